//! Pad layouts.
//!
//! A [`StepGraph`] describes the playing surface for one chart kind:
//! how many lanes it has and where each foot part rests by default.
//! The root defaults are distinct per foot by construction, so a
//! footing reset to the roots never leaves both feet on one arrow.

use crate::foot::{Foot, FootPart};
use crate::note::Lane;

/// Chart/game type a pad layout belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    DanceSingle,
    DanceDouble,
    PumpSingle,
    /// Light-show charts have no feet and no pad layout.
    Lights,
}

/// Lane count plus root placement per foot part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepGraph {
    lane_count: u8,
    roots: [[Option<Lane>; FootPart::COUNT]; Foot::COUNT],
}

impl StepGraph {
    /// 4-panel dance pad: left foot on lane 0, right foot on lane 3.
    pub const fn dance_single() -> Self {
        Self {
            lane_count: 4,
            roots: [[Some(0), None], [Some(3), None]],
        }
    }

    /// 8-panel doubles: feet start on the inner lanes of the left pad.
    pub const fn dance_double() -> Self {
        Self {
            lane_count: 8,
            roots: [[Some(0), None], [Some(3), None]],
        }
    }

    /// 5-panel pump pad: feet start on the lower corners.
    pub const fn pump_single() -> Self {
        Self {
            lane_count: 5,
            roots: [[Some(0), None], [Some(4), None]],
        }
    }

    /// Layout for a chart kind, or `None` when the kind has no pad.
    pub const fn for_kind(kind: ChartKind) -> Option<Self> {
        match kind {
            ChartKind::DanceSingle => Some(Self::dance_single()),
            ChartKind::DanceDouble => Some(Self::dance_double()),
            ChartKind::PumpSingle => Some(Self::pump_single()),
            ChartKind::Lights => None,
        }
    }

    /// Number of lanes on the pad.
    pub const fn lane_count(&self) -> u8 {
        self.lane_count
    }

    /// Root lane for one foot part, if that part has a default.
    pub const fn root_lane(&self, foot: Foot, part: FootPart) -> Option<Lane> {
        self.roots[foot.index()][part.index()]
    }

    /// Root lane for a foot (its heel default). Every layout defines
    /// one for each foot.
    pub fn root_default(&self, foot: Foot) -> Lane {
        match self.root_lane(foot, FootPart::Heel) {
            Some(lane) => lane,
            None => 0,
        }
    }
}
