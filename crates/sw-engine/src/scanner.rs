//! Footing scanner.
//!
//! Walks the search-node chain and the event stream together, away
//! from a region boundary, to infer which foot sits on which arrow at
//! that boundary. The same loop runs in both directions; only the
//! backward (preceding) direction records an entry foot and time.

use sw_chart::{BoundaryFooting, Foot, FootPart, Row, StepGraph};

use crate::graph::{GraphSnapshot, NodeId};
use crate::note_index::{Cursor, NoteIndex};

/// Which side of the boundary a scan covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDirection {
    /// Toward earlier rows (preceding boundary)
    Backward,
    /// Toward later rows (following boundary)
    Forward,
}

/// Resolve the footing at a region boundary.
///
/// `start` is the node nearest the boundary on the scan side; `cursor`
/// must be positioned at the boundary row. Each node's row is checked
/// against the lanes actually stepped at that row, so stale graph
/// states never resolve a foot onto an arrow nothing touches.
///
/// Feet left unresolved when the chain runs out fall back to the pad's
/// root defaults. A collision (both feet on one arrow, possible when a
/// resolved foot sits on the other foot's default) resets both feet to
/// the roots. A backward scan that resolves nothing reports the left
/// foot as entry with no entry time.
pub fn scan_boundary(
    direction: ScanDirection,
    snapshot: &GraphSnapshot,
    graph: &StepGraph,
    index: &NoteIndex,
    start: Option<NodeId>,
    mut cursor: Cursor,
) -> BoundaryFooting {
    let mut footing = BoundaryFooting::empty();
    let mut occupied_row: Option<Row> = None;
    let mut occupied: u16 = 0;

    let mut next = start;
    while let Some(id) = next {
        let node = snapshot.node(id);
        if occupied_row != Some(node.row) {
            occupied = match direction {
                ScanDirection::Backward => step_lanes_backward(index, &mut cursor, node.row),
                ScanDirection::Forward => step_lanes_forward(index, &mut cursor, node.row),
            };
            occupied_row = Some(node.row);
        }

        for foot in Foot::ALL {
            if footing.lane(foot).is_some() {
                continue;
            }
            for part in FootPart::ALL {
                let placement = node.placement(foot, part);
                let Some(lane) = placement.planted_lane() else {
                    continue;
                };
                if occupied & (1 << lane) == 0 {
                    continue;
                }
                footing.set_lane(foot, lane);
                if direction == ScanDirection::Backward {
                    // Later resolutions overwrite, so the walk's last
                    // (temporally earliest) contact wins.
                    footing.entry_foot = foot;
                    footing.entry_time = Some(node.time);
                }
                break;
            }
        }

        if footing.fully_resolved() {
            break;
        }
        next = match direction {
            ScanDirection::Backward => node.prev,
            ScanDirection::Forward => node.next,
        };
    }

    for foot in Foot::ALL {
        if footing.lane(foot).is_none() {
            footing.set_lane(foot, graph.root_default(foot));
        }
    }
    if footing.collision() {
        for foot in Foot::ALL {
            footing.set_lane(foot, graph.root_default(foot));
        }
    }
    footing
}

/// Lanes with a step at exactly `row`, consuming the cursor backward
/// past that row. Mines, fakes and hold ends never occupy a lane.
fn step_lanes_backward(index: &NoteIndex, cursor: &mut Cursor, row: Row) -> u16 {
    let mut mask = 0;
    while let Some(ev) = cursor.peek_prev(index) {
        if ev.row < row {
            break;
        }
        if ev.row == row && ev.kind.is_step() {
            mask |= 1 << ev.lane;
        }
        cursor.step_back();
    }
    mask
}

/// Forward twin of [`step_lanes_backward`].
fn step_lanes_forward(index: &NoteIndex, cursor: &mut Cursor, row: Row) -> u16 {
    let mut mask = 0;
    while let Some(ev) = cursor.peek_next(index) {
        if ev.row > row {
            break;
        }
        if ev.row == row && ev.kind.is_step() {
            mask |= 1 << ev.lane;
        }
        cursor.step_forward(index);
    }
    mask
}
