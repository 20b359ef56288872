//! Configuration bank and region requests.
//!
//! Pattern and synthesis configurations live in slotmap banks owned by
//! the embedding editor; region requests reference them by handle so a
//! batch stays cheap to clone and immune to config edits mid-flight.

use alloc::string::String;

use arrayvec::ArrayString;
use slotmap::{new_key_type, SlotMap};

use crate::note::Row;

new_key_type! {
    /// Handle to a [`PatternConfig`] in a [`ConfigBank`].
    pub struct PatternKey;
    /// Handle to a [`SynthConfig`] in a [`ConfigBank`].
    pub struct SynthKey;
}

/// Rhythm and shape knobs for one fill pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternConfig {
    /// Display name, used in diagnostics
    pub name: ArrayString<32>,
    /// Rows between synthesized steps (24 = 8th notes)
    pub step_rows: u32,
    /// Allow two simultaneous taps
    pub allow_jumps: bool,
    /// Allow one foot on two arrows
    pub allow_brackets: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            name: ArrayString::new(),
            step_rows: 24,
            allow_jumps: false,
            allow_brackets: false,
        }
    }
}

/// Weights steering the external note synthesizer.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthConfig {
    /// Display name, used in diagnostics
    pub name: ArrayString<32>,
    /// 0..=100 preference for lane variety over repetition
    pub spread: u8,
    /// 0..=100 chance of a crossover-style placement
    pub crossover: u8,
    /// Chance per step of emitting a mine alongside
    pub mine_rate: u8,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            name: ArrayString::new(),
            spread: 50,
            crossover: 0,
            mine_rate: 0,
        }
    }
}

/// Inputs to the external expressed-chart graph builder.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphConfig {
    /// Permit bracket placements when inferring footing
    pub allow_brackets: bool,
    /// Permit footswitches on a repeated arrow
    pub allow_footswitches: bool,
}

/// Owner of pattern and synthesis configurations.
#[derive(Clone, Debug, Default)]
pub struct ConfigBank {
    patterns: SlotMap<PatternKey, PatternConfig>,
    synths: SlotMap<SynthKey, SynthConfig>,
}

impl ConfigBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pattern(&mut self, config: PatternConfig) -> PatternKey {
        self.patterns.insert(config)
    }

    pub fn add_synth(&mut self, config: SynthConfig) -> SynthKey {
        self.synths.insert(config)
    }

    /// Look up a pattern config; `None` if the handle is dangling.
    pub fn pattern(&self, key: PatternKey) -> Option<&PatternConfig> {
        self.patterns.get(key)
    }

    /// Look up a synth config; `None` if the handle is dangling.
    pub fn synth(&self, key: SynthKey) -> Option<&SynthConfig> {
        self.synths.get(key)
    }

    pub fn remove_pattern(&mut self, key: PatternKey) -> Option<PatternConfig> {
        self.patterns.remove(key)
    }

    pub fn remove_synth(&mut self, key: SynthKey) -> Option<SynthConfig> {
        self.synths.remove(key)
    }
}

/// One row range to fill, immutable once a batch begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionRequest {
    /// First row of the region
    pub start_row: Row,
    /// Last row boundary of the region
    pub end_row: Row,
    /// Whether `start_row` itself belongs to the region
    pub inclusive_start: bool,
    /// Whether `end_row` itself belongs to the region
    pub inclusive_end: bool,
    /// Pattern config handle
    pub pattern: PatternKey,
    /// Synthesis config handle
    pub synth: SynthKey,
    /// Stored seed, used when the batch runs with stored seeds
    pub seed: u64,
    /// Zero out lane tallies from rows before this region
    pub ignore_preceding_distribution: bool,
}

impl RegionRequest {
    /// A `[start, end)` request with default flags.
    pub fn new(start_row: Row, end_row: Row, pattern: PatternKey, synth: SynthKey) -> Self {
        Self {
            start_row,
            end_row,
            inclusive_start: true,
            inclusive_end: false,
            pattern,
            synth,
            seed: 0,
            ignore_preceding_distribution: false,
        }
    }

    /// True when `row` falls inside the region's span.
    pub fn contains_row(&self, row: Row) -> bool {
        let after_start = if self.inclusive_start {
            row >= self.start_row
        } else {
            row > self.start_row
        };
        let before_end = if self.inclusive_end {
            row <= self.end_row
        } else {
            row < self.end_row
        };
        after_start && before_end
    }

    /// Diagnostic description of the span.
    pub fn span_label(&self) -> String {
        use alloc::format;
        let close = if self.inclusive_end { ']' } else { ')' };
        format!("[{}, {}{close}", self.start_row, self.end_row)
    }
}
