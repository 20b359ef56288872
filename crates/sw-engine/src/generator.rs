//! Pattern generator and batch orchestration.
//!
//! Runs an ordered batch of region requests: erase each region from
//! the external index up front, then, on a private clone of the event
//! list, rebuild the expressed-chart graph as needed, scan boundary
//! footing, call the external synthesizer, and stitch each region's
//! output back in. The external index is only touched at the two
//! synchronous edges of the batch (erase before, commit after), so a
//! UI thread can read it while the middle runs in the background.
//!
//! Erasure is eager and per-region; a batch that fails midway leaves
//! erased regions empty. [`BatchOutcome::undo`] reverses a partial or
//! complete batch.

use alloc::string::String;
use alloc::vec::Vec;

use arrayvec::ArrayString;
use oorandom::Rand64;

use sw_chart::{
    BoundaryFooting, ChartKind, ConfigBank, Foot, GraphConfig, NoteEvent, PatternConfig,
    RegionRequest, Row, StepGraph, SynthConfig, TimingMap,
};

use crate::eraser::erase_region;
use crate::graph::{GraphBuild, GraphBuildError, GraphSnapshot, NodeId};
use crate::note_index::NoteIndex;
use crate::scanner::{scan_boundary, ScanDirection};
use crate::stitcher::stitch;

/// Batch-level seed policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Draw a fresh seed per region from the batch RNG
    #[default]
    Fresh,
    /// Reuse each region's stored seed
    Stored,
}

/// Knobs that apply to a whole batch.
#[derive(Clone, Copy, Debug)]
pub struct BatchOptions {
    pub seed_mode: SeedMode,
    /// Seeds the per-region fresh-seed RNG
    pub rng_seed: u64,
    /// Chart difficulty rating, passed through to the graph builder
    pub difficulty: u8,
    /// Batch label for diagnostics
    pub label: ArrayString<32>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            seed_mode: SeedMode::Fresh,
            rng_seed: 0,
            difficulty: 5,
            label: ArrayString::new(),
        }
    }
}

/// Batch-fatal conditions, checked before anything is erased.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillError {
    /// The chart kind has no pad layout
    MissingStepGraph,
    /// No expressed-chart configuration was supplied
    MissingGraphConfig,
}

/// Why one region produced no notes. Later regions still run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionError {
    GraphBuild(GraphBuildError),
    /// The request's pattern handle is dangling
    UnknownPatternConfig,
    /// The request's synth handle is dangling
    UnknownSynthConfig,
    Synth(SynthError),
}

/// External synthesizer failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthError {
    /// No viable note sequence exists for the region
    NoResult,
    /// A placement constraint became unsatisfiable at this row
    Unsatisfiable { row: Row },
}

/// Everything the external note synthesizer sees for one region.
#[derive(Debug)]
pub struct SynthRequest<'a> {
    pub graph: &'a StepGraph,
    pub pattern: &'a PatternConfig,
    pub synth: &'a SynthConfig,
    pub start_row: Row,
    pub end_row: Row,
    pub inclusive_end: bool,
    pub seed: u64,
    /// Foot that entered the chart first, from the preceding scan
    pub entry_foot: Foot,
    pub entry_time: Option<f64>,
    /// Footing at the boundary before the region
    pub before: BoundaryFooting,
    /// Footing at the boundary after the region
    pub after: BoundaryFooting,
    /// Steps per lane strictly before the region
    pub lane_steps: &'a [u32],
    /// The full working event list, for context
    pub background: &'a [NoteEvent],
    /// Diagnostic label (the region's span)
    pub label: &'a str,
}

/// External note synthesizer seam.
pub trait SynthesizeNotes {
    fn synthesize(&mut self, request: &SynthRequest<'_>) -> Result<Vec<NoteEvent>, SynthError>;
}

/// Net effect of one batch, sufficient to reverse it.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Events committed to the index, in stitch order
    pub added: Vec<NoteEvent>,
    /// Events the eraser removed, in erase order
    pub erased: Vec<NoteEvent>,
    /// Failed regions, keyed by start row
    pub failed: Vec<(Row, RegionError)>,
}

impl BatchOutcome {
    /// Reverse the batch: pull the additions back out of `index` and
    /// restore the erased events with freshly derived times.
    pub fn undo(&self, index: &mut NoteIndex, timing: &TimingMap) {
        for ev in &self.added {
            index.remove_placement(ev.row, ev.lane, ev.kind);
        }
        index.extend_retimed(&self.erased, timing);
    }
}

/// Orchestrates fill batches for one chart.
pub struct PatternGenerator<'a> {
    graph: StepGraph,
    graph_config: GraphConfig,
    bank: &'a ConfigBank,
    timing: &'a TimingMap,
    options: BatchOptions,
}

impl<'a> PatternGenerator<'a> {
    /// Validate the batch-fatal preconditions and build a generator.
    /// Fails before anything is erased.
    pub fn new(
        kind: ChartKind,
        graph_config: Option<GraphConfig>,
        bank: &'a ConfigBank,
        timing: &'a TimingMap,
        options: BatchOptions,
    ) -> Result<Self, FillError> {
        let graph = StepGraph::for_kind(kind).ok_or(FillError::MissingStepGraph)?;
        let graph_config = graph_config.ok_or(FillError::MissingGraphConfig)?;
        Ok(Self {
            graph,
            graph_config,
            bank,
            timing,
            options,
        })
    }

    /// The pad layout the generator resolved for the chart kind.
    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    /// Run a whole batch against `index`.
    ///
    /// The index is touched twice: every region is erased up front,
    /// and the accumulated additions are committed at the end. All
    /// synthesis happens on a private clone in between. Regions run in
    /// start-row order; a failed region is logged, recorded in the
    /// outcome, and skipped without mutating anything.
    pub fn fill<B: GraphBuild, S: SynthesizeNotes>(
        &self,
        index: &mut NoteIndex,
        requests: &[RegionRequest],
        builder: &B,
        synth: &mut S,
    ) -> BatchOutcome {
        let mut sorted: Vec<RegionRequest> = requests.to_vec();
        sorted.sort_by_key(|r| r.start_row);

        // Eager per-region erase, so overlapping regions never try to
        // delete the same event twice.
        let mut erased = Vec::new();
        for region in &sorted {
            let removed = erase_region(index, region);
            log::debug!(
                "batch {}: erased {} events in {}",
                self.options.label,
                removed.len(),
                region.span_label()
            );
            erased.extend(removed);
        }

        let mut working = index.clone();
        let mut rng = Rand64::new(self.options.rng_seed as u128);
        let mut snapshot = GraphSnapshot::with_root(&self.graph);
        let mut dirty = true;
        let mut lane_steps = alloc::vec![0u32; self.graph.lane_count() as usize];
        let mut tally_watermark = Row::MIN;
        let mut added = Vec::new();
        let mut failed = Vec::new();

        for i in 0..sorted.len() {
            let region = sorted[i];
            let next = sorted.get(i + 1);

            // Accumulate lane tallies for steps that entered the
            // chart since the previous region's start.
            for ev in working.events() {
                if ev.row >= region.start_row {
                    break;
                }
                if ev.row >= tally_watermark && ev.kind.is_step() {
                    lane_steps[ev.lane as usize] += 1;
                }
            }
            tally_watermark = region.start_row;

            // Prior regions' additions invalidate the graph; rebuild
            // only then.
            if dirty {
                match builder.build(
                    working.events(),
                    &self.graph,
                    &self.graph_config,
                    self.options.difficulty,
                ) {
                    Ok(built) => {
                        snapshot = built;
                        dirty = false;
                    }
                    Err(err) => {
                        log::warn!(
                            "batch {}: graph build failed before {}: {:?}",
                            self.options.label,
                            region.span_label(),
                            err
                        );
                        failed.push((region.start_row, RegionError::GraphBuild(err)));
                        continue;
                    }
                }
            }

            let seed = match self.options.seed_mode {
                SeedMode::Fresh => rng.rand_u64(),
                SeedMode::Stored => region.seed,
            };
            let zeroed: Vec<u32>;
            let region_counts: &[u32] = if region.ignore_preceding_distribution {
                zeroed = alloc::vec![0; lane_steps.len()];
                &zeroed
            } else {
                &lane_steps
            };

            match self.run_region(
                &mut working,
                &snapshot,
                &region,
                next,
                region_counts,
                seed,
                synth,
            ) {
                Ok(retained) => {
                    log::debug!(
                        "batch {}: {} kept {} events",
                        self.options.label,
                        region.span_label(),
                        retained.len()
                    );
                    if !retained.is_empty() {
                        dirty = true;
                    }
                    added.extend(retained);
                }
                Err(err) => {
                    log::warn!(
                        "batch {}: {} failed: {:?}",
                        self.options.label,
                        region.span_label(),
                        err
                    );
                    failed.push((region.start_row, err));
                }
            }
        }

        index.extend_retimed(&added, self.timing);
        log::info!(
            "batch {}: {} added, {} erased, {} regions failed",
            self.options.label,
            added.len(),
            erased.len(),
            failed.len()
        );
        BatchOutcome {
            added,
            erased,
            failed,
        }
    }

    /// Scan, synthesize and stitch one region against the working
    /// list. Returns the retained events; any error leaves `working`
    /// untouched.
    fn run_region<S: SynthesizeNotes>(
        &self,
        working: &mut NoteIndex,
        snapshot: &GraphSnapshot,
        region: &RegionRequest,
        next: Option<&RegionRequest>,
        lane_steps: &[u32],
        seed: u64,
        synth: &mut S,
    ) -> Result<Vec<NoteEvent>, RegionError> {
        let pattern = self
            .bank
            .pattern(region.pattern)
            .ok_or(RegionError::UnknownPatternConfig)?;
        let synth_config = self
            .bank
            .synth(region.synth)
            .ok_or(RegionError::UnknownSynthConfig)?;

        let cursor = working.cursor_at(region.start_row);
        let (before, after) = match snapshot.first_at_or_after(region.start_row) {
            Some(node) => {
                let prev = snapshot.node(node).prev;
                let before = scan_boundary(
                    ScanDirection::Backward,
                    snapshot,
                    &self.graph,
                    working,
                    prev,
                    cursor,
                );
                let after = scan_boundary(
                    ScanDirection::Forward,
                    snapshot,
                    &self.graph,
                    working,
                    Some(node),
                    cursor,
                );
                (before, after)
            }
            // The region starts after all existing content; only the
            // preceding boundary has anything to scan.
            None => {
                let tail = (snapshot.len() - 1) as NodeId;
                let before = scan_boundary(
                    ScanDirection::Backward,
                    snapshot,
                    &self.graph,
                    working,
                    Some(tail),
                    cursor,
                );
                let after = scan_boundary(
                    ScanDirection::Forward,
                    snapshot,
                    &self.graph,
                    working,
                    None,
                    cursor,
                );
                (before, after)
            }
        };

        let label: String = region.span_label();
        let synthesized = {
            let request = SynthRequest {
                graph: &self.graph,
                pattern,
                synth: synth_config,
                start_row: region.start_row,
                end_row: region.end_row,
                inclusive_end: region.inclusive_end,
                seed,
                entry_foot: before.entry_foot,
                entry_time: before.entry_time,
                before,
                after,
                lane_steps,
                background: working.events(),
                label: &label,
            };
            synth.synthesize(&request).map_err(RegionError::Synth)?
        };

        Ok(stitch(working, synthesized, region, next, self.timing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lights_charts_have_no_pad() {
        let bank = ConfigBank::new();
        let timing = TimingMap::with_bpm(120.0);
        let err = PatternGenerator::new(
            ChartKind::Lights,
            Some(GraphConfig::default()),
            &bank,
            &timing,
            BatchOptions::default(),
        )
        .err();
        assert_eq!(err, Some(FillError::MissingStepGraph));
    }

    #[test]
    fn missing_graph_config_is_fatal() {
        let bank = ConfigBank::new();
        let timing = TimingMap::with_bpm(120.0);
        let err =
            PatternGenerator::new(ChartKind::DanceSingle, None, &bank, &timing, BatchOptions::default())
                .err();
        assert_eq!(err, Some(FillError::MissingGraphConfig));
    }
}
