//! Pattern stitcher.
//!
//! Merges one region's synthesized events into the working list.
//! Where the next region overlaps, the tail of this region's output is
//! cut so the next region's own synthesis stays authoritative for the
//! shared rows.

use alloc::vec::Vec;

use sw_chart::{NoteEvent, NoteKind, RegionRequest, TimingMap};

use crate::note_index::NoteIndex;

/// Merge `synthesized` into `working` and return the retained events,
/// retimed, as pending additions for the final commit.
///
/// Truncation keeps only rows strictly before the next region's start
/// when that start lies inside this region's span (strictly before its
/// end row, or equal to it when this end and the next start are both
/// inclusive). Hold starts whose ends fall past the cut are dropped so
/// hold pairs stay balanced.
pub fn stitch(
    working: &mut NoteIndex,
    mut synthesized: Vec<NoteEvent>,
    region: &RegionRequest,
    next: Option<&RegionRequest>,
    timing: &TimingMap,
) -> Vec<NoteEvent> {
    if let Some(next) = next {
        let overlaps = next.start_row < region.end_row
            || (next.start_row == region.end_row && region.inclusive_end && next.inclusive_start);
        if overlaps {
            synthesized.retain(|e| e.row < next.start_row);
            drop_orphaned_hold_starts(&mut synthesized);
        }
    }
    timing.retime(&mut synthesized);
    working.extend_retimed(&synthesized, timing);
    synthesized
}

/// Remove hold starts with no later hold end on the same lane.
fn drop_orphaned_hold_starts(events: &mut Vec<NoteEvent>) {
    let mut keep = alloc::vec![true; events.len()];
    for i in 0..events.len() {
        if events[i].kind != NoteKind::HoldStart {
            continue;
        }
        let lane = events[i].lane;
        keep[i] = events[i + 1..]
            .iter()
            .any(|e| e.kind == NoteKind::HoldEnd && e.lane == lane);
    }
    let mut i = 0;
    events.retain(|_| {
        let k = keep[i];
        i += 1;
        k
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_chart::{ConfigBank, Lane, NoteKind, PatternConfig, Row, SynthConfig};

    fn request(start: Row, end: Row) -> RegionRequest {
        let mut bank = ConfigBank::new();
        let p = bank.add_pattern(PatternConfig::default());
        let s = bank.add_synth(SynthConfig::default());
        RegionRequest::new(start, end, p, s)
    }

    fn tap(row: Row, lane: Lane) -> NoteEvent {
        NoteEvent::new(row, lane, NoteKind::Tap)
    }

    #[test]
    fn last_region_keeps_everything() {
        let timing = TimingMap::with_bpm(120.0);
        let mut working = NoteIndex::new();
        let retained = stitch(
            &mut working,
            alloc::vec![tap(10, 0), tap(14, 1)],
            &request(10, 20),
            None,
            &timing,
        );
        assert_eq!(retained.len(), 2);
        assert_eq!(working.len(), 2);
    }

    #[test]
    fn overlap_truncates_at_next_start() {
        let timing = TimingMap::with_bpm(120.0);
        let mut working = NoteIndex::new();
        let synthesized = alloc::vec![tap(10, 0), tap(14, 1), tap(15, 2), tap(18, 3)];
        let retained = stitch(
            &mut working,
            synthesized,
            &request(10, 20),
            Some(&request(15, 25)),
            &timing,
        );
        let rows: Vec<Row> = retained.iter().map(|e| e.row).collect();
        assert_eq!(rows, [10, 14]);
        assert_eq!(working.len(), 2);
    }

    #[test]
    fn touching_inclusive_boundaries_truncate() {
        let timing = TimingMap::with_bpm(120.0);
        let mut working = NoteIndex::new();
        let mut region = request(5, 10);
        region.inclusive_end = true;
        let retained = stitch(
            &mut working,
            alloc::vec![tap(5, 0), tap(10, 1)],
            &region,
            Some(&request(10, 16)),
            &timing,
        );
        assert_eq!(retained.iter().map(|e| e.row).collect::<Vec<_>>(), [5]);
    }

    #[test]
    fn disjoint_next_region_leaves_output_alone() {
        let timing = TimingMap::with_bpm(120.0);
        let mut working = NoteIndex::new();
        let retained = stitch(
            &mut working,
            alloc::vec![tap(10, 0), tap(18, 1)],
            &request(10, 20),
            Some(&request(20, 30)),
            &timing,
        );
        assert_eq!(retained.len(), 2);
    }

    #[test]
    fn truncation_drops_orphaned_hold_starts() {
        let timing = TimingMap::with_bpm(120.0);
        let mut working = NoteIndex::new();
        let synthesized = alloc::vec![
            tap(10, 0),
            NoteEvent::new(12, 1, NoteKind::HoldStart),
            NoteEvent::new(18, 1, NoteKind::HoldEnd),
        ];
        let retained = stitch(
            &mut working,
            synthesized,
            &request(10, 20),
            Some(&request(15, 25)),
            &timing,
        );
        assert_eq!(retained.iter().map(|e| e.row).collect::<Vec<_>>(), [10]);
    }

    #[test]
    fn merge_retimes_into_the_working_list() {
        let timing = TimingMap::with_bpm(120.0);
        let mut working = NoteIndex::new();
        working.insert(tap(0, 0));
        let retained = stitch(
            &mut working,
            alloc::vec![tap(48, 1)],
            &request(48, 96),
            None,
            &timing,
        );
        assert_eq!(retained[0].time, 0.5);
        assert_eq!(working.events()[1].time, 0.5);
    }
}
