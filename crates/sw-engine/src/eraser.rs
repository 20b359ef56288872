//! Region eraser.
//!
//! Clears a region's rows out of the externally-owned note index
//! before generation starts. Each region is erased independently and
//! immediately, so an overlapping later region in the same batch never
//! tries to delete an event that is already gone.

use alloc::vec::Vec;

use sw_chart::{NoteEvent, NoteKind, RegionRequest};

use crate::note_index::NoteIndex;

/// Remove a region's events from `index`, returning them in row order
/// so the caller can reverse the deletion later.
///
/// Removed: every event whose row falls in `[start, end)` (or
/// `[start, end]` for an inclusive end), plus any hold overlapping the
/// start row even when it began earlier. Hold starts and ends are
/// always removed as pairs. Erasing the same region twice removes
/// nothing the second time.
pub fn erase_region(index: &mut NoteIndex, request: &RegionRequest) -> Vec<NoteEvent> {
    let events = index.events();
    let mut marked = alloc::vec![false; events.len()];

    for (i, ev) in events.iter().enumerate() {
        let before_end = if request.inclusive_end {
            ev.row <= request.end_row
        } else {
            ev.row < request.end_row
        };
        if ev.row >= request.start_row && before_end {
            marked[i] = true;
        }
    }

    // Holds that began before the region but are still down at its
    // start row.
    for i in 0..events.len() {
        let ev = &events[i];
        if ev.kind != NoteKind::HoldStart || ev.row >= request.start_row {
            continue;
        }
        if let Some(j) = matching_hold_end(events, i) {
            if events[j].row >= request.start_row {
                marked[i] = true;
                marked[j] = true;
            }
        }
    }

    // A removed hold start takes its end with it, even past the
    // region's end row.
    for i in 0..events.len() {
        if marked[i] && events[i].kind == NoteKind::HoldStart {
            if let Some(j) = matching_hold_end(events, i) {
                marked[j] = true;
            }
        }
    }

    let indices: Vec<usize> = marked
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect();
    index.take_indices(&indices)
}

/// Index of the hold end matching the hold start at `start`: the next
/// hold end on the same lane.
fn matching_hold_end(events: &[NoteEvent], start: usize) -> Option<usize> {
    let lane = events[start].lane;
    events[start + 1..]
        .iter()
        .position(|e| e.kind == NoteKind::HoldEnd && e.lane == lane)
        .map(|p| start + 1 + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_chart::{ConfigBank, Lane, PatternConfig, Row, SynthConfig};

    fn request(start: Row, end: Row) -> RegionRequest {
        let mut bank = ConfigBank::new();
        let p = bank.add_pattern(PatternConfig::default());
        let s = bank.add_synth(SynthConfig::default());
        RegionRequest::new(start, end, p, s)
    }

    fn index_of(events: &[(Row, Lane, NoteKind)]) -> NoteIndex {
        let mut index = NoteIndex::new();
        for &(row, lane, kind) in events {
            index.insert(NoteEvent::new(row, lane, kind));
        }
        index
    }

    fn rows(index: &NoteIndex) -> Vec<Row> {
        index.events().iter().map(|e| e.row).collect()
    }

    #[test]
    fn half_open_window() {
        let mut index = index_of(&[
            (0, 0, NoteKind::Tap),
            (8, 1, NoteKind::Tap),
            (12, 2, NoteKind::Mine),
            (16, 3, NoteKind::Tap),
        ]);
        let erased = erase_region(&mut index, &request(8, 16));
        assert_eq!(erased.len(), 2);
        assert_eq!(rows(&index), [0, 16]);
    }

    #[test]
    fn inclusive_end_takes_the_boundary_row() {
        let mut index = index_of(&[(8, 0, NoteKind::Tap), (16, 1, NoteKind::Tap)]);
        let mut req = request(8, 16);
        req.inclusive_end = true;
        let erased = erase_region(&mut index, &req);
        assert_eq!(erased.len(), 2);
        assert!(index.is_empty());
    }

    #[test]
    fn hold_spanning_the_start_goes_entirely() {
        // Hold on lane 2 from row 0 to row 24, region [8, 16): the
        // hold is down at row 8, so both ends go even though neither
        // lies inside the window.
        let mut index = index_of(&[
            (0, 2, NoteKind::HoldStart),
            (4, 0, NoteKind::Tap),
            (24, 2, NoteKind::HoldEnd),
        ]);
        let erased = erase_region(&mut index, &request(8, 16));
        assert_eq!(
            erased.iter().map(|e| e.kind).collect::<Vec<_>>(),
            [NoteKind::HoldStart, NoteKind::HoldEnd]
        );
        assert_eq!(rows(&index), [4]);
    }

    #[test]
    fn hold_ending_before_the_start_survives() {
        let mut index = index_of(&[
            (0, 2, NoteKind::HoldStart),
            (4, 2, NoteKind::HoldEnd),
            (10, 0, NoteKind::Tap),
        ]);
        let erased = erase_region(&mut index, &request(8, 16));
        assert_eq!(erased.len(), 1);
        assert_eq!(rows(&index), [0, 4]);
    }

    #[test]
    fn hold_starting_inside_takes_its_end_along() {
        let mut index = index_of(&[(12, 1, NoteKind::HoldStart), (32, 1, NoteKind::HoldEnd)]);
        let erased = erase_region(&mut index, &request(8, 16));
        assert_eq!(erased.len(), 2);
        assert!(index.is_empty());
    }

    #[test]
    fn erasing_twice_is_a_no_op() {
        let mut index = index_of(&[(8, 0, NoteKind::Tap), (12, 1, NoteKind::Tap)]);
        let req = request(8, 16);
        assert_eq!(erase_region(&mut index, &req).len(), 2);
        assert!(erase_region(&mut index, &req).is_empty());
    }
}
