//! Row-to-time conversion.
//!
//! A [`TimingMap`] is the chart's row→seconds function: a song offset
//! plus a piecewise-constant BPM curve. The fill engine recomputes
//! every event's derived time through it after any reordering.

use alloc::vec::Vec;

use crate::note::{NoteEvent, Row, ROWS_PER_BEAT};

/// A BPM change taking effect at a row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BpmSegment {
    /// First row the BPM applies to
    pub row: Row,
    /// Beats per minute
    pub bpm: f64,
}

/// Song offset plus ordered BPM segments.
#[derive(Clone, Debug)]
pub struct TimingMap {
    /// Seconds added to every computed time (audio sync offset)
    offset: f64,
    /// BPM curve, ordered by row; the first segment starts at row 0
    segments: Vec<BpmSegment>,
}

impl TimingMap {
    /// A map with a single constant BPM and no offset.
    pub fn with_bpm(bpm: f64) -> Self {
        Self::new(0.0, alloc::vec![BpmSegment { row: 0, bpm }])
    }

    /// Build from an offset and a segment list.
    ///
    /// Segments must be ordered by row with the first at row 0.
    pub fn new(offset: f64, segments: Vec<BpmSegment>) -> Self {
        debug_assert!(!segments.is_empty());
        debug_assert!(segments[0].row == 0);
        debug_assert!(segments.windows(2).all(|w| w[0].row < w[1].row));
        Self { offset, segments }
    }

    /// Seconds at `row`. Rows before 0 extrapolate the first segment.
    pub fn time_at(&self, row: Row) -> f64 {
        let mut time = self.offset;
        let mut prev_row: Row = 0;
        let mut prev_bpm = self.segments[0].bpm;

        for seg in &self.segments[1..] {
            if seg.row >= row {
                break;
            }
            time += rows_to_seconds(seg.row - prev_row, prev_bpm);
            prev_row = seg.row;
            prev_bpm = seg.bpm;
        }

        time + rows_to_seconds(row - prev_row, prev_bpm)
    }

    /// Recompute every event's derived time from its row.
    pub fn retime(&self, events: &mut [NoteEvent]) {
        for ev in events {
            ev.time = self.time_at(ev.row);
        }
    }
}

/// Seconds spanned by `rows` rows at `bpm`. Negative rows yield
/// negative spans (used for pre-song extrapolation).
fn rows_to_seconds(rows: Row, bpm: f64) -> f64 {
    rows as f64 / ROWS_PER_BEAT as f64 * 60.0 / bpm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteKind;

    #[test]
    fn constant_bpm() {
        // 120 BPM: one beat = 0.5s, one row = 0.5/48 s
        let map = TimingMap::with_bpm(120.0);
        assert_eq!(map.time_at(0), 0.0);
        assert_eq!(map.time_at(48), 0.5);
        assert_eq!(map.time_at(96), 1.0);
    }

    #[test]
    fn offset_shifts_everything() {
        let map = TimingMap::new(1.5, alloc::vec![BpmSegment { row: 0, bpm: 120.0 }]);
        assert_eq!(map.time_at(0), 1.5);
        assert_eq!(map.time_at(48), 2.0);
    }

    #[test]
    fn bpm_change_mid_chart() {
        // 60 BPM for the first beat, then 120 BPM
        let map = TimingMap::new(
            0.0,
            alloc::vec![
                BpmSegment { row: 0, bpm: 60.0 },
                BpmSegment { row: 48, bpm: 120.0 },
            ],
        );
        assert_eq!(map.time_at(48), 1.0);
        assert_eq!(map.time_at(96), 1.5);
    }

    #[test]
    fn negative_rows_extrapolate() {
        let map = TimingMap::with_bpm(120.0);
        assert_eq!(map.time_at(-48), -0.5);
    }

    #[test]
    fn retime_rewrites_derived_times() {
        let map = TimingMap::with_bpm(120.0);
        let mut events = alloc::vec![
            NoteEvent::new(0, 0, NoteKind::Tap),
            NoteEvent::new(48, 1, NoteKind::Tap),
        ];
        events[0].time = 99.0;
        map.retime(&mut events);
        assert_eq!(events[0].time, 0.0);
        assert_eq!(events[1].time, 0.5);
    }
}
