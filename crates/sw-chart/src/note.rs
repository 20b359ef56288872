//! Note event types for step charts.

/// Integer chart-position subdivision. All event placement happens in
/// rows; conversion to real time goes through [`crate::TimingMap`].
pub type Row = i32;

/// Physical arrow/column index on the playing surface.
pub type Lane = u8;

/// Rows per beat. 48 divides evenly by every common note subdivision
/// (4ths, 8ths, 12ths, 16ths, 24ths, 48ths).
pub const ROWS_PER_BEAT: i32 = 48;

/// What a note event does when the player reaches its row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// A plain tap
    #[default]
    Tap,
    /// Start of a hold (the matching end is a separate event)
    HoldStart,
    /// End of a hold
    HoldEnd,
    /// A mine (never stepped on)
    Mine,
    /// A fake / decorative marker (never stepped on)
    Fake,
}

impl NoteKind {
    /// True for the kinds that put a foot on an arrow.
    pub const fn is_step(self) -> bool {
        matches!(self, NoteKind::Tap | NoteKind::HoldStart)
    }
}

/// A concrete note event in a chart.
///
/// `time` is derived from `row` and must be recomputed via
/// [`crate::TimingMap`] whenever row ordering changes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoteEvent {
    /// Chart row
    pub row: Row,
    /// Arrow/column
    pub lane: Lane,
    /// Event kind
    pub kind: NoteKind,
    /// Derived time in seconds
    pub time: f64,
}

impl NoteEvent {
    /// Create an event with an unresolved (zero) time.
    pub const fn new(row: Row, lane: Lane, kind: NoteKind) -> Self {
        Self {
            row,
            lane,
            kind,
            time: 0.0,
        }
    }

    /// The row/lane/kind triple, ignoring the derived time.
    pub const fn placement(&self) -> (Row, Lane, NoteKind) {
        (self.row, self.lane, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_kinds() {
        assert!(NoteKind::Tap.is_step());
        assert!(NoteKind::HoldStart.is_step());
        assert!(!NoteKind::HoldEnd.is_step());
        assert!(!NoteKind::Mine.is_step());
        assert!(!NoteKind::Fake.is_step());
    }

    #[test]
    fn placement_ignores_time() {
        let mut ev = NoteEvent::new(96, 2, NoteKind::Tap);
        let before = ev.placement();
        ev.time = 1.25;
        assert_eq!(ev.placement(), before);
    }
}
