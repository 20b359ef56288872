//! Procedural fill engine for step charts.
//!
//! Takes an ordered batch of region requests against a chart's event
//! index and replaces each region with freshly synthesized steps: the
//! eraser clears the target rows, the footing scanner infers which
//! foot sits where at each region boundary, an external synthesizer
//! produces the notes, and the stitcher merges them back so
//! overlapping regions never double-fill a row.
//!
//! The graph builder and note synthesizer are collaborator seams
//! ([`GraphBuild`], [`SynthesizeNotes`]); this crate owns everything
//! between them.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod eraser;
mod generator;
mod graph;
mod note_index;
mod scanner;
mod stitcher;

pub use eraser::erase_region;
pub use generator::{
    BatchOptions, BatchOutcome, FillError, PatternGenerator, RegionError, SeedMode, SynthError,
    SynthRequest, SynthesizeNotes,
};
pub use graph::{GraphBuild, GraphBuildError, GraphSnapshot, LinkKind, NodeId, SearchNode};
pub use note_index::{Cursor, NoteIndex};
pub use scanner::{scan_boundary, ScanDirection};
pub use stitcher::stitch;
