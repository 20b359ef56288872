//! Core IR types for the stepweave fill engine.
//!
//! This crate defines the chart representation shared by the fill
//! engine and its embedding editor: rows, lanes, note events, the
//! row-to-time map, the two-feet/four-parts foot model, pad layouts
//! (step graphs), and the configuration bank that region requests
//! reference by handle.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod foot;
mod note;
mod step_graph;
mod timing;

pub use config::{
    ConfigBank, GraphConfig, PatternConfig, PatternKey, RegionRequest, SynthConfig, SynthKey,
};
pub use foot::{BoundaryFooting, Foot, FootPart, PartPlacement};
pub use note::{Lane, NoteEvent, NoteKind, Row, ROWS_PER_BEAT};
pub use step_graph::{ChartKind, StepGraph};
pub use timing::{BpmSegment, TimingMap};
