//! Sequencer widget - zoomable keyframe timeline with nested tracks.
//!
//! One `Sequencer::show` call renders one session: background chrome and
//! frame ruler, the draggable current-frame cursor, the caller's rows and
//! the bottom pan/zoom bar.

mod helpers;
mod rows;
mod sequencer;

pub use sequencer::{Sequencer, SequencerOptions, SequencerResponse, SequencerUi};
