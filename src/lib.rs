//! Zoomable keyframe sequencer / timeline widget for egui.
//!
//! The widget renders a pannable, zoomable timeline with nested/grouped
//! tracks, draggable keyframe markers and a draggable current-frame
//! cursor, for embedding in animation or media-timing editors. It owns no
//! data: the embedding application keeps the current frame, the range and
//! every keyframe value, and hands mutable references in once per frame.
//!
//! Layout and interaction state (zoom, pan, selection, label-column width)
//! persists per widget identity inside the egui `Context`, so the caller
//! only holds its own data.
//!
//! ```
//! use eframe::egui;
//! use egui_sequencer::{Sequencer, SequencerStyle};
//!
//! fn sequencer_panel(
//!     ui: &mut egui::Ui,
//!     style: &SequencerStyle,
//!     current: &mut u32,
//!     start: &mut u32,
//!     end: &mut u32,
//!     position_keys: &mut Vec<u32>,
//!     transform_open: &mut bool,
//! ) {
//!     Sequencer::new("sequencer").show(ui, style, current, start, end, |seq| {
//!         seq.group("Transform", transform_open, |seq| {
//!             seq.timeline("position", position_keys);
//!         });
//!     });
//! }
//! ```

pub mod sequencer;
pub mod state;
pub mod style;

pub use sequencer::{Sequencer, SequencerOptions, SequencerResponse, SequencerUi};
pub use state::{SequencerState, SessionPhase};
pub use style::{SequencerColor, SequencerStyle};
