//! Per-identity persistent sequencer state, kept in egui memory.
//!
//! One [`SequencerState`] exists per widget identity (the enclosing egui ID
//! scope combined with the caller's label). It is created lazily on first
//! use and lives for as long as the hosting `Context` does; per-session
//! transients (nesting depth, row cursors) live on the session handle
//! instead and are rebuilt every frame.

use eframe::egui::{Color32, Context, Id, Vec2};
use serde::{Deserialize, Serialize};

/// Session lifecycle of a context: at most one sequencer session may be
/// open per [`Context`] at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    FrameOpen,
}

impl SessionPhase {
    fn store_id() -> Id {
        Id::new("egui_sequencer::session_phase")
    }

    /// Current phase of `ctx`.
    pub fn get(ctx: &Context) -> Self {
        ctx.memory_mut(|mem| mem.data.get_temp(Self::store_id()))
            .unwrap_or_default()
    }

    pub(crate) fn set(ctx: &Context, phase: SessionPhase) {
        ctx.memory_mut(|mem| mem.data.insert_temp(Self::store_id(), phase));
    }
}

/// Persistent layout/interaction state of one sequencer widget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SequencerState {
    /// Range start seen by the last session (caller-owned value).
    pub start_frame: u32,
    /// Range end seen by the last session (caller-owned value).
    pub end_frame: u32,
    /// Pan position, in frames.
    pub offset_frame: u32,
    /// View zoom factor, > 0; 1.0 shows the whole range.
    pub zoom: f32,
    /// Width of the label column; grows to the widest label seen.
    pub values_width: f32,
    /// Content height accumulated by the last session, consumed as the
    /// auto-height fallback of the next one.
    pub filled_height: f32,
    /// Resolved size of the last session.
    pub size: Vec2,
    /// Size of the top-bar ruler strip.
    pub top_bar_size: Vec2,
    /// Identity of the selected row, `None` when nothing is selected.
    pub selected_row: Option<Id>,
    /// Current-frame value seen by the last session.
    pub current_frame: u32,
    /// True while the current-frame pointer is being dragged.
    pub holding_current_frame: bool,
    /// Pointer color decided during input processing; painted at session
    /// close, once the final content height is known.
    pub current_frame_color: Color32,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: 0,
            offset_frame: 0,
            zoom: 1.0,
            values_width: 32.0,
            filled_height: 0.0,
            size: Vec2::ZERO,
            top_bar_size: Vec2::ZERO,
            selected_row: None,
            current_frame: 0,
            holding_current_frame: false,
            current_frame_color: Color32::TRANSPARENT,
        }
    }
}

impl SequencerState {
    /// Loads the state stored under `id`, default-initializing on first
    /// access.
    pub fn load(ctx: &Context, id: Id) -> Self {
        ctx.memory_mut(|mem| mem.data.get_temp(id)).unwrap_or_default()
    }

    /// Writes the state back under `id`.
    pub fn store(self, ctx: &Context, id: Id) {
        ctx.memory_mut(|mem| mem.data.insert_temp(id, self));
    }

    /// Click semantics of row selection: toggles the clicked row off,
    /// otherwise replaces whatever was selected before.
    pub fn toggle_selected(&mut self, row: Id) {
        self.selected_row = if self.selected_row == Some(row) {
            None
        } else {
            Some(row)
        };
    }

    /// Widens the label column to `width` if it is larger; never shrinks.
    pub fn grow_values_width(&mut self, width: f32) {
        if self.values_width < width {
            self.values_width = width;
        }
    }
}
