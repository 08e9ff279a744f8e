//! Sequencer frame controller: session open/close, background chrome, the
//! current-frame cursor and the bottom pan/zoom bar.
//!
//! One session spans one `show` call. Input on the current-frame pointer is
//! processed while opening (before rows are laid out), but the pointer is
//! painted while closing, once the final content height is known; the color
//! picked during input processing is carried across in session state.

use eframe::egui::{
    Align, Button, DragValue, Id, Layout, Pos2, Rect, Response, Sense, Ui, UiBuilder, Vec2,
};
use log::{debug, trace};

use super::helpers;
use crate::state::{SequencerState, SessionPhase};
use crate::style::{SequencerColor, SequencerStyle};

/// Zoom is kept strictly positive; the step buttons stop here.
const MIN_ZOOM: f32 = 0.01;

/// Named configuration switches of [`Sequencer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SequencerOptions {
    /// Hide the start/end range editor strip above the top bar.
    pub hide_zoom: bool,
    /// Allow editing the range in the editor strip; read-only otherwise.
    pub allow_length_editing: bool,
}

/// Builder for one sequencer session.
///
/// The session body receives a [`SequencerUi`] handle; rows are added
/// through it and the close logic runs when the body returns, so begin/end
/// pairs cannot be mismatched.
#[derive(Clone, Debug)]
pub struct Sequencer<'a> {
    label: &'a str,
    desired_size: Vec2,
    options: SequencerOptions,
}

impl<'a> Sequencer<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            desired_size: Vec2::ZERO,
            options: SequencerOptions::default(),
        }
    }

    /// Requested size. Non-positive axes fall back to the available width
    /// and the previous session's content height.
    pub fn desired_size(mut self, size: Vec2) -> Self {
        self.desired_size = size;
        self
    }

    pub fn options(mut self, options: SequencerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn hide_zoom(mut self, hide: bool) -> Self {
        self.options.hide_zoom = hide;
        self
    }

    pub fn allow_length_editing(mut self, allow: bool) -> Self {
        self.options.allow_length_editing = allow;
        self
    }

    /// Opens the session, runs `add_contents` with the session handle and
    /// closes the session.
    ///
    /// Returns `None` without rendering when the enclosing region is not
    /// visible. Panics if another sequencer session is already open on
    /// this context.
    pub fn show<R>(
        self,
        ui: &mut Ui,
        style: &SequencerStyle,
        current_frame: &mut u32,
        start_frame: &mut u32,
        end_frame: &mut u32,
        add_contents: impl FnOnce(&mut SequencerUi<'_, '_>) -> R,
    ) -> Option<SequencerResponse<R>> {
        let ctx = ui.ctx().clone();
        assert_eq!(
            SessionPhase::get(&ctx),
            SessionPhase::Idle,
            "Sequencer::show called while another sequencer session is open"
        );
        if !ui.is_visible() {
            return None;
        }

        let seq_id = ui.id().with(self.label);
        let mut state = SequencerState::load(&ctx, seq_id);
        SessionPhase::set(&ctx, SessionPhase::FrameOpen);

        let cursor = ui.cursor().min;
        let avail = ui.available_size();

        let mut size = self.desired_size.floor();
        if size.x <= 0.0 {
            size.x = avail.x.max(4.0);
        }
        if size.y <= 0.0 {
            size.y = state.filled_height.max(4.0);
        }
        if size.y < state.filled_height {
            size.y = state.filled_height;
        }

        state.start_frame = *start_frame;
        state.end_frame = *end_frame;
        state.size = size;

        trace!(
            "sequencer {:?}: size={:?} zoom={} offset={}",
            seq_id, size, state.zoom, state.offset_frame
        );

        let panel_rect = Rect::from_min_size(cursor, size);
        if ui.is_rect_visible(panel_rect) {
            ui.painter().rect_filled(
                panel_rect,
                style.rounding,
                style.color(SequencerColor::Background),
            );
        }

        let mut top_origin_y = cursor.y;
        if !self.options.hide_zoom {
            let editor_rect =
                Rect::from_min_size(cursor, Vec2::new(size.x, style.range_editor_height));
            range_editor(
                ui,
                self.options.allow_length_editing,
                editor_rect,
                start_frame,
                end_frame,
            );
            // edits take effect within this session
            state.start_frame = *start_frame;
            state.end_frame = *end_frame;
            top_origin_y += style.range_editor_height;
        }

        let start_cursor = Pos2::new(cursor.x, top_origin_y);
        let top_bar_rect =
            Rect::from_min_size(start_cursor, Vec2::new(size.x, style.top_bar_height));
        let track_min_x = cursor.x + state.values_width + style.item_spacing.x;
        let pfw = helpers::per_frame_width(
            size.x,
            state.values_width,
            state.start_frame,
            state.end_frame,
            state.zoom,
        );

        if ui.is_rect_visible(top_bar_rect) {
            helpers::draw_top_bar_ruler(
                ui.painter(),
                style,
                top_bar_rect,
                track_min_x,
                pfw,
                state.offset_frame,
            );
        }

        state.top_bar_size = top_bar_rect.size();
        let start_values_cursor = Pos2::new(
            cursor.x,
            start_cursor.y + state.top_bar_size.y + style.top_bar_spacing,
        );
        state.filled_height =
            (top_origin_y - cursor.y) + state.top_bar_size.y + style.top_bar_spacing;

        process_current_frame(
            ui,
            style,
            &mut state,
            current_frame,
            seq_id,
            start_cursor,
            track_min_x,
            size,
            pfw,
        );

        let mut seq_ui = SequencerUi {
            ui,
            style,
            state,
            seq_id,
            start_cursor,
            start_values_cursor,
            values_cursor: start_values_cursor,
            depth: 0,
            row_height: 0.0,
        };
        let inner = add_contents(&mut seq_ui);
        debug_assert_eq!(seq_ui.depth, 0, "row nesting did not return to zero");

        let SequencerUi { ui, mut state, .. } = seq_ui;

        // paint phase: consume the color cached during input processing
        let pfw = helpers::per_frame_width(
            size.x,
            state.values_width,
            state.start_frame,
            state.end_frame,
            state.zoom,
        );
        let pointer_bb = helpers::current_frame_pointer_rect(
            style,
            start_cursor,
            state.values_width,
            state.current_frame,
            state.offset_frame,
            pfw,
        );
        let rows_bottom = cursor.y + state.filled_height;
        if ui.is_rect_visible(pointer_bb) {
            helpers::draw_current_frame_pointer(
                ui.painter(),
                style,
                pointer_bb,
                rows_bottom,
                state.current_frame_color,
            );
        }

        state.size.y = state.filled_height;

        let zoom_bar_rect = Rect::from_min_size(
            Pos2::new(cursor.x, cursor.y + state.size.y),
            Vec2::new(size.x, style.zoom_bar_height),
        );
        let total_rect = Rect::from_min_size(
            cursor,
            Vec2::new(size.x, state.size.y + style.zoom_bar_height),
        );
        let response = ui.allocate_rect(total_rect, Sense::hover());

        zoom_pan_bar(ui, style, &mut state, seq_id, zoom_bar_rect);

        state.store(&ctx, seq_id);
        SessionPhase::set(&ctx, SessionPhase::Idle);

        Some(SequencerResponse { inner, response })
    }
}

/// Result of [`Sequencer::show`].
#[derive(Debug)]
pub struct SequencerResponse<R> {
    /// Return value of the session body.
    pub inner: R,
    /// Response covering the whole widget, pan/zoom bar included.
    pub response: Response,
}

/// Handle to an open sequencer session; rows are added through it.
pub struct SequencerUi<'u, 's> {
    pub(super) ui: &'u mut Ui,
    pub(super) style: &'s SequencerStyle,
    pub(super) state: SequencerState,
    pub(super) seq_id: Id,
    pub(super) start_cursor: Pos2,
    pub(super) start_values_cursor: Pos2,
    pub(super) values_cursor: Pos2,
    pub(super) depth: u32,
    pub(super) row_height: f32,
}

impl SequencerUi<'_, '_> {
    /// Identity of this session, usable with [`SequencerState::load`].
    pub fn id(&self) -> Id {
        self.seq_id
    }

    /// Current row nesting depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Snapshot of the session state (zoom, pan, selection, column width).
    pub fn state(&self) -> &SequencerState {
        &self.state
    }
}

/// Two numeric fields for the frame range, left/right aligned over the
/// editor strip; read-only unless length editing is allowed.
fn range_editor(
    ui: &mut Ui,
    allow_edit: bool,
    rect: Rect,
    start_frame: &mut u32,
    end_frame: &mut u32,
) {
    let field_size = Vec2::new(64.0, rect.height());

    let left = Rect::from_min_size(rect.min, field_size);
    let mut left_ui = ui.new_child(
        UiBuilder::new()
            .max_rect(left)
            .layout(Layout::left_to_right(Align::Center))
            .id_salt("range_start"),
    );
    left_ui.add_enabled(allow_edit, DragValue::new(start_frame).speed(1.0));

    let right = Rect::from_min_size(
        Pos2::new(rect.max.x - field_size.x, rect.min.y),
        field_size,
    );
    let mut right_ui = ui.new_child(
        UiBuilder::new()
            .max_rect(right)
            .layout(Layout::right_to_left(Align::Center))
            .id_salt("range_end"),
    );
    right_ui.add_enabled(allow_edit, DragValue::new(end_frame).speed(1.0));
}

/// Hit-tests the pointer handle and, while held, remaps the pointer's
/// horizontal position into a frame value. Only decides colors and state;
/// painting happens at session close.
#[allow(clippy::too_many_arguments)]
fn process_current_frame(
    ui: &mut Ui,
    style: &SequencerStyle,
    state: &mut SequencerState,
    frame: &mut u32,
    seq_id: Id,
    start_cursor: Pos2,
    track_min_x: f32,
    size: Vec2,
    pfw: f32,
) {
    state.current_frame = *frame;

    let bb = helpers::current_frame_pointer_rect(
        style,
        start_cursor,
        state.values_width,
        *frame,
        state.offset_frame,
        pfw,
    )
    .expand(2.0);
    if !ui.is_rect_visible(bb) {
        return;
    }

    let response = ui.interact(bb, seq_id.with("frame_pointer"), Sense::click_and_drag());

    let mut color = style.color(SequencerColor::FramePointer);
    if response.hovered() {
        color = style.color(SequencerColor::FramePointerHovered);
    }

    if state.holding_current_frame {
        if response.dragged() || response.is_pointer_button_down_on() {
            if let Some(pos) = response.interact_pointer_pos() {
                let work_width =
                    helpers::work_timeline_width(size.x, state.values_width, pfw);
                *frame = helpers::frame_from_pointer(
                    pos.x,
                    track_min_x,
                    work_width,
                    state.start_frame,
                    state.end_frame,
                    state.zoom,
                    state.offset_frame,
                );
                color = style.color(SequencerColor::FramePointerPressed);
            }
        }

        if !ui.input(|i| i.pointer.primary_down()) {
            state.holding_current_frame = false;
            color = style.color(SequencerColor::FramePointer);
        }
    }

    if response.is_pointer_button_down_on() && !state.holding_current_frame {
        state.holding_current_frame = true;
        color = style.color(SequencerColor::FramePointerPressed);
    }

    state.current_frame = *frame;
    state.current_frame_color = color;
}

/// Inline pan control below the rows: `<` / `>` buttons nudge zoom while
/// held, the bar between them pans the view. The thumb width shows the
/// viewport fraction (higher zoom, smaller thumb).
fn zoom_pan_bar(
    ui: &mut Ui,
    style: &SequencerStyle,
    state: &mut SequencerState,
    seq_id: Id,
    bar_rect: Rect,
) {
    let step_size = Vec2::new(style.zoom_step_width, bar_rect.height());

    let left_rect = Rect::from_min_size(bar_rect.min, step_size);
    if ui.put(left_rect, Button::new("<").small()).is_pointer_button_down_on() {
        state.zoom = (state.zoom - style.zoom_step).max(MIN_ZOOM);
    }

    let right_rect = Rect::from_min_size(
        Pos2::new(bar_rect.max.x - style.zoom_step_width, bar_rect.min.y),
        step_size,
    );
    if ui.put(right_rect, Button::new(">").small()).is_pointer_button_down_on() {
        state.zoom += style.zoom_step;
    }

    let pan_rect = Rect::from_min_max(
        Pos2::new(left_rect.max.x, bar_rect.min.y),
        Pos2::new(right_rect.min.x, bar_rect.max.y),
    );
    let response = ui.interact(pan_rect, seq_id.with("pan_bar"), Sense::click_and_drag());

    if ui.is_rect_visible(pan_rect) {
        let painter = ui.painter();
        painter.rect_filled(
            pan_rect,
            style.rounding,
            style.color(SequencerColor::ZoomBarBackground),
        );

        let frac = (1.0 / state.zoom).clamp(0.0, 1.0);
        let thumb_w = (pan_rect.width() * frac).max(4.0);
        let end = state.end_frame.max(1);
        let norm = (state.offset_frame as f32 / end as f32).clamp(0.0, 1.0);
        let thumb = Rect::from_min_size(
            Pos2::new(
                pan_rect.min.x + norm * (pan_rect.width() - thumb_w),
                pan_rect.min.y + 1.0,
            ),
            Vec2::new(thumb_w, pan_rect.height() - 2.0),
        );
        painter.rect_filled(thumb, style.rounding, style.color(SequencerColor::ZoomBarSlider));

        let cap = Vec2::new(2.0, thumb.height());
        painter.rect_filled(
            Rect::from_min_size(thumb.min, cap),
            0.0,
            style.color(SequencerColor::ZoomBarSliderEnds),
        );
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(thumb.max.x - cap.x, thumb.min.y), cap),
            0.0,
            style.color(SequencerColor::ZoomBarSliderEnds),
        );
    }

    if response.dragged() || response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let ratio = ((pos.x - pan_rect.min.x) / pan_rect.width()).clamp(0.0, 1.0);
            let new_offset = (ratio * state.end_frame as f32).round() as u32;
            if new_offset != state.offset_frame {
                debug!("pan offset {} -> {}", state.offset_frame, new_offset);
                state.offset_frame = new_offset;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{self, Event, Modifiers, PointerButton, RawInput};

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn base_input() -> RawInput {
        RawInput {
            screen_rect: Some(screen()),
            ..Default::default()
        }
    }

    fn pointer_press(pos: Pos2) -> RawInput {
        let mut input = base_input();
        input.events = vec![
            Event::PointerMoved(pos),
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: true,
                modifiers: Modifiers::default(),
            },
        ];
        input
    }

    fn pointer_move(pos: Pos2) -> RawInput {
        let mut input = base_input();
        input.events = vec![Event::PointerMoved(pos)];
        input
    }

    fn pointer_release(pos: Pos2) -> RawInput {
        let mut input = base_input();
        input.events = vec![Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed: false,
            modifiers: Modifiers::default(),
        }];
        input
    }

    struct Probe {
        rect: Rect,
        values_width: f32,
        holding: bool,
        filled_height: f32,
    }

    #[allow(clippy::too_many_arguments)]
    fn run_session(
        ctx: &egui::Context,
        input: RawInput,
        style: &SequencerStyle,
        current: &mut u32,
        start: &mut u32,
        end: &mut u32,
    ) -> Probe {
        let mut probe = Probe {
            rect: Rect::NOTHING,
            values_width: 0.0,
            holding: false,
            filled_height: 0.0,
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let resp = Sequencer::new("drag_seq")
                    .hide_zoom(true)
                    .show(ui, style, current, start, end, |seq| {
                        probe.values_width = seq.state().values_width;
                        probe.holding = seq.state().holding_current_frame;
                        probe.filled_height = seq.state().filled_height;
                    })
                    .expect("sequencer did not render");
                probe.rect = resp.response.rect;
            });
        });
        probe
    }

    #[test]
    fn test_show_returns_inner_value_and_goes_idle() {
        let ctx = egui::Context::default();
        let style = SequencerStyle::default();
        let (mut cur, mut start, mut end) = (5u32, 0u32, 100u32);

        let mut inner = 0;
        let _ = ctx.run(base_input(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let resp = Sequencer::new("seq")
                    .show(ui, &style, &mut cur, &mut start, &mut end, |_seq| 42)
                    .unwrap();
                inner = resp.inner;
            });
        });

        assert_eq!(inner, 42);
        assert_eq!(SessionPhase::get(&ctx), SessionPhase::Idle);
    }

    #[test]
    #[should_panic(expected = "another sequencer session")]
    fn test_second_open_session_panics() {
        let ctx = egui::Context::default();
        let style = SequencerStyle::default();
        let (mut c1, mut s1, mut e1) = (0u32, 0u32, 100u32);
        let (mut c2, mut s2, mut e2) = (0u32, 0u32, 100u32);

        let _ = ctx.run(base_input(), |ctx| {
            let overlay_ctx = ctx.clone();
            egui::CentralPanel::default().show(ctx, |ui| {
                Sequencer::new("outer").show(ui, &style, &mut c1, &mut s1, &mut e1, |_seq| {
                    egui::Area::new(egui::Id::new("overlay")).show(&overlay_ctx, |ui| {
                        Sequencer::new("inner")
                            .show(ui, &style, &mut c2, &mut s2, &mut e2, |_seq| {});
                    });
                });
            });
        });
    }

    #[test]
    fn test_sequential_sessions_are_allowed() {
        let ctx = egui::Context::default();
        let style = SequencerStyle::default();
        let (mut c1, mut s1, mut e1) = (0u32, 0u32, 100u32);
        let (mut c2, mut s2, mut e2) = (0u32, 0u32, 50u32);

        let _ = ctx.run(base_input(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                Sequencer::new("first").show(ui, &style, &mut c1, &mut s1, &mut e1, |_seq| {});
                Sequencer::new("second").show(ui, &style, &mut c2, &mut s2, &mut e2, |_seq| {});
            });
        });
        assert_eq!(SessionPhase::get(&ctx), SessionPhase::Idle);
    }

    #[test]
    fn test_widget_rect_matches_content_height() {
        let ctx = egui::Context::default();
        let style = SequencerStyle::default();
        let (mut cur, mut start, mut end) = (0u32, 0u32, 100u32);

        // first pass establishes the content height
        run_session(&ctx, base_input(), &style, &mut cur, &mut start, &mut end);
        let probe = run_session(&ctx, base_input(), &style, &mut cur, &mut start, &mut end);

        let expected = probe.filled_height + style.zoom_bar_height;
        assert!(
            (probe.rect.height() - expected).abs() < 0.5,
            "rect height {} != filled {} + zoom bar {}",
            probe.rect.height(),
            probe.filled_height,
            style.zoom_bar_height
        );
    }

    #[test]
    fn test_current_frame_pointer_drag_remaps_to_track_edges() {
        let ctx = egui::Context::default();
        let style = SequencerStyle::default();
        let (mut cur, mut start, mut end) = (0u32, 0u32, 100u32);

        // establish layout
        let probe = run_session(&ctx, base_input(), &style, &mut cur, &mut start, &mut end);
        let rect = probe.rect;
        let vw = probe.values_width;

        let pfw = (rect.width() - vw) / 100.0;
        let track_min_x = rect.min.x + vw + style.item_spacing.x;
        let work_width = rect.width() - vw - pfw;
        let handle = Pos2::new(track_min_x, rect.min.y + 8.0);

        // press on the handle: drag starts, frame untouched
        let probe = run_session(
            &ctx,
            pointer_press(handle),
            &style,
            &mut cur,
            &mut start,
            &mut end,
        );
        assert!(probe.holding, "press on the pointer should start a drag");
        assert_eq!(cur, 0);

        // drag to the right edge of the working width
        let right_edge = Pos2::new(track_min_x + work_width, rect.min.y + 8.0);
        run_session(
            &ctx,
            pointer_move(right_edge),
            &style,
            &mut cur,
            &mut start,
            &mut end,
        );
        assert_eq!(cur, 100, "right edge of the track maps to the range end");

        // drag to the midpoint
        let midpoint = Pos2::new(track_min_x + work_width / 2.0, rect.min.y + 8.0);
        run_session(
            &ctx,
            pointer_move(midpoint),
            &style,
            &mut cur,
            &mut start,
            &mut end,
        );
        assert_eq!(cur, 50, "track midpoint maps to the middle of the range");

        // release ends the drag
        let probe = run_session(
            &ctx,
            pointer_release(midpoint),
            &style,
            &mut cur,
            &mut start,
            &mut end,
        );
        assert!(!probe.holding, "release must end the drag");
        assert_eq!(cur, 50);
    }

    #[test]
    fn test_out_of_range_current_frame_is_not_clamped() {
        let ctx = egui::Context::default();
        let style = SequencerStyle::default();
        // callers may hold values outside [start, end] while not dragging
        let (mut cur, mut start, mut end) = (500u32, 0u32, 100u32);

        run_session(&ctx, base_input(), &style, &mut cur, &mut start, &mut end);
        assert_eq!(cur, 500);
    }
}
