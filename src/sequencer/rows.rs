//! Timeline and group rows of an open sequencer session.
//!
//! Rows are added through [`SequencerUi`]: `timeline` for leaf rows
//! carrying keyframes, `group` for collapsible rows nesting further rows.
//! Nesting is closure-scoped, so row brackets cannot be left unbalanced.

use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Response, Sense, Vec2};

use super::helpers;
use super::sequencer::SequencerUi;
use crate::style::SequencerColor;

/// Row kind: a leaf timeline, or a collapsible group with its open flag.
enum RowKind<'o> {
    Timeline,
    Group { open: &'o mut bool },
}

impl SequencerUi<'_, '_> {
    /// Leaf timeline row carrying draggable keyframe markers.
    pub fn timeline(&mut self, label: &str, keyframes: &mut [u32]) -> Response {
        let (response, _open) = self.row(label, RowKind::Timeline, keyframes);
        self.finish_row();
        response
    }

    /// Plain row with nested child rows. Plain rows are always open, so the
    /// body always runs, one indentation level deeper.
    pub fn timeline_with<R>(
        &mut self,
        label: &str,
        keyframes: &mut [u32],
        add_contents: impl FnOnce(&mut Self) -> R,
    ) -> (Response, R) {
        let (response, _open) = self.row(label, RowKind::Timeline, keyframes);
        self.depth += 1;
        let inner = add_contents(self);
        self.finish_row();
        self.depth -= 1;
        (response, inner)
    }

    /// Collapsible group row. The body runs only while the group is open
    /// and returns `None` otherwise; a closed group never indents.
    pub fn group<R>(
        &mut self,
        label: &str,
        open: &mut bool,
        add_contents: impl FnOnce(&mut Self) -> R,
    ) -> (Response, Option<R>) {
        let (response, is_open) = self.row(label, RowKind::Group { open }, &mut []);
        if is_open {
            self.depth += 1;
            let inner = add_contents(self);
            self.finish_row();
            self.depth -= 1;
            (response, Some(inner))
        } else {
            self.finish_row();
            (response, None)
        }
    }

    /// Lays out and paints one row, processes selection and disclosure,
    /// renders keyframes and advances the values cursor. Returns the row
    /// response and whether the row body counts as open.
    fn row(&mut self, label: &str, kind: RowKind<'_>, keyframes: &mut [u32]) -> (Response, bool) {
        let style = self.style;
        let is_group = matches!(kind, RowKind::Group { .. });

        let font_id = FontId::proportional(12.0);
        let galley_size = {
            let galley =
                self.ui
                    .painter()
                    .layout_no_wrap(label.to_owned(), font_id.clone(), Color32::WHITE);
            galley.size()
        };

        let arrow_w = if is_group { galley_size.y } else { 0.0 };
        let indent = self.depth as f32 * style.depth_item_spacing;
        let row_height = galley_size.y + style.item_spacing.y * 2.0;
        self.state
            .grow_values_width(galley_size.x + style.item_spacing.x * 2.0 + arrow_w + indent);

        let bb = Rect::from_min_size(
            self.values_cursor,
            Vec2::new(self.state.values_width, row_height),
        );
        let row_id = self.ui.id().with(label);
        let visible = self.ui.is_rect_visible(bb);
        let response = self.ui.interact(bb, row_id, Sense::click());

        // nested rows restart at the column's left edge
        if self.depth > 0 {
            self.values_cursor.x = self.start_cursor.x;
        }
        self.row_height = row_height;
        self.state.filled_height += row_height;

        let label_x = self.values_cursor.x + style.item_spacing.x + indent;

        // the arrow has its own hit-region and toggles independently of
        // selection; double-clicking the label toggles as well
        let mut arrow_rect = Rect::NOTHING;
        let mut arrow_clicked = false;
        if is_group && visible {
            arrow_rect = Rect::from_min_size(
                Pos2::new(
                    label_x,
                    self.values_cursor.y + (row_height - arrow_w) / 2.0,
                ),
                Vec2::splat(arrow_w),
            );
            arrow_clicked = self
                .ui
                .interact(arrow_rect, row_id.with("arrow"), Sense::click())
                .clicked();
        }

        if visible && response.clicked() && !arrow_clicked {
            self.state.toggle_selected(row_id);
        }

        let open = match kind {
            RowKind::Timeline => true,
            RowKind::Group { open } => {
                if arrow_clicked || (visible && response.double_clicked()) {
                    *open = !*open;
                }
                *open
            }
        };

        if visible {
            let lane = Rect::from_min_size(
                Pos2::new(
                    self.values_cursor.x + self.state.values_width,
                    self.values_cursor.y,
                ),
                Vec2::new(
                    (self.state.size.x - self.state.values_width).max(0.0),
                    row_height,
                ),
            );
            let selected = self.state.selected_row == Some(row_id);
            let hovered = response.hovered();

            let painter = self.ui.painter();
            if selected {
                painter.rect_filled(lane, 0.0, style.color(SequencerColor::SelectedRow));
            }
            painter.line_segment(
                [lane.left_bottom(), lane.right_bottom()],
                (1.0, style.color(SequencerColor::TrackBorder)),
            );

            let base = if is_group {
                Color32::WHITE
            } else {
                Color32::from_gray(200)
            };
            let text_color = if hovered { base.gamma_multiply(0.7) } else { base };
            painter.text(
                Pos2::new(label_x + arrow_w, self.values_cursor.y + row_height / 2.0),
                Align2::LEFT_CENTER,
                label,
                font_id,
                text_color,
            );

            if is_group {
                helpers::draw_disclosure_arrow(painter, arrow_rect, open, text_color);
            }
        }

        for (index, frame) in keyframes.iter_mut().enumerate() {
            let _registered = self.keyframe_marker(row_id, index, frame);
        }

        self.values_cursor.x += style.item_spacing.x + indent;
        self.values_cursor.y += row_height;

        (response, open)
    }

    /// Hit-tests and paints one keyframe marker. A primary-button drag
    /// remaps the pointer's horizontal position into a frame value and
    /// writes it back through `frame`. Returns false when the marker was
    /// clipped and no hit-region was registered.
    fn keyframe_marker(&mut self, row_id: eframe::egui::Id, index: usize, frame: &mut u32) -> bool {
        let style = self.style;
        let h = self.row_height;
        let pfw = helpers::per_frame_width(
            self.state.size.x,
            self.state.values_width,
            self.state.start_frame,
            self.state.end_frame,
            self.state.zoom,
        );
        let center = Pos2::new(
            self.start_values_cursor.x
                + style.item_spacing.x
                + self.state.values_width
                + helpers::keyframe_offset_x(*frame, self.state.offset_frame, pfw),
            self.values_cursor.y + h / 2.0,
        );
        let bb = Rect::from_center_size(center, Vec2::splat(h));

        if !self.ui.is_rect_visible(bb) {
            return false;
        }
        let response = self
            .ui
            .interact(bb, row_id.with(index), Sense::click_and_drag());

        let mut color = style.color(SequencerColor::Keyframe);
        if response.hovered() {
            color = style.color(SequencerColor::KeyframeHovered);
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let track_min_x =
                    self.start_cursor.x + self.state.values_width + style.item_spacing.x;
                let work_width =
                    helpers::work_timeline_width(self.state.size.x, self.state.values_width, pfw);
                *frame = helpers::frame_from_pointer(
                    pos.x,
                    track_min_x,
                    work_width,
                    self.state.start_frame,
                    self.state.end_frame,
                    self.state.zoom,
                    self.state.offset_frame,
                );
            }
            color = style.color(SequencerColor::KeyframePressed);
        }

        self.ui.painter().circle_filled(center, h / 3.0, color);
        true
    }

    /// Finalizes the current row: the horizontal cursor returns to the
    /// column start and the row-height accumulator clears.
    fn finish_row(&mut self) {
        self.values_cursor.x = self.start_cursor.x;
        self.row_height = 0.0;
    }
}
