//! Sequencer geometry math and chrome painting.

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Vec2};

use crate::style::{SequencerColor, SequencerStyle};

/// Frames spanned by the visible viewport.
///
/// A degenerate range (end <= start) is widened to a single frame so the
/// pixel math downstream stays finite.
pub(super) fn frames_in_view(start_frame: u32, end_frame: u32, zoom: f32) -> f32 {
    let span = end_frame.saturating_sub(start_frame) as f32;
    if span <= 0.0 {
        return 1.0;
    }
    span / zoom
}

/// Horizontal pixels covered by one frame of the visible span.
pub(super) fn per_frame_width(
    track_width: f32,
    values_width: f32,
    start_frame: u32,
    end_frame: u32,
    zoom: f32,
) -> f32 {
    (track_width - values_width) / frames_in_view(start_frame, end_frame, zoom)
}

/// X offset of `frame` from the track's left edge.
///
/// Subtraction in f32: panning past a marker pushes it off the left edge
/// instead of wrapping.
pub(super) fn keyframe_offset_x(frame: u32, offset_frame: u32, per_frame_width: f32) -> f32 {
    (frame as f32 - offset_frame as f32) * per_frame_width
}

/// Width of the drag-interactive part of the track.
pub(super) fn work_timeline_width(track_width: f32, values_width: f32, per_frame_width: f32) -> f32 {
    track_width - values_width - per_frame_width
}

/// Remaps a pointer position to a frame value: the normalized track
/// position is scaled to the visible span, rounded to the nearest frame,
/// then shifted by the pan offset.
pub(super) fn frame_from_pointer(
    pointer_x: f32,
    track_min_x: f32,
    work_width: f32,
    start_frame: u32,
    end_frame: u32,
    zoom: f32,
    offset_frame: u32,
) -> u32 {
    let normalized = ((pointer_x - track_min_x) / work_width).clamp(0.0, 1.0);
    let view_size = end_frame.saturating_sub(start_frame) as f32 / zoom;
    start_frame + (normalized * view_size).round() as u32 + offset_frame
}

/// Tick and label spacing for the ruler; densifies as frames widen.
pub(super) fn ruler_steps(per_frame_width: f32) -> (u32, u32) {
    let frame_step = if per_frame_width > 10.0 {
        1
    } else if per_frame_width > 2.0 {
        5
    } else if per_frame_width > 0.5 {
        10
    } else {
        50
    };
    (frame_step, frame_step * 2)
}

/// Paints the top-bar frame ruler: background, tick marks and frame
/// numbers for the visible span.
pub(super) fn draw_top_bar_ruler(
    painter: &Painter,
    style: &SequencerStyle,
    bar_rect: Rect,
    track_min_x: f32,
    per_frame_width: f32,
    offset_frame: u32,
) {
    painter.rect_filled(
        bar_rect,
        style.rounding,
        style.color(SequencerColor::TopBarBackground),
    );

    let (frame_step, label_step) = ruler_steps(per_frame_width);
    let visible_frames = ((bar_rect.max.x - track_min_x) / per_frame_width).ceil() as u32;
    let last = offset_frame.saturating_add(visible_frames);

    let mut frame = (offset_frame / frame_step) * frame_step;
    while frame <= last {
        let x = track_min_x + keyframe_offset_x(frame, offset_frame, per_frame_width);
        if x >= track_min_x && x <= bar_rect.max.x {
            painter.line_segment(
                [
                    Pos2::new(x, bar_rect.max.y - 5.0),
                    Pos2::new(x, bar_rect.max.y),
                ],
                (1.0, Color32::from_gray(100)),
            );

            if frame % label_step == 0 {
                painter.text(
                    Pos2::new(x, bar_rect.min.y + 2.0),
                    Align2::CENTER_TOP,
                    format!("{}", frame),
                    FontId::monospace(9.0),
                    Color32::from_gray(150),
                );
            }
        }
        frame = match frame.checked_add(frame_step) {
            Some(next) => next,
            None => break,
        };
    }
}

/// Hit/paint rect of the current-frame pointer handle, anchored at the top
/// of the top bar.
pub(super) fn current_frame_pointer_rect(
    style: &SequencerStyle,
    start_cursor: Pos2,
    values_width: f32,
    frame: u32,
    offset_frame: u32,
    per_frame_width: f32,
) -> Rect {
    let width = style.current_frame_pointer_size;
    let x = start_cursor.x + values_width + style.item_spacing.x - width / 2.0
        + keyframe_offset_x(frame, offset_frame, per_frame_width);
    let height = style.current_frame_pointer_size * 2.5;
    Rect::from_min_size(Pos2::new(x, start_cursor.y), Vec2::new(width, height))
}

/// Paints the pointer handle (rect body with a downward tip) and its guide
/// line through the row area.
pub(super) fn draw_current_frame_pointer(
    painter: &Painter,
    style: &SequencerStyle,
    bb: Rect,
    rows_bottom_y: f32,
    handle_color: Color32,
) {
    let line_x = bb.center().x;
    painter.line_segment(
        [
            Pos2::new(line_x, bb.max.y),
            Pos2::new(line_x, rows_bottom_y),
        ],
        (
            style.current_frame_line_width,
            style.color(SequencerColor::FramePointerLine),
        ),
    );

    let body = Rect::from_min_max(bb.min, Pos2::new(bb.max.x, bb.min.y + bb.height() * 0.6));
    painter.rect_filled(body, style.rounding, handle_color);

    let tip = vec![
        Pos2::new(body.min.x, body.max.y),
        Pos2::new(body.max.x, body.max.y),
        Pos2::new(bb.center().x, bb.max.y),
    ];
    painter.add(Shape::convex_polygon(
        tip,
        handle_color,
        (0.0, Color32::TRANSPARENT),
    ));
}

/// Small disclosure triangle for group rows: right when closed, down when
/// open.
pub(super) fn draw_disclosure_arrow(painter: &Painter, rect: Rect, open: bool, color: Color32) {
    let rect = rect.shrink(rect.width() * 0.2);
    let points = if open {
        vec![
            rect.left_top(),
            rect.right_top(),
            Pos2::new(rect.center().x, rect.max.y),
        ]
    } else {
        vec![
            rect.left_top(),
            Pos2::new(rect.max.x, rect.center().y),
            rect.left_bottom(),
        ]
    };
    painter.add(Shape::convex_polygon(
        points,
        color,
        (0.0, Color32::TRANSPARENT),
    ));
}
