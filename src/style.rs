//! Sequencer style: named color slots plus layout metrics, with a scoped
//! push/pop override stack.
//!
//! The style is a plain value owned by the embedding application and passed
//! to the widget each frame; there is no global style table.

use eframe::egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

/// Named color slots of the sequencer palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequencerColor {
    Background,
    TopBarBackground,
    SelectedRow,
    TrackBorder,
    FramePointer,
    FramePointerHovered,
    FramePointerPressed,
    FramePointerLine,
    Keyframe,
    KeyframeHovered,
    KeyframePressed,
    ZoomBarBackground,
    ZoomBarSlider,
    ZoomBarSliderEnds,
}

impl SequencerColor {
    /// Number of slots in the palette.
    pub const COUNT: usize = 14;

    /// Every slot, in palette order.
    pub const ALL: [SequencerColor; Self::COUNT] = [
        SequencerColor::Background,
        SequencerColor::TopBarBackground,
        SequencerColor::SelectedRow,
        SequencerColor::TrackBorder,
        SequencerColor::FramePointer,
        SequencerColor::FramePointerHovered,
        SequencerColor::FramePointerPressed,
        SequencerColor::FramePointerLine,
        SequencerColor::Keyframe,
        SequencerColor::KeyframeHovered,
        SequencerColor::KeyframePressed,
        SequencerColor::ZoomBarBackground,
        SequencerColor::ZoomBarSlider,
        SequencerColor::ZoomBarSliderEnds,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One saved palette entry, restored by [`SequencerStyle::pop_color`].
#[derive(Clone, Copy, Debug)]
struct ColorMod {
    slot: SequencerColor,
    backup: Color32,
}

/// Colors and layout metrics of the sequencer widget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SequencerStyle {
    colors: [Color32; SequencerColor::COUNT],
    #[serde(skip)]
    color_stack: Vec<ColorMod>,

    /// Height of the frame-number ruler strip.
    pub top_bar_height: f32,
    /// Vertical gap between the top bar and the first row.
    pub top_bar_spacing: f32,
    /// Padding around row labels; `x` also pads the track's left edge.
    pub item_spacing: Vec2,
    /// Horizontal indentation added per nesting level.
    pub depth_item_spacing: f32,
    /// Width of the current-frame pointer handle.
    pub current_frame_pointer_size: f32,
    /// Stroke width of the current-frame guide line.
    pub current_frame_line_width: f32,
    /// Corner rounding of the background panel.
    pub rounding: f32,
    /// Height of the start/end range editor strip above the top bar.
    pub range_editor_height: f32,
    /// Height of the bottom pan/zoom bar.
    pub zoom_bar_height: f32,
    /// Width of the `<` / `>` zoom step buttons.
    pub zoom_step_width: f32,
    /// Zoom change applied per UI frame while a step button is held.
    pub zoom_step: f32,
}

impl Default for SequencerStyle {
    fn default() -> Self {
        let mut colors = [Color32::TRANSPARENT; SequencerColor::COUNT];
        colors[SequencerColor::Background.index()] = Color32::from_rgb(79, 79, 79);
        colors[SequencerColor::TopBarBackground.index()] =
            Color32::from_rgba_unmultiplied(56, 56, 56, 214);
        colors[SequencerColor::SelectedRow.index()] =
            Color32::from_rgba_unmultiplied(250, 180, 82, 224);
        colors[SequencerColor::TrackBorder.index()] = Color32::from_rgb(40, 40, 40);
        colors[SequencerColor::FramePointer.index()] =
            Color32::from_rgba_unmultiplied(250, 61, 61, 128);
        colors[SequencerColor::FramePointerHovered.index()] = Color32::from_rgb(250, 38, 38);
        colors[SequencerColor::FramePointerPressed.index()] = Color32::from_rgb(250, 20, 20);
        colors[SequencerColor::FramePointerLine.index()] =
            Color32::from_rgba_unmultiplied(250, 250, 250, 64);
        colors[SequencerColor::Keyframe.index()] =
            Color32::from_rgba_unmultiplied(150, 150, 150, 128);
        colors[SequencerColor::KeyframeHovered.index()] = Color32::from_rgb(250, 99, 92);
        colors[SequencerColor::KeyframePressed.index()] = Color32::from_rgb(250, 99, 92);
        colors[SequencerColor::ZoomBarBackground.index()] =
            Color32::from_rgba_unmultiplied(56, 56, 56, 214);
        colors[SequencerColor::ZoomBarSlider.index()] = Color32::from_gray(150);
        colors[SequencerColor::ZoomBarSliderEnds.index()] = Color32::from_gray(200);

        Self {
            colors,
            color_stack: Vec::new(),
            top_bar_height: 20.0,
            top_bar_spacing: 2.0,
            item_spacing: Vec2::new(4.0, 4.0),
            depth_item_spacing: 10.0,
            current_frame_pointer_size: 7.0,
            current_frame_line_width: 1.0,
            rounding: 2.5,
            range_editor_height: 18.0,
            zoom_bar_height: 14.0,
            zoom_step_width: 15.0,
            zoom_step: 0.01,
        }
    }
}

impl SequencerStyle {
    /// Current color of `slot`, overrides included.
    pub fn color(&self, slot: SequencerColor) -> Color32 {
        self.colors[slot.index()]
    }

    /// Replaces the color of `slot` without recording the previous value.
    pub fn set_color(&mut self, slot: SequencerColor, color: impl Into<Color32>) {
        self.colors[slot.index()] = color.into();
    }

    /// Installs a scoped override for `slot`, saving the previous value.
    ///
    /// Accepts packed (`Color32`) or component (`Rgba`) values.
    pub fn push_color(&mut self, slot: SequencerColor, color: impl Into<Color32>) {
        self.color_stack.push(ColorMod {
            slot,
            backup: self.colors[slot.index()],
        });
        self.colors[slot.index()] = color.into();
    }

    /// Restores the most recent `count` overrides in reverse push order.
    ///
    /// Panics when `count` exceeds the number of pushed overrides.
    pub fn pop_color(&mut self, count: usize) {
        for _ in 0..count {
            let m = self
                .color_stack
                .pop()
                .expect("popped more sequencer style colors than were pushed");
            self.colors[m.slot.index()] = m.backup;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Rgba;

    #[test]
    fn test_push_pop_restores_every_slot() {
        let mut style = SequencerStyle::default();
        for slot in SequencerColor::ALL {
            let before = style.color(slot);
            style.push_color(slot, Color32::from_rgb(1, 2, 3));
            assert_eq!(style.color(slot), Color32::from_rgb(1, 2, 3));
            style.pop_color(1);
            assert_eq!(style.color(slot), before, "slot {:?} not restored", slot);
        }
    }

    #[test]
    fn test_pop_restores_in_lifo_order() {
        let mut style = SequencerStyle::default();
        let original = style.color(SequencerColor::Background);

        style.push_color(SequencerColor::Background, Color32::from_rgb(10, 0, 0));
        style.push_color(SequencerColor::Background, Color32::from_rgb(20, 0, 0));
        assert_eq!(
            style.color(SequencerColor::Background),
            Color32::from_rgb(20, 0, 0)
        );

        style.pop_color(1);
        assert_eq!(
            style.color(SequencerColor::Background),
            Color32::from_rgb(10, 0, 0)
        );

        style.pop_color(1);
        assert_eq!(style.color(SequencerColor::Background), original);
    }

    #[test]
    fn test_pop_restores_across_slots() {
        let mut style = SequencerStyle::default();
        let bg = style.color(SequencerColor::Background);
        let kf = style.color(SequencerColor::Keyframe);

        style.push_color(SequencerColor::Background, Color32::RED);
        style.push_color(SequencerColor::Keyframe, Color32::GREEN);
        style.pop_color(2);

        assert_eq!(style.color(SequencerColor::Background), bg);
        assert_eq!(style.color(SequencerColor::Keyframe), kf);
    }

    #[test]
    #[should_panic(expected = "popped more sequencer style colors")]
    fn test_pop_underflow_panics() {
        let mut style = SequencerStyle::default();
        style.push_color(SequencerColor::Background, Color32::RED);
        style.pop_color(2);
    }

    #[test]
    fn test_push_accepts_component_colors() {
        let mut style = SequencerStyle::default();
        style.push_color(SequencerColor::TrackBorder, Rgba::from_rgb(1.0, 0.0, 0.0));
        assert_eq!(style.color(SequencerColor::TrackBorder), Color32::RED);
        style.pop_color(1);
    }

    #[test]
    fn test_set_color_does_not_grow_stack() {
        let mut style = SequencerStyle::default();
        style.set_color(SequencerColor::Background, Color32::BLUE);
        assert_eq!(style.color(SequencerColor::Background), Color32::BLUE);
        // nothing was pushed, so popping must fail
        let result = std::panic::catch_unwind(move || style.pop_color(1));
        assert!(result.is_err());
    }
}
