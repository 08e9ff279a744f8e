//! Standalone sequencer window for development and testing.
//!
//! Sample animation data (a transform group with a few keyframed tracks)
//! driven through the sequencer widget, with toggles for the widget options.

use eframe::egui;
use egui_sequencer::{Sequencer, SequencerColor, SequencerStyle};
use log::info;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    info!("sequencer demo starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 400.0])
            .with_title("Sequencer Demo"),
        ..Default::default()
    };

    eframe::run_native(
        "sequencer-demo",
        options,
        Box::new(|_cc| Ok(Box::new(DemoApp::default()))),
    )
}

struct DemoApp {
    style: SequencerStyle,
    current_frame: u32,
    start_frame: u32,
    end_frame: u32,
    position_keys: Vec<u32>,
    rotation_keys: Vec<u32>,
    scale_keys: Vec<u32>,
    visibility_keys: Vec<u32>,
    transform_open: bool,
    hide_zoom: bool,
    allow_length_editing: bool,
    amber_selection: bool,
}

impl Default for DemoApp {
    fn default() -> Self {
        Self {
            style: SequencerStyle::default(),
            current_frame: 12,
            start_frame: 0,
            end_frame: 120,
            position_keys: vec![0, 12, 24, 48, 96],
            rotation_keys: vec![0, 30, 60, 120],
            scale_keys: vec![0, 60],
            visibility_keys: vec![0, 90],
            transform_open: true,
            hide_zoom: false,
            allow_length_editing: false,
            amber_selection: true,
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls")
            .default_width(180.0)
            .show(ctx, |ui| {
                ui.heading("Sequencer");
                ui.separator();
                ui.checkbox(&mut self.hide_zoom, "Hide range editor");
                ui.checkbox(&mut self.allow_length_editing, "Editable range");
                ui.checkbox(&mut self.amber_selection, "Amber selection");
                ui.separator();
                ui.label(format!("Frame: {}", self.current_frame));
                ui.label(format!(
                    "Range: {}..{}",
                    self.start_frame, self.end_frame
                ));
                if ui.button("Rewind").clicked() {
                    self.current_frame = self.start_frame;
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut pushed = 0;
            if !self.amber_selection {
                self.style.push_color(
                    SequencerColor::SelectedRow,
                    egui::Color32::from_rgba_unmultiplied(90, 160, 250, 224),
                );
                pushed += 1;
            }

            Sequencer::new("demo_sequencer")
                .hide_zoom(self.hide_zoom)
                .allow_length_editing(self.allow_length_editing)
                .show(
                    ui,
                    &self.style,
                    &mut self.current_frame,
                    &mut self.start_frame,
                    &mut self.end_frame,
                    |seq| {
                        seq.group("Transform", &mut self.transform_open, |seq| {
                            seq.timeline("position", &mut self.position_keys);
                            seq.timeline("rotation", &mut self.rotation_keys);
                            seq.timeline("scale", &mut self.scale_keys);
                        });
                        seq.timeline("visibility", &mut self.visibility_keys);
                    },
                );

            self.style.pop_color(pushed);
        });
    }
}
