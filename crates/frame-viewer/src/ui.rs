//! egui panels: the timeline, the camera preset window, the status overlay
//! and the cuboid tooltip.
//!
//! Panels never mutate app state directly. They read a [`UiModel`] and push
//! [`UiAction`]s that the app applies after the frame's UI pass.

use crate::playback::{PlaybackState, PLAYBACK_SPEEDS};
use crate::presets::CameraView;
use egui::{Align2, Color32, RichText};
use scene_frame::Cuboid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    TogglePlayback,
    SkipToStart,
    SkipToEnd,
    SetSpeed(f32),
    Seek(f32),
    SelectView(CameraView),
    ToggleControls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Ready,
    Loading,
    Error(&'a str),
}

/// Everything the panels display for one frame.
pub struct UiModel<'a> {
    pub playback: PlaybackState,
    pub total_frames: u32,
    pub current_view: CameraView,
    pub controls_enabled: bool,
    pub status: Status<'a>,
    pub hovered: Option<&'a Cuboid>,
}

const HELP_LINES: [&str; 6] = [
    "Space: play / pause",
    "Left / Right: previous / next frame",
    "Left drag: orbit, wheel: zoom",
    "W A S D: move, Q / E: up / down",
    "Z / X: zoom in / out",
    "Esc: quit",
];

pub fn draw(ctx: &egui::Context, model: &UiModel<'_>) -> Vec<UiAction> {
    let mut actions = Vec::new();
    draw_timeline(ctx, model, &mut actions);
    draw_camera_panel(ctx, model, &mut actions);
    draw_status(ctx, model.status);
    if let Some(cuboid) = model.hovered {
        draw_tooltip(ctx, cuboid);
    }
    actions
}

fn draw_timeline(ctx: &egui::Context, model: &UiModel<'_>, actions: &mut Vec<UiAction>) {
    let pb = model.playback;
    let last = model.total_frames.saturating_sub(1) as f32;

    egui::TopBottomPanel::bottom("timeline").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let play = if pb.is_playing { "⏸" } else { "▶" };
            if ui.button(play).clicked() {
                actions.push(UiAction::TogglePlayback);
            }
            if ui.button("⏮").on_hover_text("First frame").clicked() {
                actions.push(UiAction::SkipToStart);
            }
            if ui.button("⏭").on_hover_text("Last frame").clicked() {
                actions.push(UiAction::SkipToEnd);
            }

            ui.separator();
            for speed in PLAYBACK_SPEEDS {
                if ui
                    .selectable_label(pb.speed == speed, speed_label(speed))
                    .clicked()
                {
                    actions.push(UiAction::SetSpeed(speed));
                }
            }

            ui.separator();
            ui.label(frame_label(pb.current_frame, model.total_frames));
        });

        let mut frame = pb.current_frame.floor();
        let slider = egui::Slider::new(&mut frame, 0.0..=last)
            .step_by(1.0)
            .show_value(false);
        ui.spacing_mut().slider_width = ui.available_width();
        if ui.add(slider).changed() {
            actions.push(UiAction::Seek(frame));
        }
        ui.add_space(4.0);
    });
}

fn draw_camera_panel(ctx: &egui::Context, model: &UiModel<'_>, actions: &mut Vec<UiAction>) {
    egui::Window::new("Camera")
        .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            for view in CameraView::ALL {
                if ui
                    .selectable_label(model.current_view == view, view.to_string())
                    .clicked()
                {
                    actions.push(UiAction::SelectView(view));
                }
            }
            ui.separator();
            if ui.button(lock_label(model.controls_enabled)).clicked() {
                actions.push(UiAction::ToggleControls);
            }
            ui.collapsing("Controls", |ui| {
                for line in HELP_LINES {
                    ui.label(line);
                }
            });
        });
}

fn draw_status(ctx: &egui::Context, status: Status<'_>) {
    let Some(text) = status_text(status) else {
        return;
    };
    let color = match status {
        Status::Error(_) => Color32::from_rgb(0xff, 0x66, 0x66),
        _ => Color32::WHITE,
    };
    egui::Area::new(egui::Id::new("status"))
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(text).size(20.0).color(color));
        });
}

fn draw_tooltip(ctx: &egui::Context, cuboid: &Cuboid) {
    let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) else {
        return;
    };
    egui::Area::new(egui::Id::new("cuboid-tooltip"))
        .fixed_pos(pos + egui::vec2(14.0, 14.0))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.strong(&cuboid.label);
                ui.label(size_label(cuboid));
            });
        });
}

/// "0.5x", "1x", ...
pub fn speed_label(speed: f32) -> String {
    format!("{speed}x")
}

/// One-based position label, e.g. "Frame: 1 / 50".
pub fn frame_label(current_frame: f32, total: u32) -> String {
    format!("Frame: {} / {}", current_frame.floor() as u32 + 1, total)
}

pub fn size_label(cuboid: &Cuboid) -> String {
    format!(
        "Size: {:.2} x {:.2} x {:.2}",
        cuboid.size.x, cuboid.size.y, cuboid.size.z
    )
}

pub fn lock_label(controls_enabled: bool) -> &'static str {
    if controls_enabled {
        "Lock Camera"
    } else {
        "Unlock Camera"
    }
}

pub fn status_text(status: Status<'_>) -> Option<String> {
    match status {
        Status::Ready => None,
        Status::Loading => Some("Loading...".to_owned()),
        Status::Error(msg) => Some(format!("Error: {msg}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_frame::Point;

    #[test]
    fn labels() {
        let labels: Vec<_> = PLAYBACK_SPEEDS.iter().map(|&s| speed_label(s)).collect();
        assert_eq!(labels, ["0.5x", "1x", "2x", "4x"]);
        assert_eq!(frame_label(0.0, 50), "Frame: 1 / 50");
        assert_eq!(frame_label(12.5, 50), "Frame: 13 / 50");
        assert_eq!(lock_label(true), "Lock Camera");
        assert_eq!(lock_label(false), "Unlock Camera");
    }

    #[test]
    fn size_uses_two_decimals() {
        let c = Cuboid {
            size: Point::new(4.5, 1.857, 2.0),
            ..Cuboid::default()
        };
        assert_eq!(size_label(&c), "Size: 4.50 x 1.86 x 2.00");
    }

    #[test]
    fn status_overlay_text() {
        assert_eq!(status_text(Status::Ready), None);
        assert_eq!(status_text(Status::Loading).as_deref(), Some("Loading..."));
        assert_eq!(
            status_text(Status::Error("HTTP error! status: 404")).as_deref(),
            Some("Error: HTTP error! status: 404")
        );
    }

    #[test]
    fn panels_emit_no_actions_without_input() {
        let ctx = egui::Context::default();
        let model = UiModel {
            playback: PlaybackState::default(),
            total_frames: 50,
            current_view: CameraView::Default,
            controls_enabled: true,
            status: Status::Loading,
            hovered: None,
        };
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = draw(ctx, &model);
        });
        assert!(actions.is_empty());
    }
}
