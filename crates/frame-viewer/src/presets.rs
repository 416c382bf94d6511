//! Named camera viewpoints and the controller that switches between them.

use crate::camera::CameraRig;
use glam::Vec3;
use std::fmt;

/// Fixed position + look-at target of a named viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum CameraView {
    #[default]
    Default,
    Top,
    Side,
    Front,
    Isometric,
    Closeup,
}

impl CameraView {
    /// Every view, in the order the toolbar lists them.
    pub const ALL: [CameraView; 6] = [
        CameraView::Default,
        CameraView::Top,
        CameraView::Side,
        CameraView::Front,
        CameraView::Isometric,
        CameraView::Closeup,
    ];

    pub const fn preset(self) -> CameraPreset {
        let position = match self {
            CameraView::Default => Vec3::new(10.0, 10.0, 10.0),
            CameraView::Top => Vec3::new(0.0, 20.0, 0.0),
            CameraView::Side => Vec3::new(20.0, 0.0, 0.0),
            CameraView::Front => Vec3::new(0.0, 0.0, 20.0),
            CameraView::Isometric => Vec3::new(15.0, 15.0, 15.0),
            CameraView::Closeup => Vec3::new(5.0, 5.0, 5.0),
        };
        CameraPreset {
            position,
            target: Vec3::ZERO,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CameraView::Default => "Default",
            CameraView::Top => "Top",
            CameraView::Side => "Side",
            CameraView::Front => "Front",
            CameraView::Isometric => "Isometric",
            CameraView::Closeup => "Closeup",
        }
    }
}

impl fmt::Display for CameraView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} View", self.name())
    }
}

/// Tracks the selected viewpoint and whether manual orbiting is allowed.
#[derive(Debug, Clone)]
pub struct CameraPresets {
    current_view: CameraView,
    controls_enabled: bool,
}

impl Default for CameraPresets {
    fn default() -> Self {
        Self::new(CameraView::Default)
    }
}

impl CameraPresets {
    pub fn new(initial: CameraView) -> Self {
        Self {
            current_view: initial,
            controls_enabled: true,
        }
    }

    #[inline]
    pub fn current_view(&self) -> CameraView {
        self.current_view
    }

    #[inline]
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Selects `view` and, if a camera is attached, moves it there
    /// immediately. Without a camera only the selection changes.
    pub fn handle_view_change(&mut self, view: CameraView, rig: Option<&mut dyn CameraRig>) {
        self.current_view = view;
        if let Some(rig) = rig {
            let CameraPreset { position, target } = view.preset();
            rig.set_position(position);
            rig.set_target(target);
            log::info!("Camera moved to {view}");
        }
    }

    pub fn toggle_controls(&mut self) {
        self.controls_enabled = !self.controls_enabled;
        log::debug!(
            "Orbit controls {}",
            if self.controls_enabled { "unlocked" } else { "locked" }
        );
    }
}
