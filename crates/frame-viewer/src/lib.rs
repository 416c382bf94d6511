//! Windowed playback of recorded point-cloud frames with labelled cuboids.
//!
//! Frames are fetched on a worker thread as the timeline moves
//! ([`loader`]), advanced once per display refresh ([`playback`]) and drawn
//! with wgpu as round point sprites plus translucent boxes ([`renderer`]).
//! The camera jumps between fixed presets ([`presets`]) or is steered by
//! mouse and keyboard while unlocked.

pub mod app;
pub mod camera;
pub mod config;
pub mod data;
pub mod input;
pub mod loader;
pub mod picking;
pub mod playback;
pub mod presets;
pub mod renderer;
pub mod ui;
