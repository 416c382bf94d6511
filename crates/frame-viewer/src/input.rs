//! Global keyboard shortcuts.
//!
//! Every shortcut is decoded here, once, and handed to the app as a
//! [`Command`]. Playback and camera code never listen to keys themselves, so
//! a single press can never be acted on twice.

use crate::camera::CameraMove;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlayback,
    StepBackward,
    StepForward,
    MoveCamera(CameraMove),
    Quit,
}

#[derive(Debug, Default)]
pub struct InputDispatch;

impl InputDispatch {
    pub fn new() -> Self {
        Self
    }

    /// Maps one keyboard event to a command.
    pub fn on_key(&self, event: &KeyEvent) -> Option<Command> {
        if event.state != ElementState::Pressed {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => Self::map(code, event.repeat),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    /// Key table. Auto-repeat is ignored for toggles so holding Space does
    /// not flicker between play and pause.
    pub fn map(code: KeyCode, repeat: bool) -> Option<Command> {
        let cmd = match code {
            KeyCode::Space if !repeat => Command::TogglePlayback,
            KeyCode::Escape if !repeat => Command::Quit,
            KeyCode::ArrowLeft => Command::StepBackward,
            KeyCode::ArrowRight => Command::StepForward,
            KeyCode::KeyW => Command::MoveCamera(CameraMove::Forward),
            KeyCode::KeyS => Command::MoveCamera(CameraMove::Backward),
            KeyCode::KeyA => Command::MoveCamera(CameraMove::Left),
            KeyCode::KeyD => Command::MoveCamera(CameraMove::Right),
            KeyCode::KeyQ => Command::MoveCamera(CameraMove::Up),
            KeyCode::KeyE => Command::MoveCamera(CameraMove::Down),
            KeyCode::KeyZ => Command::MoveCamera(CameraMove::ZoomIn),
            KeyCode::KeyX => Command::MoveCamera(CameraMove::ZoomOut),
            _ => return None,
        };
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{AnimationFrames, Playback};

    #[test]
    fn space_toggles_once_per_press() {
        assert_eq!(
            InputDispatch::map(KeyCode::Space, false),
            Some(Command::TogglePlayback)
        );
        assert_eq!(InputDispatch::map(KeyCode::Space, true), None);
    }

    #[test]
    fn arrows_step_and_repeat() {
        assert_eq!(
            InputDispatch::map(KeyCode::ArrowLeft, true),
            Some(Command::StepBackward)
        );
        assert_eq!(
            InputDispatch::map(KeyCode::ArrowRight, false),
            Some(Command::StepForward)
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(InputDispatch::map(KeyCode::KeyP, false), None);
        assert_eq!(InputDispatch::map(KeyCode::ArrowUp, false), None);
    }

    #[test]
    fn pressing_space_twice_returns_to_paused() {
        let mut playback = Playback::new(50, AnimationFrames::new());
        for _ in 0..2 {
            if let Some(Command::TogglePlayback) = InputDispatch::map(KeyCode::Space, false) {
                playback.toggle_playback();
            }
        }
        assert!(!playback.is_playing());
    }

    fn press(playback: &mut Playback<AnimationFrames>, code: KeyCode) {
        match InputDispatch::map(code, false) {
            Some(Command::StepBackward) => playback.step_backward(),
            Some(Command::StepForward) => playback.step_forward(),
            _ => {}
        }
    }

    #[test]
    fn arrows_stay_on_the_timeline() {
        let mut playback = Playback::new(50, AnimationFrames::new());
        press(&mut playback, KeyCode::ArrowLeft);
        assert_eq!(playback.frame_index(), 0);

        playback.set_current_frame(49.0);
        press(&mut playback, KeyCode::ArrowRight);
        assert_eq!(playback.frame_index(), 49);
    }
}
