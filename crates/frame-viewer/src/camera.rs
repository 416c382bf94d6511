use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Capability to reposition a camera, independent of how it is stored.
pub trait CameraRig {
    fn set_position(&mut self, position: Vec3);
    fn set_target(&mut self, target: Vec3);
}

/// Perspective camera looking from `position` at `target`, Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fovy_rad: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fovy_deg: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            fovy_rad: fovy_deg.to_radians(),
            aspect,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Up vector for the view basis. Falls back to -Z when looking straight
    /// along the Y axis, where `Y` would be degenerate.
    pub fn up(&self) -> Vec3 {
        let forward = (self.target - self.position).normalize_or_zero();
        if forward.dot(Vec3::Y).abs() > 0.999 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up())
    }

    /// Right-handed projection with wgpu's [0, 1] depth range.
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_rad, self.aspect, self.znear, self.zfar)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

impl CameraRig for Camera {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }
}

/// Direction of a keyboard camera move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
}

/// Orbit-style manual control: left-drag orbits around the target, the
/// wheel zooms, and [`CameraMove`]s translate or zoom from the keyboard.
pub struct OrbitController {
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
    /// World units per keyboard move.
    pub move_step: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 500.0;
    const ORBIT_SPEED: f64 = 0.005;

    /// Creates a new controller with default state.
    pub fn new() -> Self {
        Self {
            mouse_down: false,
            last_mouse: None,
            move_step: 0.5,
        }
    }

    /// Handles window events and updates the camera.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left {
                    self.mouse_down = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_orbit((position.x, position.y), camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.zoom(scroll, camera);
            }
            _ => {}
        }
    }

    /// Drops any drag in progress, e.g. when controls get locked mid-drag.
    pub fn release(&mut self) {
        self.mouse_down = false;
    }

    pub fn apply_move(&mut self, mv: CameraMove, camera: &mut Camera) {
        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up()).normalize_or_zero();
        let offset = match mv {
            CameraMove::Forward => forward * self.move_step,
            CameraMove::Backward => -forward * self.move_step,
            CameraMove::Right => right * self.move_step,
            CameraMove::Left => -right * self.move_step,
            CameraMove::Up => Vec3::Y * self.move_step,
            CameraMove::Down => -Vec3::Y * self.move_step,
            CameraMove::ZoomIn => return self.zoom(1.0, camera),
            CameraMove::ZoomOut => return self.zoom(-1.0, camera),
        };
        camera.position += offset;
        camera.target += offset;
    }

    /// Positive `delta` zooms in (moves the camera toward the target).
    fn zoom(&mut self, delta: f32, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let factor = 1.1_f32.powf(-delta);
        let dist = (offset.length() * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
        camera.position = camera.target + offset.normalize_or_zero() * dist;
    }

    /// Rotates the camera around the target while the left mouse button is held.
    fn handle_cursor_orbit(&mut self, xy: (f64, f64), camera: &mut Camera) {
        if let Some(last) = self.last_mouse {
            if self.mouse_down {
                let dx = ((xy.0 - last.0) * Self::ORBIT_SPEED) as f32;
                let dy = ((xy.1 - last.1) * Self::ORBIT_SPEED) as f32;
                self.orbit(dx, dy, camera);
            }
        }
        self.last_mouse = Some(xy);
    }

    fn orbit(&mut self, d_azimuth: f32, d_elevation: f32, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        // Spherical coordinates around +Y.
        let mut azimuth = offset.x.atan2(offset.z);
        let mut elevation = (offset.y / radius).clamp(-1.0, 1.0).asin();

        azimuth -= d_azimuth;
        // Stop just short of the poles so the view basis stays well-defined.
        let limit = 89f32.to_radians();
        elevation = (elevation + d_elevation).clamp(-limit, limit);

        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_el, cos_el) = elevation.sin_cos();
        camera.position = camera.target
            + Vec3::new(
                radius * cos_el * sin_az,
                radius * sin_el,
                radius * cos_el * cos_az,
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> Camera {
        Camera::new(position, Vec3::ZERO, 60.0, 16.0 / 9.0)
    }

    #[test]
    fn straight_down_view_uses_fallback_up() {
        let cam = camera_at(Vec3::new(0.0, 20.0, 0.0));
        assert_eq!(cam.up(), Vec3::NEG_Z);
        assert!(cam.view().is_finite());

        let cam = camera_at(Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(cam.up(), Vec3::Y);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = camera_at(Vec3::new(20.0, 0.0, 0.0));
        let clip = cam.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn rig_moves_position_and_target() {
        let mut cam = camera_at(Vec3::ONE);
        cam.set_position(Vec3::new(0.0, 0.0, 20.0));
        cam.set_target(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(cam.target, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut ctl = OrbitController::new();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 1.0));
        for _ in 0..100 {
            ctl.apply_move(CameraMove::ZoomIn, &mut cam);
        }
        assert!((cam.distance() - OrbitController::MIN_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn forward_move_keeps_distance() {
        let mut ctl = OrbitController::new();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 10.0));
        ctl.apply_move(CameraMove::Forward, &mut cam);
        assert!((cam.distance() - 10.0).abs() < 1e-5);
        assert!((cam.position.z - 9.5).abs() < 1e-5);
        assert!((cam.target.z + 0.5).abs() < 1e-5);
    }

    #[test]
    fn orbit_preserves_radius() {
        let mut ctl = OrbitController::new();
        let mut cam = camera_at(Vec3::new(10.0, 10.0, 10.0));
        let before = cam.distance();
        ctl.orbit(0.7, -0.3, &mut cam);
        assert!((cam.distance() - before).abs() < 1e-3);
        assert!(cam.position != Vec3::new(10.0, 10.0, 10.0));
    }
}
