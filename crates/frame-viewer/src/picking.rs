//! Cursor hover over cuboids.
//!
//! A cuboid is hit when the cursor lies inside the screen-space rectangle
//! bounding its eight projected corners. Among hits the one whose center is
//! nearest the camera wins. Cuboids with a corner behind the camera are
//! skipped.

use crate::data::cuboids::cuboid_corners;
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use scene_frame::Cuboid;

/// Screen-space bounds of a projected cuboid, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Projects a world point to window pixels (origin top-left). Returns the
/// pixel position and clip `w`, or `None` behind the camera.
pub fn project(view_proj: Mat4, viewport: Vec2, p: Vec3) -> Option<(Vec2, f32)> {
    let clip = view_proj * p.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xy() / clip.w;
    let px = Vec2::new((ndc.x + 1.0) * 0.5 * viewport.x, (1.0 - ndc.y) * 0.5 * viewport.y);
    Some((px, clip.w))
}

pub fn screen_rect(cuboid: &Cuboid, view_proj: Mat4, viewport: Vec2) -> Option<ScreenRect> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for corner in cuboid_corners(cuboid) {
        let (px, _) = project(view_proj, viewport, corner)?;
        min = min.min(px);
        max = max.max(px);
    }
    Some(ScreenRect { min, max })
}

/// Index of the cuboid under `cursor`, nearest first.
pub fn pick_cuboid(
    cuboids: &[Cuboid],
    view_proj: Mat4,
    viewport: Vec2,
    cursor: Vec2,
) -> Option<usize> {
    cuboids
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let rect = screen_rect(c, view_proj, viewport)?;
            if !rect.contains(cursor) {
                return None;
            }
            let center = Vec3::new(c.center.x as f32, c.center.y as f32, c.center.z as f32);
            let (_, depth) = project(view_proj, viewport, center)?;
            Some((i, depth))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use scene_frame::Point;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 75.0, 800.0 / 600.0)
    }

    fn cube_at(x: f64, y: f64, z: f64) -> Cuboid {
        Cuboid {
            center: Point::new(x, y, z),
            size: Point::new(2.0, 2.0, 2.0),
            ..Cuboid::default()
        }
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let (px, w) = project(camera().view_proj(), VIEWPORT, Vec3::ZERO).unwrap();
        assert!(px.abs_diff_eq(Vec2::new(400.0, 300.0), 1e-3));
        assert!((w - 10.0).abs() < 1e-4);
    }

    #[test]
    fn hit_and_miss() {
        let vp = camera().view_proj();
        let cs = [cube_at(0.0, 0.0, 0.0)];
        assert_eq!(pick_cuboid(&cs, vp, VIEWPORT, Vec2::new(400.0, 300.0)), Some(0));
        assert_eq!(pick_cuboid(&cs, vp, VIEWPORT, Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn nearest_overlapping_cuboid_wins() {
        let vp = camera().view_proj();
        let cs = [cube_at(0.0, 0.0, 0.0), cube_at(0.0, 0.0, 5.0), cube_at(0.0, 0.0, -5.0)];
        assert_eq!(pick_cuboid(&cs, vp, VIEWPORT, Vec2::new(400.0, 300.0)), Some(1));
    }

    #[test]
    fn cuboids_behind_the_camera_are_ignored() {
        let vp = camera().view_proj();
        let cs = [cube_at(0.0, 0.0, 20.0)];
        assert_eq!(pick_cuboid(&cs, vp, VIEWPORT, Vec2::new(400.0, 300.0)), None);
        assert!(screen_rect(&cs[0], vp, VIEWPORT).is_none());
    }

    #[test]
    fn rect_tracks_screen_axes() {
        let vp = camera().view_proj();
        // Up in the world is up on screen, i.e. smaller pixel y.
        let high = screen_rect(&cube_at(0.0, 3.0, 0.0), vp, VIEWPORT).unwrap();
        assert!(high.max.y < 300.0);
        let right = screen_rect(&cube_at(3.0, 0.0, 0.0), vp, VIEWPORT).unwrap();
        assert!(right.min.x > 400.0);
    }
}
