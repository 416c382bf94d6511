use crate::data::types::{CuboidInstance, InstanceBuffer};
use glam::{Mat4, Quat, Vec3};
use scene_frame::Cuboid;
use wgpu::util::DeviceExt;

/// Edge color, #ffffff.
pub const EDGE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Face color, #666666 (linear) at 20% opacity.
pub const FACE_COLOR: [f32; 4] = [0.133, 0.133, 0.133, 0.2];
/// Highlight for the hovered cuboid, #ff9900 (linear).
pub const HOVER_RGB: [f32; 3] = [1.0, 0.318, 0.0];

/// Corners of the unit cube centered at the origin.
#[rustfmt::skip]
pub const UNIT_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5],
    [-0.5, -0.5,  0.5], [0.5, -0.5,  0.5], [0.5, 0.5,  0.5], [-0.5, 0.5,  0.5],
];

/// Corner index pairs of the 12 box edges.
#[rustfmt::skip]
pub const EDGES: [[u16; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

/// Corner triples of the 12 face triangles (two per side).
#[rustfmt::skip]
pub const FACES: [[u16; 3]; 12] = [
    [0, 2, 1], [0, 3, 2], // -Z
    [4, 5, 6], [4, 6, 7], // +Z
    [0, 1, 5], [0, 5, 4], // -Y
    [3, 7, 6], [3, 6, 2], // +Y
    [0, 4, 7], [0, 7, 3], // -X
    [1, 2, 6], [1, 6, 5], // +X
];

/// Unit cube → world: scale to `size`, yaw about +Z, then move to `center`.
pub fn cuboid_model(c: &Cuboid) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(c.size.x as f32, c.size.y as f32, c.size.z as f32),
        Quat::from_rotation_z(c.orientation.z as f32),
        Vec3::new(c.center.x as f32, c.center.y as f32, c.center.z as f32),
    )
}

/// World-space corners, in [`UNIT_CORNERS`] order.
pub fn cuboid_corners(c: &Cuboid) -> [Vec3; 8] {
    let model = cuboid_model(c);
    UNIT_CORNERS.map(|p| model.transform_point3(Vec3::from(p)))
}

pub fn build_cuboid_instances(cuboids: &[Cuboid], hovered: Option<usize>) -> Vec<CuboidInstance> {
    cuboids
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let (edge_color, face_color) = if hovered == Some(i) {
                let [r, g, b] = HOVER_RGB;
                ([r, g, b, 1.0], [r, g, b, FACE_COLOR[3]])
            } else {
                (EDGE_COLOR, FACE_COLOR)
            };
            CuboidInstance {
                model: cuboid_model(c).to_cols_array_2d(),
                edge_color,
                face_color,
            }
        })
        .collect()
}

pub fn upload_cuboids(device: &wgpu::Device, instances: &[CuboidInstance]) -> Option<InstanceBuffer> {
    if instances.is_empty() {
        return None;
    }
    let buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Cuboid Instances"),
        contents: bytemuck::cast_slice(instances),
        usage: wgpu::BufferUsages::VERTEX,
    });
    Some(InstanceBuffer {
        buf,
        len: instances.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_frame::{Orientation, Point};
    use std::f64::consts::FRAC_PI_2;

    fn cuboid(center: Point, size: Point, yaw: f64) -> Cuboid {
        Cuboid {
            center,
            size,
            orientation: Orientation { z: yaw },
            label: "Car".into(),
        }
    }

    #[test]
    fn axis_aligned_corners() {
        let c = cuboid(Point::new(10.0, 0.0, 1.0), Point::new(4.0, 2.0, 2.0), 0.0);
        let corners = cuboid_corners(&c);
        assert!(corners[0].abs_diff_eq(Vec3::new(8.0, -1.0, 0.0), 1e-5));
        assert!(corners[6].abs_diff_eq(Vec3::new(12.0, 1.0, 2.0), 1e-5));
    }

    #[test]
    fn yaw_rotates_about_vertical_axis() {
        let c = cuboid(Point::default(), Point::new(4.0, 2.0, 2.0), FRAC_PI_2);
        let corners = cuboid_corners(&c);
        // Length now runs along Y; height is untouched.
        assert!(corners[1].abs_diff_eq(Vec3::new(1.0, 2.0, -1.0), 1e-5));
        assert!(corners[6].z > 0.99);
    }

    #[test]
    fn hovered_cuboid_is_highlighted() {
        let cs = vec![Cuboid::default(), Cuboid::default()];
        let inst = build_cuboid_instances(&cs, Some(1));
        assert_eq!(inst[0].edge_color, EDGE_COLOR);
        assert_eq!(inst[0].face_color, FACE_COLOR);
        assert_eq!(inst[1].edge_color, [1.0, 0.318, 0.0, 1.0]);
        assert_eq!(inst[1].face_color[3], 0.2);
    }

    #[test]
    fn every_edge_and_face_references_a_corner() {
        assert!(EDGES.iter().flatten().all(|&i| (i as usize) < UNIT_CORNERS.len()));
        assert!(FACES.iter().flatten().all(|&i| (i as usize) < UNIT_CORNERS.len()));
    }
}
