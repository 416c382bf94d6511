//! Turns a decoded [`SceneData`] snapshot into GPU instance buffers.

pub mod cuboids;
pub mod point_cloud;
pub mod types;

pub use self::types::{CuboidInstance, InstanceBuffer, PointInstance};

use scene_frame::{Cuboid, SceneData};

/// GPU buffers for the frame on screen. Empty collections have no buffer.
#[derive(Debug, Default)]
pub struct FrameGpu {
    pub points: Option<InstanceBuffer>,
    pub cuboids: Option<InstanceBuffer>,
}

impl FrameGpu {
    pub fn upload(device: &wgpu::Device, scene: &SceneData, hovered: Option<usize>) -> Self {
        let points = point_cloud::build_point_instances(scene);
        let mut gpu = Self {
            points: point_cloud::upload_points(device, &points),
            cuboids: None,
        };
        gpu.update_cuboids(device, &scene.cuboids, hovered);
        gpu
    }

    /// Rebuilds only the cuboid instances, e.g. after the hover target changed.
    pub fn update_cuboids(&mut self, device: &wgpu::Device, cuboids: &[Cuboid], hovered: Option<usize>) {
        let instances = cuboids::build_cuboid_instances(cuboids, hovered);
        self.cuboids = cuboids::upload_cuboids(device, &instances);
    }
}
