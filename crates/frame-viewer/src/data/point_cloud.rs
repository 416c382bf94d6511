use crate::data::types::{InstanceBuffer, PointInstance};
use rayon::prelude::*;
use scene_frame::SceneData;
use wgpu::util::DeviceExt;

/// Builds one sprite instance per point, colored by normalized height.
pub fn build_point_instances(scene: &SceneData) -> Vec<PointInstance> {
    let Some(range) = scene.height_range() else {
        return Vec::new();
    };

    let instances: Vec<PointInstance> = scene
        .points
        .par_iter()
        .map(|p| PointInstance {
            position: [p.x as f32, p.y as f32, p.z as f32],
            color: range.color_for(p.z),
        })
        .collect();

    log::debug!(
        "Point instances: n={}, z=[{:.2}..{:.2}]",
        instances.len(),
        range.min,
        range.max
    );
    instances
}

/// Uploads point instances. Returns `None` for an empty cloud, since wgpu
/// rejects zero-sized vertex buffers.
pub fn upload_points(device: &wgpu::Device, instances: &[PointInstance]) -> Option<InstanceBuffer> {
    if instances.is_empty() {
        return None;
    }
    let buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Point Instances"),
        contents: bytemuck::cast_slice(instances),
        usage: wgpu::BufferUsages::VERTEX,
    });
    Some(InstanceBuffer {
        buf,
        len: instances.len() as u32,
    })
}
