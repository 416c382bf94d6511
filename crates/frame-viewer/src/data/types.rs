//! Core data types for the frame viewer, focused on GPU data representation.

/// Per-point instance data uploaded to the GPU vertex buffer.
/// Must match the instance inputs of `points.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct PointInstance {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGB from the height gradient.
    pub color: [f32; 3],
}

/// Uniform block for the point sprite pass, std140 layout.
/// Must match `PointUniform` in `points.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniformStd140 {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// `proj[0][0]` and `proj[1][1]`, used to size sprites in clip space.
    pub proj_scale: [f32; 2],
    /// Sprite diameter in world units.
    pub point_size: f32,
    pub opacity: f32,
}

const _: [(); 80] = [(); core::mem::size_of::<PointUniformStd140>()];

/// Per-cuboid instance data. Must match the instance inputs of `cuboids.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CuboidInstance {
    /// Unit cube → world transform (translate · yaw · scale), column major.
    pub model: [[f32; 4]; 4],
    /// RGBA for the 12 edge lines.
    pub edge_color: [f32; 4],
    /// RGBA for the translucent faces.
    pub face_color: [f32; 4],
}

/// Uniform block shared by both cuboid passes.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniformStd140 {
    pub view_proj: [[f32; 4]; 4],
}

/// GPU-resident instance buffer plus its element count.
#[derive(Debug)]
pub struct InstanceBuffer {
    pub buf: wgpu::Buffer,
    pub len: u32,
}
