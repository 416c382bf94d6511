//! Owns the GPU context and the scene pipelines, and records each frame:
//! one scene pass (points, then cuboids) followed by the egui overlay.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{cuboids::CuboidPipeline, points::PointsPipeline},
    targets::Targets,
};
use crate::{camera::Camera, data::FrameGpu};
use std::sync::Arc;
use winit::window::Window;

/// Background, #111111 in sRGB.
const BACKGROUND_SRGB: f64 = 17.0 / 255.0;

/// Tessellated egui output for one frame.
pub struct UiFrame<'a> {
    pub shapes: &'a [egui::ClippedPrimitive],
    pub textures: &'a egui::TexturesDelta,
    pub screen: egui_wgpu::ScreenDescriptor,
}

pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub points: PointsPipeline,
    pub cuboids: CuboidPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let color_fmt = gfx.config.format;

        let targets = Targets::new(&gfx.device, gfx.size);
        let points = PointsPipeline::new(&gfx.device, color_fmt, targets.depth_fmt);
        let cuboids = CuboidPipeline::new(&gfx.device, color_fmt, targets.depth_fmt);
        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, color_fmt, None, 1);

        Ok(Self {
            gfx,
            targets,
            points,
            cuboids,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Records and submits one frame. `scene` is `None` while the status
    /// overlay replaces the scene.
    pub fn render(
        &mut self,
        swap_view: &wgpu::TextureView,
        scene: Option<&FrameGpu>,
        camera: &Camera,
        point_size: f32,
        ui: UiFrame<'_>,
    ) {
        let device = &self.gfx.device;
        let queue = &self.gfx.queue;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        self.points.prepare(queue, camera, point_size);
        self.cuboids.prepare(queue, camera);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(self.gfx.config.format)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(frame) = scene {
                // Points first; cuboid faces blend over them.
                if let Some(points) = &frame.points {
                    self.points.draw(&mut pass, points);
                }
                if let Some(cuboids) = &frame.cuboids {
                    self.cuboids.draw(&mut pass, cuboids);
                }
            }
        }

        for (id, delta) in &ui.textures.set {
            self.egui_renderer.update_texture(device, queue, *id, delta);
        }
        let callback_cmds =
            self.egui_renderer
                .update_buffers(device, queue, &mut encoder, ui.shapes, &ui.screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer.render(&mut pass, ui.shapes, &ui.screen);
        }

        for id in &ui.textures.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(callback_cmds.into_iter().chain(std::iter::once(encoder.finish())));
    }
}

/// Background clear value for `format`. sRGB targets expect linear input.
pub fn clear_color(format: wgpu::TextureFormat) -> wgpu::Color {
    let c = if format.is_srgb() {
        srgb_to_linear(BACKGROUND_SRGB)
    } else {
        BACKGROUND_SRGB
    };
    wgpu::Color {
        r: c,
        g: c,
        b: c,
        a: 1.0,
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_matches_format_encoding() {
        let linear = clear_color(wgpu::TextureFormat::Bgra8UnormSrgb);
        assert!((linear.r - 0.00561).abs() < 1e-4);
        let raw = clear_color(wgpu::TextureFormat::Bgra8Unorm);
        assert!((raw.g - 17.0 / 255.0).abs() < 1e-9);
        assert_eq!(raw.a, 1.0);
    }
}
