use crate::{
    camera::{Camera, OrbitController},
    config::Config,
    data::FrameGpu,
    input::{Command, InputDispatch},
    loader::{FrameLoader, HttpFrameSource, LoadState},
    picking::pick_cuboid,
    playback::{AnimationFrames, Playback},
    presets::CameraPresets,
    renderer::{Renderer, UiFrame},
    ui::{self, Status, UiAction, UiModel},
};
use anyhow::Result;
use glam::Vec2;
use std::sync::Arc;
use winit::{event::WindowEvent, window::Window};

/// Vertical field of view, degrees.
const FOV_DEG: f32 = 75.0;

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    orbit: OrbitController,
    presets: CameraPresets,
    playback: Playback<AnimationFrames>,
    loader: FrameLoader,
    input: InputDispatch,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    frame_gpu: FrameGpu,
    hovered: Option<usize>,
    cursor: Option<Vec2>,
    point_size: f32,
    quit: bool,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let renderer = Renderer::new(window.clone()).await?;
        let size = renderer.gfx.size;

        let preset = config.view.preset();
        let mut camera = Camera::new(preset.position, preset.target, FOV_DEG, 1.0);
        camera.set_aspect(size.width, size.height);

        let mut playback = Playback::new(config.total_frames, AnimationFrames::new());
        playback.set_playback_speed(config.speed);

        let mut loader = FrameLoader::spawn(HttpFrameSource::new(config.frame_url.clone()));
        loader.request(playback.frame_index());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        log::info!(
            "Viewer ready: {} frames from {}",
            config.total_frames,
            config.frame_url
        );

        Ok(Self {
            renderer,
            camera,
            orbit: OrbitController::new(),
            presets: CameraPresets::new(config.view),
            playback,
            loader,
            input: InputDispatch::new(),
            egui_ctx,
            egui_state,
            frame_gpu: FrameGpu::default(),
            hovered: None,
            cursor: None,
            point_size: config.point_size,
            quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    /// Returns `true` if the event was consumed (by egui or a shortcut).
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        match event {
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(cmd) = self.input.on_key(event) {
                    self.apply_command(cmd);
                    return true;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            _ => {}
        }

        if self.presets.controls_enabled() {
            self.orbit.handle_event(event, &mut self.camera);
        }
        false
    }

    fn apply_command(&mut self, cmd: Command) {
        match cmd {
            Command::TogglePlayback => self.playback.toggle_playback(),
            Command::StepBackward => self.playback.step_backward(),
            Command::StepForward => self.playback.step_forward(),
            Command::MoveCamera(mv) => {
                if self.presets.controls_enabled() {
                    self.orbit.apply_move(mv, &mut self.camera);
                }
            }
            Command::Quit => self.quit = true,
        }
    }

    fn apply_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::TogglePlayback => self.playback.toggle_playback(),
            UiAction::SkipToStart => self.playback.skip_to_start(),
            UiAction::SkipToEnd => self.playback.skip_to_end(),
            UiAction::SetSpeed(speed) => self.playback.set_playback_speed(speed),
            UiAction::Seek(frame) => self.playback.set_current_frame(frame),
            UiAction::SelectView(view) => {
                self.presets.handle_view_change(view, Some(&mut self.camera));
            }
            UiAction::ToggleControls => {
                self.presets.toggle_controls();
                if !self.presets.controls_enabled() {
                    self.orbit.release();
                }
            }
        }
    }

    /// Advances playback, requests the frame under the playhead and applies
    /// finished fetches. Called once per redraw, before [`App::render`].
    pub fn update(&mut self) {
        if let Some(id) = self.playback.scheduler_mut().take_due() {
            self.playback.on_tick(id);
        }

        self.loader.request(self.playback.frame_index());

        let device = &self.renderer.gfx.device;
        if self.loader.poll() {
            self.hovered = None;
            self.frame_gpu = match self.loader.state().scene() {
                Some(scene) => FrameGpu::upload(device, scene, None),
                None => FrameGpu::default(),
            };
        }

        let hovered = self.pick_hovered();
        if hovered != self.hovered {
            self.hovered = hovered;
            if let Some(scene) = self.loader.state().scene() {
                self.frame_gpu.update_cuboids(device, &scene.cuboids, hovered);
            }
        }
    }

    fn pick_hovered(&self) -> Option<usize> {
        let cursor = self.cursor?;
        if self.egui_ctx.is_pointer_over_area() {
            return None;
        }
        let scene = self.loader.state().scene()?;
        let size = self.renderer.gfx.size;
        let viewport = Vec2::new(size.width as f32, size.height as f32);
        pick_cuboid(&scene.cuboids, self.camera.view_proj(), viewport, cursor)
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let state = self.loader.state();
        let model = UiModel {
            playback: self.playback.state(),
            total_frames: self.playback.total_frames(),
            current_view: self.presets.current_view(),
            controls_enabled: self.presets.controls_enabled(),
            status: match state {
                LoadState::Loading => Status::Loading,
                LoadState::Failed(msg) => Status::Error(msg),
                LoadState::Ready(_) => Status::Ready,
            },
            hovered: state
                .scene()
                .zip(self.hovered)
                .and_then(|(scene, i)| scene.cuboids.get(i)),
        };
        let actions = ui::draw(&self.egui_ctx, &model);

        let egui::FullOutput {
            platform_output,
            textures_delta,
            shapes,
            pixels_per_point,
            ..
        } = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, platform_output);

        for action in actions {
            self.apply_ui_action(action);
        }

        let paint_jobs = self.egui_ctx.tessellate(shapes, pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point,
        };

        // Only a loaded scene is drawn; loading and error states show the overlay.
        let scene = self.loader.state().scene().map(|_| &self.frame_gpu);
        self.renderer.render(
            &swap_view,
            scene,
            &self.camera,
            self.point_size,
            UiFrame {
                shapes: &paint_jobs,
                textures: &textures_delta,
                screen,
            },
        );
        frame.present();

        Ok(())
    }
}
