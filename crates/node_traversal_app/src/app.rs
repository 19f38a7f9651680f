// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visualizer window setup and event loop.

use crate::file_watcher::InputWatcher;
use crate::panel::{shortcut_commands, ControlPanel};
use crate::render::GraphView;
use crate::settings::VisualizerSettings;
use egui_wgpu::wgpu;
use node_traversal_graph::try_load_from_path;
use node_traversal_playback::{SearchSession, SessionError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Visualizer application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Search session could not start
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Settings could not be loaded
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),
}

/// Result type for visualizer operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| AppError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| AppError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Node Traversal Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| AppError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| AppError::RendererInit("surface has no texture formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Visualizer Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            // egui-wgpu wants a 'static pass; the encoder stays locked until it drops
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Visualizer Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the visualizer
struct VisualizerRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    inner: VisualizerInner,
}

/// Search session and the UI around it
struct VisualizerInner {
    session: SearchSession,
    graph_view: GraphView,
    controls: ControlPanel,
    watcher: Option<InputWatcher>,
    last_frame: Instant,
}

impl VisualizerInner {
    fn new(settings: &VisualizerSettings, session: SearchSession) -> Self {
        let watcher = if settings.watch_input {
            InputWatcher::new(&settings.input_path)
                .map_err(|e| tracing::warn!("Input hot reload disabled: {e}"))
                .ok()
        } else {
            None
        };

        Self {
            controls: ControlPanel::new(settings.step_delay),
            session,
            graph_view: GraphView::new(),
            watcher,
            last_frame: Instant::now(),
        }
    }

    /// Reload the input file if the watcher saw it change
    fn poll_input_changes(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        if !watcher.reload_requested() {
            return;
        }

        let path = watcher.path();
        let graph = match try_load_from_path(path) {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!("Reload skipped: {e}");
                return;
            }
        };
        match self.session.replace_graph(graph) {
            Ok(()) => tracing::info!("Reloaded {:?}", path),
            Err(e) => tracing::error!("Reload rejected, keeping previous graph: {e}"),
        }
    }

    /// Run one frame: input, playback step, UI
    fn update(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.poll_input_changes();

        let mut commands = shortcut_commands(ctx);
        commands.extend(self.controls.ui(ctx, &mut self.session));

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                self.graph_view.ui(ui, &self.session);
            });

        // Commands take effect between frames, after the UI has read the session
        for command in commands {
            self.session.apply(command);
        }
        self.session.tick(delta);
    }
}

/// Main visualizer application
pub struct VisualizerApp {
    running: Option<VisualizerRunning>,
    /// Prepared before the window exists, moved into `running` on resume
    pending: Option<VisualizerInner>,
    window_settings: crate::settings::WindowSettings,
    /// First fatal error hit inside the event loop
    error: Option<AppError>,
}

impl VisualizerApp {
    /// Load the graph and prepare the session; the window opens on resume
    pub fn new(settings: VisualizerSettings) -> Result<Self> {
        let graph = node_traversal_graph::load_from_path(&settings.input_path);
        let session = SearchSession::new(graph, settings.session_config())?;
        let window_settings = settings.window.clone();

        Ok(Self {
            running: None,
            pending: Some(VisualizerInner::new(&settings, session)),
            window_settings,
            error: None,
        })
    }

    /// Run the visualizer until its window closes
    pub fn run(settings: VisualizerSettings) -> Result<()> {
        let mut app = Self::new(settings)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<VisualizerRunning> {
        tracing::info!("Creating visualizer window...");

        let window_attrs = Window::default_attributes()
            .with_title(self.window_settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_settings.width,
                self.window_settings.height,
            ))
            .with_min_inner_size(winit::dpi::LogicalSize::new(400, 300));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| AppError::WindowCreation(e.to_string()))?,
        );

        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::light());

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        let mut inner = self
            .pending
            .take()
            .ok_or_else(|| AppError::WindowCreation("visualizer already started".to_string()))?;
        inner.last_frame = Instant::now();

        tracing::info!("Window size: {:?}", window.inner_size());

        Ok(VisualizerRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            inner,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        tracing::error!("{error}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for VisualizerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);

        if response.consumed {
            return;
        }

        let mut fatal = None;
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.inner.update(ctx);
                });

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        fatal = Some(AppError::RendererInit("out of GPU memory".to_string()));
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                if fatal.is_none() {
                    running.window.request_redraw();
                }
            }
            _ => {}
        }

        if let Some(error) = fatal {
            self.fail(event_loop, error);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}
