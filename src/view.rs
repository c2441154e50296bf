//! The model view and the application driver.
//!
//! [`ModelView`] owns the currently displayed model and exposes the model
//! kind selection; everything else (window lifecycle, frame pacing, surface
//! reconfiguration, input routing) lives in [`App`], the winit application
//! handler behind [`run`].
//!
//! # Lifecycle
//!
//! 1. `run()` builds the event loop and the [`App`]
//! 2. `resumed` creates the window and awaits GPU context + initial model
//! 3. Each redraw writes the frame uniforms and encodes one render pass
//! 4. Digit keys 1-4 select the displayed model, mouse drag orbits the
//!    camera, the scroll wheel zooms

use std::{fmt::Debug, iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    common::Params,
    context::Context,
    data_structures::{
        model::{DrawModel, Model, ModelKind},
        texture::Texture,
    },
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Radians per second of idle turntable spin.
const TURNTABLE_SPEED: f32 = 0.4;

/// The view: one displayed model and the selection of which kind it is.
///
/// Rendering a frame recomputes the [`crate::common::Uniforms`] from the
/// model's transform fields and the camera state, then encodes the model's
/// draw calls into a fresh render pass.
pub struct ModelView {
    model: Model,
}

impl ModelView {
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    /// The currently displayed model kind.
    pub fn kind(&self) -> ModelKind {
        self.model.kind
    }

    /// Swap in a freshly loaded model, dropping the old one and its GPU
    /// buffers.
    pub fn set_model(&mut self, model: Model) {
        log::info!("showing model '{}'", model.kind);
        self.model = model;
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Advance the idle turntable rotation.
    pub fn update(&mut self, dt: Duration) {
        self.model.rotation.y += TURNTABLE_SPEED * dt.as_secs_f32();
    }

    /// Render one frame of the current model.
    pub fn render(&self, ctx: &mut Context) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        ctx.frame.uniforms = self
            .model
            .uniforms(ctx.camera.view_matrix(), ctx.projection.matrix());
        ctx.frame.params = Params::new(ctx.config.width, ctx.config.height, self.model.tiling);
        ctx.frame.write(&ctx.queue);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&ctx.pipelines.model);
            render_pass.draw_model(&self.model, &ctx.frame.bind_group);
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Application state bundle: GPU context, view, and surface status.
pub struct ViewerState {
    pub(crate) ctx: Context,
    pub(crate) view: ModelView,
    is_surface_configured: bool,
    orbiting: bool,
}

impl ViewerState {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.view.render(&mut self.ctx)
    }
}

pub(crate) enum ViewerEvent {
    #[allow(dead_code)]
    Initialized {
        state: ViewerState,
    },
    #[allow(dead_code)]
    ModelLoaded(Model),
}

impl Debug for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _ } => f.write_str("Initialized"),
            Self::ModelLoaded(model) => f.debug_tuple("ModelLoaded").field(&model.kind).finish(),
        }
    }
}

/// The winit application handler driving the viewer.
pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    // Only the wasm init/load paths send user events.
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<ViewerEvent>,
    state: Option<ViewerState>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<ViewerEvent>) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            last_time: Instant::now(),
        }
    }

    /// Switch the displayed model, loading it off the current thread where
    /// the platform requires it. Loading failures keep the current model.
    fn select_model(&mut self, kind: ModelKind) {
        let Some(state) = &mut self.state else {
            return;
        };
        if state.view.kind() == kind {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let loaded = self
                .async_runtime
                .block_on(Model::load(kind, &state.ctx.device, &state.ctx.queue));
            match loaded {
                Ok(model) => state.view.set_model(model),
                Err(e) => log::error!("could not load model '{}': {}", kind, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let device = state.ctx.device.clone();
            let queue = state.ctx.queue.clone();
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match Model::load(kind, &device, &queue).await {
                    Ok(model) => {
                        assert!(proxy.send_event(ViewerEvent::ModelLoaded(model)).is_ok());
                    }
                    Err(e) => log::error!("could not load model '{}': {}", kind, e),
                }
            });
        }
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("vitrine");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let init_future = async move {
            let ctx = Context::new(window).await;
            let model = match Model::load(ModelKind::default(), &ctx.device, &ctx.queue).await {
                Ok(model) => model,
                Err(e) => panic!(
                    "App initialization failed. Cannot load the initial model: {}",
                    e
                ),
            };
            ViewerState {
                view: ModelView::new(model),
                ctx,
                is_surface_configured: false,
                orbiting: false,
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.state = Some(self.async_runtime.block_on(init_future));
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = init_future.await;
                assert!(proxy.send_event(ViewerEvent::Initialized { state }).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Initialized { state } => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(state);

                // Important: Trigger a resize and redraw now that we are initialized
                let state = self.state.as_mut().unwrap();
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
            }
            ViewerEvent::ModelLoaded(model) => {
                if let Some(state) = &mut self.state {
                    state.view.set_model(model);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.orbiting {
                let ctx = &mut state.ctx;
                ctx.camera_controller
                    .handle_mouse(&mut ctx.camera, dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                        PhysicalKey::Code(KeyCode::Digit1) => {
                            self.select_model(ModelKind::Ground)
                        }
                        PhysicalKey::Code(KeyCode::Digit2) => {
                            self.select_model(ModelKind::LowPolyHouse)
                        }
                        PhysicalKey::Code(KeyCode::Digit3) => {
                            self.select_model(ModelKind::Pancakes)
                        }
                        PhysicalKey::Code(KeyCode::Digit4) => {
                            self.select_model(ModelKind::TvRetro)
                        }
                        _ => (),
                    }
                }
            }
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                if button == MouseButton::Left {
                    state.orbiting = button_state.is_pressed();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let ctx = &mut state.ctx;
                ctx.camera_controller.handle_scroll(&mut ctx.camera, &delta);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render() {
                    Ok(_) => {
                        state.view.update(dt);
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Build the event loop and run the viewer until the window closes.
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop);

    event_loop.run_app(&mut app)?;

    Ok(())
}
