use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraController, Projection},
    common::{FrameBinding, Params, Uniforms},
    data_structures::texture,
    pipelines::Pipelines,
};

/// Central GPU and window context.
///
/// Owns the device/queue/surface, the camera state, the per-frame uniform
/// resources and the render pipelines. Created once at startup; the
/// application driver mutates the camera and rewrites the frame resources
/// every frame.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub projection: Projection,
    pub frame: FrameResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        log::info!("surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface; a linear format would leave
        // every model too dark.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new(
            (0.0, 1.0, 0.0),
            8.0,
            cgmath::Deg(30.0),
            cgmath::Deg(-25.0),
        );
        let camera_controller = CameraController::new(0.005, 0.5);
        let projection =
            Projection::new(config.width, config.height, cgmath::Deg(45.0), 0.1, 500.0);

        let frame = FrameResources::new(&device);
        let pipelines = Pipelines::new(&device, &config);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            camera_controller,
            projection,
            frame,
            pipelines,
            clear_colour: wgpu::Color {
                r: 0.53,
                g: 0.73,
                b: 0.92,
                a: 1.0,
            },
        }
    }
}

/// GPU resources of the frame bind group: the [`Uniforms`] and [`Params`]
/// buffers plus their bind group.
///
/// The CPU-side copies live here too; [`write`](Self::write) pushes them to
/// the GPU once per frame.
#[derive(Debug)]
pub struct FrameResources {
    pub uniforms: Uniforms,
    pub params: Params,
    pub uniforms_buffer: wgpu::Buffer,
    pub params_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl FrameResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniforms = Uniforms::default();
        let params = Params::new(0, 0, 1);

        let uniforms_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniforms Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Params Buffer"),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = frame_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: FrameBinding::Uniforms as u32,
                    resource: uniforms_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: FrameBinding::Params as u32,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
            label: Some("frame_bind_group"),
        });

        Self {
            uniforms,
            params,
            uniforms_buffer,
            params_buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Push the CPU-side uniform state to the GPU.
    pub fn write(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.uniforms_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );
        queue.write_buffer(&self.params_buffer, 0, bytemuck::cast_slice(&[self.params]));
    }
}

/// Bind group layout of the frame group.
pub fn frame_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let uniform_entry = |binding: FrameBinding| wgpu::BindGroupLayoutEntry {
        binding: binding as u32,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(FrameBinding::Uniforms),
            uniform_entry(FrameBinding::Params),
        ],
        label: Some("frame_bind_group_layout"),
    })
}
