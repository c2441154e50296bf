//! Render pipeline definitions.
//!
//! The viewer renders everything through one forward pipeline; the WGSL
//! source next to this module is the other half of the layout contract in
//! [`crate::common`].

pub mod model;

/// The render pipelines owned by the context.
#[derive(Debug)]
pub struct Pipelines {
    pub model: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        Self {
            model: model::mk_model_pipeline(device, config),
        }
    }
}
