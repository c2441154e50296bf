//! Shader-visible data layout.
//!
//! Everything in this module is a contract with `pipelines/model_shader.wgsl`:
//! the enums carry the attribute locations and bind group/binding indices
//! used on both sides, and the structs are uploaded byte-for-byte into
//! uniform buffers. A mismatch with the shader is a silent rendering bug,
//! not a runtime error, so the sizes and indices are pinned by unit tests.

use cgmath::{Matrix4, SquareMatrix};

/// Vertex attribute shader locations. One interleaved vertex buffer at
/// slot [`VERTEX_BUFFER_SLOT`] carries all three.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position = 0,
    Normal = 1,
    Uv = 2,
}

/// Bind group indices of the model pipeline.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindGroup {
    /// Base color texture and sampler, owned per material.
    Material = 0,
    /// Frame data ([`Uniforms`] and [`Params`]), rewritten every frame.
    Frame = 1,
}

/// Bindings inside the material group.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialBinding {
    BaseColor = 0,
    BaseColorSampler = 1,
}

/// Bindings inside the frame group.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameBinding {
    Uniforms = 0,
    Params = 1,
}

/// The single vertex buffer slot of the model pipeline.
pub const VERTEX_BUFFER_SLOT: u32 = 0;

/// Per-frame transform data: model, view and projection matrix, column-major,
/// in that order.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl Uniforms {
    pub fn new(model: Matrix4<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
            view: view.into(),
            projection: projection.into(),
        }
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        let identity = Matrix4::identity();
        Self::new(identity, identity, identity)
    }
}

/// Per-draw render configuration: the surface size in pixels and the UV
/// tiling factor of the current model.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub tiling: u32,
    // Uniform buffers round struct sizes up to 16 bytes.
    pub _padding: u32,
}

impl Params {
    pub fn new(width: u32, height: u32, tiling: u32) -> Self {
        Self {
            width,
            height,
            tiling,
            _padding: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn uniforms_layout_is_three_packed_matrices() {
        assert_eq!(size_of::<Uniforms>(), 3 * 16 * size_of::<f32>());
    }

    #[test]
    fn params_layout_is_one_uniform_slot() {
        assert_eq!(size_of::<Params>(), 16);
    }

    #[test]
    fn attribute_locations_match_the_shader() {
        assert_eq!(Attribute::Position as u32, 0);
        assert_eq!(Attribute::Normal as u32, 1);
        assert_eq!(Attribute::Uv as u32, 2);
    }

    #[test]
    fn binding_table_matches_the_shader() {
        assert_eq!(BindGroup::Material as u32, 0);
        assert_eq!(BindGroup::Frame as u32, 1);
        assert_eq!(MaterialBinding::BaseColor as u32, 0);
        assert_eq!(MaterialBinding::BaseColorSampler as u32, 1);
        assert_eq!(FrameBinding::Uniforms as u32, 0);
        assert_eq!(FrameBinding::Params as u32, 1);
    }

    #[test]
    fn default_uniforms_are_identity() {
        let uniforms = Uniforms::default();
        assert_eq!(uniforms.model[0][0], 1.0);
        assert_eq!(uniforms.model[3][3], 1.0);
        assert_eq!(uniforms.model[1][0], 0.0);
    }
}
