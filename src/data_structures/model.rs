//! Model kinds, meshes, materials and draw call encoding.
//!
//! A [`Model`] owns the GPU vertex/index buffers for one of the four demo
//! models plus its mutable transform state. Buffers are uploaded once at
//! construction; per frame the view recomputes the [`Uniforms`] from the
//! transform fields and the model encodes one draw call per mesh.

use cgmath::{Matrix4, Vector3};

use crate::{
    common::{self, Attribute, BindGroup, MaterialBinding, Uniforms},
    data_structures::texture::Texture,
    math, resources,
};

/// The closed set of models the viewer can display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelKind {
    #[default]
    Ground,
    LowPolyHouse,
    Pancakes,
    TvRetro,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Ground,
        ModelKind::LowPolyHouse,
        ModelKind::Pancakes,
        ModelKind::TvRetro,
    ];

    /// The OBJ source under `assets/`, or `None` for the procedurally
    /// generated ground plane.
    pub fn asset_file(&self) -> Option<&'static str> {
        match self {
            ModelKind::Ground => None,
            ModelKind::LowPolyHouse => Some("lowpoly_house.obj"),
            ModelKind::Pancakes => Some("pancakes.obj"),
            ModelKind::TvRetro => Some("tv_retro.obj"),
        }
    }

    /// How often the base color map repeats across the model's UV range.
    pub fn default_tiling(&self) -> u32 {
        match self {
            ModelKind::Ground => 16,
            _ => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Ground => "ground",
            ModelKind::LowPolyHouse => "low-poly house",
            ModelKind::Pancakes => "pancakes",
            ModelKind::TvRetro => "retro TV",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Types that can describe their GPU vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// One interleaved vertex: position, normal, UV.
///
/// Field order matches the attribute table in [`common`]; the layout is
/// shader-visible byte for byte.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: Attribute::Position as u32,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: Attribute::Normal as u32,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: Attribute::Uv as u32,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// GPU-resident geometry of one material slice of a model.
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
}

/// A base color texture bound as the material group.
pub struct Material {
    pub name: String,
    pub base_color: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    /// Bind `base_color` into a group matching the material layout.
    ///
    /// The texture must carry a sampler.
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        base_color: Texture,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: MaterialBinding::BaseColor as u32,
                    resource: wgpu::BindingResource::TextureView(&base_color.view),
                },
                wgpu::BindGroupEntry {
                    binding: MaterialBinding::BaseColorSampler as u32,
                    resource: wgpu::BindingResource::Sampler(
                        base_color
                            .sampler
                            .as_ref()
                            .expect("material texture created without a sampler"),
                    ),
                },
            ],
            label: Some(name),
        });
        Self {
            name: name.to_string(),
            base_color,
            bind_group,
        }
    }
}

/// One displayable model: GPU buffers plus mutable per-instance state.
pub struct Model {
    pub kind: ModelKind,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied in X * Y * Z order.
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub tiling: u32,
}

impl Model {
    /// Load or generate the mesh data for `kind` and upload it.
    ///
    /// The upload happens exactly once here; afterwards the buffers are only
    /// read by draw calls.
    pub async fn load(
        kind: ModelKind,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> anyhow::Result<Self> {
        let (meshes, materials) = match kind.asset_file() {
            Some(file_name) => resources::load_model_obj(file_name, device, queue).await?,
            None => resources::primitives::ground_plane(device, queue),
        };
        log::info!(
            "loaded model '{}' ({} meshes, {} materials)",
            kind,
            meshes.len(),
            materials.len()
        );
        Ok(Self {
            kind,
            meshes,
            materials,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            tiling: kind.default_tiling(),
        })
    }

    /// World transform from the mutable fields: translation, then the X*Y*Z
    /// Euler rotation, then uniform scale (scale applied first).
    pub fn model_matrix(&self) -> Matrix4<f32> {
        math::from_translation(self.position)
            * math::from_euler_xyz(self.rotation)
            * math::from_scale(self.scale)
    }

    /// Frame uniforms for this model under the given camera state.
    pub fn uniforms(&self, view: Matrix4<f32>, projection: Matrix4<f32>) -> Uniforms {
        Uniforms::new(self.model_matrix(), view, projection)
    }
}

/// Encoding of model draw calls into an active render pass.
pub trait DrawModel<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh, material: &'a Material, frame: &'a wgpu::BindGroup);
    fn draw_model(&mut self, model: &'a Model, frame: &'a wgpu::BindGroup);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh, material: &'b Material, frame: &'b wgpu::BindGroup) {
        self.set_vertex_buffer(common::VERTEX_BUFFER_SLOT, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(BindGroup::Material as u32, &material.bind_group, &[]);
        self.set_bind_group(BindGroup::Frame as u32, frame, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }

    fn draw_model(&mut self, model: &'b Model, frame: &'b wgpu::BindGroup) {
        for mesh in &model.meshes {
            // The loaders guarantee at least one material per model.
            let material = model
                .materials
                .get(mesh.material)
                .unwrap_or(&model.materials[0]);
            self.draw_mesh(mesh, material, frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector4;
    use std::f32::consts::FRAC_PI_2;
    use std::mem::size_of;

    #[test]
    fn vertex_layout_is_interleaved_and_packed() {
        let desc = ModelVertex::desc();
        assert_eq!(desc.array_stride, size_of::<ModelVertex>() as u64);
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes.len(), 3);
        assert_eq!(desc.attributes[0].offset, 0);
        assert_eq!(desc.attributes[1].offset, 12);
        assert_eq!(desc.attributes[2].offset, 24);
        assert_eq!(desc.attributes[0].shader_location, 0);
        assert_eq!(desc.attributes[1].shader_location, 1);
        assert_eq!(desc.attributes[2].shader_location, 2);
    }

    #[test]
    fn every_file_backed_kind_names_an_asset() {
        for kind in ModelKind::ALL {
            match kind {
                ModelKind::Ground => assert!(kind.asset_file().is_none()),
                _ => assert!(kind.asset_file().unwrap().ends_with(".obj")),
            }
        }
    }

    #[test]
    fn ground_tiles_the_base_color() {
        assert_eq!(ModelKind::Ground.default_tiling(), 16);
        assert_eq!(ModelKind::Pancakes.default_tiling(), 1);
    }

    #[test]
    fn model_matrix_scales_before_rotating_before_translating() {
        // A dummy model without GPU resources is enough to exercise the
        // transform composition.
        let model = Model {
            kind: ModelKind::Ground,
            meshes: Vec::new(),
            materials: Vec::new(),
            position: Vector3::new(10.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, FRAC_PI_2, 0.0),
            scale: 2.0,
            tiling: 1,
        };
        // (1,0,0) scaled to (2,0,0), rotated about y onto -z, then moved.
        let p = model.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -2.0, epsilon = 1e-5);
    }
}
