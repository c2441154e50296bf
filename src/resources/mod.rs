//! Asset IO: loading meshes and textures from external files and generating
//! the procedural ground plane.

use crate::data_structures::model::{Material, Mesh};

pub mod mesh;
pub mod primitives;
pub mod texture;

/// Load an OBJ model and its materials into GPU buffers.
///
/// `file_name` is resolved relative to the `assets/` directory. Every
/// returned model carries at least one material; meshes that reference no
/// material fall back to slot 0.
pub async fn load_model_obj(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<(Vec<Mesh>, Vec<Material>)> {
    let layout = texture::base_color_layout(device);

    let (materials, models) = texture::load_textures(file_name, queue, device, &layout).await?;
    let meshes = mesh::load_meshes(&models, file_name, device);
    if meshes.is_empty() {
        anyhow::bail!("{} contains no renderable meshes", file_name);
    }

    Ok((meshes, materials))
}
