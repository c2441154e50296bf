use wgpu::util::DeviceExt;

use crate::data_structures::model::{Mesh, ModelVertex};

/// Interleave the parsed OBJ data into [`ModelVertex`] buffers.
///
/// The OBJ loader runs with `single_index`, so positions, normals and UVs
/// share one index stream. Missing normals or UVs are filled with zeroes;
/// the v coordinate is flipped because OBJ uses a bottom-left UV origin and
/// wgpu samples from the top left.
pub fn load_meshes(
    models: &[tobj::Model],
    file_name: &str,
    device: &wgpu::Device,
) -> Vec<Mesh> {
    models
        .iter()
        .filter_map(|m| {
            if m.mesh.indices.is_empty() {
                log::warn!("skipping empty mesh '{}' in {}", m.name, file_name);
                return None;
            }

            let vertices = (0..m.mesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", file_name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", file_name)),
                contents: bytemuck::cast_slice(&m.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            Some(Mesh {
                name: m.name.clone(),
                vertex_buffer,
                index_buffer,
                num_elements: m.mesh.indices.len() as u32,
                material: m.mesh.material_id.unwrap_or(0),
            })
        })
        .collect::<Vec<_>>()
}
