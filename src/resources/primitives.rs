//! Procedurally generated meshes.
//!
//! The ground plane is the one model kind that is not loaded from a file.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    model::{Material, Mesh, ModelVertex},
    texture::Texture,
};
use crate::resources::texture::base_color_layout;

/// Half extent of the ground plane in world units.
const GROUND_HALF_EXTENT: f32 = 20.0;
/// Quads per side.
const GROUND_SUBDIVISIONS: u32 = 16;
/// Muted green, sRGB.
const GROUND_COLOR: [u8; 4] = [104, 130, 82, 255];

/// Vertex and index data for a subdivided quad in the x-z plane.
///
/// UVs run 0..1 across the full plane (the tiling factor multiplies them in
/// the shader), normals all point up, winding is counter-clockwise seen
/// from above.
pub fn ground_plane_mesh(half_extent: f32, subdivisions: u32) -> (Vec<ModelVertex>, Vec<u32>) {
    let side = subdivisions + 1;
    let step = (2.0 * half_extent) / subdivisions as f32;

    let mut vertices = Vec::with_capacity((side * side) as usize);
    for row in 0..side {
        for col in 0..side {
            let x = -half_extent + col as f32 * step;
            let z = -half_extent + row as f32 * step;
            vertices.push(ModelVertex {
                position: [x, 0.0, z],
                normal: [0.0, 1.0, 0.0],
                tex_coords: [
                    col as f32 / subdivisions as f32,
                    row as f32 / subdivisions as f32,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity((subdivisions * subdivisions * 6) as usize);
    for row in 0..subdivisions {
        for col in 0..subdivisions {
            let top_left = row * side + col;
            let bottom_left = (row + 1) * side + col;
            indices.extend_from_slice(&[
                top_left,
                bottom_left,
                bottom_left + 1,
                top_left,
                bottom_left + 1,
                top_left + 1,
            ]);
        }
    }

    (vertices, indices)
}

/// Upload the ground plane and its solid color material.
pub fn ground_plane(device: &wgpu::Device, queue: &wgpu::Queue) -> (Vec<Mesh>, Vec<Material>) {
    let (vertices, indices) = ground_plane_mesh(GROUND_HALF_EXTENT, GROUND_SUBDIVISIONS);

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Ground Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Ground Index Buffer"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let mesh = Mesh {
        name: "ground".to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
        material: 0,
    };

    let layout = base_color_layout(device);
    let base_color = Texture::from_pixel(device, queue, GROUND_COLOR, "ground base color");
    let material = Material::new(device, "ground", base_color, &layout);

    (vec![mesh], vec![material])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_has_grid_vertex_and_index_counts() {
        let (vertices, indices) = ground_plane_mesh(10.0, 4);
        assert_eq!(vertices.len(), 5 * 5);
        assert_eq!(indices.len(), 4 * 4 * 6);
        assert!(indices.iter().all(|i| (*i as usize) < vertices.len()));
    }

    #[test]
    fn plane_normals_point_up() {
        let (vertices, _) = ground_plane_mesh(10.0, 2);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn plane_uvs_span_the_unit_square() {
        let (vertices, _) = ground_plane_mesh(5.0, 8);
        let first = vertices.first().unwrap();
        let last = vertices.last().unwrap();
        assert_eq!(first.tex_coords, [0.0, 0.0]);
        assert_eq!(last.tex_coords, [1.0, 1.0]);
        assert_eq!(first.position, [-5.0, 0.0, -5.0]);
        assert_eq!(last.position, [5.0, 0.0, 5.0]);
    }

    #[test]
    fn plane_triangles_wind_counter_clockwise_from_above() {
        let (vertices, indices) = ground_plane_mesh(1.0, 1);
        let [a, b, c] = [0, 1, 2].map(|i| vertices[indices[i] as usize].position);
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        // y component of u x v must be positive for an upward facing winding
        let y = u[2] * v[0] - u[0] * v[2];
        assert!(y > 0.0);
    }
}
