use std::io::{BufReader, Cursor};

use crate::common::MaterialBinding;
use crate::data_structures::{model, texture};

/// Bind group layout of the material group: base color texture plus sampler.
pub fn base_color_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: MaterialBinding::BaseColor as u32,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: MaterialBinding::BaseColorSampler as u32,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Material bind_group_layout"),
    })
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let origin = location.origin().unwrap();
    let base = reqwest::Url::parse(&format!("{}/assets/", origin)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name);
        reqwest::get(url).await?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read_to_string(path)?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(path)?
    };

    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: Option<&str>,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(file_name).await?;
    texture::Texture::from_bytes(device, queue, &data, file_name, format)
}

/// Approximate linear-to-sRGB conversion of an MTL diffuse color, for
/// baking `Kd` entries into 1x1 base color textures.
fn srgb_pixel(diffuse: [f32; 3]) -> [u8; 4] {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0).powf(1.0 / 2.2) * 255.0).round() as u8;
    [to_byte(diffuse[0]), to_byte(diffuse[1]), to_byte(diffuse[2]), 255]
}

/// Parse an OBJ file and turn its MTL materials into GPU materials.
///
/// A material resolves to, in order of preference: its referenced diffuse
/// texture file, a 1x1 texture baked from its `Kd` color, or plain white.
/// Models without any usable material get a single white fallback so that
/// mesh material slots always resolve.
pub async fn load_textures(
    file_name: &str,
    queue: &wgpu::Queue,
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<(Vec<model::Material>, Vec<tobj::Model>)> {
    let obj_text: String = load_string(file_name).await?;
    let obj_cursor = Cursor::new(obj_text);
    let mut obj_reader = BufReader::new(obj_cursor);

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            let mat_text = load_string(&p)
                .await
                .expect(format!("Material library not found for {p}.").as_str());
            tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text)))
        },
    )
    .await?;

    let mut materials = Vec::new();
    for m in obj_materials? {
        let base_color = if let Some(m_diffuse_texture) = &m.diffuse_texture {
            load_texture(m_diffuse_texture, device, queue, None).await?
        } else if let Some(diffuse) = m.diffuse {
            texture::Texture::from_pixel(device, queue, srgb_pixel(diffuse), &m.name)
        } else {
            log::warn!(
                "material '{}' in {} has neither a texture nor a diffuse color",
                m.name,
                file_name
            );
            texture::Texture::from_pixel(device, queue, [255; 4], &m.name)
        };
        materials.push(model::Material::new(device, &m.name, base_color, layout));
    }

    if materials.is_empty() {
        log::warn!("{} references no materials, using a white fallback", file_name);
        let white = texture::Texture::from_pixel(device, queue, [255; 4], "fallback");
        materials.push(model::Material::new(device, "fallback", white, layout));
    }

    Ok((materials, models))
}

#[cfg(test)]
mod tests {
    use super::srgb_pixel;

    #[test]
    fn diffuse_colors_bake_to_srgb_bytes() {
        assert_eq!(srgb_pixel([0.0, 0.0, 0.0]), [0, 0, 0, 255]);
        assert_eq!(srgb_pixel([1.0, 1.0, 1.0]), [255, 255, 255, 255]);
        // Mid grey lands well above 128 after gamma encoding.
        let [r, ..] = srgb_pixel([0.5, 0.5, 0.5]);
        assert!(r > 170 && r < 200);
    }

    #[test]
    fn out_of_range_colors_are_clamped() {
        assert_eq!(srgb_pixel([2.0, -1.0, 1.0]), [255, 0, 255, 255]);
    }
}
