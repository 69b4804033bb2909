use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::data_structures::{
    registry::TextureRegistry,
    texture::{Texture, TextureError, check_channels},
};

pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &texture.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = crate::data_structures::texture::create_default_sampler(device);
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    })
}

/// One bind group per occupied slot, indexed by slot.
pub fn bind_textures(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    registry: &TextureRegistry<Texture>,
) -> Vec<wgpu::BindGroup> {
    registry
        .iter()
        .map(|(slot, entry)| {
            log::debug!("binding \"{}\" to texture slot {slot}", entry.tag);
            texture_bind_group(device, layout, &entry.payload, &entry.tag)
        })
        .collect()
}

/// Decode image file contents and flip them so `v = 0` is the bottom row.
pub fn decode_image(bytes: &[u8], label: &str) -> Result<DynamicImage, TextureError> {
    let img = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
        label: label.to_string(),
        source,
    })?;
    Ok(img.flipv())
}

pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    root: &Path,
    file_name: &str,
) -> anyhow::Result<Texture> {
    let data = super::load_binary(root, file_name)?;
    let img = decode_image(&data, file_name)?;
    let channels = check_channels(&img, file_name)?;
    let (width, height) = img.dimensions();
    let texture = Texture::from_image(device, queue, &img, file_name)?;
    log::info!(
        "Successfully loaded image: {file_name}, width: {width}, height: {height}, channels: {channels}"
    );
    Ok(texture)
}
