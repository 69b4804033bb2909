//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU texture resources,
//! and helpers for creating depth buffers, solid placeholder textures and
//! mipmapped colour textures from decoded images.

use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};

/// Reasons an image cannot become a colour texture.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("could not decode image {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported channel count {channels} in {label}, expected 3 or 4")]
    UnsupportedChannels { label: String, channels: u8 },
    #[error("image {label} is {width}x{height}, the device allows at most {max}x{max}")]
    TooLarge {
        label: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Colour textures are authored in sRGB.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// A 1x1 texture of a single colour.
    ///
    /// Bound for draws that use a solid object colour so the pipeline layout
    /// does not change between textured and untextured draws.
    pub fn create_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Self {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_rgba(device, queue, &img, label)
    }

    /// Upload a decoded image as a mipmapped sRGB colour texture.
    ///
    /// Only 3- and 4-channel images no larger than the device's 2D texture
    /// limit are accepted. RGB input is expanded to RGBA because WGPU has no
    /// 24-bit texture format.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &DynamicImage,
        label: &str,
    ) -> Result<Self, TextureError> {
        let channels = check_channels(img, label)?;
        let (width, height) = img.dimensions();
        check_dimensions(width, height, device.limits().max_texture_dimension_2d, label)?;
        log::debug!("uploading {label} ({width}x{height}, {channels} channels)");
        Ok(Self::from_rgba(device, queue, &img.to_rgba8(), label))
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &RgbaImage,
        label: &str,
    ) -> Self {
        let levels = mip_chain(rgba);
        let size = wgpu::Extent3d {
            width: rgba.width(),
            height: rgba.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width()),
                    rows_per_image: Some(level.height()),
                },
                wgpu::Extent3d {
                    width: level.width(),
                    height: level.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_default_sampler(device));

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Release the GPU memory right away instead of waiting for the last handle to drop.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

/// Repeat-wrapping sampler with trilinear filtering.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("texture sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Number of channels in `img`, if it is one the texture path supports.
pub fn check_channels(img: &DynamicImage, label: &str) -> Result<u8, TextureError> {
    match img.color().channel_count() {
        channels @ (3 | 4) => Ok(channels),
        channels => Err(TextureError::UnsupportedChannels {
            label: label.to_string(),
            channels,
        }),
    }
}

/// Fails when either side of a `width` x `height` image exceeds `max`.
pub fn check_dimensions(width: u32, height: u32, max: u32, label: &str) -> Result<(), TextureError> {
    if width > max || height > max {
        return Err(TextureError::TooLarge {
            label: label.to_string(),
            width,
            height,
            max,
        });
    }
    Ok(())
}

/// Mip levels needed to go from `width` x `height` down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// Every mip level of `img`, starting with `img` itself.
pub fn mip_chain(img: &RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(img.width(), img.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(img.clone());
    while levels.len() < count {
        let prev = &levels[levels.len() - 1];
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = image::imageops::resize(prev, width, height, FilterType::Triangle);
        levels.push(next);
    }
    levels
}
