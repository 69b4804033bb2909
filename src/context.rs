use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, Projection, default_projection},
    data_structures::texture::Texture,
    pipelines::{
        basic::{DrawResources, mk_basic_pipeline},
        light::{LightResources, Lighting},
    },
    resources::texture::{texture_bind_group, texture_layout},
};

/// Bind group layouts shared by the pipeline and the scenes that fill them.
#[derive(Debug)]
pub struct Layouts {
    pub texture: wgpu::BindGroupLayout,
}

/// Handles a flow gets while it loads its resources.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            texture_layout: ctx.layouts.texture.clone(),
        }
    }
}

/// Where frames end up: a window surface, or nothing when rendering offscreen.
#[derive(Debug)]
pub(crate) struct Presentation {
    pub(crate) window: Arc<Window>,
    pub(crate) surface: wgpu::Surface<'static>,
}

#[derive(Debug)]
pub struct Context {
    pub(crate) presentation: Option<Presentation>,
    pub(crate) depth_texture: Texture,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub layouts: Layouts,
    pub pipeline: wgpu::RenderPipeline,
    pub draws: DrawResources,
    /// Bound for draws that do not sample a texture.
    pub blank_texture: wgpu::BindGroup,
    pub clear_colour: wgpu::Color,
}

impl Context {
    /// Context presenting to `window`.
    pub async fn new(window: Arc<Window>, clear_colour: wgpu::Color) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;
        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader writes linear colour and relies on an sRGB target to encode it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let presentation = Presentation { window, surface };
        Ok(Self::from_parts(
            device,
            queue,
            config,
            Some(presentation),
            clear_colour,
        ))
    }

    /// Context without a window, rendering into offscreen textures of `width` x `height`.
    pub async fn headless(width: u32, height: u32, clear_colour: wgpu::Color) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("no graphics adapter available for offscreen rendering")?;
        let (device, queue) = request_device(&adapter).await?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: Texture::COLOR_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        Ok(Self::from_parts(device, queue, config, None, clear_colour))
    }

    fn from_parts(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        presentation: Option<Presentation>,
        clear_colour: wgpu::Color,
    ) -> Self {
        let projection = default_projection(config.width, config.height);
        let camera = CameraResources::new(&device, Camera::default(), &projection);
        let light = LightResources::new(Lighting::off(), &device);
        let layouts = Layouts {
            texture: texture_layout(&device),
        };
        let draws = DrawResources::new(&device);
        let pipeline = mk_basic_pipeline(
            &device,
            config.format,
            &layouts.texture,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            &draws.bind_group_layout,
        );
        let blank = Texture::create_solid(&device, &queue, [255; 4], "blank texture");
        let blank_texture = texture_bind_group(&device, &layouts.texture, &blank, "blank texture");
        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        if let Some(presentation) = &presentation {
            presentation.surface.configure(&device, &config);
        }

        Self {
            presentation,
            depth_texture,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            layouts,
            pipeline,
            draws,
            blank_texture,
            clear_colour,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        if let Some(presentation) = &self.presentation {
            presentation.surface.configure(&self.device, &self.config);
        }
        self.depth_texture =
            Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        self.camera.update(&self.projection, &self.queue);
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.presentation.as_ref().map(|p| &p.window)
    }
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    log::info!("using adapter {:?}", adapter.get_info().name);
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("island device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            ..Default::default()
        })
        .await
        .context("requesting a device")
}
