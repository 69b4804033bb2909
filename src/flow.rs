//! Flow control and application event loop.
//!
//! A "flow" owns a piece of the scene: it loads its resources once, gets a
//! chance to configure the [`Context`] and then hands the renderer a
//! [`Render`] every frame.
//!
//! # Lifecycle
//!
//! 1. The window and [`Context`] are created when the event loop resumes
//! 2. Every [`FlowConstructor`] runs with an [`InitContext`] and loads its resources
//! 3. `on_init` is called once per flow (lights, camera, clear colour)
//! 4. On every redraw `on_render` is collected from all flows and drawn
//! 5. Resizes reconfigure the surface and the depth buffer

use std::{iter, pin::Pin, sync::Arc};

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::{Context, InitContext},
    pipelines::basic::{CAMERA_GROUP, DRAW_GROUP, LIGHT_GROUP, TEXTURE_GROUP},
    render::{Render, SceneDraws},
};

/// A renderable part of the application.
pub trait GraphicsFlow {
    /// Configure the context once the flow is loaded.
    ///
    /// This is the place to upload lights, move the camera or change the
    /// clear colour.
    fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()>;

    /// Describe what to draw this frame.
    fn on_render(&mut self) -> Render<'_>;
}

/// Asynchronous factory for a flow.
pub type FlowConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>>,
>;

/// Build every flow and run its `on_init`.
pub async fn init_flows(
    ctx: &mut Context,
    constructors: Vec<FlowConstructor>,
) -> anyhow::Result<Vec<Box<dyn GraphicsFlow>>> {
    let mut flows = Vec::with_capacity(constructors.len());
    for constructor in constructors {
        let mut flow = constructor(InitContext::from(&*ctx)).await?;
        flow.on_init(ctx)?;
        flows.push(flow);
    }
    Ok(flows)
}

/// Record one frame of every flow into `view`.
fn encode_frame(
    ctx: &mut Context,
    flows: &mut [Box<dyn GraphicsFlow>],
    view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
) -> wgpu::CommandEncoder {
    let mut scenes: Vec<SceneDraws> = Vec::new();
    for flow in flows.iter_mut() {
        flow.on_render().collect(&mut scenes);
    }

    let uniforms: Vec<_> = scenes
        .iter()
        .flat_map(|scene| scene.draws.calls().iter().map(|call| call.uniform))
        .collect();
    ctx.draws.write(&ctx.device, &ctx.queue, &uniforms);

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&ctx.pipeline);
        render_pass.set_bind_group(CAMERA_GROUP, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(LIGHT_GROUP, &ctx.light.bind_group, &[]);

        let mut index = 0;
        for scene in &scenes {
            for call in scene.draws.calls() {
                let offset = ctx.draws.offset(index);
                index += 1;
                let Some(mesh) = scene.meshes.get(call.shape) else {
                    log::warn!("skipping draw of {:?}, its mesh was never loaded", call.shape);
                    continue;
                };
                let texture = call
                    .texture_slot
                    .and_then(|slot| scene.textures.get(slot))
                    .unwrap_or(&ctx.blank_texture);
                render_pass.set_bind_group(TEXTURE_GROUP, texture, &[]);
                render_pass.set_bind_group(DRAW_GROUP, &ctx.draws.bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }
    }
    encoder
}

/// Draw one frame to the window surface.
fn render(ctx: &mut Context, flows: &mut [Box<dyn GraphicsFlow>]) -> Result<(), wgpu::SurfaceError> {
    let Some(presentation) = &ctx.presentation else {
        return Ok(());
    };
    presentation.window.request_redraw();
    let output = presentation.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = ctx.depth_texture.view.clone();
    let encoder = encode_frame(ctx, flows, &view, &depth_view);
    ctx.queue.submit(iter::once(encoder.finish()));
    output.present();
    Ok(())
}

/// Render one frame offscreen and read it back.
pub async fn capture(
    ctx: &mut Context,
    flows: &mut [Box<dyn GraphicsFlow>],
) -> anyhow::Result<image::RgbaImage> {
    let (width, height) = (ctx.config.width, ctx.config.height);
    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Capture Texture"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.config.format,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = ctx.depth_texture.view.clone();
    let mut encoder = encode_frame(ctx, flows, &view, &depth_view);

    // Rows in a texture-to-buffer copy must be 256 byte aligned.
    let unpadded_row = 4 * width;
    let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Capture Buffer"),
        size: (padded_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        extent,
    );
    ctx.queue.submit(iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    ctx.device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(std::time::Duration::from_secs(3)),
        })
        .context("waiting for the capture copy")?;
    rx.receive()
        .await
        .context("capture buffer mapping was cancelled")?
        .context("mapping the capture buffer")?;

    let pixels: Vec<u8> = {
        let data = buffer_slice.get_mapped_range();
        data.chunks_exact(padded_row as usize)
            .flat_map(|row| &row[..unpadded_row as usize])
            .copied()
            .collect()
    };
    output_buffer.unmap();
    image::RgbaImage::from_raw(width, height, pixels).context("capture has the wrong size")
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: SceneConfig,
    ctx: Option<Context>,
    flows: Vec<Box<dyn GraphicsFlow>>,
    // Taken once the window exists.
    constructors: Option<Vec<FlowConstructor>>,
}

impl App {
    fn new(config: SceneConfig, constructors: Vec<FlowConstructor>) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            ctx: None,
            flows: Vec::new(),
            constructors: Some(constructors),
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let constructors = self.constructors.take().unwrap_or_default();
        let clear_colour = self.config.clear_colour();

        let (ctx, flows) = self.async_runtime.block_on(async move {
            let mut ctx = Context::new(window, clear_colour).await?;
            let flows = init_flows(&mut ctx, constructors).await?;
            anyhow::Ok((ctx, flows))
        })?;
        self.flows = flows;
        if let Some(window) = ctx.window() {
            window.request_redraw();
        }
        self.ctx = Some(ctx);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("App initialization failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(ctx) = &mut self.ctx else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => ctx.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match render(ctx, &mut self.flows) {
                Ok(_) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = ctx
                        .window()
                        .map(|window| window.inner_size())
                        .unwrap_or_default();
                    ctx.resize(size.width, size.height);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory, exiting");
                    event_loop.exit();
                }
                Err(e) => {
                    log::error!("Unable to render {}", e);
                }
            },
            _ => {}
        }
    }
}

pub fn run(config: SceneConfig, constructors: Vec<FlowConstructor>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, constructors)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
