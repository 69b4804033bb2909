#![cfg(feature = "integration-tests")]
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};
use island_scene::{
    camera::Camera,
    context::Context,
    data_structures::{
        mesh::{Shape, ShapeMeshes},
        registry::TextureRegistry,
        texture::Texture,
    },
    flow::{self, GraphicsFlow},
    render::{DrawList, Render, SceneDraws},
    resources::{bind_textures, load_texture},
    scene::SCENE_TEXTURES,
};

/// Box each flow as a `dyn GraphicsFlow`.
macro_rules! flows {
    ($($flow:expr),* $(,)?) => {
        vec![$(Box::new($flow) as Box<dyn island_scene::flow::GraphicsFlow>),*]
    };
}

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 64;

pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Runtime::new().unwrap().block_on(future)
}

pub async fn headless(clear_colour: wgpu::Color) -> Context {
    Context::headless(WIDTH, HEIGHT, clear_colour).await.unwrap()
}

/// Render one offscreen frame of `flows` after letting them initialise.
pub fn render_frame(clear_colour: wgpu::Color, mut flows: Vec<Box<dyn GraphicsFlow>>) -> image::RgbaImage {
    block_on(async move {
        let mut ctx = headless(clear_colour).await;
        for flow in flows.iter_mut() {
            flow.on_init(&mut ctx).unwrap();
        }
        flow::capture(&mut ctx, &mut flows).await.unwrap()
    })
}

pub fn rgba(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([f_to_u8(colour.r), f_to_u8(colour.g), f_to_u8(colour.b), f_to_u8(colour.a)])
}

/// Temporary assets directory, removed on drop.
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("island-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("textures")).unwrap();
        Self { root }
    }

    /// Every scene texture as a small flat-coloured image.
    pub fn with_scene_textures(name: &str) -> Self {
        let dir = Self::new(name);
        for (file_name, tag) in SCENE_TEXTURES {
            let shade = scene_shade(tag);
            dir.write(file_name, &flat_image(4, 4, [shade, shade, shade]));
        }
        dir
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Encode `img` into `file_name`, the format following the extension.
    pub fn write(&self, file_name: &str, img: &DynamicImage) {
        img.save(self.root.join(file_name)).unwrap();
    }
}

impl Drop for AssetDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Grey level of the scene texture tagged `tag` in [`AssetDir::with_scene_textures`].
pub fn scene_shade(tag: &str) -> u8 {
    let index = SCENE_TEXTURES
        .iter()
        .position(|(_, t)| *t == tag)
        .unwrap();
    90 + 30 * index as u8
}

pub fn flat_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

/// Draws nothing.
pub struct Empty;

impl GraphicsFlow for Empty {
    fn on_init(&mut self, _: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_render(&mut self) -> Render<'_> {
        Render::None
    }
}

/// A single unlit, solid coloured box in front of a camera at (0, 0, 5).
pub struct SolidBox {
    meshes: ShapeMeshes,
    draws: DrawList,
    colour: [f32; 4],
    scale: f32,
}

impl SolidBox {
    pub fn new(colour: [f32; 4], scale: f32) -> Self {
        Self {
            meshes: ShapeMeshes::new(),
            draws: DrawList::new(),
            colour,
            scale,
        }
    }
}

impl GraphicsFlow for SolidBox {
    fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        self.meshes.load_box_mesh(&ctx.device);
        ctx.camera.camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
        ctx.camera.update(&ctx.projection, &ctx.queue);
        Ok(())
    }

    fn on_render(&mut self) -> Render<'_> {
        let [r, g, b, a] = self.colour;
        let scale = self.scale;
        self.draws.begin_frame();
        self.draws
            .set_transformations([scale, scale, scale], 0.0, 0.0, 0.0, [0.0, 0.0, 0.0]);
        self.draws.set_shader_color(r, g, b, a);
        self.draws.set_use_lighting(false);
        self.draws.draw(Shape::Box);
        Render::Scene(SceneDraws {
            draws: &self.draws,
            meshes: &self.meshes,
            textures: &[],
        })
    }
}

/// Draws a shape whose mesh was never loaded.
pub struct MissingMesh {
    meshes: ShapeMeshes,
    draws: DrawList,
}

impl MissingMesh {
    pub fn new() -> Self {
        Self {
            meshes: ShapeMeshes::new(),
            draws: DrawList::new(),
        }
    }
}

impl GraphicsFlow for MissingMesh {
    fn on_init(&mut self, _: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_render(&mut self) -> Render<'_> {
        self.draws.begin_frame();
        self.draws.set_shader_color(0.0, 0.0, 0.0, 1.0);
        self.draws.draw(Shape::Cylinder);
        Render::Scene(SceneDraws {
            draws: &self.draws,
            meshes: &self.meshes,
            textures: &[],
        })
    }
}

/// A plane facing a camera at (0, 0, 5), sampling one texture loaded from disk.
pub struct TexturedPlane {
    root: PathBuf,
    file_name: String,
    textures: TextureRegistry<Texture>,
    bind_groups: Vec<wgpu::BindGroup>,
    meshes: ShapeMeshes,
    draws: DrawList,
}

impl TexturedPlane {
    pub fn new(root: &Path, file_name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            file_name: file_name.to_string(),
            textures: TextureRegistry::new(),
            bind_groups: Vec::new(),
            meshes: ShapeMeshes::new(),
            draws: DrawList::new(),
        }
    }
}

impl GraphicsFlow for TexturedPlane {
    fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let texture = load_texture(&ctx.device, &ctx.queue, &self.root, &self.file_name)?;
        self.textures.insert("plane", texture)?;
        self.bind_groups = bind_textures(&ctx.device, &ctx.layouts.texture, &self.textures);
        self.meshes.load_plane_mesh(&ctx.device);
        ctx.camera.camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
        ctx.camera.update(&ctx.projection, &ctx.queue);
        Ok(())
    }

    fn on_render(&mut self) -> Render<'_> {
        self.draws.begin_frame();
        // Stood up to face +Z.
        self.draws
            .set_transformations([1.5, 1.5, 1.5], 90.0, 0.0, 0.0, [0.0, 0.0, 0.0]);
        self.draws.set_shader_color(1.0, 0.0, 0.0, 1.0);
        self.draws
            .set_shader_texture(self.textures.find_texture_slot("plane"), 1.0);
        self.draws.draw(Shape::Plane);
        Render::Scene(SceneDraws {
            draws: &self.draws,
            meshes: &self.meshes,
            textures: &self.bind_groups,
        })
    }
}
