//! The kitchen island scene.
//!
//! A wooden floor, an island with a concrete countertop and a few props: a
//! laptop, a water bottle and a shoebox. Everything is placed by hand in
//! [`record_scene`].

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::{
    camera::Camera,
    context::{Context, InitContext},
    data_structures::{
        material::{MaterialLibrary, ObjectMaterial},
        mesh::{Shape, ShapeMeshes},
        registry::TextureRegistry,
        texture::Texture,
    },
    flow::GraphicsFlow,
    pipelines::light::{DirectionalLight, Lighting, PointLight},
    render::{DrawList, Render, SceneDraws},
    resources::{bind_textures, load_texture},
};

/// Image files the scene samples and the tags they are registered under.
pub const SCENE_TEXTURES: [(&str, &str); 6] = [
    ("textures/wood.jpg", "wood"),
    ("textures/white_wood.jpg", "whiteWood"),
    ("textures/concrete.png", "concrete"),
    ("textures/green.png", "green"),
    ("textures/gray.png", "gray"),
    ("textures/black.png", "black"),
];

pub fn scene_lighting() -> Lighting {
    Lighting {
        directional: DirectionalLight {
            direction: Vector3::new(-0.5, -1.0, -0.3),
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(0.8, 0.8, 0.8),
            specular: Vector3::new(1.0, 1.0, 1.0),
        },
        point: PointLight {
            position: Vector3::new(0.0, 10.0, 0.0),
            ambient: Vector3::new(0.05, 0.05, 0.05),
            diffuse: Vector3::new(0.5, 0.5, 0.5),
            specular: Vector3::new(0.7, 0.7, 0.7),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        },
    }
}

pub fn scene_materials() -> MaterialLibrary {
    let mut materials = MaterialLibrary::new();
    materials.push(ObjectMaterial::new("wood", [0.9, 0.85, 0.8], [0.2, 0.2, 0.2], 8.0));
    materials.push(ObjectMaterial::new("paintedWood", [1.0, 1.0, 1.0], [0.3, 0.3, 0.3], 16.0));
    materials.push(ObjectMaterial::new("concrete", [0.9, 0.9, 0.9], [0.1, 0.1, 0.1], 4.0));
    materials.push(ObjectMaterial::new("plastic", [1.0, 1.0, 1.0], [0.6, 0.6, 0.6], 64.0));
    materials.push(ObjectMaterial::new("metal", [0.8, 0.8, 0.8], [1.0, 1.0, 1.0], 128.0));
    materials
}

/// Point the texture state at `tag`, or fall back to the current solid colour.
fn set_shader_texture<T>(draws: &mut DrawList, textures: &TextureRegistry<T>, tag: &str, scale: f32) {
    let slot = textures.find_texture_slot(tag);
    if slot.is_none() {
        log::warn!("no texture tagged \"{tag}\" is loaded, drawing with a solid colour");
    }
    draws.set_shader_texture(slot, scale);
}

fn set_shader_material(draws: &mut DrawList, materials: &MaterialLibrary, tag: &str) {
    let material = materials.find_material(tag);
    if material.is_none() {
        log::warn!("no material tagged \"{tag}\", using the default material");
    }
    draws.set_shader_material(material);
}

/// Record the island and its props into `draws`.
pub fn record_scene<T>(draws: &mut DrawList, textures: &TextureRegistry<T>, materials: &MaterialLibrary) {
    let none = 0.0;

    // ground plane
    draws.set_transformations([50.0, 1.0, 50.0], none, none, none, [0.0, -0.5, 0.0]);
    set_shader_texture(draws, textures, "wood", 10.0);
    set_shader_material(draws, materials, "wood");
    draws.draw(Shape::Plane);

    // island base
    draws.set_transformations([10.0, 4.0, 4.0], none, none, none, [0.0, 2.0, 0.0]);
    set_shader_texture(draws, textures, "whiteWood", 2.0);
    set_shader_material(draws, materials, "paintedWood");
    draws.draw(Shape::Box);

    // countertop
    draws.set_transformations([11.0, 0.3, 5.0], none, none, none, [0.0, 4.3, 0.0]);
    set_shader_texture(draws, textures, "concrete", 2.0);
    set_shader_material(draws, materials, "concrete");
    draws.draw(Shape::Box);

    // laptop base and screen
    draws.set_transformations([1.05, 0.06, 0.7], 0.0, 16.0, 0.0, [-1.4, 2.49, -0.45]);
    set_shader_texture(draws, textures, "black", 1.0);
    draws.set_texture_uv_scale(1.0, 1.0);
    set_shader_material(draws, materials, "plastic");
    draws.draw(Shape::Box);
    draws.set_transformations([1.05, 0.75, 0.06], -90.0, 16.0, 0.0, [-1.4, 2.87, -0.05]);
    set_shader_texture(draws, textures, "black", 1.0);
    draws.draw(Shape::Box);

    // water bottle and cap
    draws.set_transformations([0.13, 0.45, 0.13], 0.0, 0.0, 0.0, [0.0, 2.57, -0.17]);
    set_shader_texture(draws, textures, "gray", 1.0);
    draws.set_texture_uv_scale(1.0, 1.0);
    set_shader_material(draws, materials, "metal");
    draws.draw(Shape::Cylinder);
    draws.set_transformations([0.15, 0.04, 0.15], 0.0, 0.0, 0.0, [0.0, 2.81, -0.17]);
    set_shader_texture(draws, textures, "black", 1.0);
    set_shader_material(draws, materials, "plastic");
    draws.draw(Shape::Cylinder);

    // shoebox
    draws.set_transformations([0.7, 1.1, 0.35], 0.0, -13.0, 0.0, [1.5, 2.92, 0.7]);
    set_shader_texture(draws, textures, "green", 1.0);
    draws.set_texture_uv_scale(1.0, 1.0);
    set_shader_material(draws, materials, "plastic");
    draws.draw(Shape::Box);
}

pub struct KitchenScene {
    textures: TextureRegistry<Texture>,
    bind_groups: Vec<wgpu::BindGroup>,
    meshes: ShapeMeshes,
    materials: MaterialLibrary,
    draws: DrawList,
}

impl KitchenScene {
    /// Load textures and meshes. Textures that fail to load are logged and left out.
    pub fn prepare(ctx: &InitContext, assets_dir: &Path) -> Self {
        let mut textures = TextureRegistry::new();
        for (file_name, tag) in SCENE_TEXTURES {
            match load_texture(&ctx.device, &ctx.queue, assets_dir, file_name) {
                Ok(texture) => {
                    if let Err(e) = textures.insert(tag, texture) {
                        log::error!("Could not register image {file_name}: {e}");
                    }
                }
                Err(e) => log::error!("Could not load image: {file_name}: {e:#}"),
            }
        }
        let bind_groups = bind_textures(&ctx.device, &ctx.texture_layout, &textures);

        let mut meshes = ShapeMeshes::new();
        meshes.load_plane_mesh(&ctx.device);
        meshes.load_box_mesh(&ctx.device);
        meshes.load_cylinder_mesh(&ctx.device);

        Self {
            textures,
            bind_groups,
            meshes,
            materials: scene_materials(),
            draws: DrawList::new(),
        }
    }

    pub fn textures(&self) -> &TextureRegistry<Texture> {
        &self.textures
    }

    /// Free every texture. The scene keeps drawing with solid colours afterwards.
    pub fn destroy(&mut self) {
        self.bind_groups.clear();
        self.textures.clear().into_iter().for_each(Texture::destroy);
    }

    /// Flow constructor loading the scene from `assets_dir`.
    pub fn constructor(assets_dir: PathBuf) -> crate::flow::FlowConstructor {
        Box::new(move |ctx: InitContext| {
            Box::pin(async move {
                let scene: Box<dyn GraphicsFlow> = Box::new(KitchenScene::prepare(&ctx, &assets_dir));
                anyhow::Ok(scene)
            })
        })
    }
}

impl GraphicsFlow for KitchenScene {
    fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        ctx.light.set(scene_lighting(), &ctx.queue);
        self.draws.set_use_lighting(true);
        ctx.camera.camera = Camera::default();
        ctx.camera.update(&ctx.projection, &ctx.queue);
        Ok(())
    }

    fn on_render(&mut self) -> Render<'_> {
        self.draws.begin_frame();
        record_scene(&mut self.draws, &self.textures, &self.materials);
        Render::Scene(SceneDraws {
            draws: &self.draws,
            meshes: &self.meshes,
            textures: &self.bind_groups,
        })
    }
}

impl Drop for KitchenScene {
    fn drop(&mut self) {
        self.destroy();
    }
}
