//! Per-draw shader state and draw recording.
//!
//! Scenes are described immediate-mode style: set the transform, texture,
//! colour and material, then draw a shape. [`DrawList`] keeps the current
//! shader state and snapshots it into a [`DrawCall`] on every draw. The state
//! outlives the frame, the recorded calls do not.
//!
//! # Key types
//!
//! - [`DrawUniform`] is the per-draw uniform block as the shader sees it
//! - [`DrawList`] records draw calls against the current state
//! - [`Render`] is what a flow hands to the renderer each frame

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::data_structures::{
    material::ObjectMaterial,
    mesh::{Shape, ShapeMeshes},
    transform::{Transform, normal_matrix},
};

/// Uniform data for one draw call.
///
/// Layout matches `Draw` in `scene.wgsl`:
/// the material shininess lives in `diffuse.w`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub use_lighting: u32,
}

impl Default for DrawUniform {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        let material = ObjectMaterial::default();
        Self {
            model: identity,
            normal: identity,
            color: [1.0, 1.0, 1.0, 1.0],
            diffuse: material_diffuse(&material),
            specular: material_specular(&material),
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            use_lighting: 0,
        }
    }
}

fn material_diffuse(material: &ObjectMaterial) -> [f32; 4] {
    let Vector3 { x, y, z } = material.diffuse_color;
    [x, y, z, material.shininess]
}

fn material_specular(material: &ObjectMaterial) -> [f32; 4] {
    let Vector3 { x, y, z } = material.specular_color;
    [x, y, z, 0.0]
}

/// Shader state that carries over from one draw to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawState {
    pub uniform: DrawUniform,
    pub texture_slot: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub shape: Shape,
    /// Texture slot sampled by this draw, `None` for solid colour draws.
    pub texture_slot: Option<usize>,
    pub uniform: DrawUniform,
}

#[derive(Clone, Debug, Default)]
pub struct DrawList {
    state: DrawState,
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the calls recorded last frame. The shader state is kept.
    pub fn begin_frame(&mut self) {
        self.calls.clear();
    }

    pub fn set_transformations(
        &mut self,
        scale: impl Into<Vector3<f32>>,
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: impl Into<Vector3<f32>>,
    ) {
        let transform = Transform::new(
            scale,
            [x_rotation_degrees, y_rotation_degrees, z_rotation_degrees],
            position,
        );
        self.set_transform(&transform);
    }

    pub fn set_transform(&mut self, transform: &Transform) {
        let model = transform.to_matrix();
        let normal = Matrix4::from(normal_matrix(&model));
        self.state.uniform.model = model.into();
        self.state.uniform.normal = normal.into();
    }

    /// Draw with a solid colour from now on.
    pub fn set_shader_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.state.uniform.color = [red, green, blue, alpha];
        self.state.uniform.use_texture = 0;
        self.state.texture_slot = None;
    }

    /// Sample the texture in `slot` from now on, tiled `scale` times in both directions.
    ///
    /// A missing slot leaves texturing off so the object keeps its solid colour.
    pub fn set_shader_texture(&mut self, slot: Option<usize>, scale: f32) {
        self.state.uniform.uv_scale = [scale, scale];
        self.state.texture_slot = slot;
        self.state.uniform.use_texture = u32::from(slot.is_some());
    }

    pub fn set_texture_uv_scale(&mut self, u: f32, v: f32) {
        self.state.uniform.uv_scale = [u, v];
    }

    /// Use `material` for lighting, or the default material for `None`.
    pub fn set_shader_material(&mut self, material: Option<&ObjectMaterial>) {
        let default = ObjectMaterial::default();
        let material = material.unwrap_or(&default);
        self.state.uniform.diffuse = material_diffuse(material);
        self.state.uniform.specular = material_specular(material);
    }

    pub fn set_use_lighting(&mut self, enabled: bool) {
        self.state.uniform.use_lighting = u32::from(enabled);
    }

    pub fn draw(&mut self, shape: Shape) {
        self.calls.push(DrawCall {
            shape,
            texture_slot: self.state.texture_slot,
            uniform: self.state.uniform,
        });
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Everything the renderer needs to replay a recorded draw list.
pub struct SceneDraws<'a> {
    pub draws: &'a DrawList,
    pub meshes: &'a ShapeMeshes,
    /// Bind group per texture slot, as built by `resources::bind_textures`.
    pub textures: &'a [wgpu::BindGroup],
}

/// What a flow renders this frame.
pub enum Render<'a> {
    None,
    Scene(SceneDraws<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flatten the render tree into scene draws in submission order.
    pub(crate) fn collect(self, out: &mut Vec<SceneDraws<'a>>) {
        match self {
            Render::None => (),
            Render::Scene(scene) => out.push(scene),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect(out)),
        }
    }
}
