use cgmath::{Matrix4, SquareMatrix};
use island_scene::{
    data_structures::{material::ObjectMaterial, mesh::Shape},
    render::{DrawList, DrawUniform},
};

#[test]
fn should_match_shader_uniform_size() {
    assert_eq!(std::mem::size_of::<DrawUniform>(), 192);
    assert_eq!(std::mem::size_of::<DrawUniform>() % 16, 0);
}

#[test]
fn should_start_untextured_and_unlit() {
    let draws = DrawList::new();
    let uniform = draws.state().uniform;
    let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
    assert_eq!(uniform.model, identity);
    assert_eq!(uniform.color, [1.0; 4]);
    assert_eq!(uniform.uv_scale, [1.0, 1.0]);
    assert_eq!(uniform.use_texture, 0);
    assert_eq!(uniform.use_lighting, 0);
    assert_eq!(draws.state().texture_slot, None);
    assert!(draws.is_empty());
}

#[test]
fn should_snapshot_state_on_draw() {
    let mut draws = DrawList::new();
    draws.set_shader_color(1.0, 0.0, 0.0, 1.0);
    draws.draw(Shape::Box);
    draws.set_shader_color(0.0, 0.0, 1.0, 1.0);
    draws.draw(Shape::Plane);

    let calls = draws.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].shape, Shape::Box);
    assert_eq!(calls[0].uniform.color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(calls[1].shape, Shape::Plane);
    assert_eq!(calls[1].uniform.color, [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn should_set_uniform_uv_scale_with_texture() {
    let mut draws = DrawList::new();
    draws.set_shader_texture(Some(3), 10.0);
    assert_eq!(draws.state().uniform.uv_scale, [10.0, 10.0]);
    assert_eq!(draws.state().uniform.use_texture, 1);
    assert_eq!(draws.state().texture_slot, Some(3));

    draws.set_texture_uv_scale(1.0, 2.0);
    assert_eq!(draws.state().uniform.uv_scale, [1.0, 2.0]);
    assert_eq!(draws.state().texture_slot, Some(3));
}

#[test]
fn should_keep_solid_colour_for_missing_texture() {
    let mut draws = DrawList::new();
    draws.set_shader_color(0.2, 0.4, 0.6, 1.0);
    draws.set_shader_texture(None, 2.0);
    draws.draw(Shape::Cylinder);

    let call = draws.calls()[0];
    assert_eq!(call.texture_slot, None);
    assert_eq!(call.uniform.use_texture, 0);
    assert_eq!(call.uniform.color, [0.2, 0.4, 0.6, 1.0]);
}

#[test]
fn should_turn_texturing_off_when_colour_is_set() {
    let mut draws = DrawList::new();
    draws.set_shader_texture(Some(0), 1.0);
    draws.set_shader_color(0.0, 1.0, 0.0, 1.0);
    assert_eq!(draws.state().uniform.use_texture, 0);
    assert_eq!(draws.state().texture_slot, None);
}

#[test]
fn should_pack_material_into_uniform() {
    let mut draws = DrawList::new();
    let metal = ObjectMaterial::new("metal", [0.8, 0.7, 0.6], [1.0, 0.9, 0.8], 128.0);
    draws.set_shader_material(Some(&metal));
    assert_eq!(draws.state().uniform.diffuse, [0.8, 0.7, 0.6, 128.0]);
    assert_eq!(draws.state().uniform.specular, [1.0, 0.9, 0.8, 0.0]);

    draws.set_shader_material(None);
    assert_eq!(draws.state().uniform.diffuse, [1.0, 1.0, 1.0, 32.0]);
}

#[test]
fn should_write_translation_into_model_matrix() {
    let mut draws = DrawList::new();
    draws.set_transformations([2.0, 2.0, 2.0], 0.0, 0.0, 0.0, [1.0, 2.0, 3.0]);
    let model = draws.state().uniform.model;
    assert_eq!(model[3], [1.0, 2.0, 3.0, 1.0]);
    assert_eq!(model[0][0], 2.0);
    // Uniform scale leaves normals pointing the same way, only shorter.
    assert_eq!(draws.state().uniform.normal[0][0], 0.5);
}

#[test]
fn should_keep_state_across_frames() {
    let mut draws = DrawList::new();
    draws.set_use_lighting(true);
    draws.set_shader_texture(Some(1), 4.0);
    draws.draw(Shape::Box);
    draws.begin_frame();

    assert!(draws.is_empty());
    assert_eq!(draws.state().uniform.use_lighting, 1);
    assert_eq!(draws.state().texture_slot, Some(1));
    draws.draw(Shape::Box);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws.calls()[0].uniform.uv_scale, [4.0, 4.0]);
}
