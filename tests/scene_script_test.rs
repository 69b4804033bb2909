use approx::assert_relative_eq;
use island_scene::{
    data_structures::{mesh::Shape, registry::TextureRegistry, transform::Transform},
    render::DrawList,
    scene::{SCENE_TEXTURES, record_scene, scene_lighting, scene_materials},
};

fn all_textures() -> TextureRegistry<()> {
    let mut textures = TextureRegistry::new();
    for (_, tag) in SCENE_TEXTURES {
        textures.insert(tag, ()).unwrap();
    }
    textures
}

fn translation(draws: &DrawList, index: usize) -> [f32; 3] {
    let [x, y, z, _] = draws.calls()[index].uniform.model[3];
    [x, y, z]
}

#[test]
fn should_record_island_and_props_in_order() {
    let mut draws = DrawList::new();
    record_scene(&mut draws, &all_textures(), &scene_materials());

    let shapes: Vec<_> = draws.calls().iter().map(|call| call.shape).collect();
    assert_eq!(
        shapes,
        vec![
            Shape::Plane,
            Shape::Box,
            Shape::Box,
            Shape::Box,
            Shape::Box,
            Shape::Cylinder,
            Shape::Cylinder,
            Shape::Box,
        ]
    );
}

#[test]
fn should_bind_expected_textures() {
    let textures = all_textures();
    let mut draws = DrawList::new();
    record_scene(&mut draws, &textures, &scene_materials());

    let slot = |tag| textures.find_texture_slot(tag);
    let slots: Vec<_> = draws.calls().iter().map(|call| call.texture_slot).collect();
    assert_eq!(
        slots,
        vec![
            slot("wood"),
            slot("whiteWood"),
            slot("concrete"),
            slot("black"),
            slot("black"),
            slot("gray"),
            slot("black"),
            slot("green"),
        ]
    );
    assert!(draws.calls().iter().all(|call| call.uniform.use_texture == 1));
}

#[test]
fn should_tile_large_surfaces() {
    let mut draws = DrawList::new();
    record_scene(&mut draws, &all_textures(), &scene_materials());

    let uv: Vec<_> = draws.calls().iter().map(|call| call.uniform.uv_scale).collect();
    assert_eq!(uv[0], [10.0, 10.0]);
    assert_eq!(uv[1], [2.0, 2.0]);
    assert_eq!(uv[2], [2.0, 2.0]);
    assert!(uv[3..].iter().all(|scale| *scale == [1.0, 1.0]));
}

#[test]
fn should_place_objects() {
    let mut draws = DrawList::new();
    record_scene(&mut draws, &all_textures(), &scene_materials());

    assert_eq!(translation(&draws, 0), [0.0, -0.5, 0.0]);
    assert_eq!(translation(&draws, 1), [0.0, 2.0, 0.0]);
    assert_eq!(translation(&draws, 2), [0.0, 4.3, 0.0]);
    assert_eq!(translation(&draws, 3), [-1.4, 2.49, -0.45]);
    assert_eq!(translation(&draws, 4), [-1.4, 2.87, -0.05]);
    assert_eq!(translation(&draws, 5), [0.0, 2.57, -0.17]);
    assert_eq!(translation(&draws, 6), [0.0, 2.81, -0.17]);
    assert_eq!(translation(&draws, 7), [1.5, 2.92, 0.7]);

    // Unrotated objects carry their scale on the diagonal.
    let floor = draws.calls()[0].uniform.model;
    assert_eq!([floor[0][0], floor[1][1], floor[2][2]], [50.0, 1.0, 50.0]);
}

/// Scale, rotation in degrees about X, Y, Z and position of every draw.
const LAYOUT: [([f32; 3], [f32; 3], [f32; 3]); 8] = [
    ([50.0, 1.0, 50.0], [0.0, 0.0, 0.0], [0.0, -0.5, 0.0]),
    ([10.0, 4.0, 4.0], [0.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
    ([11.0, 0.3, 5.0], [0.0, 0.0, 0.0], [0.0, 4.3, 0.0]),
    ([1.05, 0.06, 0.7], [0.0, 16.0, 0.0], [-1.4, 2.49, -0.45]),
    ([1.05, 0.75, 0.06], [-90.0, 16.0, 0.0], [-1.4, 2.87, -0.05]),
    ([0.13, 0.45, 0.13], [0.0, 0.0, 0.0], [0.0, 2.57, -0.17]),
    ([0.15, 0.04, 0.15], [0.0, 0.0, 0.0], [0.0, 2.81, -0.17]),
    ([0.7, 1.1, 0.35], [0.0, -13.0, 0.0], [1.5, 2.92, 0.7]),
];

#[test]
fn should_scale_rotate_and_place_every_object() {
    let mut draws = DrawList::new();
    record_scene(&mut draws, &all_textures(), &scene_materials());

    assert_eq!(draws.len(), LAYOUT.len());
    for (call, (scale, rotation, position)) in draws.calls().iter().zip(LAYOUT) {
        let expected: [[f32; 4]; 4] = Transform::new(scale, rotation, position).to_matrix().into();
        let actual = call.uniform.model.iter().flatten();
        for (a, e) in actual.zip(expected.iter().flatten()) {
            assert_relative_eq!(*a, *e, epsilon = 1e-5);
        }
    }
}

#[test]
fn should_turn_laptop_screen_upright() {
    let mut draws = DrawList::new();
    record_scene(&mut draws, &all_textures(), &scene_materials());

    // The screen box is thin in Z; tipping it about X makes that thin side point up.
    let model = draws.calls()[4].uniform.model;
    let local_z = model[2];
    assert_relative_eq!(local_z[1], 0.06, epsilon = 1e-5);
    // The base only turns about Y, so its local Y stays vertical.
    let base = draws.calls()[3].uniform.model;
    assert_relative_eq!(base[1][1], 0.06, epsilon = 1e-5);
    assert_relative_eq!(base[1][0], 0.0, epsilon = 1e-5);

    // Positive Y turns swing local +X towards -Z, negative ones towards +Z.
    assert_relative_eq!(base[0][2], -1.05 * 16f32.to_radians().sin(), epsilon = 1e-5);
    let shoebox = draws.calls()[7].uniform.model;
    assert_relative_eq!(shoebox[0][2], 0.7 * 13f32.to_radians().sin(), epsilon = 1e-5);
}

#[test]
fn should_fall_back_to_solid_colour_without_textures() {
    let mut draws = DrawList::new();
    record_scene(&mut draws, &TextureRegistry::<()>::new(), &scene_materials());

    assert_eq!(draws.len(), 8);
    for call in draws.calls() {
        assert_eq!(call.texture_slot, None);
        assert_eq!(call.uniform.use_texture, 0);
    }
}

#[test]
fn should_skip_only_missing_texture() {
    let mut textures = TextureRegistry::new();
    textures.insert("wood", ()).unwrap();
    let mut draws = DrawList::new();
    record_scene(&mut draws, &textures, &scene_materials());

    assert_eq!(draws.calls()[0].texture_slot, Some(0));
    assert!(draws.calls()[1..].iter().all(|call| call.texture_slot.is_none()));
}

#[test]
fn should_record_same_frame_twice() {
    let textures = all_textures();
    let materials = scene_materials();
    let mut draws = DrawList::new();
    record_scene(&mut draws, &textures, &materials);
    let first = draws.calls().to_vec();

    draws.begin_frame();
    record_scene(&mut draws, &textures, &materials);
    assert_eq!(draws.calls(), first.as_slice());
}

#[test]
fn should_light_scene_from_above() {
    let lighting = scene_lighting();
    assert!(lighting.directional.direction.y < 0.0);
    assert_eq!(lighting.point.position.y, 10.0);
    assert_eq!(lighting.point.attenuation(0.0), 1.0);
    assert!(lighting.point.attenuation(10.0) < 0.3);
}
