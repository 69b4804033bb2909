//! Basic shape meshes.
//!
//! All shapes use counter-clockwise front faces, outward facing normals and
//! texture coordinates with `v = 0` at the bottom of the image (the image
//! loader flips pictures to match).

use std::f32::consts::TAU;

use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Geometry on the CPU side, before it is uploaded.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
        self.indices.chunks_exact(3).map(|c| {
            [
                &self.vertices[c[0] as usize],
                &self.vertices[c[1] as usize],
                &self.vertices[c[2] as usize],
            ]
        })
    }

    /// Append a quad given in counter-clockwise order.
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (position, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(position, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Flat quad in the XZ plane spanning -1..1, facing +Y.
pub fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            [-1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, -1.0],
            [-1.0, 0.0, -1.0],
        ],
        [0.0, 1.0, 0.0],
    );
    mesh
}

/// Unit box centred at the origin. Every face has its own four vertices so
/// normals stay flat.
#[rustfmt::skip]
pub fn cube() -> MeshData {
    let mut mesh = MeshData::default();
    // front (+Z)
    mesh.push_quad([[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]], [ 0.0,  0.0,  1.0]);
    // back (-Z)
    mesh.push_quad([[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]], [ 0.0,  0.0, -1.0]);
    // top (+Y)
    mesh.push_quad([[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]], [ 0.0,  1.0,  0.0]);
    // bottom (-Y)
    mesh.push_quad([[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]], [ 0.0, -1.0,  0.0]);
    // right (+X)
    mesh.push_quad([[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]], [ 1.0,  0.0,  0.0]);
    // left (-X)
    mesh.push_quad([[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]], [-1.0,  0.0,  0.0]);
    mesh
}

pub const CYLINDER_SEGMENTS: u32 = 36;

/// Closed cylinder of radius 1 standing on the XZ plane, from y = 0 to y = 1.
pub fn cylinder(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::default();
    let ring = |i: u32| {
        let angle = i as f32 / segments as f32 * TAU;
        (angle.cos(), angle.sin())
    };

    // Side: the seam is duplicated so the texture wraps once around.
    for i in 0..=segments {
        let (x, z) = ring(i);
        let u = i as f32 / segments as f32;
        mesh.vertices
            .push(Vertex::new([x, 0.0, z], [x, 0.0, z], [u, 0.0]));
        mesh.vertices
            .push(Vertex::new([x, 1.0, z], [x, 0.0, z], [u, 1.0]));
    }
    for i in 0..segments {
        let bottom0 = 2 * i;
        let top0 = bottom0 + 1;
        let bottom1 = bottom0 + 2;
        let top1 = bottom0 + 3;
        mesh.indices
            .extend_from_slice(&[bottom0, top0, bottom1, bottom1, top0, top1]);
    }

    push_cap(&mut mesh, segments, 1.0, true);
    push_cap(&mut mesh, segments, 0.0, false);
    mesh
}

fn push_cap(mesh: &mut MeshData, segments: u32, y: f32, facing_up: bool) {
    let normal = if facing_up {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, -1.0, 0.0]
    };
    let centre = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    for i in 0..segments {
        let angle = i as f32 / segments as f32 * TAU;
        let (x, z) = (angle.cos(), angle.sin());
        mesh.vertices.push(Vertex::new(
            [x, y, z],
            normal,
            [0.5 + 0.5 * x, 0.5 + 0.5 * z],
        ));
    }
    for i in 0..segments {
        let current = centre + 1 + i;
        let next = centre + 1 + (i + 1) % segments;
        if facing_up {
            mesh.indices.extend_from_slice(&[centre, next, current]);
        } else {
            mesh.indices.extend_from_slice(&[centre, current, next]);
        }
    }
}

/// Geometry living on the GPU.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, name: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Plane,
    Box,
    Cylinder,
}

/// The basic meshes a scene draws from. Meshes are uploaded on request.
#[derive(Debug, Default)]
pub struct ShapeMeshes {
    plane: Option<Mesh>,
    cube: Option<Mesh>,
    cylinder: Option<Mesh>,
}

impl ShapeMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_plane_mesh(&mut self, device: &wgpu::Device) {
        self.plane = Some(Mesh::upload(device, "plane", &plane()));
    }

    pub fn load_box_mesh(&mut self, device: &wgpu::Device) {
        self.cube = Some(Mesh::upload(device, "box", &cube()));
    }

    pub fn load_cylinder_mesh(&mut self, device: &wgpu::Device) {
        self.cylinder = Some(Mesh::upload(
            device,
            "cylinder",
            &cylinder(CYLINDER_SEGMENTS),
        ));
    }

    pub fn get(&self, shape: Shape) -> Option<&Mesh> {
        match shape {
            Shape::Plane => self.plane.as_ref(),
            Shape::Box => self.cube.as_ref(),
            Shape::Cylinder => self.cylinder.as_ref(),
        }
    }
}
