use cgmath::Vector3;
use wgpu::util::DeviceExt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    /// Light intensity left after travelling `distance`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// The lights of a scene, one of each kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Lighting {
    /// A dark rig used until a scene sets up its own lights.
    pub fn off() -> Self {
        let zero = Vector3::new(0.0, 0.0, 0.0);
        Self {
            directional: DirectionalLight {
                direction: Vector3::new(0.0, -1.0, 0.0),
                ambient: zero,
                diffuse: zero,
                specular: zero,
            },
            point: PointLight {
                position: zero,
                ambient: zero,
                diffuse: zero,
                specular: zero,
                constant: 1.0,
                linear: 0.0,
                quadratic: 0.0,
            },
        }
    }
}

/// GPU side of [`Lighting`]. Every member is a `vec4` so the layout needs no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    dir_direction: [f32; 4],
    dir_ambient: [f32; 4],
    dir_diffuse: [f32; 4],
    dir_specular: [f32; 4],
    point_position: [f32; 4],
    point_ambient: [f32; 4],
    point_diffuse: [f32; 4],
    point_specular: [f32; 4],
    // constant, linear, quadratic, unused
    point_attenuation: [f32; 4],
}

fn vec4(v: Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

impl From<&Lighting> for LightUniform {
    fn from(lighting: &Lighting) -> Self {
        let dir = &lighting.directional;
        let point = &lighting.point;
        Self {
            dir_direction: vec4(dir.direction),
            dir_ambient: vec4(dir.ambient),
            dir_diffuse: vec4(dir.diffuse),
            dir_specular: vec4(dir.specular),
            point_position: [point.position.x, point.position.y, point.position.z, 1.0],
            point_ambient: vec4(point.ambient),
            point_diffuse: vec4(point.diffuse),
            point_specular: vec4(point.specular),
            point_attenuation: [point.constant, point.linear, point.quadratic, 0.0],
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub lighting: Lighting,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(lighting: Lighting, device: &wgpu::Device) -> Self {
        let buffer = mk_buffer(device, LightUniform::from(&lighting));
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            lighting,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Replace the scene lights and upload them.
    pub fn set(&mut self, lighting: Lighting, queue: &wgpu::Queue) {
        self.lighting = lighting;
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[LightUniform::from(&self.lighting)]),
        );
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
