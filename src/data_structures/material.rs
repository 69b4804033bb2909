use cgmath::Vector3;

/// Surface response to light, looked up by tag.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMaterial {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl ObjectMaterial {
    pub fn new(
        tag: &str,
        diffuse_color: impl Into<Vector3<f32>>,
        specular_color: impl Into<Vector3<f32>>,
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        }
    }
}

impl Default for ObjectMaterial {
    fn default() -> Self {
        Self::new("default", [1.0, 1.0, 1.0], [0.5, 0.5, 0.5], 32.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<ObjectMaterial>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, material: ObjectMaterial) {
        self.materials.push(material);
    }

    pub fn find_material(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
