//! Model transforms.
//!
//! Objects are placed with a scale, three Euler angles in degrees and a
//! position. The angles are applied X first, then Y, then Z.

use cgmath::{Deg, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    /// Rotation about the X, Y and Z axes, in degrees.
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Transform {
    pub fn new(
        scale: impl Into<Vector3<f32>>,
        rotation: impl Into<Vector3<f32>>,
        position: impl Into<Vector3<f32>>,
    ) -> Self {
        Self {
            scale: scale.into(),
            rotation: rotation.into(),
            position: position.into(),
        }
    }

    /// `translate * rotate_z * rotate_y * rotate_x * scale`
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Matrix that keeps normals perpendicular to surfaces under non-uniform scale.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        normal_matrix(&self.to_matrix())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Inverse transpose of the upper 3x3 of `model`, identity if it cannot be inverted.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        model.x.truncate(),
        model.y.truncate(),
        model.z.truncate(),
    );
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::identity)
}
