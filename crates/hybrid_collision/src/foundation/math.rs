//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of helpers the collision code
//! needs: a TRS transform, matrix decomposition and basis orthonormalization.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type, used for RGBA colors
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Columns shorter than this are treated as collapsed when extracting a basis.
const BASIS_EPSILON: f32 = 1e-8;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Set the scale, keeping position and rotation
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        self.to_matrix().transform_point(point)
    }
}

/// Translation part of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Per-axis scale factors of an affine matrix (lengths of the basis columns)
pub fn scale_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude(),
        Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude(),
        Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude(),
    )
}

/// Extract an orthonormal rotation from the upper 3x3 block of an affine matrix.
///
/// Scale is divided out column by column and the result is re-orthonormalized
/// with Gram-Schmidt, so shear and rounding never leak into the basis.
/// Collapsed columns (zero scale) are rebuilt from the surviving ones; a fully
/// collapsed matrix yields the identity.
pub fn rotation_of(matrix: &Mat4) -> Mat3 {
    let linear: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    orthonormalize([
        linear.column(0).into_owned(),
        linear.column(1).into_owned(),
        linear.column(2).into_owned(),
    ])
}

/// Gram-Schmidt over three column candidates, preserving handedness where possible
pub fn orthonormalize(columns: [Vec3; 3]) -> Mat3 {
    let unit = |v: &Vec3| {
        let len = v.magnitude();
        (len > BASIS_EPSILON).then(|| v / len)
    };

    let x = unit(&columns[0]);
    let y = x.map_or_else(
        || unit(&columns[1]),
        |x| unit(&(columns[1] - x * x.dot(&columns[1]))),
    );

    let (x, y) = match (x, y) {
        (Some(x), Some(y)) => (x, y),
        (Some(x), None) => {
            let y = unit(&(columns[2] - x * x.dot(&columns[2])))
                .map_or_else(|| any_perpendicular(&x), |z| z.cross(&x));
            (x, y)
        }
        (None, Some(y)) => {
            // Rebuild X from Y and whatever is left of Z
            let z_hint = unit(&(columns[2] - y * y.dot(&columns[2])))
                .unwrap_or_else(|| any_perpendicular(&y));
            (y.cross(&z_hint), y)
        }
        (None, None) => match unit(&columns[2]) {
            Some(z) => {
                let x = any_perpendicular(&z);
                (x, z.cross(&x))
            }
            None => return Mat3::identity(),
        },
    };

    let z = x.cross(&y);
    Mat3::from_columns(&[x, y, z])
}

/// Some unit vector perpendicular to `v` (which must be unit length)
fn any_perpendicular(v: &Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    v.cross(&helper).normalize()
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_rotation_of_removes_scale() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), constants::QUARTER_PI);
        let transform = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), rotation)
            .with_scale(Vec3::new(2.0, 3.0, 4.0));
        let matrix = transform.to_matrix();

        assert_relative_eq!(rotation_of(&matrix), *rotation.to_rotation_matrix().matrix(), epsilon = EPSILON);
        assert_relative_eq!(scale_of(&matrix), Vec3::new(2.0, 3.0, 4.0), epsilon = EPSILON);
        assert_relative_eq!(translation_of(&matrix), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_orthonormalize_collapsed_column() {
        let basis = orthonormalize([Vec3::x(), Vec3::zeros(), Vec3::z()]);

        assert_relative_eq!(basis.column(0).into_owned(), Vec3::x(), epsilon = EPSILON);
        assert_relative_eq!(basis.column(2).into_owned(), Vec3::z(), epsilon = EPSILON);
        assert_relative_eq!(basis.determinant(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_orthonormalize_all_collapsed_is_identity() {
        assert_eq!(orthonormalize([Vec3::zeros(); 3]), Mat3::identity());
    }

    #[test]
    fn test_orthonormalize_sheared_basis() {
        let basis = orthonormalize([
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ]);

        assert_relative_eq!(basis.transpose() * basis, Mat3::identity(), epsilon = EPSILON);
        assert_relative_eq!(basis.column(1).into_owned(), Vec3::y(), epsilon = EPSILON);
    }
}
