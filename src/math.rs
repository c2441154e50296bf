//! Transform and projection matrix builders.
//!
//! All transform construction in the viewer goes through this module so the
//! coordinate conventions live in one place:
//!
//! - Matrices are column-major (cgmath storage), vectors are column vectors
//!   on the right, so transforms chain right-to-left: `A * B * v` applies `B`
//!   first.
//! - World and view space are right-handed, +y up, with the camera looking
//!   down -z.
//! - Clip space is wgpu/WebGPU NDC: x,y in [-1, 1] and **z in [0, 1]**. This
//!   is the one numeric contract the WGSL shader depends on; cgmath's own
//!   projection helpers target the OpenGL [-1, 1] depth range and must not be
//!   used for rendering here.
//!
//! All functions are pure. Inputs are assumed finite and non-degenerate; a
//! zero scale axis or a singular model matrix produces a mathematically
//! meaningless result rather than an error (see [`normal_matrix`]).

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Vector3, Vector4,
};

/// A rectangle in window coordinates (origin top-left, y down).
///
/// Window sizes and cursor positions arrive from winit as `f64`, so the rect
/// carries `f64` and [`orthographic`] narrows only at the very end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub fn radians_from_degrees(degrees: f32) -> f32 {
    degrees.to_radians()
}

pub fn degrees_from_radians(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Translation by `translation`, stored in the last column.
pub fn from_translation(translation: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_cols(
        Vector4::new(1.0, 0.0, 0.0, 0.0),
        Vector4::new(0.0, 1.0, 0.0, 0.0),
        Vector4::new(0.0, 0.0, 1.0, 0.0),
        translation.extend(1.0),
    )
}

/// Per-axis scale.
pub fn from_nonuniform_scale(scale: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_cols(
        Vector4::new(scale.x, 0.0, 0.0, 0.0),
        Vector4::new(0.0, scale.y, 0.0, 0.0),
        Vector4::new(0.0, 0.0, scale.z, 0.0),
        Vector4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Uniform scale on all three axes.
pub fn from_scale(scale: f32) -> Matrix4<f32> {
    from_nonuniform_scale(Vector3::new(scale, scale, scale))
}

/// Rotation about the x axis, angle in radians.
pub fn from_rotation_x(angle: f32) -> Matrix4<f32> {
    let (s, c) = angle.sin_cos();
    Matrix4::from_cols(
        Vector4::new(1.0, 0.0, 0.0, 0.0),
        Vector4::new(0.0, c, s, 0.0),
        Vector4::new(0.0, -s, c, 0.0),
        Vector4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Rotation about the y axis, angle in radians.
pub fn from_rotation_y(angle: f32) -> Matrix4<f32> {
    let (s, c) = angle.sin_cos();
    Matrix4::from_cols(
        Vector4::new(c, 0.0, -s, 0.0),
        Vector4::new(0.0, 1.0, 0.0, 0.0),
        Vector4::new(s, 0.0, c, 0.0),
        Vector4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Rotation about the z axis, angle in radians.
pub fn from_rotation_z(angle: f32) -> Matrix4<f32> {
    let (s, c) = angle.sin_cos();
    Matrix4::from_cols(
        Vector4::new(c, s, 0.0, 0.0),
        Vector4::new(-s, c, 0.0, 0.0),
        Vector4::new(0.0, 0.0, 1.0, 0.0),
        Vector4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Euler rotation composed as X * Y * Z (z applied first).
///
/// The composition order is part of the contract: model transforms in the
/// viewer use this order.
pub fn from_euler_xyz(angles: Vector3<f32>) -> Matrix4<f32> {
    from_rotation_x(angles.x) * from_rotation_y(angles.y) * from_rotation_z(angles.z)
}

/// Euler rotation composed as Y * X * Z (z applied first).
///
/// Used for yaw/pitch style camera rotation where yaw has to stay aligned
/// with the world up axis.
pub fn from_euler_yxz(angles: Vector3<f32>) -> Matrix4<f32> {
    from_rotation_y(angles.y) * from_rotation_x(angles.x) * from_rotation_z(angles.z)
}

/// Perspective projection mapping depth to [0, 1].
///
/// `fovy` is the vertical field of view in radians, `aspect` is width over
/// height. With `lhs` false the matrix expects right-handed view space
/// (camera looking down -z, the convention [`look_at`] produces); with `lhs`
/// true it expects left-handed view space looking down +z. Both variants map
/// the near plane to NDC z = 0 and the far plane to z = 1.
pub fn perspective(fovy: f32, near: f32, far: f32, aspect: f32, lhs: bool) -> Matrix4<f32> {
    let f = 1.0 / (fovy / 2.0).tan();
    let (depth, flip) = if lhs {
        (far / (far - near), 1.0)
    } else {
        (far / (near - far), -1.0)
    };
    Matrix4::from_cols(
        Vector4::new(f / aspect, 0.0, 0.0, 0.0),
        Vector4::new(0.0, f, 0.0, 0.0),
        Vector4::new(0.0, 0.0, depth, flip),
        // The same offset works under both flags: near lands on z = 0 once
        // divided by the (sign-flipped) w.
        Vector4::new(0.0, 0.0, near * far / (near - far), 0.0),
    )
}

/// Orthographic projection of a window-space rectangle, depth mapped to
/// [0, 1] for right-handed view space.
///
/// The rect is given with y growing downward (window convention); its top
/// edge lands on NDC y = +1. Computed in f64 and narrowed once at the end.
pub fn orthographic(rect: Rect, near: f32, far: f32) -> Matrix4<f32> {
    let (l, r) = (rect.x, rect.x + rect.width);
    let (t, b) = (rect.y, rect.y + rect.height);
    let (n, f) = (near as f64, far as f64);
    let ortho = Matrix4::from_cols(
        Vector4::new(2.0 / (r - l), 0.0, 0.0, 0.0),
        Vector4::new(0.0, 2.0 / (t - b), 0.0, 0.0),
        Vector4::new(0.0, 0.0, -1.0 / (f - n), 0.0),
        Vector4::new(
            -(r + l) / (r - l),
            -(t + b) / (t - b),
            -n / (f - n),
            1.0,
        ),
    );
    mat4_from_f64(ortho)
}

/// Right-handed look-at view matrix.
pub fn look_at(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let forward = (center - eye).normalize();
    let side = forward.cross(up).normalize();
    let up = side.cross(forward);
    let eye = eye.to_vec();
    Matrix4::from_cols(
        Vector4::new(side.x, up.x, -forward.x, 0.0),
        Vector4::new(side.y, up.y, -forward.y, 0.0),
        Vector4::new(side.z, up.z, -forward.z, 0.0),
        Vector4::new(-side.dot(eye), -up.dot(eye), forward.dot(eye), 1.0),
    )
}

/// View matrix for a camera `eye` units from `center` along world +z,
/// looking at `center`.
pub fn from_eye_distance(eye: f32, center: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let position = Point3::new(center.x, center.y, center.z + eye);
    look_at(position, center, up)
}

/// The upper-left 3x3 block of `matrix`.
pub fn upper_left(matrix: Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(
        matrix.x.truncate(),
        matrix.y.truncate(),
        matrix.z.truncate(),
    )
}

/// Normal matrix for a model matrix: the inverse-transpose of its upper-left
/// 3x3 block, which keeps normals perpendicular to surfaces under
/// non-uniform scale.
///
/// A singular upper-left block (zero scale axis) has no defined normal
/// matrix; the plain upper-left block is returned in that case.
pub fn normal_matrix(matrix: Matrix4<f32>) -> Matrix3<f32> {
    let upper = upper_left(matrix);
    match upper.invert() {
        Some(inverse) => inverse.transpose(),
        None => upper,
    }
}

/// Narrow a double-precision matrix to single precision, column by column.
pub fn mat4_from_f64(matrix: Matrix4<f64>) -> Matrix4<f32> {
    Matrix4::from_cols(
        vec4_from_f64(matrix.x),
        vec4_from_f64(matrix.y),
        vec4_from_f64(matrix.z),
        vec4_from_f64(matrix.w),
    )
}

/// Narrow a double-precision vector to single precision.
pub fn vec4_from_f64(vector: Vector4<f64>) -> Vector4<f32> {
    Vector4::new(
        vector.x as f32,
        vector.y as f32,
        vector.z as f32,
        vector.w as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_mat4_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: [[f32; 4]; 4] = a.into();
        let b: [[f32; 4]; 4] = b.into();
        for (col_a, col_b) in a.iter().zip(b.iter()) {
            for (x, y) in col_a.iter().zip(col_b.iter()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-5);
            }
        }
    }

    /// Project a view-space point through a projection matrix and divide.
    fn to_ndc(projection: Matrix4<f32>, point: Vector3<f32>) -> Vector3<f32> {
        let clip = projection * point.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn degree_radian_round_trip() {
        for degrees in [-720.0, -90.0, 0.0, 33.3, 45.0, 180.0, 1234.5] {
            assert_relative_eq!(
                degrees_from_radians(radians_from_degrees(degrees)),
                degrees,
                epsilon = 1e-3
            );
        }
        assert_relative_eq!(radians_from_degrees(180.0), PI, epsilon = 1e-6);
    }

    #[test]
    fn translation_moves_origin_exactly() {
        let t = Vector3::new(3.0, -4.5, 12.25);
        let moved = from_translation(t) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(moved, t.extend(1.0));
    }

    #[test]
    fn uniform_scale_composes_multiplicatively() {
        let s = 1.75;
        assert_mat4_eq(from_scale(s) * from_scale(s), from_scale(s * s));
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_mat4_eq(from_rotation_z(0.0), Matrix4::identity());
    }

    #[test]
    fn rotation_x_quarter_turn_sends_y_to_z() {
        let rotated = from_rotation_x(FRAC_PI_2) * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn euler_composition_orders() {
        let angles = Vector3::new(0.3, -1.1, 2.0);
        assert_mat4_eq(
            from_euler_xyz(angles),
            from_rotation_x(angles.x) * from_rotation_y(angles.y) * from_rotation_z(angles.z),
        );
        assert_mat4_eq(
            from_euler_yxz(angles),
            from_rotation_y(angles.y) * from_rotation_x(angles.x) * from_rotation_z(angles.z),
        );
    }

    #[test]
    fn perspective_maps_near_to_zero_and_far_to_one() {
        let fovy = radians_from_degrees(60.0);
        let (near, far) = (0.1, 100.0);

        let rhs = perspective(fovy, near, far, 16.0 / 9.0, false);
        assert_relative_eq!(to_ndc(rhs, Vector3::new(0.0, 0.0, -near)).z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(to_ndc(rhs, Vector3::new(0.0, 0.0, -far)).z, 1.0, epsilon = 1e-4);

        let lhs = perspective(fovy, near, far, 16.0 / 9.0, true);
        assert_relative_eq!(to_ndc(lhs, Vector3::new(0.0, 0.0, near)).z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(to_ndc(lhs, Vector3::new(0.0, 0.0, far)).z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn perspective_scales_x_by_aspect() {
        let fovy = radians_from_degrees(90.0);
        let proj = perspective(fovy, 0.1, 10.0, 2.0, false);
        // A point on the vertical fov edge hits y = 1, the same offset in x
        // only reaches half way with aspect 2.
        let ndc = to_ndc(proj, Vector3::new(1.0, 1.0, -1.0));
        assert_relative_eq!(ndc.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.x, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn orthographic_maps_rect_corners() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        };
        let proj = orthographic(rect, 0.0, 1.0);
        let top_left = to_ndc(proj, Vector3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(top_left.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(top_left.y, 1.0, epsilon = 1e-6);

        let bottom_right = to_ndc(proj, Vector3::new(800.0, 600.0, -1.0));
        assert_relative_eq!(bottom_right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(bottom_right.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(bottom_right.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_centers_the_target() {
        let view = look_at(
            Point3::new(4.0, 2.0, 7.0),
            Point3::new(4.0, 2.0, -3.0),
            Vector3::unit_y(),
        );
        // The eye lands on the view-space origin, the target straight ahead
        // on -z at its actual distance.
        let eye = view * Vector4::new(4.0, 2.0, 7.0, 1.0);
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-5);

        let center = view * Vector4::new(4.0, 2.0, -3.0, 1.0);
        assert_relative_eq!(center.z, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn eye_distance_view_matches_look_at() {
        let center = Point3::new(1.0, 0.5, -2.0);
        let view = from_eye_distance(6.0, center, Vector3::unit_y());
        let transformed = view * Vector4::new(center.x, center.y, center.z, 1.0);
        assert_relative_eq!(transformed.z, -6.0, epsilon = 1e-5);
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular() {
        let model = from_nonuniform_scale(Vector3::new(2.0, 1.0, 3.0));
        // A surface through the origin with normal (1,1,0) and tangent
        // (1,-1,0). After a non-uniform scale the naive transformed normal
        // would no longer be perpendicular to the transformed tangent.
        let normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let tangent = Vector3::new(1.0, -1.0, 0.0).normalize();

        let scaled_tangent = upper_left(model) * tangent;
        let reoriented = normal_matrix(model) * normal;
        assert_relative_eq!(reoriented.dot(scaled_tangent), 0.0, epsilon = 1e-6);

        // Sanity check that the naive transform really is wrong here.
        let naive = upper_left(model) * normal;
        assert!(naive.dot(scaled_tangent).abs() > 0.1);
    }

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let model = from_rotation_y(0.7);
        let normal = normal_matrix(model);
        let upper = upper_left(model);
        let a: [[f32; 3]; 3] = normal.into();
        let b: [[f32; 3]; 3] = upper.into();
        for (col_a, col_b) in a.iter().zip(b.iter()) {
            for (x, y) in col_a.iter().zip(col_b.iter()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn narrowing_preserves_values() {
        let wide = Matrix4::from_cols(
            Vector4::new(1.5f64, 0.0, 0.0, 0.0),
            Vector4::new(0.0, 2.5, 0.0, 0.0),
            Vector4::new(0.0, 0.0, -3.5, 0.0),
            Vector4::new(7.0, 8.0, 9.0, 1.0),
        );
        let narrow = mat4_from_f64(wide);
        assert_eq!(narrow.w, Vector4::new(7.0f32, 8.0, 9.0, 1.0));
        assert_eq!(vec4_from_f64(wide.x), Vector4::new(1.5f32, 0.0, 0.0, 0.0));
    }
}
