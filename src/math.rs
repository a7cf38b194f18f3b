//! Math helpers shared by the geometry builders and the hierarchy importer.
//!
//! All inputs are in the source tool's space: right-handed, Y up, one unit per
//! texel, rotations as Euler angles in degrees applied in Z·Y·X order.

use glam::{Affine3A, EulerRot, Quat, Vec2, Vec3};

/// Converts a `[x, y, z]` Euler triple in degrees into a quaternion.
///
/// The source tool composes element and group rotations as `Rz * Ry * Rx`.
#[inline]
#[must_use]
pub fn quat_from_euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::ZYX,
        degrees.z.to_radians(),
        degrees.y.to_radians(),
        degrees.x.to_radians(),
    )
}

/// Rigid transform placing element-local points at `origin` after `rotation`.
#[inline]
#[must_use]
pub fn origin_rotation_transform(origin: Vec3, rotation_degrees: Vec3) -> Affine3A {
    Affine3A::from_rotation_translation(quat_from_euler_degrees(rotation_degrees), origin)
}

/// Projects `p` onto the infinite line through `a` and `b`.
///
/// A degenerate line (`a == b`) projects everything onto `a`.
#[must_use]
pub fn project_point_on_line(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    a + ab * ((p - a).dot(ab) / len_sq)
}

/// Plane in Hessian normal form: `dot(normal, x) + distance == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Plane through `point` facing `normal`. The normal is normalised; a zero
    /// normal yields a plane every point lies on.
    #[must_use]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Signed distance from `point`; positive on the side the normal faces.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Maps a pixel-space UV into the unit square of `resolution`, flipping V.
#[inline]
#[must_use]
pub fn normalize_uv(raw: Vec2, resolution: Vec2) -> Vec2 {
    let uv = raw / resolution;
    Vec2::new(uv.x, 1.0 - uv.y)
}
