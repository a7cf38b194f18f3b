use glam::{Quat, Vec3, Vec4};

pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Uniform Catmull-Rom through `p1 -> p2`, with `p0`/`p3` as neighbours.
    fn interpolate_catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f32) -> Self;
}

/// Catmull-Rom basis weights for `p0..p3` at `t`.
#[inline]
fn catmull_rom_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f32) -> Self {
        let [w0, w1, w2, w3] = catmull_rom_weights(t);
        p0 * w0 + p1 * w1 + p2 * w2 + p3 * w3
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    fn interpolate_catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f32) -> Self {
        let [w0, w1, w2, w3] = catmull_rom_weights(t);

        // Keep the neighbours in p1's hemisphere before blending components
        let anchor = Vec4::from(p1);
        let align = |q: Quat| {
            let v = Vec4::from(q);
            if v.dot(anchor) < 0.0 { -v } else { v }
        };

        let result = align(p0) * w0 + anchor * w1 + align(p2) * w2 + align(p3) * w3;
        Quat::from_vec4(result).normalize()
    }
}
