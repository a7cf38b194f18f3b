//! Box elements: six axis-aligned quads, two triangles each.

use glam::{Vec2, Vec3};

use super::builder::{MeshBuilder, Vertex};
use super::document::{CubeFace, CubeFaceSide, CubeShape};

/// Corners of `side` as seen from outside the box: top-left, top-right,
/// bottom-right, bottom-left. `f` is the min corner, `t` the max corner.
fn face_corners(side: CubeFaceSide, f: Vec3, t: Vec3) -> [Vec3; 4] {
    match side {
        CubeFaceSide::North => [
            Vec3::new(t.x, t.y, f.z),
            Vec3::new(f.x, t.y, f.z),
            Vec3::new(f.x, f.y, f.z),
            Vec3::new(t.x, f.y, f.z),
        ],
        CubeFaceSide::South => [
            Vec3::new(f.x, t.y, t.z),
            Vec3::new(t.x, t.y, t.z),
            Vec3::new(t.x, f.y, t.z),
            Vec3::new(f.x, f.y, t.z),
        ],
        CubeFaceSide::East => [
            Vec3::new(t.x, t.y, t.z),
            Vec3::new(t.x, t.y, f.z),
            Vec3::new(t.x, f.y, f.z),
            Vec3::new(t.x, f.y, t.z),
        ],
        CubeFaceSide::West => [
            Vec3::new(f.x, t.y, f.z),
            Vec3::new(f.x, t.y, t.z),
            Vec3::new(f.x, f.y, t.z),
            Vec3::new(f.x, f.y, f.z),
        ],
        CubeFaceSide::Up => [
            Vec3::new(f.x, t.y, f.z),
            Vec3::new(t.x, t.y, f.z),
            Vec3::new(t.x, t.y, t.z),
            Vec3::new(f.x, t.y, t.z),
        ],
        CubeFaceSide::Down => [
            Vec3::new(f.x, f.y, t.z),
            Vec3::new(t.x, f.y, t.z),
            Vec3::new(t.x, f.y, f.z),
            Vec3::new(f.x, f.y, f.z),
        ],
    }
}

/// Pixel-space UVs for the four corners, after the face's UV rotation.
fn face_uvs(rect: [f32; 4], rotation: f32) -> [Vec2; 4] {
    let [u1, v1, u2, v2] = rect;
    let uvs = [
        Vec2::new(u1, v1),
        Vec2::new(u2, v1),
        Vec2::new(u2, v2),
        Vec2::new(u1, v2),
    ];
    let steps = ((rotation / 90.0).round() as i32).rem_euclid(4) as usize;
    std::array::from_fn(|i| uvs[(i + 4 - steps) % 4])
}

/// Emits every textured face of `shape` into `builder`.
///
/// A face without a UV rectangle or without a texture emits nothing.
pub fn append_cube(builder: &mut MeshBuilder<'_>, shape: &CubeShape) {
    let a = Vec3::from(shape.from);
    let b = Vec3::from(shape.to);
    let inflate = Vec3::splat(shape.inflate);
    let min = a.min(b) - inflate;
    let max = a.max(b) + inflate;

    for side in CubeFaceSide::ALL {
        let Some(face) = shape.faces.get(side) else {
            continue;
        };
        append_face(builder, side, face, min, max);
    }
}

fn append_face(builder: &mut MeshBuilder<'_>, side: CubeFaceSide, face: &CubeFace, min: Vec3, max: Vec3) {
    let (Some(rect), Some(material_index)) = (face.uv, face.material_index()) else {
        return;
    };

    let corners = face_corners(side, min, max);
    let uvs = face_uvs(rect, face.rotation);
    let materials = builder.materials();
    let v: [Vertex; 4] =
        std::array::from_fn(|i| Vertex::new(corners[i], materials.normalize_uv(material_index, uvs[i])));

    builder.push_triangle(material_index, [v[0], v[1], v[2]]);
    builder.push_triangle(material_index, [v[0], v[2], v[3]]);
}
