//! Free-form mesh elements: triangles and (possibly non-planar) quads.

use glam::{Vec2, Vec3};

use crate::errors::{ImportError, Result};
use crate::math::{Plane, origin_rotation_transform, project_point_on_line};

use super::builder::{MeshBuilder, Vertex};
use super::document::{Element, MeshFace, MeshShape};

/// Emits every face of `shape`, then moves the new vertices into place with
/// the element's origin and rotation.
///
/// Faces with neither 3 nor 4 vertices are loose edges and are skipped.
pub fn append_mesh(builder: &mut MeshBuilder<'_>, element: &Element, shape: &MeshShape) -> Result<()> {
    let start = builder.vertex_count();

    for (key, face) in &shape.faces {
        match face.vertices.len() {
            3 => {
                let [a, b, c] = read_vertices::<3>(builder, shape, key, face)?;
                builder.push_triangle(face.texture, [c, b, a]);
            }
            4 => {
                let quad = read_vertices::<4>(builder, shape, key, face)?;
                append_quad(builder, face.texture, quad);
            }
            n => log::warn!("Found loose edge in face {key} of {} ({n} vertices), skipping", element.name),
        }
    }

    let transform = origin_rotation_transform(element.origin, element.rotation);
    builder.transform_from(start, &transform);
    Ok(())
}

fn read_vertices<const N: usize>(
    builder: &MeshBuilder<'_>,
    shape: &MeshShape,
    key: &str,
    face: &MeshFace,
) -> Result<[Vertex; N]> {
    let materials = builder.materials();
    let mut out = [Vertex::default(); N];
    for (slot, name) in out.iter_mut().zip(&face.vertices) {
        let position = *shape.vertices.get(name).ok_or_else(|| ImportError::MissingVertex {
            face: key.to_string(),
            vertex: name.clone(),
        })?;
        let uv = if materials.has_uv_slot(face.texture) {
            let raw = face.uv.get(name).ok_or_else(|| ImportError::MissingUv {
                face: key.to_string(),
                vertex: name.clone(),
            })?;
            materials.normalize_uv(face.texture, Vec2::from(*raw))
        } else {
            Vec2::ZERO
        };
        *slot = Vertex::new(position, uv);
    }
    Ok(out)
}

/// `true` when `d` lies behind the plane through `b` whose normal points
/// from line `a-b` towards `c`, i.e. `c` and `d` sit on opposite sides.
pub fn is_diagonal(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> bool {
    let on_line = project_point_on_line(c, a, b);
    let plane = Plane::from_normal_and_point(c - on_line, b);
    plane.signed_distance(d) < 0.0
}

/// Splits a quad along the diagonal that keeps both triangles on the
/// surface, emitting six fresh vertices.
pub fn append_quad(builder: &mut MeshBuilder<'_>, material_index: usize, [a, b, c, d]: [Vertex; 4]) {
    let (pa, pb, pc, pd) = (a.position, b.position, c.position, d.position);

    let (a, b, c, d) = if is_diagonal(pa, pb, pc, pd) {
        (a, b, c, d)
    } else if is_diagonal(pa, pc, pb, pd) {
        (a, c, b, d)
    } else {
        (a, d, b, c)
    };

    builder.push_triangle(material_index, [c, a, b]);
    builder.push_triangle(material_index, [d, b, a]);
}
