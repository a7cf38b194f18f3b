use core::ops::Range;

use glam::{Affine3A, Vec2, Vec3};
use uuid::Uuid;

/// Which winding marks the front side of a triangle.
///
/// Normals computed by [`Geometry::compute_vertex_normals`] point out of the
/// front side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    #[default]
    Ccw,
    Cw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn center(&self) -> Vec3 { (self.min + self.max) * 0.5 }
    pub fn size(&self) -> Vec3 { self.max - self.min }
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Smallest box containing every point, `None` for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |bb, p| Self {
            min: bb.min.min(*p),
            max: bb.max.max(*p),
        }))
    }

    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut new_min = Vec3::splat(f32::INFINITY);
        let mut new_max = Vec3::splat(f32::NEG_INFINITY);

        for point in corners {
            let transformed = matrix.transform_point3(point);
            new_min = new_min.min(transformed);
            new_max = new_max.max(transformed);
        }

        Self { min: new_min, max: new_max }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// A contiguous range of the index buffer drawn with one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMesh {
    /// Material index in the source document (texture slot).
    pub material_index: usize,
    /// Range into [`Geometry::indices`].
    pub index_range: Range<u32>,
}

impl SubMesh {
    pub fn index_count(&self) -> u32 {
        self.index_range.end - self.index_range.start
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count() / 3
    }
}

/// Interleaved vertex layout of [`Geometry::interleaved_bytes`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InterleavedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side triangle-list geometry split into material sub-meshes.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub name: String,

    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    submeshes: Vec<SubMesh>,

    pub front_face: FrontFace,

    pub bounding_box: Option<BoundingBox>,
    pub bounding_sphere: Option<BoundingSphere>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: String::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            submeshes: Vec::new(),
            front_face: FrontFace::default(),
            bounding_box: None,
            bounding_sphere: None,
        }
    }

    // Attribute accessors
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Indices of sub-mesh `index`, or `None` if out of range.
    pub fn submesh_indices(&self, index: usize) -> Option<&[u32]> {
        let range = &self.submeshes.get(index)?.index_range;
        self.indices.get(range.start as usize..range.end as usize)
    }

    /// Replaces position and UV streams. Normals are cleared; call
    /// [`Self::compute_vertex_normals`] once indices are in place.
    pub fn set_vertices(&mut self, positions: Vec<Vec3>, uvs: Vec<Vec2>) {
        debug_assert_eq!(positions.len(), uvs.len());
        self.positions = positions;
        self.uvs = uvs;
        self.normals.clear();
    }

    /// Appends one sub-mesh. Empty index lists are ignored.
    pub fn push_submesh(&mut self, material_index: usize, indices: &[u32]) {
        if indices.is_empty() {
            return;
        }
        let start = self.indices.len() as u32;
        self.indices.extend_from_slice(indices);
        let end = self.indices.len() as u32;
        self.submeshes.push(SubMesh {
            material_index,
            index_range: start..end,
        });
    }

    pub fn compute_vertex_normals(&mut self) {
        let pos_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; pos_count];

        for chunk in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (chunk[0] as usize, chunk[1] as usize, chunk[2] as usize);
            if i0 >= pos_count || i1 >= pos_count || i2 >= pos_count {
                continue;
            }

            let v0 = self.positions[i0];
            let v1 = self.positions[i1];
            let v2 = self.positions[i2];

            // Area weighted: |cross| == 2 * triangle area
            let face_normal = match self.front_face {
                FrontFace::Ccw => (v1 - v0).cross(v2 - v0),
                FrontFace::Cw => (v2 - v0).cross(v1 - v0),
            };

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }

        self.normals = normals;
    }

    pub fn compute_bounding_volume(&mut self) {
        let Some(bb) = BoundingBox::from_points(&self.positions) else {
            self.bounding_box = None;
            self.bounding_sphere = None;
            return;
        };

        // AABB centre as sphere centre
        let center = bb.center();
        let max_dist_sq = self
            .positions
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max);

        self.bounding_box = Some(bb);
        self.bounding_sphere = Some(BoundingSphere {
            center,
            radius: max_dist_sq.sqrt(),
        });
    }

    /// Packs position, normal and UV per vertex for upload.
    pub fn interleaved_vertices(&self) -> Vec<InterleavedVertex> {
        (0..self.positions.len())
            .map(|i| InterleavedVertex {
                position: self.positions[i].to_array(),
                normal: self.normals.get(i).copied().unwrap_or(Vec3::ZERO).to_array(),
                uv: self.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
            })
            .collect()
    }

    pub fn interleaved_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved_vertices()).to_vec()
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
