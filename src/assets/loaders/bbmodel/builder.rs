use std::collections::BTreeMap;

use glam::{Affine3A, Vec2, Vec3};

use crate::assets::bundle::AssetRegistry;
use crate::assets::prefab::PrefabNode;
use crate::errors::Result;
use crate::math::origin_rotation_transform;
use crate::resources::geometry::{FrontFace, Geometry};
use crate::resources::mesh::Mesh;

use super::document::{Element, ElementKind};
use super::materials::MaterialSet;
use super::{cube, polymesh};

/// One emitted vertex. Faces never share vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// Accumulates the triangles of one renderable unit.
///
/// Triangle indices are bucketed by material index; buckets are kept in an
/// ordered map so baking always emits sub-meshes by ascending index.
#[derive(Debug)]
pub struct MeshBuilder<'a> {
    materials: &'a MaterialSet,
    vertices: Vec<Vertex>,
    submeshes: BTreeMap<usize, Vec<u32>>,
    bake_cube_rotation: bool,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(materials: &'a MaterialSet) -> Self {
        Self {
            materials,
            vertices: Vec::new(),
            submeshes: BTreeMap::new(),
            bake_cube_rotation: false,
        }
    }

    /// Rotate cube vertices about the cube's origin instead of leaving the
    /// rotation to the owning node.
    #[must_use]
    pub fn with_cube_rotation_baked(mut self, bake: bool) -> Self {
        self.bake_cube_rotation = bake;
        self
    }

    pub fn materials(&self) -> &'a MaterialSet {
        self.materials
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Material indices that have a bucket, ascending.
    pub fn material_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.submeshes.keys().copied()
    }

    pub fn submesh(&self, material_index: usize) -> Option<&[u32]> {
        self.submeshes.get(&material_index).map(Vec::as_slice)
    }

    /// `true` when nothing would be drawn; such a result must not be baked.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.submeshes.is_empty()
    }

    /// Converts one element into triangles.
    ///
    /// Locators and unsupported kinds contribute nothing. On error the
    /// builder is left exactly as it was before the call.
    pub fn add_element(&mut self, element: &Element) -> Result<()> {
        let checkpoint = self.vertices.len();

        let result = match &element.kind {
            ElementKind::Cube(shape) => {
                cube::append_cube(self, shape);
                if self.bake_cube_rotation && element.rotation != Vec3::ZERO {
                    // Rotate about the cube's own pivot
                    let about_origin = origin_rotation_transform(element.origin, element.rotation)
                        * Affine3A::from_translation(-element.origin);
                    self.transform_from(checkpoint, &about_origin);
                }
                Ok(())
            }
            ElementKind::Mesh(shape) => polymesh::append_mesh(self, element, shape),
            ElementKind::Locator => Ok(()),
            ElementKind::Unsupported(kind) => {
                log::debug!("Element {} of type {kind:?} has no geometry", element.uuid);
                Ok(())
            }
        };

        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    /// Appends one triangle, in the given order, to `material_index`'s bucket.
    pub fn push_triangle(&mut self, material_index: usize, triangle: [Vertex; 3]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&triangle);
        self.submeshes
            .entry(material_index)
            .or_default()
            .extend(start..start + 3);
    }

    /// Applies `matrix` to every vertex emitted since `start`.
    pub(crate) fn transform_from(&mut self, start: usize, matrix: &Affine3A) {
        for vertex in &mut self.vertices[start..] {
            vertex.position = matrix.transform_point3(vertex.position);
        }
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.vertices.truncate(checkpoint);
        let limit = checkpoint as u32;
        for indices in self.submeshes.values_mut() {
            indices.retain(|&i| i < limit);
        }
        self.submeshes.retain(|_, indices| !indices.is_empty());
    }

    /// Bakes the accumulated triangles into a registered geometry and a node
    /// carrying the mesh.
    ///
    /// Positions are made relative to `anchor`. The geometry is registered
    /// under `identifier`; sub-meshes follow ascending material index and
    /// empty buckets are dropped, so the material list has no gaps.
    pub fn bake(
        &self,
        name: &str,
        identifier: &str,
        anchor: Vec3,
        registry: &mut dyn AssetRegistry,
    ) -> PrefabNode {
        let name = name.replace('/', ".");

        let mut geometry = Geometry::new();
        geometry.name.clone_from(&name);
        geometry.front_face = FrontFace::Cw;
        geometry.set_vertices(
            self.vertices.iter().map(|v| v.position - anchor).collect(),
            self.vertices.iter().map(|v| v.uv).collect(),
        );
        for (&material_index, indices) in &self.submeshes {
            geometry.push_submesh(material_index, indices);
        }
        geometry.compute_vertex_normals();
        geometry.compute_bounding_volume();

        let material_indices: Vec<usize> = geometry
            .submeshes()
            .iter()
            .map(|s| s.material_index)
            .collect();
        let materials = self.materials.handles_for(material_indices);

        log::debug!(
            "Baked '{name}': {} vertices, {} sub-meshes",
            geometry.vertex_count(),
            geometry.submeshes().len()
        );

        let geometry = registry.add_geometry(identifier, geometry);

        let mut node = PrefabNode::new(name.clone()).with_identifier(identifier);
        node.mesh = Some(Mesh::new(name, geometry, materials));
        node
    }
}
