//! CPU-side resources produced by the importer.
//!
//! - [`Geometry`]: triangle list with per-material sub-meshes
//! - [`Mesh`]: geometry handle + material handles
//! - [`Material`], [`Texture`]

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod texture;

pub use geometry::{BoundingBox, BoundingSphere, FrontFace, Geometry, InterleavedVertex, SubMesh};
pub use material::Material;
pub use mesh::Mesh;
pub use texture::{FilterMode, Texture};
