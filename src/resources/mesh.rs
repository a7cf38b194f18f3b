use crate::assets::{GeometryHandle, MaterialHandle};

/// A renderable: one geometry plus one material per sub-mesh, in sub-mesh order.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,

    // === Asset references ===
    pub geometry: GeometryHandle,
    /// `materials[i]` draws `geometry.submeshes()[i]`.
    pub materials: Vec<MaterialHandle>,

    pub visible: bool,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: GeometryHandle, materials: Vec<MaterialHandle>) -> Self {
        Self {
            name: name.into(),
            geometry,
            materials,
            visible: true,
        }
    }
}
