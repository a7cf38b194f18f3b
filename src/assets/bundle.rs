use slotmap::new_key_type;
use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::assets::prefab::Prefab;
use crate::assets::storage::AssetStorage;
use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::resources::texture::Texture;

// Strongly-typed handles
new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
    pub struct TextureHandle;
    pub struct ClipHandle;
    pub struct PrefabHandle;
}

/// Sink for everything an import produces.
///
/// Every object is persisted under a stable identifier; exactly one prefab
/// is designated the main output.
pub trait AssetRegistry {
    fn add_texture(&mut self, identifier: &str, texture: Texture) -> TextureHandle;
    fn add_material(&mut self, identifier: &str, material: Material) -> MaterialHandle;
    fn add_geometry(&mut self, identifier: &str, geometry: Geometry) -> GeometryHandle;
    fn add_clip(&mut self, identifier: &str, clip: AnimationClip) -> ClipHandle;
    fn add_prefab(&mut self, identifier: &str, prefab: Prefab) -> PrefabHandle;

    /// Marks the prefab registered under `identifier` as the primary output.
    fn set_main(&mut self, identifier: &str);
    fn main_identifier(&self) -> Option<&str>;
}

/// In-memory [`AssetRegistry`], one storage per asset kind.
#[derive(Clone, Default)]
pub struct AssetBundle {
    pub geometries: Arc<AssetStorage<GeometryHandle, Geometry>>,
    pub materials: Arc<AssetStorage<MaterialHandle, Material>>,
    pub textures: Arc<AssetStorage<TextureHandle, Texture>>,
    pub clips: Arc<AssetStorage<ClipHandle, AnimationClip>>,
    pub prefabs: Arc<AssetStorage<PrefabHandle, Prefab>>,

    main: Option<String>,
}

impl AssetBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the main prefab, or `fallback` when none is set.
    pub fn main_identifier_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.main.as_deref().unwrap_or(fallback)
    }

    /// The designated main prefab, if one was set and registered.
    pub fn main_prefab(&self) -> Option<Arc<Prefab>> {
        self.prefabs.get_by_identifier(self.main.as_deref()?)
    }
}

impl AssetRegistry for AssetBundle {
    fn add_texture(&mut self, identifier: &str, texture: Texture) -> TextureHandle {
        self.textures.add(identifier, texture)
    }

    fn add_material(&mut self, identifier: &str, material: Material) -> MaterialHandle {
        self.materials.add(identifier, material)
    }

    fn add_geometry(&mut self, identifier: &str, geometry: Geometry) -> GeometryHandle {
        self.geometries.add(identifier, geometry)
    }

    fn add_clip(&mut self, identifier: &str, clip: AnimationClip) -> ClipHandle {
        self.clips.add(identifier, clip)
    }

    fn add_prefab(&mut self, identifier: &str, prefab: Prefab) -> PrefabHandle {
        self.prefabs.add(identifier, prefab)
    }

    fn set_main(&mut self, identifier: &str) {
        if let Some(previous) = self.main.as_deref()
            && previous != identifier
        {
            log::debug!("Main asset changes from '{previous}' to '{identifier}'");
        }
        self.main = Some(identifier.to_string());
    }

    fn main_identifier(&self) -> Option<&str> {
        self.main.as_deref()
    }
}
