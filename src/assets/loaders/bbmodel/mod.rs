//! Blockbench `.bbmodel` loader.
//!
//! # Pipeline
//!
//! 1. [`Document`] parses the JSON file; malformed elements are dropped here.
//! 2. [`MaterialSet`] decodes embedded textures and instantiates materials.
//! 3. The selected [`ImportMode`] walks the outliner:
//!    - hierarchy: [`HierarchyImporter`], one node per group and leaf, plus clips
//!    - merged: [`import_merged`], one mesh for everything
//!    - separate: [`import_separate`], one prefab per leaf
//!
//! Geometry for each renderable is accumulated by a [`MeshBuilder`] and
//! baked into the [`AssetRegistry`].

pub mod animation;
pub mod builder;
pub mod cube;
pub mod document;
pub mod hierarchy;
pub mod materials;
pub mod merged;
pub mod polymesh;
pub mod separate;

use std::path::Path;

pub use builder::{MeshBuilder, Vertex};
pub use document::{Document, Element, ElementKind, OutlinerNode};
pub use hierarchy::HierarchyImporter;
pub use materials::MaterialSet;
pub use merged::import_merged;
pub use separate::import_separate;

use crate::assets::bundle::{AssetBundle, AssetRegistry};
use crate::errors::Result;
use crate::settings::{ImportMode, ImportSettings};

/// Imports `.bbmodel` documents into an [`AssetRegistry`].
#[derive(Debug, Clone, Default)]
pub struct BbModelLoader {
    settings: ImportSettings,
}

impl BbModelLoader {
    #[must_use]
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Reads and imports the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>, registry: &mut dyn AssetRegistry) -> Result<()> {
        let path = path.as_ref();
        log::info!("Loading {}", path.display());
        let doc = Document::load(path)?;
        self.import(&doc, registry);
        Ok(())
    }

    pub fn load_str(&self, json: &str, registry: &mut dyn AssetRegistry) -> Result<()> {
        let doc = Document::from_json_str(json)?;
        self.import(&doc, registry);
        Ok(())
    }

    /// Imports `path` into a fresh [`AssetBundle`].
    pub fn load_bundle(&self, path: impl AsRef<Path>) -> Result<AssetBundle> {
        let mut bundle = AssetBundle::new();
        self.load(path, &mut bundle)?;
        Ok(bundle)
    }

    /// Runs the selected import mode on an already parsed document.
    pub fn import(&self, doc: &Document, registry: &mut dyn AssetRegistry) {
        let materials = MaterialSet::load(doc, &self.settings.material, registry);

        match self.settings.mode {
            ImportMode::WithHierarchyAndAnimations => {
                HierarchyImporter::new(doc, &self.settings, &materials).import(registry);
            }
            ImportMode::MergeAllIntoOneObject => {
                import_merged(doc, &self.settings, &materials, registry);
            }
            ImportMode::SeparateObjects => {
                import_separate(doc, &self.settings, &materials, registry);
            }
        }
    }
}
