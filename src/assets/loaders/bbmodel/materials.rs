use glam::Vec2;

use crate::assets::bundle::{AssetRegistry, MaterialHandle};
use crate::math::normalize_uv;
use crate::resources::material::Material;
use crate::resources::texture::Texture;
use crate::settings::MaterialTemplate;

use super::document::Document;

/// Used when a document declares no usable global resolution.
pub const DEFAULT_UV_RESOLUTION: Vec2 = Vec2::splat(16.0);

/// `candidate` when both axes are positive, otherwise `fallback`.
fn usable_resolution(candidate: Vec2, fallback: Vec2) -> Vec2 {
    if candidate.cmpgt(Vec2::ZERO).all() {
        candidate
    } else {
        log::debug!("Ignoring UV resolution {candidate}, using {fallback}");
        fallback
    }
}

/// Materials of one import, in the document's texture order.
///
/// Also owns the UV-space rules: which resolution a material index maps
/// against, and which indices get UVs at all.
#[derive(Debug, Clone)]
pub struct MaterialSet {
    handles: Vec<MaterialHandle>,
    /// Per-texture UV resolution, parallel to `handles` when textures exist.
    resolutions: Vec<Vec2>,
    global_resolution: Vec2,
    /// Number of material indices that receive normalised UVs.
    uv_slots: usize,
}

impl MaterialSet {
    /// Instantiates one material per texture (or a single default one) and
    /// registers textures and materials.
    ///
    /// A texture that fails to decode still yields an untextured material so
    /// material indices stay aligned with the document.
    pub fn load(doc: &Document, template: &MaterialTemplate, registry: &mut dyn AssetRegistry) -> Self {
        let global_resolution = usable_resolution(doc.resolution, DEFAULT_UV_RESOLUTION);

        if doc.textures.is_empty() {
            let name = format!("{}_material", doc.name);
            let handle = registry.add_material(&name, Material::from_template(&name, template));
            return Self {
                handles: vec![handle],
                resolutions: Vec::new(),
                global_resolution,
                uv_slots: 1,
            };
        }

        let mut handles = Vec::with_capacity(doc.textures.len());
        let mut resolutions = Vec::with_capacity(doc.textures.len());
        let mut decoded = 0_usize;

        for (index, desc) in doc.textures.iter().enumerate() {
            let identifier = if desc.uuid.is_empty() {
                format!("texture_{index}")
            } else {
                desc.uuid.clone()
            };
            let mut material = Material::from_template(&desc.name, template);
            let mut resolution = global_resolution;

            let texture = match desc.source.as_deref() {
                Some(source) => match Texture::from_data_uri(&desc.name, source) {
                    Ok(texture) => Some(texture),
                    Err(err) => {
                        log::warn!("Texture '{}' could not be decoded: {err}", desc.name);
                        None
                    }
                },
                None => {
                    log::warn!("Texture '{}' has no embedded source", desc.name);
                    None
                }
            };

            if let Some(texture) = texture {
                let map = registry.add_texture(&format!("{identifier}_texture"), texture);
                material = material.with_map(map);
                decoded += 1;
                if let Some(declared) = desc.uv_resolution() {
                    resolution = usable_resolution(declared, global_resolution);
                }
            }

            handles.push(registry.add_material(&identifier, material));
            resolutions.push(resolution);
        }

        Self {
            handles,
            resolutions,
            global_resolution,
            uv_slots: decoded.max(1),
        }
    }

    /// Builds a set directly, bypassing texture decoding.
    ///
    /// Non-positive resolutions fall back like they do in [`MaterialSet::load`].
    pub fn from_parts(handles: Vec<MaterialHandle>, resolutions: Vec<Vec2>, global_resolution: Vec2) -> Self {
        let global_resolution = usable_resolution(global_resolution, DEFAULT_UV_RESOLUTION);
        let resolutions: Vec<Vec2> = resolutions
            .into_iter()
            .map(|r| usable_resolution(r, global_resolution))
            .collect();
        let uv_slots = resolutions.len().max(1);
        Self {
            handles,
            resolutions,
            global_resolution,
            uv_slots,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// UV resolution for `material_index`, falling back to the global one.
    pub fn resolution_for(&self, material_index: usize) -> Vec2 {
        self.resolutions
            .get(material_index)
            .copied()
            .unwrap_or(self.global_resolution)
    }

    /// Whether faces using `material_index` get UVs at all.
    pub fn has_uv_slot(&self, material_index: usize) -> bool {
        material_index < self.uv_slots
    }

    /// Normalised, V-flipped UV; zero for indices without a texture slot.
    pub fn normalize_uv(&self, material_index: usize, raw: Vec2) -> Vec2 {
        if !self.has_uv_slot(material_index) {
            return Vec2::ZERO;
        }
        normalize_uv(raw, self.resolution_for(material_index))
    }

    pub fn handle(&self, material_index: usize) -> Option<MaterialHandle> {
        self.handles.get(material_index).copied()
    }

    /// Handles for a list of material indices; out-of-range indices fall
    /// back to the first material.
    pub fn handles_for(&self, material_indices: impl IntoIterator<Item = usize>) -> Vec<MaterialHandle> {
        material_indices
            .into_iter()
            .filter_map(|index| {
                self.handle(index).or_else(|| {
                    log::warn!("Material index {index} out of range, using the first material");
                    self.handles.first().copied()
                })
            })
            .collect()
    }
}
