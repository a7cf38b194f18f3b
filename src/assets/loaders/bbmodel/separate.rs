//! Separate mode: every leaf element becomes its own single-node prefab.
//!
//! Groups are only walked for their children. No offsets are composed; each
//! object sits at its element's declared origin.

use glam::Vec3;

use crate::assets::bundle::AssetRegistry;
use crate::assets::prefab::Prefab;
use crate::settings::ImportSettings;

use super::builder::MeshBuilder;
use super::document::{Document, Element, OutlinerNode};
use super::materials::MaterialSet;

/// Imports every visible leaf as an independent prefab, registered under
/// the element's uuid. Returns the identifiers produced, in outliner order.
pub fn import_separate(
    doc: &Document,
    settings: &ImportSettings,
    materials: &MaterialSet,
    registry: &mut dyn AssetRegistry,
) -> Vec<String> {
    let mut produced = Vec::new();
    load_recursively(&doc.outliner, doc, settings, materials, registry, &mut produced);
    log::info!("Imported '{}' as {} separate objects", doc.name, produced.len());
    produced
}

fn load_recursively(
    entries: &[OutlinerNode],
    doc: &Document,
    settings: &ImportSettings,
    materials: &MaterialSet,
    registry: &mut dyn AssetRegistry,
    produced: &mut Vec<String>,
) {
    for entry in entries {
        match entry {
            OutlinerNode::Element(uuid) => {
                let Some(element) = doc.element(uuid) else {
                    log::warn!("Outliner references unknown element {uuid}");
                    continue;
                };
                if !element.visible && settings.filter_hidden {
                    continue;
                }
                if settings.is_ignored(&element.name) {
                    log::debug!("Ignoring element '{}'", element.name);
                    continue;
                }
                if load_object(element, settings, materials, registry) {
                    produced.push(element.uuid.clone());
                }
            }
            OutlinerNode::Group(group) => {
                load_recursively(&group.children, doc, settings, materials, registry, produced);
            }
            OutlinerNode::Unsupported(kind) => {
                log::warn!("Unhandled outliner entry: {kind}");
            }
        }
    }
}

fn load_object(
    element: &Element,
    settings: &ImportSettings,
    materials: &MaterialSet,
    registry: &mut dyn AssetRegistry,
) -> bool {
    let mut builder = MeshBuilder::new(materials).with_cube_rotation_baked(true);
    if let Err(err) = builder.add_element(element) {
        log::warn!("Skipping element '{}': {err}", element.name);
        return false;
    }
    if builder.is_empty() {
        log::debug!("Element '{}' produced no triangles", element.name);
        return false;
    }

    let mut node = builder.bake(&element.name, &element.uuid, element.origin, registry);
    node.transform.position = element.origin * settings.unit_scale;
    node.transform.scale = Vec3::splat(settings.unit_scale);

    let mut prefab = Prefab::new();
    prefab.add_node(node, None);
    registry.add_prefab(&element.uuid, prefab);

    if registry.main_identifier().is_none() {
        registry.set_main(&element.uuid);
    }
    true
}
