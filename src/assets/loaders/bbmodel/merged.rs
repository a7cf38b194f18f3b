//! Merged mode: every element goes into one mesh on a single root node.

use glam::Vec3;

use crate::assets::bundle::AssetRegistry;
use crate::assets::prefab::{Prefab, PrefabNode};
use crate::settings::ImportSettings;

use super::builder::MeshBuilder;
use super::document::{Document, OutlinerNode};
use super::materials::MaterialSet;

/// Accumulates every visible, non-ignored element in outliner order and
/// registers the result under the document's root identifier as main.
pub fn import_merged(
    doc: &Document,
    settings: &ImportSettings,
    materials: &MaterialSet,
    registry: &mut dyn AssetRegistry,
) -> String {
    let root_identifier = doc.root_identifier().to_string();

    let mut builder = MeshBuilder::new(materials).with_cube_rotation_baked(true);
    collect(&doc.outliner, doc, settings, &mut builder);

    let mut root = if builder.is_empty() {
        log::warn!("'{}' has no geometry to merge", doc.name);
        PrefabNode::new(doc.name.clone()).with_identifier(root_identifier.clone())
    } else {
        builder.bake(&doc.name, &root_identifier, Vec3::ZERO, registry)
    };
    root.transform.scale = Vec3::splat(settings.unit_scale);

    log::info!(
        "Merged '{}' into one mesh: {} vertices",
        doc.name,
        builder.vertex_count()
    );

    let mut prefab = Prefab::new();
    prefab.add_node(root, None);
    registry.add_prefab(&root_identifier, prefab);
    registry.set_main(&root_identifier);
    root_identifier
}

fn collect(entries: &[OutlinerNode], doc: &Document, settings: &ImportSettings, builder: &mut MeshBuilder<'_>) {
    for entry in entries {
        match entry {
            OutlinerNode::Element(uuid) => {
                let Some(element) = doc.element(uuid) else {
                    log::warn!("Outliner references unknown element {uuid}");
                    continue;
                };
                if (!element.visible && settings.filter_hidden) || settings.is_ignored(&element.name) {
                    continue;
                }
                if let Err(err) = builder.add_element(element) {
                    log::warn!("Skipping element '{}': {err}", element.name);
                }
            }
            OutlinerNode::Group(group) => collect(&group.children, doc, settings, builder),
            OutlinerNode::Unsupported(kind) => log::warn!("Unhandled outliner entry: {kind}"),
        }
    }
}
