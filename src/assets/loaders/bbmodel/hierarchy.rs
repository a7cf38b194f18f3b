//! Hierarchy mode: one node per outliner group and per leaf element, plus
//! animation clips bound to the group nodes.
//!
//! Offsets are computed from declared origins in source space only: a
//! node's position is its own origin minus its parent's origin. Parent node
//! transforms are never read back for this arithmetic.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::assets::bundle::AssetRegistry;
use crate::assets::prefab::{Prefab, PrefabNode};
use crate::math::quat_from_euler_degrees;
use crate::scene::transform::Transform;
use crate::settings::ImportSettings;

use super::animation::convert_animations;
use super::builder::MeshBuilder;
use super::document::{Document, Element, ElementKind, Group, OutlinerNode};
use super::materials::MaterialSet;

pub struct HierarchyImporter<'a> {
    doc: &'a Document,
    settings: &'a ImportSettings,
    materials: &'a MaterialSet,
    prefab: Prefab,
    /// Group uuid -> node index, the bind targets for animations.
    groups: FxHashMap<String, usize>,
}

impl<'a> HierarchyImporter<'a> {
    pub fn new(doc: &'a Document, settings: &'a ImportSettings, materials: &'a MaterialSet) -> Self {
        Self {
            doc,
            settings,
            materials,
            prefab: Prefab::new(),
            groups: FxHashMap::default(),
        }
    }

    /// Builds the node tree and clips, registers the prefab under the
    /// document's root identifier and makes it the main asset.
    pub fn import(mut self, registry: &mut dyn AssetRegistry) -> String {
        let root_identifier = self.doc.root_identifier().to_string();

        let mut root = PrefabNode::new(self.doc.name.clone()).with_identifier(root_identifier.clone());
        root.transform.scale = Vec3::splat(self.settings.unit_scale);
        let root_index = self.prefab.add_node(root, None);

        let doc = self.doc;
        self.load_group_recursively(&doc.outliner, root_index, Vec3::ZERO, registry);

        let clips = convert_animations(self.doc, &self.prefab, &self.groups);
        for clip in &clips {
            registry.add_clip(&clip.name, clip.clone());
        }
        self.prefab.animations = clips;

        log::info!(
            "Imported '{}' with hierarchy: {} nodes, {} groups, {} clips",
            self.doc.name,
            self.prefab.nodes.len(),
            self.groups.len(),
            self.prefab.animations.len()
        );

        registry.add_prefab(&root_identifier, self.prefab);
        registry.set_main(&root_identifier);
        root_identifier
    }

    fn load_group_recursively(
        &mut self,
        entries: &'a [OutlinerNode],
        parent: usize,
        parent_origin: Vec3,
        registry: &mut dyn AssetRegistry,
    ) {
        let doc = self.doc;
        for entry in entries {
            match entry {
                OutlinerNode::Element(uuid) => {
                    let Some(element) = doc.element(uuid) else {
                        log::warn!("Outliner references unknown element {uuid}");
                        continue;
                    };
                    // Ends the whole sibling list, not just this element
                    if !element.visible && self.settings.filter_hidden {
                        return;
                    }
                    if self.settings.is_ignored(&element.name) {
                        log::debug!("Ignoring element '{}'", element.name);
                        continue;
                    }
                    match &element.kind {
                        ElementKind::Cube(_) | ElementKind::Mesh(_) => {
                            self.load_mesh(element, parent, parent_origin, registry);
                        }
                        ElementKind::Locator => self.load_locator(element, parent, parent_origin),
                        ElementKind::Unsupported(kind) => {
                            log::warn!("Unsupported element type {kind:?} ({})", element.name);
                        }
                    }
                }
                OutlinerNode::Group(group) => {
                    let index = self.add_group_node(group, parent, parent_origin);
                    self.load_group_recursively(&group.children, index, group.origin, registry);
                }
                OutlinerNode::Unsupported(kind) => {
                    log::warn!("Unhandled outliner entry: {kind}");
                }
            }
        }
    }

    fn add_group_node(&mut self, group: &Group, parent: usize, parent_origin: Vec3) -> usize {
        let transform = Transform::from_position_rotation(
            group.origin - parent_origin,
            quat_from_euler_degrees(group.rotation),
        );
        let node = PrefabNode::new(format!("{}-Group", group.name))
            .with_identifier(group.uuid.clone())
            .with_transform(transform);
        let index = self.prefab.add_node(node, Some(parent));
        if self.groups.insert(group.uuid.clone(), index).is_some() {
            log::warn!("Duplicate group uuid {}, animations bind to the last one", group.uuid);
        }
        index
    }

    fn load_mesh(&mut self, element: &Element, parent: usize, parent_origin: Vec3, registry: &mut dyn AssetRegistry) {
        let mut builder = MeshBuilder::new(self.materials);
        if let Err(err) = builder.add_element(element) {
            log::warn!("Skipping element '{}': {err}", element.name);
            return;
        }
        if builder.is_empty() {
            log::debug!("Element '{}' produced no triangles", element.name);
            return;
        }

        let mut node = builder.bake(&element.name, &element.uuid, element.origin, registry);
        node.transform.position = element.origin - parent_origin;
        // Mesh rotation is already in the vertices
        if matches!(element.kind, ElementKind::Cube(_)) {
            node.transform.rotation = quat_from_euler_degrees(element.rotation);
        }
        self.prefab.add_node(node, Some(parent));
    }

    fn load_locator(&mut self, element: &Element, parent: usize, parent_origin: Vec3) {
        let transform = Transform::from_position_rotation(
            element.origin - parent_origin,
            quat_from_euler_degrees(element.rotation),
        );
        let node = PrefabNode::new(format!("{}-Locator", element.name))
            .with_identifier(element.uuid.clone())
            .with_transform(transform);
        self.prefab.add_node(node, Some(parent));
    }
}
