//! Merged and Separate Import Mode Tests
//!
//! Tests for:
//! - Separate: one prefab per leaf, keyed by uuid, first one main
//! - Separate: origin placement, unit scale, baked cube rotation
//! - Merged: one mesh in source space, sub-meshes across elements
//! - Merged: empty document still yields a main root
//! - Hidden filtering skips single elements in both modes

use glam::Vec3;
use serde_json::{Value, json};

use myth_bbmodel::assets::{AssetBundle, AssetRegistry};
use myth_bbmodel::{BbModelLoader, ImportMode, ImportSettings};

const EPSILON: f32 = 1e-4;
const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn cube(uuid: &str, from: [f32; 3], to: [f32; 3], texture: usize) -> Value {
    let f = json!({ "uv": [0, 0, 16, 16], "texture": texture });
    json!({
        "uuid": uuid,
        "name": uuid,
        "from": from,
        "to": to,
        "faces": { "north": f, "east": f, "south": f, "west": f, "up": f, "down": f }
    })
}

fn document(elements: Value, outliner: Value) -> Value {
    json!({
        "name": "crate",
        "resolution": { "width": 16, "height": 16 },
        "textures": [
            { "name": "wood", "uuid": "t0", "source": PNG },
            { "name": "metal", "uuid": "t1", "source": PNG }
        ],
        "elements": elements,
        "outliner": outliner
    })
}

fn import(doc: &Value, mode: ImportMode, configure: impl FnOnce(&mut ImportSettings)) -> AssetBundle {
    let mut settings = ImportSettings {
        mode,
        ..Default::default()
    };
    configure(&mut settings);
    let mut bundle = AssetBundle::new();
    BbModelLoader::new(settings)
        .load_str(&doc.to_string(), &mut bundle)
        .unwrap();
    bundle
}

fn two_cube_doc() -> Value {
    document(
        json!([
            cube("a", [0.0, 0.0, 0.0], [1.0, 1.0, 1.0], 1),
            cube("b", [4.0, 0.0, 0.0], [6.0, 2.0, 2.0], 0)
        ]),
        json!([{ "uuid": "g", "name": "lid", "origin": [9, 9, 9], "children": ["a", "b"] }]),
    )
}

// ============================================================================
// Separate
// ============================================================================

#[test]
fn separate_registers_one_prefab_per_leaf() {
    let bundle = import(&two_cube_doc(), ImportMode::SeparateObjects, |_| {});

    assert_eq!(bundle.prefabs.len(), 2);
    assert_eq!(bundle.prefabs.identifiers(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(bundle.main_identifier(), Some("a"));

    let prefab = bundle.prefabs.get_by_identifier("b").unwrap();
    assert_eq!(prefab.nodes.len(), 1);
    assert_eq!(prefab.root_indices, vec![0]);
    assert!(prefab.animations.is_empty());
}

#[test]
fn separate_places_object_at_scaled_origin() {
    let mut doc = two_cube_doc();
    doc["elements"][1]["origin"] = json!([4, 0, 0]);
    let bundle = import(&doc, ImportMode::SeparateObjects, |s| s.unit_scale = 0.5);

    let prefab = bundle.prefabs.get_by_identifier("b").unwrap();
    let node = &prefab.nodes[0];
    assert!(vec3_approx(node.transform.position, Vec3::new(2.0, 0.0, 0.0)));
    assert!(vec3_approx(node.transform.scale, Vec3::splat(0.5)));

    // Group origins play no part
    let geometry = bundle.geometries.get_by_identifier("b").unwrap();
    let bb = geometry.bounding_box.unwrap();
    assert!(vec3_approx(bb.min, Vec3::ZERO));
    assert!(vec3_approx(bb.max, Vec3::new(2.0, 2.0, 2.0)));
}

#[test]
fn separate_bakes_cube_rotation() {
    let mut bar = cube("bar", [0.0, 0.0, 0.0], [4.0, 1.0, 1.0], 0);
    bar["rotation"] = json!([0, 90, 0]);
    let doc = document(json!([bar]), json!(["bar"]));
    let bundle = import(&doc, ImportMode::SeparateObjects, |_| {});

    let prefab = bundle.prefabs.get_by_identifier("bar").unwrap();
    assert!(prefab.nodes[0].transform.rotation.abs_diff_eq(glam::Quat::IDENTITY, 1e-6));

    let bb = bundle.geometries.get_by_identifier("bar").unwrap().bounding_box.unwrap();
    assert!(vec3_approx(bb.min, Vec3::new(0.0, 0.0, -4.0)));
    assert!(vec3_approx(bb.max, Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn separate_hidden_element_skips_only_itself() {
    let mut doc = two_cube_doc();
    doc["elements"][0]["visibility"] = json!(false);
    let bundle = import(&doc, ImportMode::SeparateObjects, |s| s.filter_hidden = true);

    assert_eq!(bundle.prefabs.identifiers(), vec!["b".to_string()]);
    assert_eq!(bundle.main_identifier(), Some("b"));
}

#[test]
fn separate_skips_locators_and_ignored_names() {
    let mut doc = two_cube_doc();
    doc["elements"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "uuid": "loc", "name": "loc", "type": "locator" }));
    doc["outliner"][0]["children"]
        .as_array_mut()
        .unwrap()
        .push(json!("loc"));
    let bundle = import(&doc, ImportMode::SeparateObjects, |s| s.ignore_name = Some("a".into()));

    assert_eq!(bundle.prefabs.identifiers(), vec!["b".to_string()]);
}

// ============================================================================
// Merged
// ============================================================================

#[test]
fn merged_collects_everything_into_one_mesh() {
    let bundle = import(&two_cube_doc(), ImportMode::MergeAllIntoOneObject, |_| {});

    assert_eq!(bundle.prefabs.len(), 1);
    assert_eq!(bundle.main_identifier(), Some("crate"));
    let prefab = bundle.main_prefab().unwrap();
    assert_eq!(prefab.nodes.len(), 1);
    assert_eq!(prefab.nodes[0].name, "crate");

    let mesh = prefab.nodes[0].mesh.as_ref().unwrap();
    let geometry = bundle.geometries.get(mesh.geometry).unwrap();
    assert_eq!(geometry.vertex_count(), 72);

    // Source-space positions, no anchor
    let bb = geometry.bounding_box.unwrap();
    assert!(vec3_approx(bb.min, Vec3::ZERO));
    assert!(vec3_approx(bb.max, Vec3::new(6.0, 2.0, 2.0)));

    // Sub-meshes by ascending material index regardless of element order
    let order: Vec<usize> = geometry.submeshes().iter().map(|s| s.material_index).collect();
    assert_eq!(order, vec![0, 1]);
    let expected = vec![
        bundle.materials.get_handle("t0").unwrap(),
        bundle.materials.get_handle("t1").unwrap(),
    ];
    assert_eq!(mesh.materials, expected);
}

#[test]
fn merged_applies_unit_scale_to_root() {
    let bundle = import(&two_cube_doc(), ImportMode::MergeAllIntoOneObject, |s| s.unit_scale = 0.25);
    let prefab = bundle.main_prefab().unwrap();
    assert!(vec3_approx(prefab.nodes[0].transform.scale, Vec3::splat(0.25)));
    assert!(vec3_approx(prefab.nodes[0].transform.position, Vec3::ZERO));
}

#[test]
fn merged_hidden_element_skips_only_itself() {
    let mut doc = two_cube_doc();
    doc["elements"][0]["visibility"] = json!(false);
    let bundle = import(&doc, ImportMode::MergeAllIntoOneObject, |s| s.filter_hidden = true);

    let prefab = bundle.main_prefab().unwrap();
    let mesh = prefab.nodes[0].mesh.as_ref().unwrap();
    let geometry = bundle.geometries.get(mesh.geometry).unwrap();
    assert_eq!(geometry.vertex_count(), 36);
    assert_eq!(geometry.submeshes().len(), 1);
}

#[test]
fn merged_empty_document_still_has_a_main_root() {
    let doc = document(json!([]), json!([]));
    let bundle = import(&doc, ImportMode::MergeAllIntoOneObject, |_| {});

    let prefab = bundle.main_prefab().unwrap();
    assert_eq!(prefab.nodes.len(), 1);
    assert!(prefab.nodes[0].mesh.is_none());
    assert!(bundle.geometries.is_empty());
}
