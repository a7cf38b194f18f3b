//! Document, Settings and Material Loading Tests
//!
//! Tests for:
//! - Document defaults and the root identifier
//! - Per-entry tolerance: malformed elements, animations, outliner entries
//! - Element kinds, locator position, mesh face parsing
//! - Texture decoding, per-texture UV resolution, material registration
//! - Settings sidecar parsing and import mode names
//! - Loader entry points (file, string, fatal errors)

use glam::{Vec2, Vec3};
use serde_json::json;

use myth_bbmodel::assets::loaders::bbmodel::{Document, ElementKind, MaterialSet, OutlinerNode};
use myth_bbmodel::assets::{AssetBundle, AssetRegistry};
use myth_bbmodel::settings::{MaterialTemplate, Shading};
use myth_bbmodel::{BbModelLoader, ImportError, ImportMode, ImportSettings};

const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

fn parse(value: &serde_json::Value) -> Document {
    Document::from_json_str(&value.to_string()).unwrap()
}

// ============================================================================
// Document
// ============================================================================

#[test]
fn empty_document_uses_defaults() {
    let doc = parse(&json!({}));
    assert_eq!(doc.name, "");
    assert_eq!(doc.resolution, Vec2::splat(16.0));
    assert!(doc.textures.is_empty());
    assert!(doc.elements.is_empty());
    assert!(doc.outliner.is_empty());
    assert!(doc.animations.is_empty());
}

#[test]
fn root_identifier_prefers_model_identifier() {
    let doc = parse(&json!({ "name": "robot", "model_identifier": "robot_v2" }));
    assert_eq!(doc.root_identifier(), "robot_v2");

    let doc = parse(&json!({ "name": "robot", "model_identifier": "" }));
    assert_eq!(doc.root_identifier(), "robot");
}

#[test]
fn resolution_is_read() {
    let doc = parse(&json!({ "resolution": { "width": 64, "height": 32 } }));
    assert_eq!(doc.resolution, Vec2::new(64.0, 32.0));
}

#[test]
fn malformed_entries_are_skipped() {
    let doc = parse(&json!({
        "elements": [
            { "name": "no uuid" },
            { "uuid": "bad-cube", "from": [0, 0] },
            { "uuid": "bad-mesh", "type": "mesh", "faces": { "f": { "vertices": 3 } } },
            { "uuid": "ok", "from": [0, 0, 0], "to": [1, 1, 1] }
        ],
        "animations": [
            { "name": 12 },
            { "name": "walk", "animators": {} }
        ]
    }));
    assert_eq!(doc.elements.len(), 1);
    assert!(doc.element("ok").is_some());
    assert!(doc.element("bad-cube").is_none());
    assert_eq!(doc.animations.len(), 1);
    assert_eq!(doc.animations[0].name, "walk");
}

#[test]
fn element_kinds_and_defaults() {
    let doc = parse(&json!({
        "elements": [
            { "uuid": "c", "from": [0, 0, 0], "to": [1, 1, 1] },
            { "uuid": "l", "type": "locator", "position": [1, 2, 3], "origin": [9, 9, 9] },
            { "uuid": "n", "type": "null_object" }
        ]
    }));

    let cube = doc.element("c").unwrap();
    assert!(matches!(cube.kind, ElementKind::Cube(_)));
    assert!(cube.visible);
    assert_eq!(cube.origin, Vec3::ZERO);
    assert!(cube.has_geometry());

    let locator = doc.element("l").unwrap();
    assert!(matches!(locator.kind, ElementKind::Locator));
    assert_eq!(locator.origin, Vec3::new(1.0, 2.0, 3.0));
    assert!(!locator.has_geometry());

    let other = doc.element("n").unwrap();
    assert!(matches!(&other.kind, ElementKind::Unsupported(kind) if kind == "null_object"));
}

#[test]
fn mesh_faces_keep_declaration_order() {
    let doc = parse(&json!({
        "elements": [{
            "uuid": "m", "type": "mesh",
            "vertices": { "a": [0, 0, 0], "b": [1, 0, 0], "c": [0, 1, 0] },
            "faces": {
                "zeta": { "vertices": ["a", "b", "c"], "uv": { "a": [0, 0] }, "texture": 2 },
                "alpha": { "vertices": ["c", "b", "a"] }
            }
        }]
    }));
    let ElementKind::Mesh(shape) = &doc.element("m").unwrap().kind else {
        panic!("mesh expected");
    };
    let names: Vec<&str> = shape.faces.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
    assert_eq!(shape.faces[0].1.texture, 2);
    assert_eq!(shape.faces[1].1.texture, 0);
    assert_eq!(shape.vertices["b"], Vec3::X);
}

#[test]
fn outliner_entries_are_classified() {
    let doc = parse(&json!({
        "outliner": [
            "elem",
            { "uuid": "g", "name": "body", "origin": [1, 2, 3], "children": ["x", 5] },
            true
        ]
    }));
    assert_eq!(doc.outliner.len(), 3);
    assert!(matches!(&doc.outliner[0], OutlinerNode::Element(uuid) if uuid == "elem"));
    let OutlinerNode::Group(group) = &doc.outliner[1] else {
        panic!("group expected");
    };
    assert_eq!(group.origin, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(group.children.len(), 2);
    assert!(matches!(group.children[1], OutlinerNode::Unsupported(_)));
    assert!(matches!(doc.outliner[2], OutlinerNode::Unsupported(_)));
}

#[test]
fn duplicate_element_uuid_keeps_the_first() {
    let doc = parse(&json!({
        "elements": [
            { "uuid": "dup", "name": "first", "from": [0, 0, 0], "to": [1, 1, 1] },
            { "uuid": "dup", "name": "second", "from": [0, 0, 0], "to": [2, 2, 2] }
        ]
    }));
    assert_eq!(doc.elements.len(), 2);
    assert_eq!(doc.element("dup").unwrap().name, "first");
}

#[test]
fn invalid_json_is_fatal() {
    let err = Document::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ImportError::JsonError(_)));
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn textures_become_materials_with_maps() {
    let doc = parse(&json!({
        "name": "crate",
        "resolution": { "width": 16, "height": 16 },
        "textures": [
            { "name": "wood", "uuid": "t-wood", "source": PNG, "uv_width": 32, "uv_height": 64 },
            { "name": "broken", "uuid": "", "source": "data:image/png;base64,AAAA" },
            { "name": "plain", "uuid": "t-plain", "source": PNG }
        ]
    }));
    let mut bundle = AssetBundle::new();
    let set = MaterialSet::load(&doc, &MaterialTemplate::default(), &mut bundle);

    assert_eq!(set.len(), 3);
    assert_eq!(bundle.textures.len(), 2);
    let wood = bundle.textures.get_by_identifier("t-wood_texture").unwrap();
    assert_eq!((wood.width, wood.height), (1, 1));
    assert_eq!(wood.data.len(), 4);

    // Failed decode keeps the slot with an untextured material
    let broken = bundle.materials.get_by_identifier("texture_1").unwrap();
    assert!(broken.map.is_none());
    assert!(bundle.materials.get_by_identifier("t-plain").unwrap().map.is_some());
    assert_eq!(set.handle(1), bundle.materials.get_handle("texture_1"));

    assert_eq!(set.resolution_for(0), Vec2::new(32.0, 64.0));
    assert_eq!(set.resolution_for(2), Vec2::splat(16.0));
    assert_eq!(set.resolution_for(7), Vec2::splat(16.0));

    // Two decoded textures give two UV slots
    assert!(set.has_uv_slot(1));
    assert!(!set.has_uv_slot(2));
}

#[test]
fn non_positive_resolutions_fall_back() {
    let doc = parse(&json!({
        "resolution": { "width": 0, "height": 0 },
        "textures": [
            { "name": "flat", "uuid": "t-flat", "source": PNG, "uv_width": 0, "uv_height": 32 },
            { "name": "tall", "uuid": "t-tall", "source": PNG, "uv_width": 8, "uv_height": 32 }
        ]
    }));
    let mut bundle = AssetBundle::new();
    let set = MaterialSet::load(&doc, &MaterialTemplate::default(), &mut bundle);

    // Zero global resolution falls back to 16, a zero texture axis to the global one
    assert_eq!(set.resolution_for(0), Vec2::splat(16.0));
    assert_eq!(set.resolution_for(1), Vec2::new(8.0, 32.0));

    let uv = set.normalize_uv(0, Vec2::new(8.0, 4.0));
    assert!(uv.is_finite());
    assert_eq!(uv, Vec2::new(0.5, 0.75));

    let parts = MaterialSet::from_parts(Vec::new(), vec![Vec2::new(-4.0, 16.0)], Vec2::ZERO);
    assert_eq!(parts.resolution_for(0), Vec2::splat(16.0));
}

#[test]
fn zero_resolution_document_imports_finite_uvs() {
    let doc = json!({
        "name": "flat",
        "resolution": { "width": 0, "height": 0 },
        "elements": [{ "uuid": "c", "name": "c", "from": [0, 0, 0], "to": [1, 1, 1],
            "faces": { "north": { "uv": [0, 0, 16, 16], "texture": 0 } } }],
        "outliner": ["c"]
    });
    let mut bundle = AssetBundle::new();
    BbModelLoader::default()
        .load_str(&doc.to_string(), &mut bundle)
        .unwrap();

    let geometry = bundle.geometries.get_by_identifier("c").unwrap();
    assert!(!geometry.uvs().is_empty());
    assert!(geometry.uvs().iter().all(|uv| uv.is_finite()));
}

#[test]
fn document_without_textures_gets_one_default_material() {
    let doc = parse(&json!({ "name": "blob" }));
    let mut bundle = AssetBundle::new();
    let template = MaterialTemplate {
        shading: Shading::Standard,
        metallic: 0.5,
        roughness: 0.25,
    };
    let set = MaterialSet::load(&doc, &template, &mut bundle);

    assert_eq!(set.len(), 1);
    assert!(set.has_uv_slot(0));
    let material = bundle.materials.get_by_identifier("blob_material").unwrap();
    assert_eq!(material.shading, Shading::Standard);
    assert!((material.roughness - 0.25).abs() < 1e-6);
    assert!(material.map.is_none());
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn settings_sidecar_fills_missing_fields() {
    let settings = ImportSettings::from_json_str(r#"{ "mode": "merged", "unit_scale": 0.0625 }"#).unwrap();
    assert_eq!(settings.mode, ImportMode::MergeAllIntoOneObject);
    assert!((settings.unit_scale - 0.0625).abs() < 1e-6);
    assert!(!settings.filter_hidden);
    assert_eq!(settings.ignore_name, None);
}

#[test]
fn unknown_mode_is_rejected() {
    assert!(matches!(
        "everything".parse::<ImportMode>(),
        Err(ImportError::UnknownImportMode(name)) if name == "everything"
    ));
    assert!(ImportSettings::from_json_str(r#"{ "mode": "everything" }"#).is_err());
    assert_eq!("SeparateObjects".parse::<ImportMode>().unwrap(), ImportMode::SeparateObjects);
}

#[test]
fn ignore_name_matches_substrings() {
    let settings = ImportSettings {
        ignore_name: Some("_hitbox".into()),
        ..Default::default()
    };
    assert!(settings.is_ignored("body_hitbox_2"));
    assert!(!settings.is_ignored("body"));

    let empty = ImportSettings {
        ignore_name: Some(String::new()),
        ..Default::default()
    };
    assert!(!empty.is_ignored("anything"));
}

// ============================================================================
// Loader
// ============================================================================

#[test]
fn load_bundle_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("bbmodel_loader_{}.bbmodel", std::process::id()));
    let doc = json!({
        "name": "disk",
        "elements": [{ "uuid": "c", "name": "c", "from": [0, 0, 0], "to": [1, 1, 1],
            "faces": { "up": { "uv": [0, 0, 1, 1], "texture": 0 } } }],
        "outliner": ["c"]
    });
    std::fs::write(&path, doc.to_string()).unwrap();

    let bundle = BbModelLoader::default().load_bundle(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(bundle.main_identifier(), Some("disk"));
    assert_eq!(bundle.geometries.len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = BbModelLoader::default()
        .load_bundle("/definitely/not/here.bbmodel")
        .err()
        .expect("missing file must fail");
    assert!(matches!(err, ImportError::IoError(_)));
}
