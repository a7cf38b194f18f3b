//! Imports a `.bbmodel` file and prints what came out of it.
//!
//! Usage: `bbmodel_inspect <file.bbmodel> [--mode hierarchy|merged|separate] [--settings settings.json] [--filter-hidden]`

use anyhow::{Context, bail};

use myth_bbmodel::assets::{AssetBundle, Prefab};
use myth_bbmodel::resources::{BoundingBox, SubMesh};
use myth_bbmodel::{BbModelLoader, ImportSettings};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut settings = ImportSettings::default();
    let mut mode_override = None;
    let mut filter_hidden = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => mode_override = Some(args.next().context("--mode needs a value")?),
            "--settings" => {
                let file = args.next().context("--settings needs a path")?;
                let text = std::fs::read_to_string(&file).with_context(|| format!("Failed to read {file}"))?;
                settings = ImportSettings::from_json_str(&text)?;
            }
            "--filter-hidden" => filter_hidden = true,
            other if other.starts_with("--") => bail!("Unknown option {other}"),
            other => path = Some(other.to_string()),
        }
    }

    let Some(path) = path else {
        bail!("Usage: bbmodel_inspect <file.bbmodel> [--mode hierarchy|merged|separate] [--settings file] [--filter-hidden]");
    };
    if let Some(mode) = mode_override {
        settings.mode = mode.parse()?;
    }
    settings.filter_hidden |= filter_hidden;

    let bundle = BbModelLoader::new(settings)
        .load_bundle(&path)
        .with_context(|| format!("Failed to import {path}"))?;

    print_bundle(&bundle);
    Ok(())
}

fn print_bundle(bundle: &AssetBundle) {
    println!(
        "textures: {}  materials: {}  geometries: {}  clips: {}  prefabs: {}",
        bundle.textures.len(),
        bundle.materials.len(),
        bundle.geometries.len(),
        bundle.clips.len(),
        bundle.prefabs.len()
    );
    println!("main: {}", bundle.main_identifier_or("<none>"));

    for identifier in bundle.prefabs.identifiers() {
        let Some(prefab) = bundle.prefabs.get_by_identifier(&identifier) else {
            continue;
        };
        println!(
            "\nprefab {identifier} ({} nodes, {} with meshes)",
            prefab.nodes.len(),
            prefab.mesh_nodes().count()
        );
        if let Some(bb) = world_bounds(bundle, &prefab) {
            let size = bb.size();
            println!(
                "  bounds ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3}), size {:.2} x {:.2} x {:.2}",
                bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z, size.x, size.y, size.z
            );
        }
        for &root in &prefab.root_indices {
            print_node(bundle, &prefab, root, 1);
        }
        for clip in &prefab.animations {
            println!(
                "  clip '{}' {:.2}s {:?}, {} tracks",
                clip.name,
                clip.duration,
                clip.loop_mode,
                clip.tracks.len()
            );
        }
    }
}

fn print_node(bundle: &AssetBundle, prefab: &Prefab, index: usize, depth: usize) {
    let node = &prefab.nodes[index];
    let indent = "  ".repeat(depth);
    let p = node.transform.position;
    print!("{indent}{} @ ({:.3}, {:.3}, {:.3})", node.name, p.x, p.y, p.z);

    if let Some(mesh) = &node.mesh
        && let Some(geometry) = bundle.geometries.get(mesh.geometry)
    {
        let triangles: u32 = geometry.submeshes().iter().map(SubMesh::triangle_count).sum();
        print!(
            "  [{} vertices, {triangles} triangles, {} sub-meshes, {} bytes",
            geometry.vertex_count(),
            geometry.submeshes().len(),
            geometry.interleaved_bytes().len() + geometry.index_bytes().len()
        );
        if let Some(bb) = geometry.bounding_box {
            print!(", size {:.2} x {:.2} x {:.2}", bb.size().x, bb.size().y, bb.size().z);
        }
        print!("]");
    }
    let animated: usize = prefab
        .animations
        .iter()
        .map(|clip| clip.tracks_for_node(index).count())
        .sum();
    if animated > 0 {
        print!("  <{animated} tracks>");
    }
    println!();

    for &child in &node.children_indices {
        print_node(bundle, prefab, child, depth + 1);
    }
}

/// Union of every mesh node's bounding box in prefab space.
fn world_bounds(bundle: &AssetBundle, prefab: &Prefab) -> Option<BoundingBox> {
    prefab
        .mesh_nodes()
        .filter_map(|(index, node)| {
            let geometry = bundle.geometries.get(node.mesh.as_ref()?.geometry)?;
            let world = prefab.world_matrix(index)?;
            Some(geometry.bounding_box?.transform(&world))
        })
        .reduce(|a, b| a.union(&b))
}
