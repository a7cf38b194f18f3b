#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Blockbench `.bbmodel` importer.
//!
//! Turns a `.bbmodel` document into triangle geometry split by material, a
//! node hierarchy mirroring the outliner, and keyframe clips bound to the
//! group nodes. Everything lands in an [`AssetRegistry`]; [`AssetBundle`] is
//! the in-memory one.
//!
//! ```rust,ignore
//! use myth_bbmodel::{BbModelLoader, ImportSettings};
//!
//! let bundle = BbModelLoader::new(ImportSettings::default()).load_bundle("robot.bbmodel")?;
//! let prefab = bundle.main_prefab().expect("main prefab");
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod math;
pub mod resources;
pub mod scene;
pub mod settings;

pub use animation::{AnimationAction, AnimationClip, LoopMode};
pub use assets::{AssetBundle, AssetRegistry, BbModelLoader, Prefab, PrefabNode};
pub use errors::{ImportError, Result};
pub use resources::{Geometry, Material, Mesh, Texture};
pub use scene::Transform;
pub use settings::{ImportMode, ImportSettings};
