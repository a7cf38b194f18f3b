pub mod bundle;
pub mod loaders;
pub mod prefab;
pub mod storage;

pub use bundle::{
    AssetBundle, AssetRegistry, ClipHandle, GeometryHandle, MaterialHandle, PrefabHandle,
    TextureHandle,
};
pub use loaders::BbModelLoader;
pub use prefab::{Prefab, PrefabNode};
pub use storage::AssetStorage;
