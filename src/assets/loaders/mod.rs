pub mod bbmodel;

pub use bbmodel::BbModelLoader;
