//! Scene graph data
//!
//! - Transform: local position, rotation, scale

pub mod transform;

pub use transform::Transform;
