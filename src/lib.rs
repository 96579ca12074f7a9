//! Prism Engine: a software 3D rendering pipeline
//!
//! Takes meshes, a moving camera, and a directional light, and produces
//! a raster image every frame with no hardware graphics API:
//! frustum clipping with re-triangulation, perspective projection,
//! per-pixel depth buffering, and perspective-correct rasterization.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod raster;
pub mod scene;
