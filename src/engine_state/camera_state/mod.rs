//! # Camera State
//!
//! Supplies the projection and view matrices that `Terrain::draw` culls against.

pub mod camera;

pub use camera::{Camera, Projection, OPENGL_TO_WGPU_MATRIX};
