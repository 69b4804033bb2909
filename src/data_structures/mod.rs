//! Scene data structures: textures, meshes, transforms and materials.
//!
//! - `registry` is the fixed-size tag to texture slot table
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `mesh` holds vertex layout, basic shape geometry and GPU meshes
//! - `transform` builds model matrices from scale, rotation and position
//! - `material` contains object materials and their lookup

pub mod material;
pub mod mesh;
pub mod registry;
pub mod texture;
pub mod transform;
