//! Render pipeline and the uniform resources it binds.
//!
//! - `basic` is the scene pipeline plus the per-draw uniform buffer
//! - `light` holds the scene lights and their uniform

pub mod basic;
pub mod light;
