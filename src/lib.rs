//! island-scene
//!
//! A small wgpu renderer drawing a textured, Phong-lit kitchen island. Scenes
//! are recorded immediate-mode style into a draw list and replayed by a single
//! pipeline every frame.
//!
//! High-level modules
//! - `camera`: fixed look-at camera, projection and their uniform
//! - `config`: TOML configuration for the window and asset directory
//! - `context`: central GPU and window context that owns device/queue/pipeline
//! - `data_structures`: texture registry, textures, meshes, materials, transforms
//! - `flow`: flow trait, event loop and offscreen capture
//! - `pipelines`: the scene pipeline and the lights it uses
//! - `render`: per-draw shader state and draw recording
//! - `resources`: helpers to load textures from disk
//! - `scene`: the kitchen island itself
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
