//! Loading of scene assets from disk.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub mod texture;

pub use texture::{bind_textures, decode_image, load_texture, texture_layout};

/// Path of `file_name` inside the assets directory `root`.
pub fn asset_path(root: &Path, file_name: &str) -> PathBuf {
    root.join(file_name)
}

pub fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(root, file_name);
    std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
}
