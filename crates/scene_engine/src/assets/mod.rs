//! Asset management system

pub mod image_loader;
pub mod mesh;
pub mod obj_loader;
pub mod resource_manager;
pub mod shader;
pub mod source;

pub use image_loader::TextureData;
pub use mesh::{MeshData, Vertex};
pub use resource_manager::{MeshId, Registry, ResourceManager, ShaderId, TextureId};
pub use shader::ShaderSource;
pub use source::{AssetSource, FileAssetSource, MemoryAssetSource};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Image decoding failed
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
