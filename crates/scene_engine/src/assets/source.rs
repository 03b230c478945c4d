//! Where asset data comes from
//!
//! The resource manager asks an [`AssetSource`] for data the first time a
//! name is acquired. [`FileAssetSource`] reads the on-disk layout described by
//! [`AssetConfig`]; [`MemoryAssetSource`] serves data registered in code and is
//! what headless runs and tests use.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::image_loader::TextureData;
use crate::assets::mesh::MeshData;
use crate::assets::obj_loader;
use crate::assets::shader::ShaderSource;
use crate::assets::AssetError;
use crate::config::AssetConfig;

/// Provider of raw shader, mesh and texture data by name
pub trait AssetSource {
    /// Load a shader pair
    fn load_shader(&self, name: &str) -> Result<ShaderSource, AssetError>;

    /// Load a mesh
    fn load_mesh(&self, name: &str) -> Result<MeshData, AssetError>;

    /// Load a texture
    fn load_texture(&self, name: &str) -> Result<TextureData, AssetError>;
}

/// Reads `<root>/<kind dir>/<name><extension>`
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    config: AssetConfig,
}

impl FileAssetSource {
    /// Create a file source over the given layout
    pub fn new(config: AssetConfig) -> Self {
        Self { config }
    }

    fn path(dir: PathBuf, name: &str, extension: &str) -> Result<PathBuf, AssetError> {
        let path = dir.join(format!("{name}{extension}"));
        if path.exists() {
            Ok(path)
        } else {
            Err(AssetError::NotFound(path.display().to_string()))
        }
    }
}

impl AssetSource for FileAssetSource {
    fn load_shader(&self, name: &str) -> Result<ShaderSource, AssetError> {
        let dir = self.config.shader_dir();
        let vertex = Self::path(dir.clone(), name, &self.config.vertex_extension)?;
        let fragment = Self::path(dir, name, &self.config.fragment_extension)?;
        ShaderSource::from_files(vertex, fragment)
    }

    fn load_mesh(&self, name: &str) -> Result<MeshData, AssetError> {
        let path = Self::path(self.config.mesh_dir(), name, &self.config.mesh_extension)?;
        obj_loader::load_obj(path)
    }

    fn load_texture(&self, name: &str) -> Result<TextureData, AssetError> {
        let path = Self::path(self.config.texture_dir(), name, &self.config.texture_extension)?;
        TextureData::from_file(path)
    }
}

/// In-memory asset store
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    shaders: HashMap<String, ShaderSource>,
    meshes: HashMap<String, MeshData>,
    textures: HashMap<String, TextureData>,
}

impl MemoryAssetSource {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the built-in primitives
    ///
    /// Meshes `cube`, `square`, `triangle`, `cylinder`; shader `basic`;
    /// texture `white`.
    pub fn with_builtins() -> Self {
        let mut source = Self::new();
        source.insert_mesh("cube", MeshData::cube());
        source.insert_mesh("square", MeshData::square());
        source.insert_mesh("triangle", MeshData::triangle());
        source.insert_mesh("cylinder", MeshData::cylinder(24));
        source.insert_shader("basic", ShaderSource::basic());
        source.insert_texture("white", TextureData::solid_color(1, 1, [255; 4]));
        source
    }

    /// Register a shader under `name`
    pub fn insert_shader(&mut self, name: impl Into<String>, shader: ShaderSource) -> &mut Self {
        self.shaders.insert(name.into(), shader);
        self
    }

    /// Register a mesh under `name`
    pub fn insert_mesh(&mut self, name: impl Into<String>, mesh: MeshData) -> &mut Self {
        self.meshes.insert(name.into(), mesh);
        self
    }

    /// Register a texture under `name`
    pub fn insert_texture(&mut self, name: impl Into<String>, texture: TextureData) -> &mut Self {
        self.textures.insert(name.into(), texture);
        self
    }
}

fn lookup<T: Clone>(map: &HashMap<String, T>, kind: &str, name: &str) -> Result<T, AssetError> {
    map.get(name)
        .cloned()
        .ok_or_else(|| AssetError::NotFound(format!("{kind} '{name}'")))
}

impl AssetSource for MemoryAssetSource {
    fn load_shader(&self, name: &str) -> Result<ShaderSource, AssetError> {
        lookup(&self.shaders, "shader", name)
    }

    fn load_mesh(&self, name: &str) -> Result<MeshData, AssetError> {
        lookup(&self.meshes, "mesh", name)
    }

    fn load_texture(&self, name: &str) -> Result<TextureData, AssetError> {
        lookup(&self.textures, "texture", name)
    }
}
