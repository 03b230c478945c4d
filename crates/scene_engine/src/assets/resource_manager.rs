//! Resource Manager - name-keyed, reference-counted asset registries
//!
//! Every scene node that uses the same named shader, mesh or texture shares
//! one loaded copy. `acquire_*` loads on first use and bumps the count after
//! that; `release_*` decrements and destroys the entry when the count reaches
//! zero. Handles are arena keys, so a handle to a destroyed entry is simply
//! stale and every lookup with it returns `None`.

use std::collections::HashMap;

use slotmap::{Key, SlotMap};

use crate::assets::image_loader::TextureData;
use crate::assets::mesh::MeshData;
use crate::assets::shader::ShaderSource;
use crate::assets::source::AssetSource;
use crate::assets::AssetError;

slotmap::new_key_type! {
    /// Handle to a loaded shader
    pub struct ShaderId;

    /// Handle to a loaded mesh
    pub struct MeshId;

    /// Handle to a loaded texture
    pub struct TextureId;
}

#[derive(Debug)]
struct Entry<T> {
    name: String,
    data: T,
    refs: usize,
}

/// Arena of one resource kind with a name index
#[derive(Debug)]
pub struct Registry<K: Key, T> {
    kind: &'static str,
    entries: SlotMap<K, Entry<T>>,
    by_name: HashMap<String, K>,
}

impl<K: Key, T> Registry<K, T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    fn acquire_with<F>(&mut self, name: &str, load: F) -> Result<K, AssetError>
    where
        F: FnOnce() -> Result<T, AssetError>,
    {
        if let Some(&id) = self.by_name.get(name) {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.refs += 1;
                log::debug!("Reusing {} '{}' (refs: {})", self.kind, name, entry.refs);
                return Ok(id);
            }
        }

        let data = load()?;
        let id = self.entries.insert(Entry {
            name: name.to_string(),
            data,
            refs: 1,
        });
        self.by_name.insert(name.to_string(), id);
        log::info!("Loaded {} '{}'", self.kind, name);
        Ok(id)
    }

    /// Returns true when this release destroyed the entry
    fn release(&mut self, id: K) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            log::warn!("Release of unknown {} handle {:?}", self.kind, id);
            return false;
        };

        entry.refs -= 1;
        if entry.refs > 0 {
            return false;
        }

        if let Some(entry) = self.entries.remove(id) {
            self.by_name.remove(&entry.name);
            log::debug!("Destroyed {} '{}'", self.kind, entry.name);
        }
        true
    }

    /// Loaded data behind a handle
    pub fn get(&self, id: K) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.data)
    }

    /// Name the handle was acquired with
    pub fn name(&self, id: K) -> Option<&str> {
        self.entries.get(id).map(|entry| entry.name.as_str())
    }

    /// Handle currently registered under `name`
    pub fn find(&self, name: &str) -> Option<K> {
        self.by_name.get(name).copied()
    }

    /// Current reference count, 0 for stale handles
    pub fn ref_count(&self, id: K) -> usize {
        self.entries.get(id).map_or(0, |entry| entry.refs)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared shader, mesh and texture cache
pub struct ResourceManager {
    source: Box<dyn AssetSource>,
    shaders: Registry<ShaderId, ShaderSource>,
    meshes: Registry<MeshId, MeshData>,
    textures: Registry<TextureId, TextureData>,
}

impl ResourceManager {
    /// Create a manager that loads through `source`
    pub fn new(source: Box<dyn AssetSource>) -> Self {
        Self {
            source,
            shaders: Registry::new("shader"),
            meshes: Registry::new("mesh"),
            textures: Registry::new("texture"),
        }
    }

    /// Acquire a shader by name
    pub fn acquire_shader(&mut self, name: &str) -> Result<ShaderId, AssetError> {
        let source = &self.source;
        self.shaders.acquire_with(name, || source.load_shader(name))
    }

    /// Acquire a mesh by name
    pub fn acquire_mesh(&mut self, name: &str) -> Result<MeshId, AssetError> {
        let source = &self.source;
        self.meshes.acquire_with(name, || source.load_mesh(name))
    }

    /// Acquire a texture by name
    pub fn acquire_texture(&mut self, name: &str) -> Result<TextureId, AssetError> {
        let source = &self.source;
        self.textures.acquire_with(name, || source.load_texture(name))
    }

    /// Release one reference to a shader
    pub fn release_shader(&mut self, id: ShaderId) -> bool {
        self.shaders.release(id)
    }

    /// Release one reference to a mesh
    pub fn release_mesh(&mut self, id: MeshId) -> bool {
        self.meshes.release(id)
    }

    /// Release one reference to a texture
    pub fn release_texture(&mut self, id: TextureId) -> bool {
        self.textures.release(id)
    }

    /// Shader data
    pub fn get_shader(&self, id: ShaderId) -> Option<&ShaderSource> {
        self.shaders.get(id)
    }

    /// Mesh data
    pub fn get_mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id)
    }

    /// Texture data
    pub fn get_texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(id)
    }

    /// Shader registry
    pub fn shaders(&self) -> &Registry<ShaderId, ShaderSource> {
        &self.shaders
    }

    /// Mesh registry
    pub fn meshes(&self) -> &Registry<MeshId, MeshData> {
        &self.meshes
    }

    /// Texture registry
    pub fn textures(&self) -> &Registry<TextureId, TextureData> {
        &self.textures
    }

    /// Total number of live resources across all kinds
    pub fn loaded_count(&self) -> usize {
        self.shaders.len() + self.meshes.len() + self.textures.len()
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("shaders", &self.shaders.len())
            .field("meshes", &self.meshes.len())
            .field("textures", &self.textures.len())
            .finish_non_exhaustive()
    }
}
