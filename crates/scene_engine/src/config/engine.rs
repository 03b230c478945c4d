//! Engine-level configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Config;
use crate::foundation::math::Vec3;

/// Root engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default `env_logger` filter, overridden by `RUST_LOG`
    pub log_filter: String,

    /// Scene graph settings
    pub scene: SceneConfig,

    /// Asset lookup settings
    pub assets: AssetConfig,

    /// Initial camera settings
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            scene: SceneConfig::default(),
            assets: AssetConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

/// What `add_child` does when the name is already taken under the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNamePolicy {
    /// Return `SceneError::DuplicateName`
    Reject,
    /// Log a warning and leave the graph untouched
    Warn,
}

impl Default for DuplicateNamePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Reject
        } else {
            Self::Warn
        }
    }
}

/// Scene graph settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Half-size of the world cube; positions are clamped into `[-border, border]`
    pub border: f32,

    /// Smallest allowed scale component
    pub min_scale: f32,

    /// Duplicate child name handling
    pub duplicate_names: DuplicateNamePolicy,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            border: 250.0,
            min_scale: 1e-6,
            duplicate_names: DuplicateNamePolicy::default(),
        }
    }
}

/// Where assets are looked up on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset root directory
    pub root: PathBuf,
    /// Shader directory, relative to `root`
    pub shaders: PathBuf,
    /// Mesh directory, relative to `root`
    pub meshes: PathBuf,
    /// Texture directory, relative to `root`
    pub textures: PathBuf,
    /// Vertex shader suffix
    pub vertex_extension: String,
    /// Fragment shader suffix
    pub fragment_extension: String,
    /// Mesh suffix
    pub mesh_extension: String,
    /// Texture suffix
    pub texture_extension: String,
}

impl AssetConfig {
    /// Directory holding shaders
    pub fn shader_dir(&self) -> PathBuf {
        self.root.join(&self.shaders)
    }

    /// Directory holding meshes
    pub fn mesh_dir(&self) -> PathBuf {
        self.root.join(&self.meshes)
    }

    /// Directory holding textures
    pub fn texture_dir(&self) -> PathBuf {
        self.root.join(&self.textures)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            shaders: PathBuf::from("shaders"),
            meshes: PathBuf::from("meshes"),
            textures: PathBuf::from("textures"),
            vertex_extension: ".vert.glsl".to_string(),
            fragment_extension: ".frag.glsl".to_string(),
            mesh_extension: ".obj".to_string(),
            texture_extension: ".png".to_string(),
        }
    }
}

/// Camera placement, projection and first-person movement limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position
    pub position: Vec3,
    /// Yaw in radians, 0 looks down +X
    pub yaw: f32,
    /// Pitch in radians
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,

    /// Pitch limit in degrees, either way
    pub max_pitch_degrees: f32,
    /// Walking speed in units per second
    pub move_speed: f32,
    /// Degrees turned per unit of pointer motion
    pub look_speed_degrees: f32,
    /// Degrees of field of view per scroll step
    pub zoom_speed_degrees: f32,
    /// Narrowest field of view in degrees
    pub min_fov_degrees: f32,
    /// Widest field of view in degrees
    pub max_fov_degrees: f32,
    /// Eye height when standing; gravity stops here
    pub player_height: f32,
    /// Upward speed while a jump lasts
    pub jump_speed: f32,
    /// Seconds a jump pushes upward
    pub jump_time: f32,
    /// Downward speed applied every tick
    pub gravity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            // standing on the floor
            position: Vec3::new(0.0, 1.8, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: 45.0,
            aspect: 1280.0 / 720.0,
            near: 0.1,
            far: 50.0,
            max_pitch_degrees: 89.0,
            move_speed: 5.0,
            look_speed_degrees: 0.1,
            zoom_speed_degrees: 3.0,
            min_fov_degrees: 10.0,
            max_fov_degrees: 90.0,
            player_height: 1.8,
            jump_speed: 14.0,
            jump_time: 0.25,
            gravity: 9.81,
        }
    }
}
