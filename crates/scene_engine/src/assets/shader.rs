//! GLSL shader sources

use std::path::Path;

use crate::assets::AssetError;

const BASIC_VERTEX: &str = r"#version 330 core
layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_tex_coord;
layout (location = 2) in vec3 a_normal;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

out vec2 tex_coord;
out vec3 normal;

void main() {
    tex_coord = a_tex_coord;
    normal = mat3(transpose(inverse(model))) * a_normal;
    gl_Position = projection * view * model * vec4(a_position, 1.0);
}
";

const BASIC_FRAGMENT: &str = r"#version 330 core
in vec2 tex_coord;
in vec3 normal;

uniform vec3 color;

out vec4 frag_color;

void main() {
    frag_color = vec4(color, 1.0);
}
";

/// Vertex + fragment source pair, compiled by the render backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage source
    pub vertex: String,
    /// Fragment stage source
    pub fragment: String,
}

impl ShaderSource {
    /// Create a shader source pair
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Read both stages from disk
    pub fn from_files<P: AsRef<Path>>(vertex: P, fragment: P) -> Result<Self, AssetError> {
        let vertex = vertex.as_ref();
        let fragment = fragment.as_ref();
        log::debug!("Loading shader stages {:?} + {:?}", vertex, fragment);

        let shader = Self::new(
            std::fs::read_to_string(vertex)?,
            std::fs::read_to_string(fragment)?,
        );
        shader.validate()?;
        Ok(shader)
    }

    /// Minimal colour-only shader
    pub fn basic() -> Self {
        Self::new(BASIC_VERTEX, BASIC_FRAGMENT)
    }

    /// Reject stages that cannot possibly compile
    pub fn validate(&self) -> Result<(), AssetError> {
        for (stage, text) in [("vertex", &self.vertex), ("fragment", &self.fragment)] {
            if !text.contains("void main") {
                return Err(AssetError::InvalidData(format!("{stage} stage has no main function")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shader_is_valid() {
        assert!(ShaderSource::basic().validate().is_ok());
    }

    #[test]
    fn test_missing_main_rejected() {
        let shader = ShaderSource::new(BASIC_VERTEX, "#version 330 core\n");
        assert!(matches!(shader.validate(), Err(AssetError::InvalidData(_))));
    }
}
