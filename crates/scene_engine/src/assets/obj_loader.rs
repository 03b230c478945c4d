//! OBJ file loader for 3D models

use std::collections::HashMap;
use std::path::Path;

use crate::assets::mesh::{MeshData, Vertex};
use crate::assets::AssetError;

/// Corner of a face: position, texture coordinate and normal indices (0-based)
type CornerKey = (usize, Option<usize>, Option<usize>);

/// Load an OBJ file and return its mesh data
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&text)?;
    log::debug!(
        "Loaded {:?}: {} vertices, {} triangles",
        path,
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text
///
/// Identical `v/t/n` corners share one vertex. Polygons are fan-triangulated.
pub fn parse_obj(text: &str) -> Result<MeshData, AssetError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut mesh = MeshData::default();
    let mut index_map: HashMap<CornerKey, u32> = HashMap::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else { continue };
        let values: Vec<&str> = parts.collect();

        match tag {
            "v" => positions.push(parse_floats::<3>(&values, line_no)?),
            "vt" => tex_coords.push(parse_floats::<2>(&values, line_no)?),
            "vn" => normals.push(parse_floats::<3>(&values, line_no)?),
            "f" => {
                if values.len() < 3 {
                    return Err(invalid(line_no, "face needs at least 3 corners"));
                }

                let mut corners = Vec::with_capacity(values.len());
                for corner in &values {
                    let key = parse_corner(corner, line_no)?;
                    let index = match index_map.get(&key) {
                        Some(&index) => index,
                        None => {
                            let vertex = build_vertex(key, &positions, &tex_coords, &normals, line_no)?;
                            let index = mesh.vertices.len() as u32;
                            mesh.vertices.push(vertex);
                            index_map.insert(key, index);
                            index
                        }
                    };
                    corners.push(index);
                }

                for i in 1..corners.len() - 1 {
                    mesh.indices
                        .extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {
                // Ignore other commands
            }
        }
    }

    if mesh.vertices.is_empty() {
        return Err(AssetError::InvalidData("No faces found in OBJ data".to_string()));
    }

    Ok(mesh)
}

fn invalid(line_no: usize, message: &str) -> AssetError {
    AssetError::InvalidData(format!("line {}: {}", line_no + 1, message))
}

fn parse_floats<const N: usize>(values: &[&str], line_no: usize) -> Result<[f32; N], AssetError> {
    if values.len() < N {
        return Err(invalid(line_no, &format!("expected {N} values")));
    }
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value
            .parse()
            .map_err(|_| invalid(line_no, &format!("invalid number '{value}'")))?;
    }
    Ok(out)
}

fn parse_corner(corner: &str, line_no: usize) -> Result<CornerKey, AssetError> {
    let mut fields = corner.split('/');
    let index = |field: Option<&str>| -> Result<Option<usize>, AssetError> {
        match field {
            None | Some("") => Ok(None),
            Some(text) => match text.parse::<usize>() {
                Ok(0) | Err(_) => Err(invalid(line_no, &format!("invalid index '{text}'"))),
                Ok(i) => Ok(Some(i - 1)),
            },
        }
    };

    let position = index(fields.next())?.ok_or_else(|| invalid(line_no, "corner has no position index"))?;
    let tex_coord = index(fields.next())?;
    let normal = index(fields.next())?;
    Ok((position, tex_coord, normal))
}

fn build_vertex(
    (position, tex_coord, normal): CornerKey,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    line_no: usize,
) -> Result<Vertex, AssetError> {
    let position = *positions
        .get(position)
        .ok_or_else(|| invalid(line_no, "position index out of bounds"))?;
    let tex_coord = match tex_coord {
        Some(i) => *tex_coords
            .get(i)
            .ok_or_else(|| invalid(line_no, "texture coordinate index out of bounds"))?,
        None => [0.0, 0.0],
    };
    let normal = match normal {
        Some(i) => *normals
            .get(i)
            .ok_or_else(|| invalid(line_no, "normal index out of bounds"))?,
        None => [0.0, 1.0, 0.0],
    };
    Ok(Vertex::new(position, tex_coord, normal))
}
