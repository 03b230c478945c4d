//! CPU-side mesh data and built-in primitives
//!
//! Primitives are unit sized and centred on the origin. Flat primitives
//! (square, triangle) lie in the YZ plane facing +X.

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, texture coordinate, normal
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
    /// Object-space normal
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a vertex
    pub const fn new(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Unique vertices
    pub vertices: Vec<Vertex>,
    /// Three indices per triangle
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create mesh data from vertices and indices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes, ready for a vertex buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Append a quad given its four corners in counter-clockwise order
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(corner, uv, normal));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Unit cube, one quad per face so every face gets its own normal
    pub fn cube() -> Self {
        let mut mesh = Self::default();
        let h = 0.5;
        mesh.push_quad([[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]], [1.0, 0.0, 0.0]);
        mesh.push_quad([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], [-1.0, 0.0, 0.0]);
        mesh.push_quad([[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]], [0.0, 1.0, 0.0]);
        mesh.push_quad([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], [0.0, -1.0, 0.0]);
        mesh.push_quad([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], [0.0, 0.0, 1.0]);
        mesh.push_quad([[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], [0.0, 0.0, -1.0]);
        mesh
    }

    /// Unit square
    pub fn square() -> Self {
        let mut mesh = Self::default();
        let h = 0.5;
        mesh.push_quad([[0.0, -h, h], [0.0, -h, -h], [0.0, h, -h], [0.0, h, h]], [1.0, 0.0, 0.0]);
        mesh
    }

    /// Isoceles triangle pointing up +Y
    pub fn triangle() -> Self {
        let normal = [1.0, 0.0, 0.0];
        Self::new(
            vec![
                Vertex::new([0.0, -0.5, 0.5], [0.0, 0.0], normal),
                Vertex::new([0.0, -0.5, -0.5], [1.0, 0.0], normal),
                Vertex::new([0.0, 0.5, 0.0], [0.5, 1.0], normal),
            ],
            vec![0, 1, 2],
        )
    }

    /// Cylinder along Y with diameter and height 1
    pub fn cylinder(segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Self::default();
        let step = std::f32::consts::TAU / segments as f32;
        let ring = |i: u32| {
            let angle = step * i as f32;
            (angle.cos() * 0.5, angle.sin() * 0.5)
        };

        // side
        for i in 0..segments {
            let (x0, z0) = ring(i);
            let (x1, z1) = ring(i + 1);
            let u0 = i as f32 / segments as f32;
            let u1 = (i + 1) as f32 / segments as f32;
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&[
                Vertex::new([x0, -0.5, z0], [u0, 0.0], [x0 * 2.0, 0.0, z0 * 2.0]),
                Vertex::new([x1, -0.5, z1], [u1, 0.0], [x1 * 2.0, 0.0, z1 * 2.0]),
                Vertex::new([x1, 0.5, z1], [u1, 1.0], [x1 * 2.0, 0.0, z1 * 2.0]),
                Vertex::new([x0, 0.5, z0], [u0, 1.0], [x0 * 2.0, 0.0, z0 * 2.0]),
            ]);
            mesh.indices
                .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }

        // caps
        for (y, normal_y) in [(0.5_f32, 1.0_f32), (-0.5, -1.0)] {
            let centre = mesh.vertices.len() as u32;
            mesh.vertices
                .push(Vertex::new([0.0, y, 0.0], [0.5, 0.5], [0.0, normal_y, 0.0]));
            for i in 0..segments {
                let (x, z) = ring(i);
                mesh.vertices.push(Vertex::new(
                    [x, y, z],
                    [x + 0.5, z + 0.5],
                    [0.0, normal_y, 0.0],
                ));
            }
            for i in 0..segments {
                let a = centre + 1 + i;
                let b = centre + 1 + (i + 1) % segments;
                if normal_y > 0.0 {
                    mesh.indices.extend_from_slice(&[centre, b, a]);
                } else {
                    mesh.indices.extend_from_slice(&[centre, a, b]);
                }
            }
        }

        mesh
    }
}
