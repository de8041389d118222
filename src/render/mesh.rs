use bytemuck::{Pod, Zeroable};
use gl::types::*;
use serde::{Deserialize, Serialize};
use std::mem;

/// Interleaved position + color, matching attribute locations 0 and 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

pub const POSITION_LOCATION: GLuint = 0;
pub const COLOR_LOCATION: GLuint = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    #[default]
    Cube,
    Triangle,
}

impl MeshKind {
    pub fn vertices(self) -> Vec<Vertex> {
        match self {
            MeshKind::Cube => cube_vertices(),
            MeshKind::Triangle => triangle_vertices(),
        }
    }
}

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];
const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];

/// Unit cube centered on the origin, two triangles per face.
///
/// Faces in order: back (red), front (green), left (blue), right (yellow),
/// bottom (cyan), top (magenta).
pub fn cube_vertices() -> Vec<Vertex> {
    let faces: [([[f32; 3]; 6], [f32; 3]); 6] = [
        (
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [-0.5, -0.5, -0.5],
            ],
            RED,
        ),
        (
            [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
            GREEN,
        ),
        (
            [
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ],
            BLUE,
        ),
        (
            [
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
            ],
            YELLOW,
        ),
        (
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, -0.5, -0.5],
            ],
            CYAN,
        ),
        (
            [
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ],
            MAGENTA,
        ),
    ];

    faces
        .iter()
        .flat_map(|(corners, color)| corners.iter().map(|&p| Vertex::new(p, *color)))
        .collect()
}

pub fn triangle_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new([-0.5, -0.5, 0.0], RED),
        Vertex::new([0.5, -0.5, 0.0], GREEN),
        Vertex::new([0.0, 0.5, 0.0], BLUE),
    ]
}

/// One triangle whose interior covers all of clip space.
pub fn fullscreen_triangle() -> Vec<Vertex> {
    let white = [1.0, 1.0, 1.0];
    vec![
        Vertex::new([-1.0, -1.0, 0.0], white),
        Vertex::new([3.0, -1.0, 0.0], white),
        Vertex::new([-1.0, 3.0, 0.0], white),
    ]
}

/// Vertex array + buffer holding uploaded vertices. Freed on drop, so it
/// must be dropped while its context is current.
#[derive(Debug)]
pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
}

impl Mesh {
    pub fn new(vertices: &[Vertex]) -> Self {
        let stride = mem::size_of::<Vertex>() as GLsizei;
        let color_offset = mem::size_of::<[f32; 3]>();
        let bytes: &[u8] = bytemuck::cast_slice(vertices);

        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::VertexAttribPointer(
                POSITION_LOCATION,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null(),
            );
            gl::EnableVertexAttribArray(POSITION_LOCATION);

            gl::VertexAttribPointer(
                COLOR_LOCATION,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                color_offset as *const _,
            );
            gl::EnableVertexAttribArray(COLOR_LOCATION);

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        Self {
            vao,
            vbo,
            vertex_count: vertices.len() as GLsizei,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }

    pub fn draw(&self) {
        if self.vertex_count == 0 {
            return;
        }
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count);
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
