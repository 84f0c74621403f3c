//! Vertex layouts, the tutorial geometry, and uploading it to the GPU.

use bytemuck::{Pod, Zeroable};
use glow::HasContext;

use crate::error::ResourceError;

/// One `vertex_attrib_pointer` entry: a float vector at `location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// Shader `layout (location = N)`.
    pub location: u32,
    /// Number of `f32` components.
    pub components: i32,
    /// Byte offset inside the vertex.
    pub offset: i32,
}

/// A `#[repr(C)]` vertex type with a fixed attribute layout.
pub trait VertexLayout: Pod {
    /// Attributes in location order.
    const ATTRIBUTES: &'static [Attribute];

    /// Size of one vertex in bytes.
    #[must_use]
    // Vertices are a handful of floats.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn stride() -> i32 {
        std::mem::size_of::<Self>() as i32
    }
}

const F32: i32 = 4;

/// Position only (`location = 0`).
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PositionVertex {
    /// Clip-space position.
    pub position: [f32; 3],
}

impl VertexLayout for PositionVertex {
    const ATTRIBUTES: &'static [Attribute] = &[Attribute {
        location: 0,
        components: 3,
        offset: 0,
    }];
}

/// Position and per-vertex color (`location = 0, 1`).
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ColorVertex {
    /// Clip-space position.
    pub position: [f32; 3],
    /// RGB color.
    pub color: [f32; 3],
}

impl VertexLayout for ColorVertex {
    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute {
            location: 0,
            components: 3,
            offset: 0,
        },
        Attribute {
            location: 1,
            components: 3,
            offset: 3 * F32,
        },
    ];
}

/// Position, color and texture coordinate (`location = 0, 1, 2`).
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TexturedVertex {
    /// Clip-space position.
    pub position: [f32; 3],
    /// RGB color.
    pub color: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl VertexLayout for TexturedVertex {
    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute {
            location: 0,
            components: 3,
            offset: 0,
        },
        Attribute {
            location: 1,
            components: 3,
            offset: 3 * F32,
        },
        Attribute {
            location: 2,
            components: 2,
            offset: 6 * F32,
        },
    ];
}

/// The first triangle.
pub const TRIANGLE: [PositionVertex; 3] = [
    PositionVertex {
        position: [-0.5, -0.5, 0.0],
    },
    PositionVertex {
        position: [0.5, -0.5, 0.0],
    },
    PositionVertex {
        position: [0.0, 0.5, 0.0],
    },
];

/// Two triangles sharing the quad's diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Quad corners: top right, bottom right, bottom left, top left.
pub const QUAD: [PositionVertex; 4] = [
    PositionVertex {
        position: [0.5, 0.5, 0.0],
    },
    PositionVertex {
        position: [0.5, -0.5, 0.0],
    },
    PositionVertex {
        position: [-0.5, -0.5, 0.0],
    },
    PositionVertex {
        position: [-0.5, 0.5, 0.0],
    },
];

/// [`QUAD`] with a color per corner.
pub const COLOR_QUAD: [ColorVertex; 4] = [
    ColorVertex {
        position: [0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    ColorVertex {
        position: [0.5, -0.5, 0.0],
        color: [0.5, 1.0, 0.0],
    },
    ColorVertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 0.5, 1.0],
    },
    ColorVertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.5],
    },
];

/// [`COLOR_QUAD`] with texture coordinates covering the whole image.
pub const TEXTURED_QUAD: [TexturedVertex; 4] = [
    TexturedVertex {
        position: [0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
        uv: [1.0, 1.0],
    },
    TexturedVertex {
        position: [0.5, -0.5, 0.0],
        color: [0.5, 1.0, 0.0],
        uv: [1.0, 0.0],
    },
    TexturedVertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 0.5, 1.0],
        uv: [0.0, 0.0],
    },
    TexturedVertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.5],
        uv: [0.0, 1.0],
    },
];

/// Static geometry living in a VAO, with an optional index buffer.
pub struct Mesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    count: i32,
}

impl Mesh {
    /// Upload `vertices` (and `indices`, if given) and record the layout.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context. The mesh must be released
    /// with [`destroy`](Self::destroy) on the same context.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffer or vertex array cannot be created, or if
    /// there are more than `i32::MAX` elements to draw.
    pub unsafe fn upload<V: VertexLayout>(
        gl: &glow::Context,
        vertices: &[V],
        indices: Option<&[u32]>,
    ) -> Result<Self, ResourceError> {
        let count = i32::try_from(indices.map_or(vertices.len(), <[u32]>::len)).map_err(|_| {
            ResourceError {
                kind: "mesh",
                message: "element count exceeds i32::MAX".to_owned(),
            }
        })?;

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(ResourceError::of("vertex array"))?;
            let vbo = gl.create_buffer().map_err(ResourceError::of("buffer"))?;

            // Bind the VAO first so it captures the buffer bindings below.
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            let ebo = match indices {
                Some(indices) => {
                    let ebo = gl.create_buffer().map_err(ResourceError::of("buffer"))?;
                    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    gl.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        bytemuck::cast_slice(indices),
                        glow::STATIC_DRAW,
                    );
                    Some(ebo)
                }
                None => None,
            };

            for attr in V::ATTRIBUTES {
                gl.vertex_attrib_pointer_f32(
                    attr.location,
                    attr.components,
                    glow::FLOAT,
                    false,
                    V::stride(),
                    attr.offset,
                );
                gl.enable_vertex_attrib_array(attr.location);
            }

            // The element buffer binding is VAO state, so only the array
            // buffer is unbound before the VAO.
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);

            Ok(Self {
                vao,
                vbo,
                ebo,
                count,
            })
        }
    }

    /// Draw the whole mesh as triangles with the currently bound program.
    ///
    /// # Safety
    ///
    /// Requires the context the mesh was uploaded with to be current.
    pub unsafe fn draw(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            if self.ebo.is_some() {
                gl.draw_elements(glow::TRIANGLES, self.count, glow::UNSIGNED_INT, 0);
            } else {
                gl.draw_arrays(glow::TRIANGLES, 0, self.count);
            }
            gl.bind_vertex_array(None);
        }
    }

    /// Release the GL objects.
    ///
    /// # Safety
    ///
    /// Must be called once, with the context the mesh was uploaded with.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                gl.delete_buffer(ebo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_packed<V: VertexLayout>() {
        let floats: i32 = V::ATTRIBUTES.iter().map(|a| a.components).sum();
        assert_eq!(V::stride(), floats * F32);

        let mut expected_offset = 0;
        for (i, attr) in V::ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.location as usize, i);
            assert_eq!(attr.offset, expected_offset);
            expected_offset += attr.components * F32;
        }
    }

    #[test]
    fn layouts_are_tightly_packed() {
        assert_packed::<PositionVertex>();
        assert_packed::<ColorVertex>();
        assert_packed::<TexturedVertex>();
    }

    #[test]
    fn strides_match_tutorial() {
        assert_eq!(PositionVertex::stride(), 12);
        assert_eq!(ColorVertex::stride(), 24);
        assert_eq!(TexturedVertex::stride(), 32);
    }

    #[test]
    fn quad_indices_reference_all_corners() {
        let mut seen = [false; 4];
        for &i in &QUAD_INDICES {
            seen[i as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn quads_share_positions() {
        for i in 0..4 {
            assert_eq!(QUAD[i].position, COLOR_QUAD[i].position);
            assert_eq!(QUAD[i].position, TEXTURED_QUAD[i].position);
            assert_eq!(COLOR_QUAD[i].color, TEXTURED_QUAD[i].color);
        }
    }

    #[test]
    fn vertex_bytes_are_contiguous() {
        let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE);
        assert_eq!(bytes.len(), 3 * 12);
    }
}
