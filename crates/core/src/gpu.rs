//! The GPU command surface the renderer drives.
//!
//! `Gpu` is the small OpenGL ES subset the renderer needs: buffer objects,
//! vertex attribute arrays, indexed draws, depth-test state and 2D textures.
//! The `glow` implementation lives in [`crate::render`] behind the `render`
//! feature; tests use a recording implementation.
//!
//! Like `glow::HasContext`, every method takes `&self`. The context is a
//! single-threaded machine register set, and callers are expected to issue
//! all commands from the thread that owns it.

use std::fmt;

use crate::texture::TextureConfig;

/// Binding point for a buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data (`GL_ARRAY_BUFFER`).
    Array,
    /// Index data (`GL_ELEMENT_ARRAY_BUFFER`).
    Element,
}

/// Generic vertex attribute slots the techniques read from.
///
/// Locations are fixed so every technique can bind its inputs the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Normal,
    Color,
    TexCoord,
}

impl Attribute {
    /// The generic vertex attribute index.
    pub fn location(self) -> u32 {
        match self {
            Attribute::Position => 0,
            Attribute::Normal => 1,
            Attribute::Color => 2,
            Attribute::TexCoord => 3,
        }
    }

    /// Number of `f32` components per vertex.
    pub fn components(self) -> i32 {
        match self {
            Attribute::TexCoord => 2,
            _ => 3,
        }
    }
}

/// Primitive topology for an indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    Lines,
}

/// GPU command interface used by the renderer.
///
/// Handles are plain `Copy` values. Creation can fail and reports the
/// backend's message; every other call is fire-and-forget, matching GL.
pub trait Gpu {
    /// Buffer object handle.
    type Buffer: Copy + PartialEq + fmt::Debug;
    /// Texture object handle.
    type Texture: Copy + PartialEq + fmt::Debug;

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);

    /// Replaces the whole contents of the buffer bound to `target` using
    /// the static usage hint.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);

    /// Enables `attribute` and points it at the bound array buffer as
    /// tightly packed `f32` components.
    fn enable_attribute(&self, attribute: Attribute);
    fn disable_attribute(&self, attribute: Attribute);

    /// Draws `count` 16-bit indices from the bound element buffer.
    fn draw_elements(&self, primitive: Primitive, count: i32);
    fn line_width(&self, width: f32);

    fn is_depth_test_enabled(&self) -> bool;
    fn set_depth_test(&self, enabled: bool);

    /// Selects texture unit `unit` (0-based) for subsequent texture binds.
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, texture: Option<Self::Texture>);

    /// Whether single- and two-channel 8-bit textures can be sampled.
    fn supports_rg_textures(&self) -> bool;

    /// Creates a clamp-to-edge 2D texture and uploads tightly packed rows.
    fn create_texture(
        &self,
        config: &TextureConfig,
        pixels: &[u8],
    ) -> Result<Self::Texture, String>;
    fn delete_texture(&self, texture: Self::Texture);

    /// Clears the color and depth buffers.
    fn clear(&self, color: [f32; 4], depth: f32);
}
