//! GPU context wrapper with capability detection.
//!
//! `GpuContext` wraps a `glow::Context`, records whether 8-bit red and
//! red-green textures can be sampled, and implements [`Gpu`] on top of it.

use glow::HasContext;

use crate::gpu::{Attribute, BufferTarget, Gpu, Primitive};
use crate::texture::TextureConfig;

/// Wraps a `glow::Context` with detected GPU capabilities.
///
/// Created once per context. On desktop GL a vertex array object is
/// created and left bound, since core profiles reject attribute setup
/// without one.
pub struct GpuContext {
    gl: glow::Context,
    supports_rg_textures: bool,
    vertex_array: Option<glow::VertexArray>,
}

/// Whether a context of this version (or with these extensions) samples
/// `R8` and `RG8` textures.
fn detect_rg_support(major: u32, extensions: &std::collections::HashSet<String>) -> bool {
    major >= 3
        || extensions.contains("GL_EXT_texture_rg")
        || extensions.contains("EXT_texture_rg")
}

impl GpuContext {
    /// Wraps `gl` and queries its capabilities.
    ///
    /// Missing RG texture support is not an error here; the video texture
    /// cache reports it when the first frame arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex array object cannot be created.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, String> {
        let version = gl.version();
        let supports_rg_textures = detect_rg_support(version.major, gl.supported_extensions());

        let vertex_array = if version.is_embedded {
            None
        } else {
            // SAFETY: creating and binding a vertex array has no
            // preconditions beyond a current context.
            let vao = unsafe { gl.create_vertex_array()? };
            unsafe { gl.bind_vertex_array(Some(vao)) };
            Some(vao)
        };

        Ok(Self {
            gl,
            supports_rg_textures,
            vertex_array,
        })
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consumes this wrapper and returns the underlying `glow::Context`,
    /// deleting the vertex array object it created.
    #[allow(unsafe_code)]
    pub fn into_gl(self) -> glow::Context {
        if let Some(vao) = self.vertex_array {
            // SAFETY: the array was created by this wrapper and is not
            // referenced after this point.
            unsafe {
                self.gl.bind_vertex_array(None);
                self.gl.delete_vertex_array(vao);
            }
        }
        self.gl
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::Element => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn primitive_mode(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::Lines => glow::LINES,
    }
}

#[allow(unsafe_code)]
impl Gpu for GpuContext {
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;

    fn create_buffer(&self) -> Result<glow::Buffer, String> {
        // SAFETY: buffer creation has no preconditions.
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&self, buffer: glow::Buffer) {
        // SAFETY: the pool deletes each buffer it created exactly once.
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<glow::Buffer>) {
        // SAFETY: buffers passed in were created on this context.
        unsafe { self.gl.bind_buffer(buffer_target(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        // SAFETY: glow copies the slice before returning.
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW)
        }
    }

    fn enable_attribute(&self, attribute: Attribute) {
        let location = attribute.location();
        // SAFETY: the caller binds the source array buffer first, so the
        // zero offset refers to that buffer rather than client memory.
        unsafe {
            self.gl.enable_vertex_attrib_array(location);
            self.gl.vertex_attrib_pointer_f32(
                location,
                attribute.components(),
                glow::FLOAT,
                false,
                0,
                0,
            );
        }
    }

    fn disable_attribute(&self, attribute: Attribute) {
        // SAFETY: disabling an attribute array has no preconditions.
        unsafe { self.gl.disable_vertex_attrib_array(attribute.location()) }
    }

    fn draw_elements(&self, primitive: Primitive, count: i32) {
        // SAFETY: the bound element buffer holds `count` 16-bit indices.
        // Uploads reject any index at or past the segment's vertex count,
        // so every index names a vertex in the bound attribute buffers.
        unsafe {
            self.gl
                .draw_elements(primitive_mode(primitive), count, glow::UNSIGNED_SHORT, 0)
        }
    }

    fn line_width(&self, width: f32) {
        // SAFETY: any positive width is accepted; GL clamps to its range.
        unsafe { self.gl.line_width(width) }
    }

    fn is_depth_test_enabled(&self) -> bool {
        // SAFETY: querying a capability has no preconditions.
        unsafe { self.gl.is_enabled(glow::DEPTH_TEST) }
    }

    fn set_depth_test(&self, enabled: bool) {
        // SAFETY: toggling a capability has no preconditions.
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn active_texture(&self, unit: u32) {
        // SAFETY: the renderer config keeps `unit + 1` below the unit limit.
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, texture: Option<glow::Texture>) {
        // SAFETY: textures passed in were created on this context.
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn supports_rg_textures(&self) -> bool {
        self.supports_rg_textures
    }

    fn create_texture(
        &self,
        config: &TextureConfig,
        pixels: &[u8],
    ) -> Result<glow::Texture, String> {
        super::texture::create_texture(&self.gl, config, pixels)
    }

    fn delete_texture(&self, texture: glow::Texture) {
        // SAFETY: the texture cache deletes each texture exactly once.
        unsafe { self.gl.delete_texture(texture) }
    }

    fn clear(&self, color: [f32; 4], depth: f32) {
        let [r, g, b, a] = color;
        // SAFETY: clearing the bound framebuffer has no preconditions.
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear_depth_f32(depth);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    // GpuContext requires a live GL context, so integration tests are ignored.

    #[test]
    fn gpu_context_implements_gpu() {
        fn _assert_gpu<G: Gpu>() {}
        _assert_gpu::<GpuContext>();
    }

    #[test]
    fn gles3_supports_rg_without_extensions() {
        assert!(detect_rg_support(3, &HashSet::new()));
    }

    #[test]
    fn gles2_needs_texture_rg_extension() {
        assert!(!detect_rg_support(2, &HashSet::new()));
        let extensions: HashSet<String> = ["GL_EXT_texture_rg".to_string()].into();
        assert!(detect_rg_support(2, &extensions));
    }

    #[test]
    fn buffer_targets_map_to_gl_enums() {
        assert_eq!(buffer_target(BufferTarget::Array), glow::ARRAY_BUFFER);
        assert_eq!(buffer_target(BufferTarget::Element), glow::ELEMENT_ARRAY_BUFFER);
    }

    #[test]
    fn primitives_map_to_gl_enums() {
        assert_eq!(primitive_mode(Primitive::Triangles), glow::TRIANGLES);
        assert_eq!(primitive_mode(Primitive::Lines), glow::LINES);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_binds_vertex_array_on_desktop() {
        // Would test: GpuContext::new(gl) leaves a VAO bound on desktop GL.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn depth_test_state_round_trips() {
        // Would test: set_depth_test(true) makes is_depth_test_enabled() true.
    }
}
