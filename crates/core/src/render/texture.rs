//! Plane texture creation for OpenGL ES 3 / WebGL2.
//!
//! Video planes are uploaded as 8-bit red (luma) or red-green (chroma)
//! textures with linear filtering and clamp-to-edge wrapping, which is what
//! the textured technique samples.

use crate::texture::{TextureConfig, TextureFormat};

/// GL internal format, pixel format and pixel type for a plane format.
pub fn gl_formats(format: TextureFormat) -> (u32, u32, u32) {
    match format {
        TextureFormat::R8 => (glow::R8, glow::RED, glow::UNSIGNED_BYTE),
        TextureFormat::Rg8 => (glow::RG8, glow::RG, glow::UNSIGNED_BYTE),
    }
}

/// Creates a 2D texture from tightly packed `pixels`.
///
/// The unpack alignment is set to 1 because plane rows are rarely a
/// multiple of four bytes. The texture is left unbound on the active unit.
///
/// # Errors
///
/// Returns an error string if `pixels` is shorter than the config needs,
/// a dimension does not fit in `i32`, or the context fails to create the
/// texture.
#[allow(unsafe_code)]
pub fn create_texture(
    gl: &glow::Context,
    config: &TextureConfig,
    pixels: &[u8],
) -> Result<glow::Texture, String> {
    use glow::HasContext;

    if pixels.len() < config.byte_len() {
        return Err(format!(
            "texture {}x{} needs {} bytes, got {}",
            config.width,
            config.height,
            config.byte_len(),
            pixels.len()
        ));
    }
    let width = i32::try_from(config.width).map_err(|e| e.to_string())?;
    let height = i32::try_from(config.height).map_err(|e| e.to_string())?;
    let (internal_format, format, pixel_type) = gl_formats(config.format);

    // SAFETY: glow wraps raw GL calls as unsafe. The pixel slice holds at
    // least width * height * bytes-per-pixel bytes, checked above.
    let texture = unsafe { gl.create_texture()? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            internal_format as i32,
            width,
            height,
            0,
            format,
            pixel_type,
            glow::PixelUnpackData::Slice(Some(&pixels[..config.byte_len()])),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}
