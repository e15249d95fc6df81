//! Texture descriptions for video-derived textures.
//!
//! Provides `TextureConfig` for specifying texture dimensions and channel
//! layout, and `tight_rows` for dropping row padding before upload. The
//! mapping to GL enums lives in the `glow` backend.

use std::borrow::Cow;

/// Channel layout of an 8-bit-per-channel texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// One channel (`R8`), used for luma.
    R8,
    /// Two channels (`RG8`), used for interleaved CbCr.
    Rg8,
}

impl TextureFormat {
    /// Bytes per texel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::Rg8 => 2,
        }
    }
}

/// Configuration for creating a GPU texture.
///
/// All video textures use clamp-to-edge wrapping and linear filtering, so
/// only dimensions and layout vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Channel layout.
    pub format: TextureFormat,
}

impl TextureConfig {
    /// Full-resolution single-channel luma texture for a `width × height` frame.
    pub fn luma(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: TextureFormat::R8,
        }
    }

    /// Half-resolution two-channel chroma texture for a `width × height` frame.
    ///
    /// 4:2:0 subsampling halves both dimensions (rounding down).
    pub fn chroma(width: u32, height: u32) -> Self {
        Self {
            width: width / 2,
            height: height / 2,
            format: TextureFormat::Rg8,
        }
    }

    /// Bytes in one tightly packed row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Bytes in the whole tightly packed image.
    pub fn byte_len(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

/// Returns `rows` rows of `row_bytes` each from `data`, where consecutive
/// rows start `bytes_per_row` apart.
///
/// Borrows when the rows are already contiguous and copies otherwise.
///
/// # Errors
///
/// Returns a message if the stride is smaller than a row or if `data` is
/// too short to hold every row.
pub fn tight_rows(
    data: &[u8],
    bytes_per_row: usize,
    row_bytes: usize,
    rows: usize,
) -> Result<Cow<'_, [u8]>, String> {
    if bytes_per_row < row_bytes {
        return Err(format!(
            "stride {bytes_per_row} is smaller than row size {row_bytes}"
        ));
    }
    if rows == 0 || row_bytes == 0 {
        return Ok(Cow::Borrowed(&[]));
    }

    // The last row does not need trailing padding.
    let required = bytes_per_row
        .checked_mul(rows - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or_else(|| format!("plane stride {bytes_per_row} overflows over {rows} rows"))?;
    if data.len() < required {
        return Err(format!(
            "plane holds {} bytes, need {required}",
            data.len()
        ));
    }

    if bytes_per_row == row_bytes {
        return Ok(Cow::Borrowed(&data[..required]));
    }

    let packed = data
        .chunks(bytes_per_row)
        .take(rows)
        .flat_map(|row| &row[..row_bytes])
        .copied()
        .collect();
    Ok(Cow::Owned(packed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_keeps_full_resolution() {
        let config = TextureConfig::luma(640, 480);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.format, TextureFormat::R8);
    }

    #[test]
    fn chroma_halves_both_dimensions() {
        let config = TextureConfig::chroma(640, 480);
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 240);
        assert_eq!(config.format, TextureFormat::Rg8);
    }

    #[test]
    fn chroma_rounds_odd_dimensions_down() {
        let config = TextureConfig::chroma(641, 3);
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 1);
    }

    #[test]
    fn byte_len_accounts_for_channels() {
        assert_eq!(TextureConfig::luma(4, 2).byte_len(), 8);
        assert_eq!(TextureConfig::chroma(4, 2).byte_len(), 4);
    }

    #[test]
    fn texture_config_is_copy_and_clone() {
        let config = TextureConfig::luma(128, 128);
        let copy = config;
        let clone = config.clone();
        assert_eq!(config, copy);
        assert_eq!(config, clone);
    }

    #[test]
    fn tight_rows_borrows_contiguous_data() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let rows = tight_rows(&data, 3, 3, 2).unwrap();
        assert!(matches!(rows, Cow::Borrowed(_)));
        assert_eq!(&*rows, &data[..]);
    }

    #[test]
    fn tight_rows_strips_padding() {
        // Two rows of 2 bytes with 2 bytes of padding each; last row unpadded.
        let data = [1u8, 2, 0xAA, 0xAA, 3, 4];
        let rows = tight_rows(&data, 4, 2, 2).unwrap();
        assert_eq!(&*rows, &[1, 2, 3, 4]);
    }

    #[test]
    fn tight_rows_rejects_short_plane() {
        let data = [0u8; 5];
        let err = tight_rows(&data, 3, 3, 2).unwrap_err();
        assert!(err.contains("need 6"), "got: {err}");
    }

    #[test]
    fn tight_rows_rejects_stride_smaller_than_row() {
        let err = tight_rows(&[0u8; 16], 2, 4, 2).unwrap_err();
        assert!(err.contains("stride"), "got: {err}");
    }

    #[test]
    fn tight_rows_rejects_overflowing_stride() {
        let err = tight_rows(&[0u8; 16], usize::MAX / 2, 4, 4).unwrap_err();
        assert!(err.contains("overflows"), "got: {err}");
    }

    #[test]
    fn tight_rows_handles_empty_image() {
        let rows = tight_rows(&[], 0, 0, 0).unwrap();
        assert!(rows.is_empty());
    }
}
