//! Video texture bridge: planar 4:2:0 frames to luma/chroma textures.
//!
//! A bi-planar 4:2:0 frame stores a full-resolution luma plane followed by
//! a half-resolution plane of interleaved Cb/Cr pairs. The bridge turns
//! the two planes into an `R8` luma texture and an `RG8` chroma texture,
//! bound to two consecutive texture units so the textured technique can
//! convert to RGB in its fragment stage.
//!
//! Textures are created through a [`TextureCache`]. The cache and both
//! textures are thrown away every time a new frame arrives and again at
//! teardown; nothing is reused across frames.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::RendererError;
use crate::gpu::Gpu;
use crate::texture::{tight_rows, TextureConfig};

/// Pixel layout of a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Bi-planar 4:2:0 Y'CbCr, full range. The only layout the bridge accepts.
    Yuv420BiPlanarFullRange,
    /// Bi-planar 4:2:0 Y'CbCr, video range.
    Yuv420BiPlanarVideoRange,
    /// Packed 8-bit BGRA.
    Bgra8,
}

/// One image plane with its row stride.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    /// Distance in bytes between the starts of consecutive rows.
    pub bytes_per_row: usize,
}

/// A borrowed video frame.
#[derive(Debug, Clone, Copy)]
pub struct VideoFrame<'a> {
    /// Width of the luma plane in pixels.
    pub width: u32,
    /// Height of the luma plane in pixels.
    pub height: u32,
    pub format: PixelFormat,
    /// Plane 0: one byte per pixel.
    pub luma: Plane<'a>,
    /// Plane 1: one Cb/Cr byte pair per 2×2 block of pixels.
    pub chroma: Plane<'a>,
}

/// Creates textures from frame planes and defers their deletion until the
/// next flush.
///
/// Every texture the cache hands out is either live (held by a caller) or
/// released (waiting for [`TextureCache::flush`]). Destroying the cache
/// deletes both sets, so no texture outlives it.
#[derive(Debug)]
pub struct TextureCache<T> {
    live: Vec<T>,
    released: Vec<T>,
}

impl<T: Copy + PartialEq> TextureCache<T> {
    /// Creates an empty cache for `gpu`.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::TextureCache` if the context cannot sample
    /// one- and two-channel textures.
    pub fn create<G>(gpu: &G) -> Result<Self, RendererError>
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        if !gpu.supports_rg_textures() {
            return Err(RendererError::TextureCache(
                "context cannot sample R8/RG8 textures".into(),
            ));
        }
        Ok(Self {
            live: Vec::new(),
            released: Vec::new(),
        })
    }

    /// Uploads `plane` as a texture described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::TextureCreation` if the plane is too small
    /// for the texture or the GPU refuses the texture.
    pub fn create_texture_from_plane<G>(
        &mut self,
        gpu: &G,
        plane_index: usize,
        plane: &Plane<'_>,
        config: TextureConfig,
    ) -> Result<T, RendererError>
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        let to_error = |reason: String| RendererError::TextureCreation {
            plane: plane_index,
            reason,
        };

        let pixels = tight_rows(
            plane.data,
            plane.bytes_per_row,
            config.row_bytes(),
            config.height as usize,
        )
        .map_err(to_error)?;

        let texture = gpu.create_texture(&config, &pixels).map_err(to_error)?;
        self.live.push(texture);
        Ok(texture)
    }

    /// Hands a texture back; it is deleted at the next flush or destroy.
    pub fn release(&mut self, texture: T) {
        if let Some(pos) = self.live.iter().position(|t| *t == texture) {
            self.released.push(self.live.swap_remove(pos));
        }
    }

    /// Deletes every released texture.
    pub fn flush<G>(&mut self, gpu: &G)
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        for texture in self.released.drain(..) {
            gpu.delete_texture(texture);
        }
    }

    /// Deletes every texture the cache created, live or released.
    pub fn destroy<G>(mut self, gpu: &G)
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        self.flush(gpu);
        for texture in self.live.drain(..) {
            gpu.delete_texture(texture);
        }
    }

    /// Number of textures created and not yet deleted.
    pub fn len(&self) -> usize {
        self.live.len() + self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A texture handle together with the configuration it was created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoTexture<T> {
    pub handle: T,
    pub config: TextureConfig,
}

/// Owns the texture cache and the current luma/chroma pair.
#[derive(Debug)]
pub struct VideoTextureBridge<T> {
    texture_unit: u32,
    cache: Option<TextureCache<T>>,
    luma: Option<VideoTexture<T>>,
    chroma: Option<VideoTexture<T>>,
}

impl<T: Copy + PartialEq> VideoTextureBridge<T> {
    /// Creates a bridge that binds luma to `texture_unit` and chroma to the
    /// unit after it. No GPU calls are made.
    pub fn new(texture_unit: u32) -> Self {
        Self {
            texture_unit,
            cache: None,
            luma: None,
            chroma: None,
        }
    }

    /// The unit luma is bound to; chroma uses the next one.
    pub fn texture_unit(&self) -> u32 {
        self.texture_unit
    }

    fn chroma_unit(&self) -> Option<u32> {
        self.texture_unit.checked_add(1)
    }

    /// Replaces the current textures with ones built from `frame`.
    ///
    /// Failures are logged and leave the pair unset, which makes textured
    /// rendering skip until a later frame succeeds.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not bi-planar 4:2:0 full range.
    pub fn upload<G>(&mut self, gpu: &G, frame: &VideoFrame<'_>)
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        assert_eq!(
            frame.format,
            PixelFormat::Yuv420BiPlanarFullRange,
            "video texture bridge only accepts bi-planar 4:2:0 full-range frames"
        );

        self.release(gpu);

        let Some(chroma_unit) = self.chroma_unit() else {
            warn!("texture unit {} leaves no unit for chroma", self.texture_unit);
            return;
        };

        if self.cache.is_none() {
            match TextureCache::create(gpu) {
                Ok(cache) => self.cache = Some(cache),
                Err(e) => {
                    warn!("video textures unavailable: {e}");
                    return;
                }
            }
        }
        let Some(cache) = self.cache.as_mut() else {
            return;
        };

        cache.flush(gpu);

        gpu.active_texture(self.texture_unit);
        let luma_config = TextureConfig::luma(frame.width, frame.height);
        let luma = match cache.create_texture_from_plane(gpu, 0, &frame.luma, luma_config) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("luma texture not created: {e}");
                return;
            }
        };

        gpu.active_texture(chroma_unit);
        let chroma_config = TextureConfig::chroma(frame.width, frame.height);
        let chroma = match cache.create_texture_from_plane(gpu, 1, &frame.chroma, chroma_config)
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!("chroma texture not created: {e}");
                cache.release(luma);
                return;
            }
        };
        gpu.bind_texture(None);

        self.luma = Some(VideoTexture {
            handle: luma,
            config: luma_config,
        });
        self.chroma = Some(VideoTexture {
            handle: chroma,
            config: chroma_config,
        });
        debug!(
            "video textures ready: luma {}x{}, chroma {}x{}",
            luma_config.width, luma_config.height, chroma_config.width, chroma_config.height
        );
    }

    /// Binds luma and chroma to their units. Returns `false` without
    /// touching GPU state if the pair is not available.
    pub fn bind<G>(&self, gpu: &G) -> bool
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        let (Some(luma), Some(chroma), Some(chroma_unit)) =
            (self.luma, self.chroma, self.chroma_unit())
        else {
            return false;
        };
        gpu.active_texture(self.texture_unit);
        gpu.bind_texture(Some(luma.handle));
        gpu.active_texture(chroma_unit);
        gpu.bind_texture(Some(chroma.handle));
        true
    }

    /// Whether both textures exist.
    pub fn is_ready(&self) -> bool {
        self.luma.is_some() && self.chroma.is_some()
    }

    pub fn luma(&self) -> Option<&VideoTexture<T>> {
        self.luma.as_ref()
    }

    pub fn chroma(&self) -> Option<&VideoTexture<T>> {
        self.chroma.as_ref()
    }

    /// Releases both textures and destroys the cache.
    pub fn release<G>(&mut self, gpu: &G)
    where
        G: Gpu<Texture = T> + ?Sized,
    {
        if let Some(cache) = self.cache.as_mut() {
            for texture in [self.luma.take(), self.chroma.take()].into_iter().flatten() {
                cache.release(texture.handle);
            }
        }
        if let Some(cache) = self.cache.take() {
            cache.destroy(gpu);
        }
    }
}
