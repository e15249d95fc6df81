//! The mesh renderer: owns every GPU resource and drives each frame.
//!
//! `MeshRenderer` is created once per GL context, accepts any number of
//! upload, mode-change and render calls, and is torn down with
//! [`MeshRenderer::destroy`]. All methods must be called on the thread
//! that owns the context; uploads and renders are ordered by the caller.

use glam::Mat4;
use log::{debug, warn};

use crate::config::RendererConfig;
use crate::draw::draw_segment;
use crate::error::RendererError;
use crate::gpu::Gpu;
use crate::guard::DepthTestGuard;
use crate::mesh::MeshSource;
use crate::mode::{reconcile, AttributeAvailability, RenderingMode, SkipReason};
use crate::pool::BufferPool;
use crate::technique::Techniques;
use crate::upload::upload_mesh;
use crate::video::VideoTextureBridge;

/// What one call to [`MeshRenderer::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// The mode the frame was drawn (or skipped) in.
    pub mode: RenderingMode,
    pub draw_calls: usize,
    /// Uploaded segments with no triangles.
    pub empty_segments: usize,
    /// Set when the frame issued no draws because data was missing.
    pub skipped: Option<SkipReason>,
}

/// Multi-segment mesh renderer.
pub struct MeshRenderer<G: Gpu> {
    config: RendererConfig,
    pool: BufferPool<G::Buffer>,
    video: VideoTextureBridge<G::Texture>,
    techniques: Techniques<G>,
    available: AttributeAvailability,
    mode: RenderingMode,
}

impl<G: Gpu> MeshRenderer<G> {
    /// Creates a renderer and allocates its buffer pool on `gpu`.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::InvalidConfig` for a bad config, or
    /// `RendererError::BufferAllocation` if the GPU runs out of buffers.
    pub fn new(
        gpu: &G,
        config: RendererConfig,
        techniques: Techniques<G>,
    ) -> Result<Self, RendererError> {
        config.validate()?;
        let mut pool = BufferPool::new();
        pool.allocate(gpu)?;
        Ok(Self {
            config,
            pool,
            video: VideoTextureBridge::new(config.texture_unit),
            techniques,
            available: AttributeAvailability::default(),
            mode: RenderingMode::default(),
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn rendering_mode(&self) -> RenderingMode {
        self.mode
    }

    pub fn set_rendering_mode(&mut self, mode: RenderingMode) {
        self.mode = mode;
    }

    /// Attribute flags from the most recent upload.
    pub fn available_attributes(&self) -> AttributeAvailability {
        self.available
    }

    /// Number of segments that will be drawn.
    pub fn uploaded_meshes(&self) -> usize {
        self.pool.uploaded()
    }

    pub fn pool(&self) -> &BufferPool<G::Buffer> {
        &self.pool
    }

    pub fn video_textures(&self) -> &VideoTextureBridge<G::Texture> {
        &self.video
    }

    /// Replaces the uploaded mesh with `source`.
    ///
    /// # Errors
    ///
    /// See [`upload_mesh`]. On error the previous upload stays drawable.
    ///
    /// # Panics
    ///
    /// Panics if the attached video frame has an unsupported pixel format.
    pub fn upload_mesh(&mut self, gpu: &G, source: &dyn MeshSource) -> Result<(), RendererError> {
        self.available = upload_mesh(gpu, &mut self.pool, &mut self.video, source)?;
        Ok(())
    }

    /// Clears color and depth. The background is light for the colored
    /// modes and dark otherwise.
    pub fn clear(&self, gpu: &G) {
        let color = if self.mode.is_colored() {
            self.config.clear_color_light
        } else {
            self.config.clear_color_dark
        };
        gpu.clear(color, 1.0);
    }

    /// Draws every uploaded segment with the current technique.
    ///
    /// The mode is reconciled against the uploaded attributes first; a
    /// substitution is logged and persists. If the reconciled mode still
    /// lacks data, nothing is drawn. Depth testing is on during the draws
    /// and restored to its previous state afterwards.
    pub fn render(&mut self, gpu: &G, projection: &Mat4, model_view: &Mat4) -> FrameStats {
        let plan = reconcile(self.mode, &self.available, self.video.is_ready());
        if let Some(from) = plan.switched_from {
            warn!(
                "{from:?} rendering lacks data, switching to {:?}",
                plan.mode
            );
            self.mode = plan.mode;
        }

        let mut stats = FrameStats {
            mode: plan.mode,
            draw_calls: 0,
            empty_segments: 0,
            skipped: plan.skip,
        };
        if let Some(reason) = plan.skip {
            warn!("skipping {:?} rendering: {reason}", plan.mode);
            return stats;
        }

        let texture_unit = if plan.mode == RenderingMode::Textured {
            if !self.video.bind(gpu) {
                stats.skipped = Some(SkipReason::MissingTextures);
                return stats;
            }
            Some(self.video.texture_unit())
        } else {
            None
        };

        let technique = self.techniques.for_mode(plan.mode);
        technique.activate(gpu);
        technique.prepare_rendering(gpu, projection, model_view, texture_unit);

        let _depth = DepthTestGuard::enable(gpu);
        for slot in self.pool.uploaded_slots() {
            if draw_segment(gpu, slot, plan.mode, self.config.line_width) {
                stats.draw_calls += 1;
            } else {
                stats.empty_segments += 1;
            }
        }
        stats
    }

    /// Empties every buffer without releasing the handles. Nothing is drawn
    /// until the next upload.
    pub fn release_buffers(&mut self, gpu: &G) {
        self.pool.release_contents(gpu);
    }

    /// Releases the video textures and their cache.
    pub fn release_textures(&mut self, gpu: &G) {
        self.video.release(gpu);
    }

    /// Releases every buffer and texture. Calling it again does nothing.
    pub fn destroy(&mut self, gpu: &G) {
        if self.pool.is_allocated() {
            debug!("destroying mesh renderer");
        }
        self.pool.destroy(gpu);
        self.video.release(gpu);
        self.available = AttributeAvailability::default();
    }
}

impl<G: Gpu> Drop for MeshRenderer<G> {
    fn drop(&mut self) {
        if self.pool.is_allocated() {
            warn!("mesh renderer dropped without destroy(); GPU buffers leaked");
        }
    }
}
