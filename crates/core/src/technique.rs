//! Shading techniques, one per rendering mode.
//!
//! Techniques are opaque to the renderer: it only selects one, activates
//! it, and hands it the frame matrices. Programs, uniforms and attribute
//! bindings are the technique's business.

use glam::Mat4;

use crate::gpu::Gpu;
use crate::mode::RenderingMode;

/// A shading program selected by rendering mode.
///
/// This trait is object-safe so the four techniques can be stored as
/// `Box<dyn Technique<G>>`.
pub trait Technique<G: Gpu + ?Sized> {
    /// Makes this technique's program current.
    fn activate(&mut self, gpu: &G);

    /// Configures GPU state for the draws that follow.
    ///
    /// `texture_unit` is the unit holding luma; chroma is on the next unit.
    /// It is only `Some` for the textured technique.
    fn prepare_rendering(
        &mut self,
        gpu: &G,
        projection: &Mat4,
        model_view: &Mat4,
        texture_unit: Option<u32>,
    );
}

/// The four techniques the renderer switches between.
pub struct Techniques<G: Gpu + ?Sized> {
    pub x_ray: Box<dyn Technique<G>>,
    pub per_vertex_color: Box<dyn Technique<G>>,
    pub textured: Box<dyn Technique<G>>,
    pub lighted_gray: Box<dyn Technique<G>>,
}

impl<G: Gpu + ?Sized> Techniques<G> {
    /// Returns the technique that draws `mode`.
    pub fn for_mode(&mut self, mode: RenderingMode) -> &mut dyn Technique<G> {
        match mode {
            RenderingMode::XRay => &mut *self.x_ray,
            RenderingMode::PerVertexColor => &mut *self.per_vertex_color,
            RenderingMode::Textured => &mut *self.textured,
            RenderingMode::LightedGray => &mut *self.lighted_gray,
        }
    }
}
