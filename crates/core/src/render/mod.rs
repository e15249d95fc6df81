//! OpenGL ES 3 / WebGL2 backend.
//!
//! This module is only available when the `render` feature is enabled.
//!
//! - [`context`] -- `GpuContext`, the `glow` implementation of [`crate::Gpu`].
//! - [`texture`] -- Plane texture formats and creation.

pub mod context;
pub mod texture;

pub use context::GpuContext;
pub use texture::{create_texture, gl_formats};
