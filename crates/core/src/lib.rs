#![deny(unsafe_code)]
//! Multi-segment triangle mesh renderer for live 3D scans.
//!
//! Uploads up to [`MAX_MESHES`] mesh segments into a fixed pool of GPU
//! buffers, bridges bi-planar 4:2:0 camera frames into luma/chroma
//! textures, and draws every segment each frame with one of four shading
//! techniques, falling back between color and texture when the mesh lacks
//! what the requested mode needs.
//!
//! GPU access goes through the [`Gpu`] trait. The `glow` backend is in
//! [`render`], behind the `render` feature.

pub mod config;
pub mod draw;
pub mod error;
pub mod gpu;
pub mod guard;
pub mod mesh;
pub mod mode;
pub mod params;
pub mod pool;
pub mod renderer;
pub mod technique;
pub mod texture;
pub mod upload;
pub mod video;

#[cfg(test)]
mod mock_gpu;

#[cfg(feature = "render")]
pub mod render;

pub use config::RendererConfig;
pub use error::RendererError;
pub use gpu::{Attribute, BufferTarget, Gpu, Primitive};
pub use mesh::{CpuMesh, CpuSegment, MeshSource, OwnedVideoFrame};
pub use mode::{AttributeAvailability, RenderingMode, SkipReason};
pub use pool::{BufferPool, MAX_MESHES};
pub use renderer::{FrameStats, MeshRenderer};
pub use technique::{Technique, Techniques};
pub use texture::{TextureConfig, TextureFormat};
pub use video::{PixelFormat, Plane, TextureCache, VideoFrame, VideoTextureBridge};
