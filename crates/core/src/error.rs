//! Error types for the mesh renderer.

use thiserror::Error;

/// Errors produced by renderer operations.
///
/// Backend calls report failures as plain strings (the same convention
/// `glow` uses); those strings are wrapped into the variant that names the
/// resource that could not be created.
#[derive(Debug, Error)]
pub enum RendererError {
    /// An upload or draw was attempted before the buffer pool was allocated.
    #[error("buffer pool is not allocated")]
    PoolNotAllocated,

    /// `allocate` was called on a pool that already holds buffer handles.
    #[error("buffer pool is already allocated")]
    PoolAlreadyAllocated,

    /// The GPU refused to create a buffer object.
    #[error("buffer allocation failed: {0}")]
    BufferAllocation(String),

    /// The video texture cache could not be created.
    #[error("texture cache creation failed: {0}")]
    TextureCache(String),

    /// A luma or chroma texture could not be created from its plane.
    #[error("texture creation failed for plane {plane}: {reason}")]
    TextureCreation { plane: usize, reason: String },

    /// A mesh source accessor returned fewer elements than its declared count.
    #[error("segment {segment}: {attribute} has {actual} elements, expected {expected}")]
    SegmentData {
        segment: usize,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A face or line index refers past the end of its segment's vertices.
    #[error("segment {segment}: {attribute} index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange {
        segment: usize,
        attribute: &'static str,
        index: u16,
        vertices: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
