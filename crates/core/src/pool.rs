//! Fixed-capacity pool of per-segment GPU buffers.
//!
//! Each of the [`MAX_MESHES`] slots owns one buffer of every
//! [`BufferKind`] plus the index counts recorded by the last upload into
//! it. Handles are created once by [`BufferPool::allocate`], reused by
//! every upload, and released once by [`BufferPool::destroy`].

use log::debug;

use crate::error::RendererError;
use crate::gpu::{BufferTarget, Gpu};

/// Maximum number of mesh segments the pool can hold.
pub const MAX_MESHES: usize = 30;

/// The six buffers every segment slot owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Vertex,
    Normal,
    Color,
    TexCoord,
    Faces,
    Lines,
}

impl BufferKind {
    /// Every kind, in allocation order.
    pub const ALL: [BufferKind; 6] = [
        BufferKind::Vertex,
        BufferKind::Normal,
        BufferKind::Color,
        BufferKind::TexCoord,
        BufferKind::Faces,
        BufferKind::Lines,
    ];

    /// The binding point this kind of buffer is written and drawn through.
    pub fn target(self) -> BufferTarget {
        match self {
            BufferKind::Faces | BufferKind::Lines => BufferTarget::Element,
            _ => BufferTarget::Array,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One segment's buffer handles and index counts.
///
/// A `None` handle is the "unallocated" sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSlot<B> {
    buffers: [Option<B>; 6],
    triangle_index_count: usize,
    line_index_count: usize,
}

impl<B: Copy> SegmentSlot<B> {
    fn empty() -> Self {
        Self {
            buffers: [None; 6],
            triangle_index_count: 0,
            line_index_count: 0,
        }
    }

    /// Returns the handle for `kind`, or `None` if the pool is not allocated.
    pub fn buffer(&self, kind: BufferKind) -> Option<B> {
        self.buffers[kind.index()]
    }

    /// Number of triangle indices (faces × 3) from the last upload.
    pub fn triangle_index_count(&self) -> usize {
        self.triangle_index_count
    }

    /// Number of line indices (lines × 2) from the last upload.
    pub fn line_index_count(&self) -> usize {
        self.line_index_count
    }
}

/// Fixed array of segment slots plus the count of currently uploaded segments.
pub struct BufferPool<B> {
    slots: [SegmentSlot<B>; MAX_MESHES],
    uploaded: usize,
}

impl<B: Copy> BufferPool<B> {
    /// Creates an unallocated pool. No GPU calls are made.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| SegmentSlot::empty()),
            uploaded: 0,
        }
    }

    /// Whether `allocate` has run and `destroy` has not.
    pub fn is_allocated(&self) -> bool {
        self.slots[0].buffer(BufferKind::Vertex).is_some()
    }

    /// Acquires [`MAX_MESHES`] handles for each buffer kind.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::PoolAlreadyAllocated` if handles are already
    /// held. Returns `RendererError::BufferAllocation` if the GPU refuses a
    /// handle, after releasing every handle created so far.
    pub fn allocate<G>(&mut self, gpu: &G) -> Result<(), RendererError>
    where
        G: Gpu<Buffer = B> + ?Sized,
    {
        if self.is_allocated() {
            return Err(RendererError::PoolAlreadyAllocated);
        }

        for kind in BufferKind::ALL {
            for index in 0..MAX_MESHES {
                match gpu.create_buffer() {
                    Ok(buffer) => self.slots[index].buffers[kind.index()] = Some(buffer),
                    Err(e) => {
                        self.destroy(gpu);
                        return Err(RendererError::BufferAllocation(format!(
                            "{kind:?} buffer for slot {index}: {e}"
                        )));
                    }
                }
            }
        }

        debug!(
            "allocated {} buffers for {MAX_MESHES} segment slots",
            MAX_MESHES * BufferKind::ALL.len()
        );
        Ok(())
    }

    /// Replaces every slot's buffer storage with zero-length data, keeping
    /// the handles. Index counts and the uploaded count drop to zero.
    pub fn release_contents<G>(&mut self, gpu: &G)
    where
        G: Gpu<Buffer = B> + ?Sized,
    {
        for slot in &mut self.slots {
            for kind in BufferKind::ALL {
                if let Some(buffer) = slot.buffer(kind) {
                    gpu.bind_buffer(kind.target(), Some(buffer));
                    gpu.buffer_data(kind.target(), &[]);
                }
            }
            slot.triangle_index_count = 0;
            slot.line_index_count = 0;
        }
        gpu.bind_buffer(BufferTarget::Element, None);
        gpu.bind_buffer(BufferTarget::Array, None);
        self.uploaded = 0;
    }

    /// Releases every handle exactly once.
    ///
    /// A kind whose first handle is already the unallocated sentinel is
    /// skipped, so calling this on a destroyed pool does nothing.
    pub fn destroy<G>(&mut self, gpu: &G)
    where
        G: Gpu<Buffer = B> + ?Sized,
    {
        for kind in BufferKind::ALL {
            if self.slots[0].buffer(kind).is_none() {
                continue;
            }
            for slot in &mut self.slots {
                if let Some(buffer) = slot.buffers[kind.index()].take() {
                    gpu.delete_buffer(buffer);
                }
            }
        }
        for slot in &mut self.slots {
            slot.triangle_index_count = 0;
            slot.line_index_count = 0;
        }
        self.uploaded = 0;
    }

    /// Replaces the contents of one slot's buffer with `data`.
    ///
    /// Leaves the buffer bound to its target; callers reset bindings once
    /// per segment.
    pub(crate) fn write<G>(&self, gpu: &G, index: usize, kind: BufferKind, data: &[u8])
    where
        G: Gpu<Buffer = B> + ?Sized,
    {
        let target = kind.target();
        gpu.bind_buffer(target, self.slots[index].buffer(kind));
        gpu.buffer_data(target, data);
    }

    pub(crate) fn set_counts(&mut self, index: usize, triangle_indices: usize, line_indices: usize) {
        let slot = &mut self.slots[index];
        slot.triangle_index_count = triangle_indices;
        slot.line_index_count = line_indices;
    }

    pub(crate) fn set_uploaded(&mut self, count: usize) {
        debug_assert!(count <= MAX_MESHES, "uploaded count {count} exceeds capacity");
        self.uploaded = count.min(MAX_MESHES);
    }

    /// Number of segments from the most recent upload. Only these are drawn.
    pub fn uploaded(&self) -> usize {
        self.uploaded
    }

    /// The slots eligible for drawing, in index order.
    pub fn uploaded_slots(&self) -> &[SegmentSlot<B>] {
        &self.slots[..self.uploaded]
    }

    /// Any slot, including stale ones beyond the uploaded count.
    pub fn slot(&self, index: usize) -> Option<&SegmentSlot<B>> {
        self.slots.get(index)
    }
}

impl<B: Copy> Default for BufferPool<B> {
    fn default() -> Self {
        Self::new()
    }
}
