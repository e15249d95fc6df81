//! Scoped GPU state guards.
//!
//! GL bindings are global to the context. Each guard changes one piece of
//! state on construction and puts it back on drop, so state is restored on
//! every exit path. Guards declared later in a scope drop first, which
//! gives reverse-order unbinding for free.

use crate::gpu::{Attribute, BufferTarget, Gpu};

/// Enables a vertex attribute sourced from `buffer` until dropped.
#[must_use = "the attribute is disabled as soon as the guard drops"]
pub struct BoundAttribute<'a, G: Gpu + ?Sized> {
    gpu: &'a G,
    buffer: Option<G::Buffer>,
    attribute: Attribute,
}

impl<'a, G: Gpu + ?Sized> BoundAttribute<'a, G> {
    pub fn bind(gpu: &'a G, buffer: Option<G::Buffer>, attribute: Attribute) -> Self {
        gpu.bind_buffer(BufferTarget::Array, buffer);
        gpu.enable_attribute(attribute);
        Self {
            gpu,
            buffer,
            attribute,
        }
    }
}

impl<G: Gpu + ?Sized> Drop for BoundAttribute<'_, G> {
    fn drop(&mut self) {
        self.gpu.bind_buffer(BufferTarget::Array, self.buffer);
        self.gpu.disable_attribute(self.attribute);
    }
}

/// Resets the element and array buffer bindings to none when dropped.
#[must_use = "bindings are reset as soon as the guard drops"]
pub struct BufferBindingReset<'a, G: Gpu + ?Sized> {
    gpu: &'a G,
}

impl<'a, G: Gpu + ?Sized> BufferBindingReset<'a, G> {
    pub fn new(gpu: &'a G) -> Self {
        Self { gpu }
    }
}

impl<G: Gpu + ?Sized> Drop for BufferBindingReset<'_, G> {
    fn drop(&mut self) {
        self.gpu.bind_buffer(BufferTarget::Element, None);
        self.gpu.bind_buffer(BufferTarget::Array, None);
    }
}

/// Forces depth testing on and restores the previous state when dropped.
#[must_use = "depth state is restored as soon as the guard drops"]
pub struct DepthTestGuard<'a, G: Gpu + ?Sized> {
    gpu: &'a G,
    was_enabled: bool,
}

impl<'a, G: Gpu + ?Sized> DepthTestGuard<'a, G> {
    pub fn enable(gpu: &'a G) -> Self {
        let was_enabled = gpu.is_depth_test_enabled();
        if !was_enabled {
            gpu.set_depth_test(true);
        }
        Self { gpu, was_enabled }
    }
}

impl<G: Gpu + ?Sized> Drop for DepthTestGuard<'_, G> {
    fn drop(&mut self) {
        if !self.was_enabled {
            self.gpu.set_depth_test(false);
        }
    }
}
