//! Recording `Gpu` used by unit tests.
//!
//! Records every command in order, tracks live handles so double releases
//! panic, and remembers bound buffers so uploaded sizes can be checked.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::gpu::{Attribute, BufferTarget, Gpu, Primitive};
use crate::texture::TextureConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer(u32),
    DeleteBuffer(u32),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData(BufferTarget, usize),
    EnableAttribute(Attribute),
    DisableAttribute(Attribute),
    DrawElements(Primitive, i32),
    LineWidth(f32),
    SetDepthTest(bool),
    ActiveTexture(u32),
    BindTexture(Option<u32>),
    CreateTexture(u32, TextureConfig),
    DeleteTexture(u32),
    Clear([f32; 4], f32),
}

pub struct MockGpu {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    live_buffers: RefCell<HashSet<u32>>,
    live_textures: RefCell<HashSet<u32>>,
    bound: RefCell<HashMap<BufferTarget, u32>>,
    buffer_sizes: RefCell<HashMap<u32, usize>>,
    texture_data: RefCell<HashMap<u32, Vec<u8>>>,
    depth_test: Cell<bool>,
    rg_supported: Cell<bool>,
    buffers_before_failure: Cell<Option<usize>>,
    fail_texture_number: Cell<Option<usize>>,
    textures_created: Cell<usize>,
}

impl MockGpu {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
            live_buffers: RefCell::new(HashSet::new()),
            live_textures: RefCell::new(HashSet::new()),
            bound: RefCell::new(HashMap::new()),
            buffer_sizes: RefCell::new(HashMap::new()),
            texture_data: RefCell::new(HashMap::new()),
            depth_test: Cell::new(false),
            rg_supported: Cell::new(true),
            buffers_before_failure: Cell::new(None),
            fail_texture_number: Cell::new(None),
            textures_created: Cell::new(0),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn draws(&self) -> Vec<(Primitive, i32)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::DrawElements(p, n) => Some((*p, *n)),
                _ => None,
            })
            .collect()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.borrow().len()
    }

    pub fn buffer_size(&self, buffer: u32) -> Option<usize> {
        self.buffer_sizes.borrow().get(&buffer).copied()
    }

    pub fn texture_data(&self, texture: u32) -> Option<Vec<u8>> {
        self.texture_data.borrow().get(&texture).cloned()
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<u32> {
        self.bound.borrow().get(&target).copied()
    }

    pub fn set_depth_test_state(&self, enabled: bool) {
        self.depth_test.set(enabled);
    }

    pub fn set_rg_supported(&self, supported: bool) {
        self.rg_supported.set(supported);
    }

    /// Buffer creation fails once `count` buffers have been created.
    pub fn fail_buffers_after(&self, count: usize) {
        self.buffers_before_failure.set(Some(count));
    }

    /// The `n`th texture creation (0-based, counted from now) fails.
    pub fn fail_texture(&self, n: usize) {
        self.textures_created.set(0);
        self.fail_texture_number.set(Some(n));
    }

    fn next(&self) -> u32 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Gpu for MockGpu {
    type Buffer = u32;
    type Texture = u32;

    fn create_buffer(&self) -> Result<u32, String> {
        if let Some(remaining) = self.buffers_before_failure.get() {
            if remaining == 0 {
                return Err("out of buffer names".into());
            }
            self.buffers_before_failure.set(Some(remaining - 1));
        }
        let handle = self.next();
        self.live_buffers.borrow_mut().insert(handle);
        self.record(Call::CreateBuffer(handle));
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: u32) {
        assert!(
            self.live_buffers.borrow_mut().remove(&buffer),
            "buffer {buffer} released twice or never created"
        );
        self.record(Call::DeleteBuffer(buffer));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        match buffer {
            Some(b) => {
                self.bound.borrow_mut().insert(target, b);
            }
            None => {
                self.bound.borrow_mut().remove(&target);
            }
        }
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        if let Some(b) = self.bound_buffer(target) {
            self.buffer_sizes.borrow_mut().insert(b, data.len());
        }
        self.record(Call::BufferData(target, data.len()));
    }

    fn enable_attribute(&self, attribute: Attribute) {
        self.record(Call::EnableAttribute(attribute));
    }

    fn disable_attribute(&self, attribute: Attribute) {
        self.record(Call::DisableAttribute(attribute));
    }

    fn draw_elements(&self, primitive: Primitive, count: i32) {
        self.record(Call::DrawElements(primitive, count));
    }

    fn line_width(&self, width: f32) {
        self.record(Call::LineWidth(width));
    }

    fn is_depth_test_enabled(&self) -> bool {
        self.depth_test.get()
    }

    fn set_depth_test(&self, enabled: bool) {
        self.depth_test.set(enabled);
        self.record(Call::SetDepthTest(enabled));
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, texture: Option<u32>) {
        self.record(Call::BindTexture(texture));
    }

    fn supports_rg_textures(&self) -> bool {
        self.rg_supported.get()
    }

    fn create_texture(&self, config: &TextureConfig, pixels: &[u8]) -> Result<u32, String> {
        let n = self.textures_created.get();
        self.textures_created.set(n + 1);
        if self.fail_texture_number.get() == Some(n) {
            return Err("texture allocation refused".into());
        }
        let handle = self.next();
        self.live_textures.borrow_mut().insert(handle);
        self.texture_data
            .borrow_mut()
            .insert(handle, pixels.to_vec());
        self.record(Call::CreateTexture(handle, *config));
        Ok(handle)
    }

    fn delete_texture(&self, texture: u32) {
        assert!(
            self.live_textures.borrow_mut().remove(&texture),
            "texture {texture} released twice or never created"
        );
        self.record(Call::DeleteTexture(texture));
    }

    fn clear(&self, color: [f32; 4], depth: f32) {
        self.record(Call::Clear(color, depth));
    }
}
