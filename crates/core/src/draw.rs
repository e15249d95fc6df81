//! Per-segment draw submission.
//!
//! Each mode reads a fixed vertex format. [`DrawSpec::for_mode`] is that
//! table; [`draw_segment`] binds exactly those buffers for one slot,
//! issues a single indexed draw and unbinds in reverse order.

use log::warn;

use crate::guard::{BoundAttribute, BufferBindingReset};
use crate::gpu::{Attribute, BufferTarget, Gpu, Primitive};
use crate::mode::RenderingMode;
use crate::pool::{BufferKind, SegmentSlot};

/// Vertex format and primitive used by one rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSpec {
    pub primitive: Primitive,
    /// The index buffer drawn from.
    pub indices: BufferKind,
    /// Attributes bound, in binding order.
    pub attributes: &'static [Attribute],
}

impl DrawSpec {
    pub fn for_mode(mode: RenderingMode) -> Self {
        match mode {
            RenderingMode::XRay => Self {
                primitive: Primitive::Lines,
                indices: BufferKind::Lines,
                attributes: &[Attribute::Position, Attribute::Normal],
            },
            RenderingMode::LightedGray => Self {
                primitive: Primitive::Triangles,
                indices: BufferKind::Faces,
                attributes: &[Attribute::Position, Attribute::Normal],
            },
            RenderingMode::PerVertexColor => Self {
                primitive: Primitive::Triangles,
                indices: BufferKind::Faces,
                attributes: &[Attribute::Position, Attribute::Normal, Attribute::Color],
            },
            RenderingMode::Textured => Self {
                primitive: Primitive::Triangles,
                indices: BufferKind::Faces,
                attributes: &[Attribute::Position, Attribute::TexCoord],
            },
        }
    }

    fn uses(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }
}

/// The buffer an attribute is sourced from.
fn source_buffer(attribute: Attribute) -> BufferKind {
    match attribute {
        Attribute::Position => BufferKind::Vertex,
        Attribute::Normal => BufferKind::Normal,
        Attribute::Color => BufferKind::Color,
        Attribute::TexCoord => BufferKind::TexCoord,
    }
}

/// Draws one segment in `mode`. Returns whether a draw call was issued.
///
/// A slot with no triangle indices holds nothing and is skipped in every
/// mode. Afterwards the element and array bindings are both none.
pub fn draw_segment<G>(
    gpu: &G,
    slot: &SegmentSlot<G::Buffer>,
    mode: RenderingMode,
    line_width: f32,
) -> bool
where
    G: Gpu + ?Sized,
{
    if slot.triangle_index_count() == 0 {
        return false;
    }

    let spec = DrawSpec::for_mode(mode);
    let count = match spec.indices {
        BufferKind::Lines => slot.line_index_count(),
        _ => slot.triangle_index_count(),
    };
    let Ok(count) = i32::try_from(count) else {
        warn!("segment index count {count} exceeds the draw limit, skipping");
        return false;
    };

    let _reset = BufferBindingReset::new(gpu);
    gpu.bind_buffer(BufferTarget::Element, slot.buffer(spec.indices));
    if spec.primitive == Primitive::Lines {
        gpu.line_width(line_width);
    }

    let bind = |attribute| {
        spec.uses(attribute)
            .then(|| BoundAttribute::bind(gpu, slot.buffer(source_buffer(attribute)), attribute))
    };
    let _position = bind(Attribute::Position);
    let _normal = bind(Attribute::Normal);
    let _color = bind(Attribute::Color);
    let _texcoord = bind(Attribute::TexCoord);

    gpu.draw_elements(spec.primitive, count);
    true
}
