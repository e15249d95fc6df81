//! Mesh upload: copies segment data from a [`MeshSource`] into the pool.
//!
//! Every write replaces a buffer's whole contents. Segments beyond
//! [`MAX_MESHES`] are dropped without error. The source is validated in
//! full before the first GPU call, so a malformed source leaves the
//! previous upload intact.

use log::debug;

use crate::error::RendererError;
use crate::gpu::Gpu;
use crate::guard::BufferBindingReset;
use crate::mesh::MeshSource;
use crate::mode::AttributeAvailability;
use crate::pool::{BufferKind, BufferPool, MAX_MESHES};
use crate::video::VideoTextureBridge;

#[derive(Debug, Clone, Copy)]
struct SegmentCounts {
    vertices: usize,
    faces: usize,
    lines: usize,
}

fn check_len(
    segment: usize,
    attribute: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), RendererError> {
    if actual < expected {
        return Err(RendererError::SegmentData {
            segment,
            attribute,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Rejects the first index that does not name one of `vertices` vertices.
fn check_indices(
    segment: usize,
    attribute: &'static str,
    indices: impl IntoIterator<Item = u16>,
    vertices: usize,
) -> Result<(), RendererError> {
    match indices.into_iter().find(|&i| usize::from(i) >= vertices) {
        Some(index) => Err(RendererError::IndexOutOfRange {
            segment,
            attribute,
            index,
            vertices,
        }),
        None => Ok(()),
    }
}

fn validate_segment(
    source: &dyn MeshSource,
    segment: usize,
    available: &AttributeAvailability,
) -> Result<SegmentCounts, RendererError> {
    let counts = SegmentCounts {
        vertices: source.vertex_count(segment),
        faces: source.face_count(segment),
        lines: source.line_count(segment),
    };
    check_len(segment, "positions", counts.vertices, source.positions(segment).len())?;
    if available.normal {
        check_len(segment, "normals", counts.vertices, source.normals(segment).len())?;
    }
    if available.color {
        check_len(segment, "colors", counts.vertices, source.colors(segment).len())?;
    }
    if available.uv {
        check_len(segment, "uvs", counts.vertices, source.uvs(segment).len())?;
    }
    check_len(segment, "faces", counts.faces, source.faces(segment).len())?;
    check_len(segment, "lines", counts.lines, source.lines(segment).len())?;

    let faces = &source.faces(segment)[..counts.faces];
    check_indices(segment, "faces", faces.iter().flatten().copied(), counts.vertices)?;
    let lines = &source.lines(segment)[..counts.lines];
    check_indices(segment, "lines", lines.iter().flatten().copied(), counts.vertices)?;
    Ok(counts)
}

/// Uploads up to [`MAX_MESHES`] segments of `source` and returns the
/// attribute flags that now apply to every uploaded segment.
///
/// An attached video frame goes through the bridge before any segment is
/// written. A source without one releases any textures from earlier frames.
///
/// # Errors
///
/// Returns `RendererError::PoolNotAllocated` before allocation,
/// `RendererError::SegmentData` if an accessor is shorter than its count,
/// or `RendererError::IndexOutOfRange` if a face or line names a vertex
/// the segment does not have.
/// In both cases nothing on the GPU changes.
///
/// # Panics
///
/// Panics if the attached video frame is not bi-planar 4:2:0 full range.
pub fn upload_mesh<G>(
    gpu: &G,
    pool: &mut BufferPool<G::Buffer>,
    video: &mut VideoTextureBridge<G::Texture>,
    source: &dyn MeshSource,
) -> Result<AttributeAvailability, RendererError>
where
    G: Gpu + ?Sized,
{
    if !pool.is_allocated() {
        return Err(RendererError::PoolNotAllocated);
    }

    let frame = source.video_texture();
    let available = AttributeAvailability {
        color: source.has_per_vertex_colors(),
        normal: source.has_per_vertex_normals(),
        uv: source.has_per_vertex_uvs(),
        texture: frame.is_some(),
    };

    let offered = source.segment_count();
    let count = offered.min(MAX_MESHES);
    let counts = (0..count)
        .map(|segment| validate_segment(source, segment, &available))
        .collect::<Result<Vec<_>, _>>()?;

    match frame {
        Some(frame) => video.upload(gpu, &frame),
        None => video.release(gpu),
    }

    for (segment, seg) in counts.iter().enumerate() {
        let _reset = BufferBindingReset::new(gpu);
        let n = seg.vertices;

        let positions = &source.positions(segment)[..n];
        pool.write(gpu, segment, BufferKind::Vertex, bytemuck::cast_slice(positions));
        if available.normal {
            let normals = &source.normals(segment)[..n];
            pool.write(gpu, segment, BufferKind::Normal, bytemuck::cast_slice(normals));
        }
        if available.color {
            let colors = &source.colors(segment)[..n];
            pool.write(gpu, segment, BufferKind::Color, bytemuck::cast_slice(colors));
        }
        if available.uv {
            let uvs = &source.uvs(segment)[..n];
            pool.write(gpu, segment, BufferKind::TexCoord, bytemuck::cast_slice(uvs));
        }
        let faces = &source.faces(segment)[..seg.faces];
        pool.write(gpu, segment, BufferKind::Faces, bytemuck::cast_slice(faces));
        let lines = &source.lines(segment)[..seg.lines];
        pool.write(gpu, segment, BufferKind::Lines, bytemuck::cast_slice(lines));

        pool.set_counts(segment, seg.faces * 3, seg.lines * 2);
    }
    pool.set_uploaded(count);

    debug!(
        "uploaded {count} of {offered} segments (color: {}, normal: {}, uv: {}, texture: {})",
        available.color, available.normal, available.uv, available.texture
    );
    Ok(available)
}
