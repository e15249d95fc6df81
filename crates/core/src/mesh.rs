//! Mesh source contract and an owned CPU-side implementation.
//!
//! A mesh arrives as a list of independently indexed segments. Capability
//! queries apply to the whole mesh, not per segment. [`MeshSource`] is the
//! read-only view the upload pipeline consumes; [`CpuMesh`] is a plain
//! owned mesh that implements it.

use serde::{Deserialize, Serialize};

use crate::video::{PixelFormat, Plane, VideoFrame};

/// Read-only access to segmented mesh data.
///
/// Accessors return slices that must hold at least as many elements as the
/// matching count (`vertex_count` for per-vertex data, `face_count` for
/// faces, `line_count` for lines). Accessors for attributes the mesh does
/// not have are never called by the uploader.
///
/// This trait is object-safe so sources can be passed as `&dyn MeshSource`.
pub trait MeshSource {
    fn segment_count(&self) -> usize;

    fn vertex_count(&self, segment: usize) -> usize;
    fn face_count(&self, segment: usize) -> usize;
    fn line_count(&self, segment: usize) -> usize;

    fn positions(&self, segment: usize) -> &[[f32; 3]];
    fn normals(&self, segment: usize) -> &[[f32; 3]];
    fn colors(&self, segment: usize) -> &[[f32; 3]];
    fn uvs(&self, segment: usize) -> &[[f32; 2]];
    /// Triangles as triples of 16-bit vertex indices.
    fn faces(&self, segment: usize) -> &[[u16; 3]];
    /// Line segments as pairs of 16-bit vertex indices.
    fn lines(&self, segment: usize) -> &[[u16; 2]];

    fn has_per_vertex_colors(&self) -> bool;
    fn has_per_vertex_normals(&self) -> bool;
    fn has_per_vertex_uvs(&self) -> bool;

    /// The camera frame the mesh is textured from, if any.
    fn video_texture(&self) -> Option<VideoFrame<'_>> {
        None
    }
}

/// One owned mesh segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSegment {
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub colors: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    #[serde(default)]
    pub faces: Vec<[u16; 3]>,
    #[serde(default)]
    pub lines: Vec<[u16; 2]>,
}

impl CpuSegment {
    /// A segment with positions and triangles only.
    pub fn new(positions: Vec<[f32; 3]>, faces: Vec<[u16; 3]>) -> Self {
        Self {
            positions,
            faces,
            ..Self::default()
        }
    }
}

/// An owned video frame with both planes tightly packed or padded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedVideoFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub luma: Vec<u8>,
    pub luma_bytes_per_row: usize,
    pub chroma: Vec<u8>,
    pub chroma_bytes_per_row: usize,
}

impl OwnedVideoFrame {
    /// A tightly packed full-range 4:2:0 frame filled with mid gray.
    pub fn gray(width: u32, height: u32) -> Self {
        let chroma_row = (width / 2) as usize * 2;
        Self {
            width,
            height,
            format: PixelFormat::Yuv420BiPlanarFullRange,
            luma: vec![128; width as usize * height as usize],
            luma_bytes_per_row: width as usize,
            chroma: vec![128; chroma_row * (height / 2) as usize],
            chroma_bytes_per_row: chroma_row,
        }
    }

    /// Borrows this frame as a [`VideoFrame`].
    pub fn as_frame(&self) -> VideoFrame<'_> {
        VideoFrame {
            width: self.width,
            height: self.height,
            format: self.format,
            luma: Plane {
                data: &self.luma,
                bytes_per_row: self.luma_bytes_per_row,
            },
            chroma: Plane {
                data: &self.chroma,
                bytes_per_row: self.chroma_bytes_per_row,
            },
        }
    }
}

/// An owned segmented mesh.
///
/// Capability flags are derived from the data: a mesh has per-vertex
/// colors only if every segment has one color per vertex, and likewise for
/// normals and UVs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuMesh {
    pub segments: Vec<CpuSegment>,
    #[serde(default)]
    pub video: Option<OwnedVideoFrame>,
}

impl CpuMesh {
    pub fn new(segments: Vec<CpuSegment>) -> Self {
        Self {
            segments,
            video: None,
        }
    }

    /// Attaches a camera frame for textured rendering.
    pub fn with_video(mut self, frame: OwnedVideoFrame) -> Self {
        self.video = Some(frame);
        self
    }

    fn all_segments(&self, per_vertex: impl Fn(&CpuSegment) -> usize) -> bool {
        !self.segments.is_empty()
            && self
                .segments
                .iter()
                .all(|s| per_vertex(s) == s.positions.len())
    }
}

impl MeshSource for CpuMesh {
    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn vertex_count(&self, segment: usize) -> usize {
        self.segments[segment].positions.len()
    }

    fn face_count(&self, segment: usize) -> usize {
        self.segments[segment].faces.len()
    }

    fn line_count(&self, segment: usize) -> usize {
        self.segments[segment].lines.len()
    }

    fn positions(&self, segment: usize) -> &[[f32; 3]] {
        &self.segments[segment].positions
    }

    fn normals(&self, segment: usize) -> &[[f32; 3]] {
        &self.segments[segment].normals
    }

    fn colors(&self, segment: usize) -> &[[f32; 3]] {
        &self.segments[segment].colors
    }

    fn uvs(&self, segment: usize) -> &[[f32; 2]] {
        &self.segments[segment].uvs
    }

    fn faces(&self, segment: usize) -> &[[u16; 3]] {
        &self.segments[segment].faces
    }

    fn lines(&self, segment: usize) -> &[[u16; 2]] {
        &self.segments[segment].lines
    }

    fn has_per_vertex_colors(&self) -> bool {
        self.all_segments(|s| s.colors.len())
    }

    fn has_per_vertex_normals(&self) -> bool {
        self.all_segments(|s| s.normals.len())
    }

    fn has_per_vertex_uvs(&self) -> bool {
        self.all_segments(|s| s.uvs.len())
    }

    fn video_texture(&self) -> Option<VideoFrame<'_>> {
        self.video.as_ref().map(OwnedVideoFrame::as_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CpuSegment {
        CpuSegment::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn counts_come_from_segment_data() {
        let mut seg = triangle();
        seg.lines = vec![[0, 1], [1, 2], [2, 0]];
        let mesh = CpuMesh::new(vec![seg]);
        assert_eq!(mesh.segment_count(), 1);
        assert_eq!(mesh.vertex_count(0), 3);
        assert_eq!(mesh.face_count(0), 1);
        assert_eq!(mesh.line_count(0), 3);
    }

    #[test]
    fn capabilities_require_every_segment() {
        let mut colored = triangle();
        colored.colors = vec![[1.0, 0.0, 0.0]; 3];
        let mesh = CpuMesh::new(vec![colored.clone(), triangle()]);
        assert!(!mesh.has_per_vertex_colors());

        let mesh = CpuMesh::new(vec![colored.clone(), colored]);
        assert!(mesh.has_per_vertex_colors());
        assert!(!mesh.has_per_vertex_normals());
        assert!(!mesh.has_per_vertex_uvs());
    }

    #[test]
    fn empty_mesh_has_no_capabilities() {
        let mesh = CpuMesh::default();
        assert!(!mesh.has_per_vertex_colors());
        assert!(!mesh.has_per_vertex_normals());
        assert!(!mesh.has_per_vertex_uvs());
        assert!(mesh.video_texture().is_none());
    }

    #[test]
    fn gray_frame_has_matching_plane_sizes() {
        let frame = OwnedVideoFrame::gray(16, 8);
        assert_eq!(frame.luma.len(), 128);
        assert_eq!(frame.chroma.len(), 8 * 4 * 2);
        let view = frame.as_frame();
        assert_eq!(view.format, PixelFormat::Yuv420BiPlanarFullRange);
        assert_eq!(view.chroma.bytes_per_row, 16);
    }

    #[test]
    fn with_video_exposes_frame() {
        let mesh = CpuMesh::new(vec![triangle()]).with_video(OwnedVideoFrame::gray(4, 4));
        let frame = mesh.video_texture().expect("frame attached");
        assert_eq!((frame.width, frame.height), (4, 4));
    }

    #[test]
    fn cpu_mesh_deserializes_with_optional_attributes_missing() {
        let json = r#"{"segments":[{"positions":[[0,0,0],[1,0,0],[0,1,0]],"faces":[[0,1,2]]}]}"#;
        let mesh: CpuMesh = serde_json::from_str(json).unwrap();
        assert_eq!(mesh, CpuMesh::new(vec![triangle()]));
    }

    #[test]
    fn mesh_source_is_object_safe() {
        let mesh = CpuMesh::new(vec![triangle()]);
        let source: &dyn MeshSource = &mesh;
        assert_eq!(source.segment_count(), 1);
    }
}
