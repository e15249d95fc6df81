//! Rendering modes and per-frame reconciliation against mesh attributes.
//!
//! The requested mode can disagree with what the last upload provided:
//! a scan without color can still be shown textured, and a scan without a
//! camera frame can still be shown in color. [`reconcile`] decides, once
//! per frame, which mode is drawn and whether the frame must be skipped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shading technique applied to every segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderingMode {
    /// Wireframe lines over the mesh edges.
    XRay,
    /// Lit surface shaded with the per-vertex colors.
    PerVertexColor,
    /// Surface sampled from the luma/chroma video textures.
    Textured,
    /// Lit uniform gray surface.
    #[default]
    LightedGray,
}

impl RenderingMode {
    /// Every mode, in technique order.
    pub const ALL: [RenderingMode; 4] = [
        RenderingMode::XRay,
        RenderingMode::PerVertexColor,
        RenderingMode::Textured,
        RenderingMode::LightedGray,
    ];

    /// Whether the mode shows scan color, and so clears to a light background.
    pub fn is_colored(self) -> bool {
        matches!(self, RenderingMode::PerVertexColor | RenderingMode::Textured)
    }
}

/// Which optional attributes the last upload provided, for all segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeAvailability {
    pub color: bool,
    pub normal: bool,
    pub uv: bool,
    /// A video frame was attached to the mesh.
    pub texture: bool,
}

impl AttributeAvailability {
    fn can_texture(&self) -> bool {
        self.texture && self.uv
    }
}

/// Why a frame issues no draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `PerVertexColor` requested but the mesh has no colors.
    MissingColors,
    /// `Textured` requested but there is no frame, no UVs, or the
    /// luma/chroma pair failed to build.
    MissingTextures,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingColors => f.write_str("the mesh has no colors"),
            SkipReason::MissingTextures => f.write_str("textures are unavailable"),
        }
    }
}

/// The outcome of reconciling a mode for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// The mode to draw with, and the mode to store.
    pub mode: RenderingMode,
    /// The requested mode, if it was substituted.
    pub switched_from: Option<RenderingMode>,
    /// Set if nothing may be drawn this frame.
    pub skip: Option<SkipReason>,
}

/// Reconciles `requested` against the attributes of the current upload.
///
/// Only `PerVertexColor` and `Textured` are ever substituted, and only for
/// each other:
///
/// - `PerVertexColor` without colors becomes `Textured` when a frame and
///   UVs are present.
/// - `Textured` without a frame or UVs becomes `PerVertexColor` when
///   colors are present.
///
/// `textures_ready` reports whether the luma/chroma pair actually exists;
/// an attached frame whose textures failed to build still skips.
pub fn reconcile(
    requested: RenderingMode,
    available: &AttributeAvailability,
    textures_ready: bool,
) -> FramePlan {
    let mode = match requested {
        RenderingMode::PerVertexColor if !available.color && available.can_texture() => {
            RenderingMode::Textured
        }
        RenderingMode::Textured if !available.can_texture() && available.color => {
            RenderingMode::PerVertexColor
        }
        other => other,
    };

    let skip = match mode {
        RenderingMode::PerVertexColor if !available.color => Some(SkipReason::MissingColors),
        RenderingMode::Textured if !available.can_texture() || !textures_ready => {
            Some(SkipReason::MissingTextures)
        }
        _ => None,
    };

    FramePlan {
        mode,
        switched_from: (mode != requested).then_some(requested),
        skip,
    }
}
