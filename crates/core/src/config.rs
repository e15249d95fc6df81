//! Construction-time renderer configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RendererError;
use crate::params::{param_f32, param_rgba, param_u32};

/// Texture units guaranteed by the contexts the renderer targets.
pub const MAX_TEXTURE_UNITS: u32 = 32;

/// Options fixed when the renderer is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Texture unit for luma (0-based); chroma uses the next unit.
    pub texture_unit: u32,
    /// Line width for `XRay` wireframes.
    pub line_width: f32,
    /// Clear color behind colored and textured scans.
    pub clear_color_light: [f32; 4],
    /// Clear color behind gray and wireframe scans.
    pub clear_color_dark: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_unit: 3,
            line_width: 1.0,
            clear_color_light: [0.9, 0.9, 0.9, 1.0],
            clear_color_dark: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

impl RendererConfig {
    /// Builds a config from a JSON params object, falling back to defaults
    /// for missing or mistyped keys, then validates it.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::InvalidConfig` if a value is out of range.
    pub fn from_params(params: &Value) -> Result<Self, RendererError> {
        let defaults = Self::default();
        let config = Self {
            texture_unit: param_u32(params, "texture_unit", defaults.texture_unit),
            line_width: param_f32(params, "line_width", defaults.line_width),
            clear_color_light: param_rgba(params, "clear_color_light", defaults.clear_color_light),
            clear_color_dark: param_rgba(params, "clear_color_dark", defaults.clear_color_dark),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both video texture units exist and the line width is usable.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> Result<(), RendererError> {
        if self.texture_unit >= MAX_TEXTURE_UNITS - 1 {
            return Err(RendererError::InvalidConfig(format!(
                "texture_unit {} leaves no unit for chroma (max {})",
                self.texture_unit,
                MAX_TEXTURE_UNITS - 2
            )));
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(RendererError::InvalidConfig(format!(
                "line_width must be positive, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_uses_texture_unit_three() {
        let config = RendererConfig::default();
        assert_eq!(config.texture_unit, 3);
        assert_eq!(config.line_width, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_params_reads_every_key() {
        let config = RendererConfig::from_params(&json!({
            "texture_unit": 6,
            "line_width": 2.0,
            "clear_color_light": [1.0, 1.0, 1.0],
            "clear_color_dark": [0.0, 0.0, 0.0, 0.5],
        }))
        .unwrap();
        assert_eq!(config.texture_unit, 6);
        assert_eq!(config.line_width, 2.0);
        assert_eq!(config.clear_color_light, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(config.clear_color_dark, [0.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn from_params_empty_object_gives_defaults() {
        let config = RendererConfig::from_params(&json!({})).unwrap();
        assert_eq!(config, RendererConfig::default());
    }

    #[test]
    fn last_unit_is_rejected_because_chroma_needs_the_next() {
        let err = RendererConfig::from_params(&json!({"texture_unit": 31})).unwrap_err();
        assert!(matches!(err, RendererError::InvalidConfig(_)), "got {err:?}");
        assert!(RendererConfig::from_params(&json!({"texture_unit": 30})).is_ok());
    }

    #[test]
    fn non_positive_line_width_is_rejected() {
        let config = RendererConfig {
            line_width: 0.0,
            ..RendererConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RendererConfig {
            line_width: f32::NAN,
            ..RendererConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_partial_config_with_defaults() {
        let config: RendererConfig = serde_json::from_str(r#"{"texture_unit": 4}"#).unwrap();
        assert_eq!(config.texture_unit, 4);
        assert_eq!(config.clear_color_dark, RendererConfig::default().clear_color_dark);
    }
}
