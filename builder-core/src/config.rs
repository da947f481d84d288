//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult};

/// Tunables for the canvas editor.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Width floor applied while resizing.
    pub min_width: f32,
    /// Height floor applied while resizing.
    pub min_height: f32,
    /// Offset applied on both axes to a duplicate.
    pub duplicate_offset: f32,
    /// X position for newly added elements.
    pub spawn_x: f32,
    /// Y position for newly added elements.
    pub spawn_y: f32,
    /// Maximum number of undo steps kept (0 disables history).
    pub history_limit: usize,
    /// Z-index of the selected element.
    pub selected_z_index: i32,
    /// Z-index of every other element.
    pub base_z_index: i32,
    /// Hit radius around a resize handle anchor, for hosts without a DOM.
    pub handle_hit_radius: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            min_width: 50.0,
            min_height: 30.0,
            duplicate_offset: 20.0,
            spawn_x: 50.0,
            spawn_y: 50.0,
            history_limit: 100,
            selected_z_index: 1000,
            base_z_index: 1,
            handle_hit_radius: 6.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Serialization`] on malformed JSON and
    /// [`EditorError::InvalidConfig`] if validation fails.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that sizes are finite and non-negative and the canvas is not empty.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EditorResult<()> {
        let fields = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("duplicate_offset", self.duplicate_offset),
            ("spawn_x", self.spawn_x),
            ("spawn_y", self.spawn_y),
            ("handle_hit_radius", self.handle_hit_radius),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                tracing::warn!("Rejected config field {name}={value}");
                return Err(EditorError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(EditorError::InvalidConfig(
                "canvas must have a non-zero size".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.min_width - 50.0).abs() < f32::EPSILON);
        assert!((config.min_height - 30.0).abs() < f32::EPSILON);
        assert!((config.duplicate_offset - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            EditorConfig::from_json(r#"{"canvas_width": 960.0, "history_limit": 5}"#).expect("valid");
        assert!((config.canvas_width - 960.0).abs() < f32::EPSILON);
        assert_eq!(config.history_limit, 5);
        assert!((config.canvas_height - 800.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_negative_minimum() {
        let result = EditorConfig::from_json(r#"{"min_width": -1.0}"#);
        assert!(matches!(result, Err(EditorError::InvalidConfig(msg)) if msg.contains("min_width")));
    }

    #[test]
    fn test_rejects_zero_canvas() {
        let result = EditorConfig::from_json(r#"{"canvas_height": 0.0}"#);
        assert!(matches!(result, Err(EditorError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = EditorConfig::from_json("{ nope }");
        assert!(matches!(result, Err(EditorError::Serialization(_))));
    }
}
