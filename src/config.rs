//! Configuration for a zone layer.

use crate::engine::DrawingTool;
use serde::Deserialize;

/// Zone layer configuration.
///
/// Hosts that keep their viewer settings in JSON can embed this struct
/// directly; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Allow drawing new shapes.
    pub drawing_enabled: bool,

    /// Tool used for new shapes.
    pub drawing_tool: DrawingTool,

    /// IRI of the annotated image, written into `target.source`.
    pub image_source: Option<String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            drawing_enabled: false,
            drawing_tool: DrawingTool::Rect,
            image_source: None,
        }
    }

    /// Allow drawing new shapes.
    pub fn with_drawing(mut self, enable: bool) -> Self {
        self.drawing_enabled = enable;
        self
    }

    /// Set the drawing tool.
    pub fn with_drawing_tool(mut self, tool: DrawingTool) -> Self {
        self.drawing_tool = tool;
        self
    }

    /// Set the image IRI.
    pub fn with_image_source(mut self, source: impl Into<String>) -> Self {
        self.image_source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayerConfig::default();
        assert!(!config.drawing_enabled);
        assert_eq!(config.drawing_tool, DrawingTool::Rect);
        assert_eq!(config.image_source, None);
    }

    #[test]
    fn test_builder() {
        let config = LayerConfig::new()
            .with_drawing(true)
            .with_drawing_tool(DrawingTool::Polygon)
            .with_image_source("https://example.org/img.jpg");
        assert!(config.drawing_enabled);
        assert_eq!(config.drawing_tool, DrawingTool::Polygon);
        assert_eq!(config.image_source.as_deref(), Some("https://example.org/img.jpg"));
    }

    #[test]
    fn test_partial_json() {
        let config: LayerConfig = serde_json::from_str(r#"{"drawing_tool": "polygon"}"#).unwrap();
        assert_eq!(config, LayerConfig::new().with_drawing_tool(DrawingTool::Polygon));
    }

    #[test]
    fn test_unknown_tool_in_json() {
        assert!(serde_json::from_str::<LayerConfig>(r#"{"drawing_tool": "lasso"}"#).is_err());
    }
}
