// src/config.rs

//! Configuration for a new display window.
//!
//! Deserializable from JSON so embedders can ship a settings file; every
//! field has a sensible default and missing fields fall back to it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::display::DEFAULT_DPI;
use crate::font::DEFAULT_FONT_SIZE;

/// Settings applied when a display is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title handed to the backend.
    pub title: String,
    /// Initial window width in pixels.
    pub width_px: u32,
    /// Initial window height in pixels.
    pub height_px: u32,
    /// Dots per inch used by `Display::scale_size`. The scaling baseline
    /// is `DEFAULT_DPI`; values at or below it scale nothing. Zero means
    /// "ask the backend": the display derives its dpi from the backend's
    /// reported scale factor.
    pub dpi: i32,
    /// Default font settings.
    pub font: FontConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: "ninedraw".to_string(),
            width_px: 800,
            height_px: 600,
            dpi: DEFAULT_DPI,
            font: FontConfig::default(),
        }
    }
}

/// Default font selection; a name plus a pixel size. Shaping is up to the
/// embedding toolkit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub name: String,
    pub size: i32,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            name: "monospace".to_string(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

impl DisplayConfig {
    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = DisplayConfig::default();
        assert_eq!(config.dpi, DEFAULT_DPI);
        assert_eq!(config.font.size, DEFAULT_FONT_SIZE);
        assert!(config.width_px > 0 && config.height_px > 0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: DisplayConfig = serde_json::from_str(r#"{ "dpi": 200 }"#).unwrap();
        assert_eq!(config.dpi, 200);
        assert_eq!(config.title, DisplayConfig::default().title);
        assert_eq!(config.font.name, "monospace");
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = DisplayConfig::default();
        config.title = "demo".to_string();
        config.font.size = 14;
        let text = serde_json::to_string(&config).unwrap();
        let back: DisplayConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.title, "demo");
        assert_eq!(back.font.size, 14);
    }
}
