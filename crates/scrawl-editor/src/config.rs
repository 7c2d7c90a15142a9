//! Session configuration.
//!
//! Hosts may pass a JSON object with any subset of the fields below
//! (camelCase); missing fields take their defaults.

use scrawl_core::model::{Color, DEFAULT_TEXT_COLOR};
use scrawl_core::viewport::ScaleLimits;
use scrawl_render::hit::{HANDLE_RADIUS_PX, HIT_TOLERANCE_PX};
use serde::Deserialize;

/// Tunables for one editing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Undo checkpoints kept before the oldest is evicted.
    pub history_depth: usize,
    /// Quiet period before an autosave write, in milliseconds.
    pub autosave_quiet_ms: f64,
    /// Line/path hit radius in screen pixels.
    pub hit_tolerance_px: f64,
    /// Handle grab radius in screen pixels.
    pub handle_radius_px: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Colour of new text objects until the user picks another.
    pub default_text_color: String,
    /// Title used when saving with an empty title.
    pub untitled_title: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_depth: 50,
            autosave_quiet_ms: 5000.0,
            hit_tolerance_px: HIT_TOLERANCE_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
            min_scale: 0.1,
            max_scale: 4.0,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            default_text_color: DEFAULT_TEXT_COLOR.to_string(),
            untitled_title: "Untitled drawing".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse a JSON config. Invalid or inconsistent input falls back to
    /// the defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<BoardConfig>(json) {
            Ok(config) => config.validate().unwrap_or_else(|reason| {
                log::warn!("ignoring board config: {reason}");
                Self::default()
            }),
            Err(e) => {
                log::warn!("ignoring unparsable board config: {e}");
                Self::default()
            }
        }
    }

    /// Check the values are usable.
    ///
    /// # Errors
    /// Returns a description of the first invalid field.
    pub fn validate(self) -> Result<Self, String> {
        if self.history_depth == 0 {
            return Err("historyDepth must be at least 1".into());
        }
        if !(self.autosave_quiet_ms >= 0.0) {
            return Err("autosaveQuietMs must be non-negative".into());
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(format!(
                "scale range {}..{} is empty or non-positive",
                self.min_scale, self.max_scale
            ));
        }
        if !(self.zoom_in_factor > 1.0
            && self.zoom_out_factor > 0.0
            && self.zoom_out_factor < 1.0)
        {
            return Err("zoom factors must be >1 (in) and in (0,1) (out)".into());
        }
        if !(self.hit_tolerance_px >= 0.0 && self.handle_radius_px >= 0.0) {
            return Err("hit radii must be non-negative".into());
        }
        if Color::from_hex(&self.default_text_color).is_none() {
            return Err(format!(
                "defaultTextColor {:?} is not a hex colour",
                self.default_text_color
            ));
        }
        Ok(self)
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits {
            min: self.min_scale,
            max: self.max_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{"historyDepth": 10, "autosaveQuietMs": 250}"#);
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.autosave_quiet_ms, 250.0);
        assert_eq!(config.max_scale, 4.0);
        assert_eq!(config.default_text_color, "#000000");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        assert_eq!(BoardConfig::from_json(r#"{"historyDepth": 0}"#), BoardConfig::default());
        assert_eq!(
            BoardConfig::from_json(r#"{"minScale": 5, "maxScale": 2}"#),
            BoardConfig::default()
        );
        assert_eq!(
            BoardConfig::from_json(r#"{"defaultTextColor": "red"}"#),
            BoardConfig::default()
        );
        assert_eq!(BoardConfig::from_json("{"), BoardConfig::default());
    }
}
