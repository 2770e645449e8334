//! Player configuration
//!
//! Loaded once at startup from a JSON file given on the command line.
//! Missing fields fall back to defaults; invalid values degrade instead of
//! failing the player (unknown speeds become 1.0, volume clamps to 0..=100).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Hosted,
    Native,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub backend: BackendKind,
    pub title: String,
    /// Secondary duration source, normalized seconds. Used while the
    /// backend still reports an unknown (zero) duration.
    pub duration: Option<f64>,
    pub captions_url: Option<String>,
    /// Trim region bounds, normalized seconds. Out-of-range values are
    /// corrected once the real duration is known.
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub speed: String,
    pub volume: u32,
    /// Auto-hide the caption panel after a short idle period while the
    /// caption toggle is off.
    pub autohide_captions: bool,
    /// Start with the caption panel toggled off.
    pub hide_captions: bool,
    /// Rendering ratio of the video surface.
    pub element_ratio: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Hosted,
            title: "Untitled media".to_string(),
            duration: None,
            captions_url: None,
            start_time: None,
            end_time: None,
            speed: "1.0".to_string(),
            volume: 100,
            autohide_captions: true,
            hide_captions: false,
            element_ratio: 16.0 / 9.0,
        }
    }
}

impl PlayerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: PlayerConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"backend": "native", "end_time": 90.5}"#).unwrap();
        assert_eq!(config.backend, BackendKind::Native);
        assert_eq!(config.end_time, Some(90.5));
        assert_eq!(config.speed, "1.0");
        assert_eq!(config.volume, 100);
        assert!(config.captions_url.is_none());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(serde_json::from_str::<PlayerConfig>(r#"{"backend": "flash"}"#).is_err());
    }
}
