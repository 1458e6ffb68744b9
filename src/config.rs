//! Widget configuration
//!
//! Loaded from an optional JSON file next to the binary. Every field has a
//! default so a partial (or absent) file still yields a working display.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "capwall.json";

const DEFAULT_API_URL: &str =
    "https://api.coingecko.com/api/v3/coins/live-on-treadmill-till-100mill";
const DEFAULT_VIDEO_URL: &str = "https://www.youtube.com/embed/HhKQvMCnuO8?autoplay=1&mute=1&rel=0";
const DEFAULT_TICKER_TEXT: &str =
    "$TREAD  +++  LIVE ON TREADMILL TILL 100 MILL  +++  EVERY STEP COUNTS  +++  ";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Endpoint returning `{ market_data: { market_cap: { usd } } }`
    pub api_url: String,
    /// Market-cap target the bar measures against
    pub goal: f64,
    /// Value substituted when live data cannot be obtained
    pub fallback_market_cap: f64,
    /// Auto-refresh cadence; also the only retry mechanism
    pub refresh_interval_secs: f32,
    pub ticker_text: String,
    /// Embed URL loaded into the video panel when the modal opens
    pub video_url: String,
    /// Snap animations instead of easing them
    pub reduced_motion: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            goal: 100_000_000.0,
            fallback_market_cap: 250_000.0,
            refresh_interval_secs: 30.0,
            ticker_text: DEFAULT_TICKER_TEXT.to_string(),
            video_url: DEFAULT_VIDEO_URL.to_string(),
            reduced_motion: false,
        }
    }
}

impl WidgetConfig {
    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    /// A malformed file is reported and also falls back.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.goal, 100_000_000.0);
        assert_eq!(config.fallback_market_cap, 250_000.0);
        assert_eq!(config.refresh_interval_secs, 30.0);
        assert!(!config.reduced_motion);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: WidgetConfig = serde_json::from_str(r#"{"goal": 5000000}"#).unwrap();
        assert_eq!(config.goal, 5_000_000.0);
        assert_eq!(config.fallback_market_cap, 250_000.0);
        assert_eq!(config.api_url, WidgetConfig::default().api_url);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = WidgetConfig::default();
        config.reduced_motion = true;
        config.refresh_interval_secs = 5.0;
        let json = serde_json::to_string(&config).unwrap();
        let back: WidgetConfig = serde_json::from_str(&json).unwrap();
        assert!(back.reduced_motion);
        assert_eq!(back.refresh_interval_secs, 5.0);
    }
}
