//! Client settings
//!
//! Read from LocalStorage on the web build. Every field has a default so a
//! partial JSON object is enough to override a single value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_RADIUS, REPEAT_PERIOD_MS, TICK_INTERVAL_MS};
use crate::error::ClientError;
use crate::input::KeyBindings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Connection ===
    /// WebSocket endpoint; derived from the page location when unset
    pub server_url: Option<String>,

    // === Rendering ===
    /// Server tick interval (ms), the base interpolation duration
    pub tick_interval_ms: f32,
    /// Follow the measured snapshot rate instead of the fixed interval
    pub adaptive_cadence: bool,
    /// Ball radius (px), must match the server's
    pub ball_radius: f32,

    // === Input ===
    /// Paddle move period while a direction key is held (ms)
    pub repeat_period_ms: u32,
    pub keys: KeyBindings,

    // === Diagnostics ===
    /// `log` level name: error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,

            tick_interval_ms: TICK_INTERVAL_MS,
            adaptive_cadence: true,
            ball_radius: BALL_RADIUS,

            repeat_period_ms: REPEAT_PERIOD_MS,
            keys: KeyBindings::default(),

            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_pong_settings";

    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Nominal snapshot interval (ms), the default when the stored value is
    /// not a positive number
    pub fn tick_interval(&self) -> f32 {
        if self.tick_interval_ms.is_finite() && self.tick_interval_ms > 0.0 {
            self.tick_interval_ms
        } else {
            TICK_INTERVAL_MS
        }
    }

    pub fn repeat_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.repeat_period_ms.max(1)))
    }

    /// Configured log level, `Info` if the name is unknown
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => return settings,
                    // logger is not up yet; report through the console
                    Err(e) => web_sys::console::warn_1(
                        &format!("Ignoring stored settings: {}", e).into(),
                    ),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"repeat_period_ms": 30, "keys": {"start": ["Enter"]}}"#)
            .unwrap();
        assert_eq!(settings.repeat_period(), Duration::from_millis(30));
        assert_eq!(settings.keys.start, vec!["Enter".to_string()]);
        assert_eq!(settings.keys.left, KeyBindings::default().left);
        assert_eq!(settings.tick_interval_ms, TICK_INTERVAL_MS);
        assert!(settings.adaptive_cadence);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json("{").is_err());
        assert!(Settings::from_json(r#"{"repeat_period_ms": "fast"}"#).is_err());
    }

    #[test]
    fn test_tick_interval_must_be_positive() {
        for json in [r#"{"tick_interval_ms": -16}"#, r#"{"tick_interval_ms": 0}"#] {
            let settings = Settings::from_json(json).unwrap();
            assert_eq!(settings.tick_interval(), TICK_INTERVAL_MS);
        }
        let settings = Settings::from_json(r#"{"tick_interval_ms": 33.5}"#).unwrap();
        assert_eq!(settings.tick_interval(), 33.5);
    }

    #[test]
    fn test_log_level_fallback() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_level(), log::Level::Info);
        settings.log_level = "debug".into();
        assert_eq!(settings.log_level(), log::Level::Debug);
        settings.log_level = "loud".into();
        assert_eq!(settings.log_level(), log::Level::Info);
    }

    #[test]
    fn test_zero_period_clamped() {
        let settings = Settings {
            repeat_period_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.repeat_period(), Duration::from_millis(1));
    }
}
