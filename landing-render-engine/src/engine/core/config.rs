use bevy::prelude::*;
use constants::scene::{DEFAULT_MODEL_PATH, DEFAULT_MODEL_SCALE, DEFAULT_ROTATION_SPEED};
use constants::timing::DEFAULT_READY_TIMEOUT_MS;
use serde::Deserialize;
use std::time::Duration;

const EMBEDDED_CONFIG: &str = include_str!(concat!(env!("OUT_DIR"), "/landing_config.json"));

pub const DEFAULT_SNAPSHOT_PATH: &str = "data/store_snapshot.json";

/// Runtime configuration for the hero scene and the data store.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub model_path: String,
    /// Radians per second.
    pub rotation_speed: f32,
    pub model_scale: f32,
    pub ready_timeout_ms: u64,
    /// Skip the 3D view and draw the flat halftone instead.
    pub prefer_fallback: bool,
    pub store_url: Option<String>,
    pub store_anon_key: Option<String>,
    pub snapshot_path: String,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            rotation_speed: DEFAULT_ROTATION_SPEED,
            model_scale: DEFAULT_MODEL_SCALE,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            prefer_fallback: false,
            store_url: None,
            store_anon_key: None,
            snapshot_path: DEFAULT_SNAPSHOT_PATH.to_string(),
        }
    }
}

impl LandingConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Configuration generated by `build.rs`, or defaults if it does not parse.
    pub fn embedded() -> Self {
        match Self::from_json(EMBEDDED_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                warn!("Embedded landing config is invalid, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Store URL and anon key, when both are set and non-blank.
    pub fn store_credentials(&self) -> Option<(&str, &str)> {
        let url = self.store_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let key = self
            .store_anon_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = LandingConfig::from_json(r#"{ "rotation_speed": 0.5 }"#).unwrap();
        assert_eq!(config.rotation_speed, 0.5);
        assert_eq!(config.model_path, DEFAULT_MODEL_PATH);
        assert_eq!(config.ready_timeout(), Duration::from_millis(8000));
        assert!(!config.prefer_fallback);
    }

    #[test]
    fn store_credentials_need_both_values() {
        let mut config = LandingConfig::default();
        assert_eq!(config.store_credentials(), None);

        config.store_url = Some("https://store.example.co/".to_string());
        assert_eq!(config.store_credentials(), None);

        config.store_anon_key = Some("   ".to_string());
        assert_eq!(config.store_credentials(), None);

        config.store_anon_key = Some("anon".to_string());
        assert_eq!(
            config.store_credentials(),
            Some(("https://store.example.co", "anon"))
        );
    }

    #[test]
    fn embedded_config_parses() {
        assert!(LandingConfig::from_json(EMBEDDED_CONFIG).is_ok());
    }
}
