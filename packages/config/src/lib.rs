#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Process-wide configuration.
//!
//! [`AppConfig`] is assembled once at startup from built-in defaults, an
//! optional TOML file (`CHAPCHAP_CONFIG`), environment overrides, and
//! optionally the backend's `/api/config` payload ([`RemoteConfig`]). It is
//! then installed with [`init`] and read through [`get`]; it never changes
//! afterwards.

use std::path::Path;
use std::sync::OnceLock;

use chapchap_geography_models::{GeoBounds, GeoPoint, InvalidBoundsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "CHAPCHAP_CONFIG";
/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_VAR: &str = "CHAPCHAP_BACKEND_URL";
/// Environment variable supplying the mapping provider credential.
pub const MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configured map window is malformed.
    #[error(transparent)]
    InvalidBounds(#[from] InvalidBoundsError),

    /// [`init`] was called twice.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend base URL, without the `/api` suffix.
    pub backend_url: String,
    /// Mapping provider credential. Absent means the simulated map is used.
    pub google_maps_api_key: Option<String>,
    /// Initial live-map center.
    pub default_center: GeoPoint,
    /// Initial live-map zoom.
    pub default_zoom: u8,
    /// Window shown by the simulated map.
    pub bounds: GeoBounds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8001".to_string(),
            google_maps_api_key: None,
            default_center: GeoPoint::new(5.3364, -4.0267),
            default_zoom: 12,
            bounds: GeoBounds::ABIDJAN,
        }
    }
}

/// Payload of the backend's `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Mapping provider credential, if the backend has one.
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
    /// Initial live-map center.
    pub default_center: GeoPoint,
    /// Initial live-map zoom.
    pub default_zoom: u8,
}

impl AppConfig {
    /// Loads from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if the resulting bounds are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`].
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                log::info!("Loading configuration from {path}");
                Self::from_file(Path::new(&path))?
            }
            None => Self::default(),
        };

        if let Some(url) = lookup(BACKEND_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.backend_url = url;
        }
        if let Some(key) = lookup(MAPS_API_KEY_VAR).filter(|v| !v.trim().is_empty()) {
            config.google_maps_api_key = Some(key);
        }

        config.bounds.validate()?;
        Ok(config)
    }

    /// Parses a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O or parse failure.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text does not parse and
    /// [`ConfigError::InvalidBounds`] if the bounds are malformed.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.bounds.validate()?;
        Ok(config)
    }

    /// Applies the backend's config. A local credential is kept when the
    /// backend does not supply one.
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        if remote.google_maps_api_key.is_some() {
            self.google_maps_api_key = remote.google_maps_api_key;
        }
        self.default_center = remote.default_center;
        self.default_zoom = remote.default_zoom;
        self
    }

    /// `backend_url` joined with `/api`.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }

    /// Whether a mapping provider credential is configured.
    #[must_use]
    pub fn has_map_credential(&self) -> bool {
        self.google_maps_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

/// Installs the process-wide configuration.
///
/// # Errors
///
/// Returns [`ConfigError::AlreadyInitialized`] if called more than once.
pub fn init(config: AppConfig) -> Result<&'static AppConfig, ConfigError> {
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    CONFIG.get().ok_or(ConfigError::AlreadyInitialized)
}

/// The process-wide configuration, if [`init`] has run.
#[must_use]
pub fn get() -> Option<&'static AppConfig> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::load_with(env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.has_map_credential());
        assert_eq!(config.api_base(), "http://127.0.0.1:8001/api");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::load_with(env(&[
            (BACKEND_URL_VAR, "https://chapchap.example/"),
            (MAPS_API_KEY_VAR, "key-123"),
        ]))
        .unwrap();
        assert_eq!(config.api_base(), "https://chapchap.example/api");
        assert!(config.has_map_credential());
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let config = AppConfig::load_with(env(&[(MAPS_API_KEY_VAR, "  ")])).unwrap();
        assert_eq!(config.google_maps_api_key, None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            backend_url = "http://10.0.0.5:8001"
            default_zoom = 13

            [bounds]
            minLat = 5.1
            maxLat = 5.5
            minLng = -4.2
            maxLng = -3.8
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.5:8001");
        assert_eq!(config.default_zoom, 13);
        assert!((config.bounds.min_lat - 5.1).abs() < f64::EPSILON);
        assert_eq!(config.default_center, AppConfig::default().default_center);
    }

    #[test]
    fn inverted_bounds_in_toml_are_rejected() {
        let err = AppConfig::from_toml_str(
            r"
            [bounds]
            minLat = 5.5
            maxLat = 5.1
            minLng = -4.2
            maxLng = -3.8
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load_with(env(&[(CONFIG_PATH_VAR, "/nonexistent/chapchap.toml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn remote_config_overrides_map_settings() {
        let remote: RemoteConfig = serde_json::from_value(serde_json::json!({
            "google_maps_api_key": null,
            "default_center": {"lat": 5.34, "lng": -4.03},
            "default_zoom": 11
        }))
        .unwrap();

        let local = AppConfig {
            google_maps_api_key: Some("local".to_string()),
            ..AppConfig::default()
        };
        let merged = local.with_remote(remote);
        assert_eq!(merged.google_maps_api_key.as_deref(), Some("local"));
        assert_eq!(merged.default_center, GeoPoint::new(5.34, -4.03));
        assert_eq!(merged.default_zoom, 11);
    }
}
