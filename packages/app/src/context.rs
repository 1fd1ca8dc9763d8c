//! Shared projection, scale and gazetteer.

use chapchap_config::AppConfig;
use chapchap_geography_models::GeoBounds;
use chapchap_projection::{GeoProjector, IncidentLocator, ProjectionError};
use chapchap_route::Gazetteer;
use chapchap_traffic_models::TrafficScale;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which renderer is active.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MapMode {
    /// The mapping provider's map, with overlays.
    Live,
    /// The self-contained simulated map.
    Simulated,
}

impl MapMode {
    /// Live when a mapping credential is configured, simulated otherwise.
    #[must_use]
    pub fn for_config(config: &AppConfig) -> Self {
        if config.has_map_credential() {
            Self::Live
        } else {
            Self::Simulated
        }
    }
}

/// The single projection, traffic scale and place list used by every view.
#[derive(Debug, Clone)]
pub struct MapContext {
    /// Projector for the simulated surface.
    pub projector: GeoProjector,
    /// Traffic level lookup.
    pub scale: TrafficScale,
    /// Known places for simulated routing.
    pub gazetteer: Gazetteer,
}

impl MapContext {
    /// Builds a context over `bounds` with the standard scale and the
    /// Abidjan gazetteer.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidBounds`] if `bounds` is malformed.
    pub fn new(bounds: GeoBounds) -> Result<Self, ProjectionError> {
        Ok(Self {
            projector: GeoProjector::new(bounds)?,
            scale: TrafficScale::STANDARD,
            gazetteer: Gazetteer::abidjan(),
        })
    }

    /// Builds a context over the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidBounds`] if the configured bounds
    /// are malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProjectionError> {
        Self::new(config.bounds)
    }

    /// A locator sharing this context's projector.
    #[must_use]
    pub const fn locator(&self) -> IncidentLocator {
        IncidentLocator::new(self.projector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_credential() {
        let mut config = AppConfig::default();
        assert_eq!(MapMode::for_config(&config), MapMode::Simulated);
        config.google_maps_api_key = Some("key".to_string());
        assert_eq!(MapMode::for_config(&config), MapMode::Live);
    }

    #[test]
    fn context_rejects_inverted_bounds() {
        let bounds = GeoBounds {
            min_lat: 5.4,
            max_lat: 5.2,
            min_lng: -4.1,
            max_lng: -3.9,
        };
        assert!(matches!(
            MapContext::new(bounds),
            Err(ProjectionError::InvalidBounds(_))
        ));
    }
}
