//! Traffic zones reported by the backend.

use chapchap_geography_models::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TrafficLevel;

/// Center and radius of a zone, as nested in the backend payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCoordinates {
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Radius in meters.
    pub radius: f64,
}

/// A named area with an observed traffic level.
///
/// Read-only to the client. The level is kept as the raw integer so an
/// out-of-range value from the backend still deserializes and renders with
/// the scale's fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficZone {
    /// Backend identifier.
    #[serde(default)]
    pub id: String,
    /// Display name, e.g. `"Plateau Centre"`.
    pub name: String,
    /// Center and radius.
    pub coordinates: ZoneCoordinates,
    /// Raw traffic level, nominally 1-5.
    pub traffic_level: i64,
    /// When the level was observed.
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl TrafficZone {
    /// Zone center.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        GeoPoint::new(self.coordinates.lat, self.coordinates.lng)
    }

    /// Zone radius in meters.
    #[must_use]
    pub const fn radius_meters(&self) -> f64 {
        self.coordinates.radius
    }

    /// Typed level, `None` when the backend sent an out-of-range value.
    #[must_use]
    pub const fn level(&self) -> Option<TrafficLevel> {
        TrafficLevel::from_value(self.traffic_level)
    }

    /// When the level was observed.
    #[must_use]
    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Hover text, e.g. `"Adjamé - Trafic 5/5"`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} - Trafic {}/5", self.name, self.traffic_level)
    }
}
