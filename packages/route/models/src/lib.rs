#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route request, summary, geometry and composed route types.
//!
//! A route shown to the user has two independent sources: the backend's
//! [`RouteSummary`] (durations, distance, advice) and a [`RouteGeometry`]
//! from the mapping provider or synthesized locally. [`ComposedRoute`]
//! pairs them without reconciling fields between them.

use chapchap_geography_models::GeoPoint;
use chapchap_traffic_models::{Color, TrafficLevel, TrafficScale};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Request body for the backend route endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Free-text origin as typed by the user.
    pub origin: String,
    /// Free-text destination as typed by the user.
    pub destination: String,
    /// Optional departure time (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
}

impl RouteRequest {
    /// Creates a request departing now.
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_time: None,
        }
    }

    /// Whether both ends have non-blank text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.origin.trim().is_empty() && !self.destination.trim().is_empty()
    }
}

/// Traffic on a route, either as a numeric level or as the backend's label.
///
/// Numbers are kept raw so that out-of-range levels still deserialize and
/// resolve to the scale's fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrafficIndicator {
    /// Numeric level, 1-5 when known.
    Level(i64),
    /// Text such as `"Modéré"`.
    Label(String),
}

impl TrafficIndicator {
    /// Resolves to a level through `scale`, `None` if unknown.
    #[must_use]
    pub fn level(&self, scale: &TrafficScale) -> Option<TrafficLevel> {
        match self {
            Self::Level(value) => TrafficLevel::from_value(*value),
            Self::Label(label) => scale.level_for_label(label),
        }
    }

    /// Badge color, the scale's fallback when the level is unknown.
    #[must_use]
    pub fn color(&self, scale: &TrafficScale) -> Color {
        match self {
            Self::Level(value) => scale.color_of(*value),
            Self::Label(_) => self
                .level(scale)
                .map_or_else(|| scale.fallback_color(), |level| scale.color(level)),
        }
    }

    /// Text to display, using the scale for numeric levels.
    #[must_use]
    pub fn display_label(&self, scale: &TrafficScale) -> String {
        match self {
            Self::Level(value) => scale.label_of(*value).to_string(),
            Self::Label(label) => label.clone(),
        }
    }
}

impl From<TrafficLevel> for TrafficIndicator {
    fn from(level: TrafficLevel) -> Self {
        Self::Level(level.value())
    }
}

/// Backend-computed route summary.
///
/// Text fields are opaque and never parsed. Every field defaults so a
/// partial payload still deserializes; [`RouteSummary::missing_fields`]
/// reports what a composer must reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Backend identifier.
    #[serde(default)]
    pub id: String,
    /// Origin as echoed by the backend.
    #[serde(default)]
    pub origin: String,
    /// Destination as echoed by the backend.
    #[serde(default)]
    pub destination: String,
    /// e.g. `"27 min"`.
    #[serde(default)]
    pub duration_text: String,
    /// e.g. `"12 km"`.
    #[serde(default)]
    pub distance_text: String,
    /// Overall traffic on the route.
    #[serde(default)]
    pub traffic_level: Option<TrafficIndicator>,
    /// Advice text.
    #[serde(default)]
    pub ai_suggestion: String,
}

impl RouteSummary {
    /// Names of required text fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("duration_text", &self.duration_text),
            ("distance_text", &self.distance_text),
            ("ai_suggestion", &self.ai_suggestion),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A past route from the backend history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteHistoryEntry {
    /// Origin text.
    pub origin: String,
    /// Destination text.
    pub destination: String,
    /// e.g. `"27 min"`.
    pub duration_text: String,
    /// e.g. `"12 km"`.
    pub distance_text: String,
    /// Traffic at the time, if recorded.
    #[serde(default)]
    pub traffic_level: Option<TrafficIndicator>,
    /// When the route was computed.
    #[serde(default, with = "optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Polyline and endpoint markers of a route.
///
/// `markers[0]` is the origin and `markers[1]` the destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    /// Ordered path points.
    pub polyline: Vec<GeoPoint>,
    /// Ordered markers: origin, destination.
    pub markers: Vec<GeoPoint>,
}

impl RouteGeometry {
    /// Origin marker, if present.
    #[must_use]
    pub fn origin(&self) -> Option<GeoPoint> {
        self.markers.first().copied()
    }

    /// Destination marker, if present.
    #[must_use]
    pub fn destination(&self) -> Option<GeoPoint> {
        self.markers.get(1).copied()
    }
}

/// Where a composed route's geometry came from.
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
#[strum(serialize_all = "lowercase")]
pub enum RouteSource {
    /// Geometry from the mapping provider.
    External,
    /// Geometry synthesized for the simulated map.
    Simulated,
}

/// A backend summary paired with a geometry.
///
/// Built fresh for every successful calculation and replaced wholesale by
/// the next one; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedRoute {
    /// Backend summary, verbatim.
    pub summary: RouteSummary,
    /// Geometry, verbatim from the provider or synthesized.
    pub geometry: RouteGeometry,
    /// Which kind of geometry this is.
    pub source: RouteSource,
}

/// Travel mode passed to the mapping provider.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TravelMode {
    /// By car
    #[default]
    Driving,
    /// On foot
    Walking,
    /// By bicycle
    Bicycling,
    /// Public transport
    Transit,
}

/// Directions request sent to the mapping provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    /// Origin text.
    pub origin: String,
    /// Destination text.
    pub destination: String,
    /// Travel mode.
    pub travel_mode: TravelMode,
    /// Whether highways should be avoided.
    pub avoid_highways: bool,
    /// Whether toll roads should be avoided.
    pub avoid_tolls: bool,
}

impl From<&RouteRequest> for ProviderRequest {
    fn from(request: &RouteRequest) -> Self {
        Self {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            travel_mode: TravelMode::Driving,
            avoid_highways: false,
            avoid_tolls: false,
        }
    }
}

/// Status reported by the mapping provider.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    /// A route was found.
    Ok,
    /// An endpoint could not be geocoded.
    NotFound,
    /// No route between the endpoints.
    ZeroResults,
    /// Quota exhausted.
    OverQueryLimit,
    /// Credential rejected.
    RequestDenied,
    /// Malformed request.
    InvalidRequest,
    /// Anything else.
    #[serde(other)]
    UnknownError,
}

/// Result of a provider directions call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Outcome status.
    pub status: ProviderStatus,
    /// Geometry, present when `status` is [`ProviderStatus::Ok`].
    #[serde(default)]
    pub geometry: Option<RouteGeometry>,
}

mod optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                chapchap_traffic_models::timestamp::parse(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {raw}"))
                })
            })
            .transpose()
    }
}
