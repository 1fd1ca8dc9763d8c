//! Overlays handed to the mapping provider's live map.
//!
//! The provider draws tiles and the route itself; it only needs
//! geographic shapes with colors from the shared scale.

use chapchap_config::AppConfig;
use chapchap_geography_models::GeoPoint;
use chapchap_route_models::RouteGeometry;
use chapchap_traffic_models::Color;
use serde::Serialize;

use crate::scene::{PENDING_INCIDENT_COLOR, ZONE_OPACITY};
use crate::{AppState, MapContext};

/// A traffic zone as a geographic circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCircle {
    /// Center.
    pub center: GeoPoint,
    /// Radius in meters; the provider draws it to scale.
    pub radius_meters: f64,
    /// Fill color.
    pub color: Color,
    /// Fill opacity.
    pub opacity: f64,
    /// Hover text.
    pub title: String,
}

/// An incident marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentMarker {
    /// Location.
    pub location: GeoPoint,
    /// Marker color.
    pub color: Color,
    /// Hover text.
    pub title: String,
}

/// Everything the live map needs besides its own tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveMapView {
    /// Initial center.
    pub center: GeoPoint,
    /// Initial zoom.
    pub zoom: u8,
    /// Whether the provider's own traffic layer is shown.
    pub traffic_layer: bool,
    /// Zone circles.
    pub zones: Vec<ZoneCircle>,
    /// Active incidents.
    pub incidents: Vec<IncidentMarker>,
    /// Route geometry to hand to the provider's renderer.
    pub route: Option<RouteGeometry>,
    /// Location being reported.
    pub pending_incident: Option<GeoPoint>,
}

impl LiveMapView {
    /// Builds the overlay, or `None` without a mapping credential.
    #[must_use]
    pub fn build(config: &AppConfig, context: &MapContext, state: &AppState) -> Option<Self> {
        if !config.has_map_credential() {
            return None;
        }

        let scale = &context.scale;
        Some(Self {
            center: config.default_center,
            zoom: config.default_zoom,
            traffic_layer: true,
            zones: state
                .zones
                .iter()
                .map(|zone| ZoneCircle {
                    center: zone.center(),
                    radius_meters: zone.radius_meters(),
                    color: scale.color_of(zone.traffic_level),
                    opacity: ZONE_OPACITY,
                    title: zone.title(),
                })
                .collect(),
            incidents: state
                .incidents
                .iter()
                .map(|incident| IncidentMarker {
                    location: incident.location,
                    color: PENDING_INCIDENT_COLOR,
                    title: format!("{}: {}", incident.kind.label(), incident.description),
                })
                .collect(),
            route: state
                .current_route
                .as_ref()
                .map(|route| route.geometry.clone()),
            pending_incident: state.pending_incident_location(),
        })
    }
}
