//! Everything the simulated map draws, in surface coordinates.
//!
//! Zone markers, the route polyline, route markers, the pending incident
//! pin and place labels are all positioned through the one
//! [`GeoProjector`] of a [`MapContext`], and colored through its
//! [`TrafficScale`]. A renderer only has to place the returned
//! [`ScreenPoint`]s (as percentages of its size) and paint them.
//!
//! [`GeoProjector`]: chapchap_projection::GeoProjector
//! [`TrafficScale`]: chapchap_traffic_models::TrafficScale

use chapchap_geography_models::ScreenPoint;
use chapchap_projection::zone_diameter_px;
use chapchap_route_models::ComposedRoute;
use chapchap_traffic_models::{Color, TrafficZone};
use serde::Serialize;

use crate::{AppState, MapContext};

/// Origin marker fill.
pub const ORIGIN_COLOR: Color = Color::new("#34A853");
/// Destination marker fill.
pub const DESTINATION_COLOR: Color = Color::new("#EA4335");
/// Route stroke.
pub const ROUTE_COLOR: Color = Color::new("#4285F4");
/// Route stroke width in pixels.
pub const ROUTE_WIDTH_PX: f64 = 4.0;
/// Pending incident pin fill.
pub const PENDING_INCIDENT_COLOR: Color = Color::new("#FF5722");
/// Pending incident pin text.
pub const PENDING_INCIDENT_LABEL: &str = "Nouvel incident";
/// Zone marker opacity.
pub const ZONE_OPACITY: f64 = 0.7;

/// Neighborhood names printed on the map.
const PLACE_LABELS: [&str; 5] = ["Plateau", "Cocody", "Yopougon", "Treichville", "Marcory"];

const PICK_HINT: &str = "Cliquez pour localiser un incident.";

/// One traffic zone disc.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneMarker {
    /// Zone name.
    pub name: String,
    /// Disc center.
    pub position: ScreenPoint,
    /// Disc diameter in pixels.
    pub diameter_px: f64,
    /// Fill color.
    pub color: Color,
    /// Level label, e.g. `"Dense"`.
    pub label: &'static str,
    /// Text inside the disc (the raw level).
    pub text: String,
    /// Hover text.
    pub title: String,
}

/// A round route endpoint marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerDot {
    /// Center.
    pub position: ScreenPoint,
    /// Fill.
    pub color: Color,
}

/// The drawn route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    /// Polyline vertices.
    pub points: Vec<ScreenPoint>,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in pixels.
    pub width_px: f64,
    /// Origin then destination.
    pub markers: Vec<MarkerDot>,
    /// Traffic badge color, the fallback for an unknown level.
    pub traffic_color: Option<Color>,
    /// Traffic badge text.
    pub traffic_label: Option<String>,
}

/// A labelled pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pin {
    /// Anchor.
    pub position: ScreenPoint,
    /// Fill.
    pub color: Color,
    /// Text.
    pub label: &'static str,
}

/// One row of the legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    /// Swatch.
    pub color: Color,
    /// Label.
    pub label: &'static str,
}

/// A place name on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceLabel {
    /// Name.
    pub name: String,
    /// Anchor.
    pub position: ScreenPoint,
}

/// The complete simulated map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedScene {
    /// Traffic zones.
    pub zones: Vec<ZoneMarker>,
    /// The displayed route, if any.
    pub route: Option<RouteOverlay>,
    /// Pin for the location being reported.
    pub pending_incident: Option<Pin>,
    /// Level legend, level 1 first.
    pub legend: Vec<LegendEntry>,
    /// Neighborhood names.
    pub places: Vec<PlaceLabel>,
    /// Instruction shown while the report form is open.
    pub hint: Option<&'static str>,
}

impl SimulatedScene {
    /// Builds the scene for `state`.
    #[must_use]
    pub fn build(context: &MapContext, state: &AppState) -> Self {
        let projector = &context.projector;

        let pending_incident = state.pending_incident_location().map(|location| Pin {
            position: projector.to_screen(location),
            color: PENDING_INCIDENT_COLOR,
            label: PENDING_INCIDENT_LABEL,
        });

        let places = PLACE_LABELS
            .iter()
            .filter_map(|name| {
                context.gazetteer.resolve(name).map(|location| PlaceLabel {
                    name: (*name).to_string(),
                    position: projector.to_screen(location),
                })
            })
            .collect();

        Self {
            zones: state
                .zones
                .iter()
                .map(|zone| zone_marker(context, zone))
                .collect(),
            route: state
                .current_route
                .as_ref()
                .map(|route| route_overlay(context, route)),
            pending_incident,
            legend: context
                .scale
                .entries()
                .iter()
                .map(|entry| LegendEntry {
                    color: entry.color,
                    label: entry.label,
                })
                .collect(),
            places,
            hint: state.incident_form.is_some().then_some(PICK_HINT),
        }
    }
}

fn zone_marker(context: &MapContext, zone: &TrafficZone) -> ZoneMarker {
    ZoneMarker {
        name: zone.name.clone(),
        position: context.projector.to_screen(zone.center()),
        diameter_px: zone_diameter_px(zone.radius_meters()),
        color: context.scale.color_of(zone.traffic_level),
        label: context.scale.label_of(zone.traffic_level),
        text: zone.traffic_level.to_string(),
        title: zone.title(),
    }
}

fn route_overlay(context: &MapContext, route: &ComposedRoute) -> RouteOverlay {
    let projector = &context.projector;
    let markers = route
        .geometry
        .markers
        .iter()
        .zip([ORIGIN_COLOR, DESTINATION_COLOR])
        .map(|(point, color)| MarkerDot {
            position: projector.to_screen(*point),
            color,
        })
        .collect();

    let indicator = route.summary.traffic_level.as_ref();

    RouteOverlay {
        points: projector.project_path(&route.geometry.polyline),
        stroke: ROUTE_COLOR,
        width_px: ROUTE_WIDTH_PX,
        markers,
        traffic_color: indicator.map(|i| i.color(&context.scale)),
        traffic_label: indicator.map(|i| i.display_label(&context.scale)),
    }
}

#[cfg(test)]
mod tests {
    use chapchap_geography_models::{GeoBounds, GeoPoint};
    use chapchap_route_models::{RouteGeometry, RouteSource, RouteSummary, TrafficIndicator};

    use super::*;

    fn context() -> MapContext {
        MapContext::new(GeoBounds::ABIDJAN).unwrap()
    }

    fn zone(level: i64) -> TrafficZone {
        serde_json::from_value(serde_json::json!({
            "id": "z",
            "name": "Centre",
            "coordinates": {"lat": 5.3, "lng": -4.0, "radius": 500},
            "traffic_level": level,
            "timestamp": "2024-01-15T08:00:00"
        }))
        .unwrap()
    }

    #[test]
    fn zone_is_centered_and_colored_from_the_scale() {
        let state = AppState {
            zones: vec![zone(3)],
            ..AppState::default()
        };
        let scene = SimulatedScene::build(&context(), &state);
        let marker = &scene.zones[0];

        assert!((marker.position.x - 0.5).abs() < 1e-9);
        assert!((marker.position.y - 0.5).abs() < 1e-9);
        assert_eq!(marker.color, "#FFEB3B");
        assert_eq!(marker.label, "Modéré");
        assert!((marker.diameter_px - 10.0).abs() < 1e-12);
        assert_eq!(marker.title, "Centre - Trafic 3/5");
    }

    #[test]
    fn unknown_level_uses_fallback() {
        let state = AppState {
            zones: vec![zone(9)],
            ..AppState::default()
        };
        let scene = SimulatedScene::build(&context(), &state);
        assert_eq!(scene.zones[0].color, "#9E9E9E");
        assert_eq!(scene.zones[0].label, "Inconnu");
    }

    #[test]
    fn route_markers_take_origin_and_destination_colors() {
        let origin = GeoPoint::new(5.35, -4.05);
        let destination = GeoPoint::new(5.25, -3.95);
        let state = AppState {
            current_route: Some(ComposedRoute {
                summary: RouteSummary {
                    traffic_level: Some(TrafficIndicator::Label("Dense".to_string())),
                    ..RouteSummary::default()
                },
                geometry: RouteGeometry {
                    polyline: vec![origin, GeoPoint::new(5.3, -4.0), destination],
                    markers: vec![origin, destination],
                },
                source: RouteSource::Simulated,
            }),
            ..AppState::default()
        };

        let route = SimulatedScene::build(&context(), &state).route.unwrap();

        assert_eq!(route.points.len(), 3);
        assert_eq!(route.stroke, "#4285F4");
        assert_eq!(route.markers[0].color, "#34A853");
        assert_eq!(route.markers[1].color, "#EA4335");
        assert!((route.markers[0].position.x - 0.25).abs() < 1e-9);
        assert!((route.markers[0].position.y - 0.25).abs() < 1e-9);
        assert_eq!(route.traffic_color, Some(Color::new("#FF9800")));
        assert_eq!(route.traffic_label.as_deref(), Some("Dense"));
    }

    #[test]
    fn unknown_route_traffic_level_gets_fallback_badge() {
        let origin = GeoPoint::new(5.35, -4.05);
        let destination = GeoPoint::new(5.25, -3.95);
        let summary: RouteSummary = serde_json::from_value(serde_json::json!({
            "duration_text": "27 min",
            "distance_text": "12 km",
            "traffic_level": 6,
            "ai_suggestion": "ok"
        }))
        .unwrap();
        let state = AppState {
            current_route: Some(ComposedRoute {
                summary,
                geometry: RouteGeometry {
                    polyline: vec![origin, destination],
                    markers: vec![origin, destination],
                },
                source: RouteSource::Simulated,
            }),
            ..AppState::default()
        };

        let route = SimulatedScene::build(&context(), &state).route.unwrap();

        assert_eq!(route.traffic_color, Some(Color::new("#9E9E9E")));
        assert_eq!(route.traffic_label.as_deref(), Some("Inconnu"));
    }

    #[test]
    fn pending_pin_and_hint_follow_the_form() {
        let mut state = AppState::default();
        let scene = SimulatedScene::build(&context(), &state);
        assert!(scene.pending_incident.is_none());
        assert!(scene.hint.is_none());

        state.open_incident_form();
        state.map_clicked_at(GeoPoint::new(5.3, -4.0));
        let scene = SimulatedScene::build(&context(), &state);
        let pin = scene.pending_incident.unwrap();
        assert_eq!(pin.label, "Nouvel incident");
        assert_eq!(pin.color, "#FF5722");
        assert!(scene.hint.is_some());
    }

    #[test]
    fn legend_and_places_come_from_shared_context() {
        let scene = SimulatedScene::build(&context(), &AppState::default());
        assert_eq!(scene.legend.len(), 5);
        assert_eq!(scene.legend[0].label, "Fluide");
        assert_eq!(scene.legend[4].color, "#F44336");
        assert_eq!(scene.places.len(), 5);
        assert!(scene.places.iter().all(|p| p.position.is_visible()));
    }
}
