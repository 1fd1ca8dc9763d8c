//! Merges route geometry with a backend summary.
//!
//! The two sources are merged only at the [`ComposedRoute`] boundary: the
//! summary and an external geometry are copied verbatim and neither
//! corrects the other. A route is either fully composed or not at all.

use chapchap_geography_models::GeoPoint;
use chapchap_route_models::{
    ComposedRoute, ProviderResponse, ProviderStatus, RouteGeometry, RouteSource, RouteSummary,
};
use geo::{Coord, Line, LineString};
use serde::{Deserialize, Serialize};

use crate::RouteError;

/// Sideways offset of the simulated route's bend, as a fraction of the
/// straight-line length.
const DEFAULT_CURVE_RATIO: f64 = 0.15;

/// Number of straight segments in a simulated polyline.
const DEFAULT_SEGMENTS: usize = 8;

/// Resolved coordinates of a route's two ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoints {
    /// Start point.
    pub origin: GeoPoint,
    /// End point.
    pub destination: GeoPoint,
}

/// The geometry half of a composition.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    /// Geometry returned by the mapping provider.
    External(RouteGeometry),
    /// No provider available; synthesize between these endpoints.
    Simulated(RouteEndpoints),
}

/// Builds [`ComposedRoute`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteComposer {
    curve_ratio: f64,
    segments: usize,
}

impl Default for RouteComposer {
    fn default() -> Self {
        Self {
            curve_ratio: DEFAULT_CURVE_RATIO,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl RouteComposer {
    /// Creates a composer with the default curve.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bend offset ratio. `0.0` draws a straight line.
    #[must_use]
    pub const fn with_curve_ratio(mut self, ratio: f64) -> Self {
        self.curve_ratio = ratio;
        self
    }

    /// Sets the number of segments; values below 1 are treated as 1.
    #[must_use]
    pub const fn with_segments(mut self, segments: usize) -> Self {
        self.segments = if segments == 0 { 1 } else { segments };
        self
    }

    /// Composes a route from its two sources.
    ///
    /// Identical inputs always produce field-equal output.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::IncompleteRoute`] if the summary is absent or
    /// has blank required text, or if an external geometry lacks a
    /// polyline or does not carry exactly two markers.
    pub fn compose(
        &self,
        geometry: GeometrySource,
        summary: Option<RouteSummary>,
    ) -> Result<ComposedRoute, RouteError> {
        let summary = summary.ok_or_else(|| RouteError::IncompleteRoute {
            missing: vec!["summary"],
        })?;

        let missing = summary.missing_fields();
        if !missing.is_empty() {
            return Err(RouteError::IncompleteRoute { missing });
        }

        let (geometry, source) = match geometry {
            GeometrySource::External(geometry) => {
                validate_external(&geometry)?;
                (geometry, RouteSource::External)
            }
            GeometrySource::Simulated(endpoints) => {
                (self.simulate_geometry(&endpoints), RouteSource::Simulated)
            }
        };

        log::debug!(
            "Composed {source} route: {} polyline points, {} / {}",
            geometry.polyline.len(),
            summary.duration_text,
            summary.distance_text
        );

        Ok(ComposedRoute {
            summary,
            geometry,
            source,
        })
    }

    /// Synthesizes a geometry between two endpoints.
    ///
    /// Markers are exactly `[origin, destination]`. The polyline is a
    /// quadratic curve bowing to the left of the direction of travel,
    /// starting and ending exactly on the markers. Coincident endpoints
    /// yield a two-point polyline.
    #[must_use]
    pub fn simulate_geometry(&self, endpoints: &RouteEndpoints) -> RouteGeometry {
        let start = to_coord(endpoints.origin);
        let end = to_coord(endpoints.destination);
        let markers = vec![endpoints.origin, endpoints.destination];

        if start == end {
            return RouteGeometry {
                polyline: markers.clone(),
                markers,
            };
        }

        let chord = Line::new(start, end);
        let delta = chord.delta();
        let midpoint = start + delta / 2.0;
        let control = midpoint
            + Coord {
                x: -delta.y,
                y: delta.x,
            } * self.curve_ratio;

        let mut coords = Vec::with_capacity(self.segments + 1);
        coords.push(start);
        for step in 1..self.segments {
            #[allow(clippy::cast_precision_loss)]
            let t = step as f64 / self.segments as f64;
            coords.push(quadratic_bezier(start, control, end, t));
        }
        coords.push(end);

        let line = LineString::from(coords);
        RouteGeometry {
            polyline: line.coords().map(|c| GeoPoint::new(c.y, c.x)).collect(),
            markers,
        }
    }
}

/// Extracts the geometry from a provider response.
///
/// # Errors
///
/// Returns [`RouteError::ExternalProvider`] for any status other than
/// [`ProviderStatus::Ok`], and [`RouteError::IncompleteRoute`] if an `OK`
/// response carries no geometry.
pub fn geometry_from_provider(response: ProviderResponse) -> Result<RouteGeometry, RouteError> {
    if response.status != ProviderStatus::Ok {
        return Err(RouteError::ExternalProvider {
            status: response.status,
        });
    }
    response.geometry.ok_or_else(|| RouteError::IncompleteRoute {
        missing: vec!["geometry"],
    })
}

fn validate_external(geometry: &RouteGeometry) -> Result<(), RouteError> {
    let mut missing = Vec::new();
    if geometry.polyline.is_empty() {
        missing.push("geometry.polyline");
    }
    if geometry.markers.len() != 2 {
        missing.push("geometry.markers");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RouteError::IncompleteRoute { missing })
    }
}

const fn to_coord(point: GeoPoint) -> Coord<f64> {
    Coord {
        x: point.lng,
        y: point.lat,
    }
}

fn quadratic_bezier(p0: Coord<f64>, c: Coord<f64>, p1: Coord<f64>, t: f64) -> Coord<f64> {
    let u = 1.0 - t;
    p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t)
}
