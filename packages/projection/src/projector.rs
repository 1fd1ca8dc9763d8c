//! Linear projection between a geographic window and the unit square.
//!
//! Longitude maps to `x` left to right. Latitude grows northward but screen
//! `y` grows downward, so `y` is measured from `max_lat`. No clamping is
//! applied; callers decide whether to clip off-surface results.

use chapchap_geography_models::{GeoBounds, GeoPoint, ScreenPoint};

use crate::ProjectionError;

/// Projects a geographic point onto the surface described by `bounds`.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidBounds`] if `bounds` is malformed.
pub fn to_screen(point: GeoPoint, bounds: &GeoBounds) -> Result<ScreenPoint, ProjectionError> {
    Ok(GeoProjector::new(*bounds)?.to_screen(point))
}

/// Inverse of [`to_screen`].
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidBounds`] if `bounds` is malformed.
pub fn to_geo(point: ScreenPoint, bounds: &GeoBounds) -> Result<GeoPoint, ProjectionError> {
    Ok(GeoProjector::new(*bounds)?.to_geo(point))
}

/// A projector bound to one validated geographic window.
///
/// Construct once from configuration and pass to every renderer. Because
/// the bounds are checked in [`GeoProjector::new`], the per-point methods
/// cannot fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    bounds: GeoBounds,
}

impl GeoProjector {
    /// Creates a projector for `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidBounds`] if `min_lat >= max_lat`
    /// or `min_lng >= max_lng`.
    pub fn new(bounds: GeoBounds) -> Result<Self, ProjectionError> {
        bounds.validate()?;
        Ok(Self { bounds })
    }

    /// The window this projector maps.
    #[must_use]
    pub const fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Geographic point to fractional surface position.
    #[must_use]
    pub fn to_screen(&self, point: GeoPoint) -> ScreenPoint {
        let b = &self.bounds;
        ScreenPoint {
            x: (point.lng - b.min_lng) / b.lng_span(),
            y: (b.max_lat - point.lat) / b.lat_span(),
        }
    }

    /// Fractional surface position to geographic point.
    #[must_use]
    pub fn to_geo(&self, point: ScreenPoint) -> GeoPoint {
        let b = &self.bounds;
        GeoPoint {
            lat: point.y.mul_add(-b.lat_span(), b.max_lat),
            lng: point.x.mul_add(b.lng_span(), b.min_lng),
        }
    }

    /// Projects an ordered path, preserving order.
    #[must_use]
    pub fn project_path(&self, points: &[GeoPoint]) -> Vec<ScreenPoint> {
        points.iter().map(|p| self.to_screen(*p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GeoBounds {
        GeoBounds::new(5.2, 5.4, -4.1, -3.9).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        let tolerance = 1e-9 * a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= tolerance, "{a} != {b}");
    }

    #[test]
    fn center_projects_to_middle() {
        let s = to_screen(GeoPoint::new(5.3, -4.0), &bounds()).unwrap();
        assert_close(s.x, 0.5);
        assert_close(s.y, 0.5);
    }

    #[test]
    fn corners_project_to_unit_square_corners() {
        let p = GeoProjector::new(bounds()).unwrap();

        let nw = p.to_screen(GeoPoint::new(5.4, -4.1));
        assert_close(nw.x, 0.0);
        assert_close(nw.y, 0.0);

        let se = p.to_screen(GeoPoint::new(5.2, -3.9));
        assert_close(se.x, 1.0);
        assert_close(se.y, 1.0);
    }

    #[test]
    fn north_is_up() {
        let p = GeoProjector::new(bounds()).unwrap();
        let north = p.to_screen(GeoPoint::new(5.35, -4.0));
        let south = p.to_screen(GeoPoint::new(5.25, -4.0));
        assert!(north.y < south.y);
    }

    #[test]
    fn outside_points_are_not_clamped() {
        let p = GeoProjector::new(bounds()).unwrap();
        let s = p.to_screen(GeoPoint::new(5.5, -4.3));
        assert!(s.x < 0.0);
        assert!(s.y < 0.0);
        assert!(!s.is_visible());
    }

    #[test]
    fn round_trips_inside_and_outside_bounds() {
        let windows = [
            bounds(),
            GeoBounds::new(-90.0, 90.0, -180.0, 180.0).unwrap(),
            GeoBounds::new(48.80, 48.92, 2.25, 2.42).unwrap(),
        ];
        let points = [
            GeoPoint::new(5.3198, -4.0200),
            GeoPoint::new(5.2547, -3.9198),
            GeoPoint::new(-33.9, 151.2),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(48.8566, 2.3522),
        ];

        for b in &windows {
            for p in points {
                let back = to_geo(to_screen(p, b).unwrap(), b).unwrap();
                assert_close(back.lat, p.lat);
                assert_close(back.lng, p.lng);
            }
        }
    }

    #[test]
    fn to_geo_inverts_screen_center() {
        let g = to_geo(ScreenPoint::new(0.5, 0.5), &bounds()).unwrap();
        assert_close(g.lat, 5.3);
        assert_close(g.lng, -4.0);
    }

    #[test]
    fn invalid_bounds_fail_both_directions() {
        let bad = GeoBounds {
            min_lat: 5.4,
            max_lat: 5.2,
            min_lng: -4.1,
            max_lng: -3.9,
        };
        assert!(matches!(
            to_screen(GeoPoint::new(5.3, -4.0), &bad),
            Err(ProjectionError::InvalidBounds(_))
        ));
        assert!(matches!(
            to_geo(ScreenPoint::new(0.5, 0.5), &bad),
            Err(ProjectionError::InvalidBounds(_))
        ));
        assert!(GeoProjector::new(bad).is_err());
    }

    #[test]
    fn overflowing_bounds_are_rejected_instead_of_producing_nan() {
        let huge = GeoBounds {
            min_lat: -f64::MAX,
            max_lat: f64::MAX,
            min_lng: -4.1,
            max_lng: -3.9,
        };
        assert!(matches!(
            to_geo(ScreenPoint::new(0.5, 0.5), &huge),
            Err(ProjectionError::InvalidBounds(_))
        ));
        assert!(GeoProjector::new(huge).is_err());
    }

    #[test]
    fn project_path_keeps_order() {
        let p = GeoProjector::new(bounds()).unwrap();
        let path = [GeoPoint::new(5.4, -4.1), GeoPoint::new(5.2, -3.9)];
        let out = p.project_path(&path);
        assert_eq!(out.len(), 2);
        assert!(out[0].x < out[1].x);
    }
}
