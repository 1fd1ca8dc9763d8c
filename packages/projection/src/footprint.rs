//! Display size of circular zones on the simulated surface.
//!
//! The size is a fixed scale of the zone radius and has no geographic
//! meaning: a 2 km zone is drawn 40 px wide regardless of viewport or
//! bounds.

/// Meters of zone radius per pixel of drawn diameter.
pub const ZONE_RADIUS_DIVISOR: f64 = 50.0;

/// Drawn diameter in pixels for a zone of `radius_meters`.
///
/// Negative or non-finite radii draw as zero.
#[must_use]
pub fn zone_diameter_px(radius_meters: f64) -> f64 {
    if radius_meters.is_finite() && radius_meters > 0.0 {
        radius_meters / ZONE_RADIUS_DIVISOR
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_fixed_divisor() {
        assert!((zone_diameter_px(500.0) - 10.0).abs() < f64::EPSILON);
        assert!((zone_diameter_px(2000.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_radius_draws_nothing() {
        assert!(zone_diameter_px(-5.0).abs() < f64::EPSILON);
        assert!(zone_diameter_px(f64::NAN).abs() < f64::EPSILON);
    }
}
