#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic point, bounding box and viewport types.
//!
//! These types are shared by the projection, route and application crates.
//! They carry no behavior beyond construction and validation so they can be
//! serialized to and from the backend unchanged.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in WGS84 degrees.
///
/// No intrinsic bounds: a point may lie outside any [`GeoBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Error returned when a [`GeoBounds`] violates its ordering invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidBoundsError {
    /// The offending bounds.
    pub bounds: GeoBounds,
}

impl std::fmt::Display for InvalidBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.bounds;
        write!(
            f,
            "invalid bounds: expected finite minLat < maxLat and minLng < maxLng, \
             got lat [{}, {}], lng [{}, {}]",
            b.min_lat, b.max_lat, b.min_lng, b.max_lng
        )
    }
}

impl std::error::Error for InvalidBoundsError {}

/// The rectangular geographic window a simulated map surface represents.
///
/// Valid bounds satisfy `min_lat < max_lat` and `min_lng < max_lng`. The
/// fields are public so the value can be deserialized from configuration;
/// consumers call [`GeoBounds::validate`] before doing arithmetic with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    /// Southern latitude boundary.
    pub min_lat: f64,
    /// Northern latitude boundary.
    pub max_lat: f64,
    /// Western longitude boundary.
    pub min_lng: f64,
    /// Eastern longitude boundary.
    pub max_lng: f64,
}

impl GeoBounds {
    /// The Abidjan window used by the simulated map.
    pub const ABIDJAN: Self = Self {
        min_lat: 5.2,
        max_lat: 5.4,
        min_lng: -4.1,
        max_lng: -3.9,
    };

    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBoundsError`] if `min_lat >= max_lat` or
    /// `min_lng >= max_lng` (including `NaN` edges), or if either span is
    /// not finite.
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Self, InvalidBoundsError> {
        let bounds = Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks the ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBoundsError`] if either axis is empty, inverted,
    /// `NaN` or spans more than an `f64` can hold.
    pub fn validate(&self) -> Result<(), InvalidBoundsError> {
        // Any comparison against NaN is false, so NaN edges fail here too.
        let ordered = self.min_lat < self.max_lat && self.min_lng < self.max_lng;
        // An infinite edge or an overflowing difference gives a non-finite span.
        let finite = self.lat_span().is_finite() && self.lng_span().is_finite();
        if !(ordered && finite) {
            return Err(InvalidBoundsError { bounds: *self });
        }
        Ok(())
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Geometric center of the window.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            self.min_lat + self.lat_span() / 2.0,
            self.min_lng + self.lng_span() / 2.0,
        )
    }

    /// Whether `point` lies inside the window (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::ABIDJAN
    }
}

/// A position on the rendering surface as a fraction of the viewport.
///
/// `x` runs left to right and `y` top to bottom. Values outside `[0, 1]`
/// mean the projected geographic point lies outside the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal fraction of the viewport width.
    pub x: f64,
    /// Vertical fraction of the viewport height.
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a new screen point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether the point falls on the visible surface.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Percentages for CSS-style `left`/`top` placement.
    #[must_use]
    pub fn as_percent(&self) -> (f64, f64) {
        (self.x * 100.0, self.y * 100.0)
    }
}

/// A pointer position in pixels relative to the surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the rendering surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ViewportSize {
    /// Creates a new viewport size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are strictly positive and finite.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
