#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate projection for the simulated map surface.
//!
//! [`GeoProjector`] maps geographic coordinates inside a fixed
//! [`GeoBounds`] window to fractional surface coordinates and back. The
//! same projector drives route drawing, zone placement and pointer
//! location ([`IncidentLocator`]), so every view shares one transform.
//!
//! Everything here is pure and synchronous; a projector is `Copy` and can
//! be handed to any number of renderers.

pub mod footprint;
pub mod locator;
pub mod projector;

pub use chapchap_geography_models::{
    GeoBounds, GeoPoint, InvalidBoundsError, PixelPoint, ScreenPoint, ViewportSize,
};
pub use footprint::{ZONE_RADIUS_DIVISOR, zone_diameter_px};
pub use locator::IncidentLocator;
pub use projector::{GeoProjector, to_geo, to_screen};

use thiserror::Error;

/// Errors that can occur during projection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The geographic window violates `min < max` on one of its axes.
    #[error(transparent)]
    InvalidBounds(#[from] InvalidBoundsError),

    /// The viewport has a zero, negative or non-finite dimension.
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidViewport {
        /// Reported width in pixels.
        width: f64,
        /// Reported height in pixels.
        height: f64,
    },
}
