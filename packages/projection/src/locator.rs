//! Pointer position to geographic coordinate on the simulated surface.
//!
//! Whether a click should place an incident at all (the report form being
//! open) is decided by the caller; this is only the conversion.

use chapchap_geography_models::{GeoPoint, PixelPoint, ScreenPoint, ViewportSize};

use crate::{GeoProjector, ProjectionError};

/// Converts pixel pointer positions into geographic points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentLocator {
    projector: GeoProjector,
}

impl IncidentLocator {
    /// Creates a locator sharing the map's projector.
    #[must_use]
    pub const fn new(projector: GeoProjector) -> Self {
        Self { projector }
    }

    /// Normalizes `pointer` by `viewport` and inverts the projection.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidViewport`] if the viewport has a
    /// non-positive or non-finite dimension.
    pub fn locate(
        &self,
        pointer: PixelPoint,
        viewport: ViewportSize,
    ) -> Result<GeoPoint, ProjectionError> {
        if !viewport.is_usable() {
            return Err(ProjectionError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let normalized = ScreenPoint::new(pointer.x / viewport.width, pointer.y / viewport.height);
        Ok(self.projector.to_geo(normalized))
    }
}
