#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route composition for the traffic map.
//!
//! [`RouteComposer`] pairs a backend [`RouteSummary`] with either the
//! mapping provider's geometry or a geometry synthesized between two
//! resolved endpoints. [`Gazetteer`] resolves typed place names for the
//! simulated map, and [`SequenceGuard`] keeps a slow, stale calculation
//! from replacing a newer one.
//!
//! Composition is synchronous and performs no I/O or retries; fetching the
//! two sources is the caller's job.
//!
//! [`RouteSummary`]: chapchap_route_models::RouteSummary

pub mod composer;
pub mod gazetteer;
pub mod sequence;

pub use composer::{GeometrySource, RouteComposer, RouteEndpoints, geometry_from_provider};
pub use gazetteer::{Gazetteer, Place};
pub use sequence::{SequenceGuard, Ticket};

use chapchap_route_models::ProviderStatus;
use thiserror::Error;

/// Errors that can occur while composing a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// One or both sources are missing or malformed.
    #[error("Incomplete route: missing {}", .missing.join(", "))]
    IncompleteRoute {
        /// Names of the missing or malformed parts.
        missing: Vec<&'static str>,
    },

    /// The mapping provider did not return a route.
    #[error("Mapping provider returned {status}")]
    ExternalProvider {
        /// Status reported by the provider.
        status: ProviderStatus,
    },

    /// A typed place could not be resolved to coordinates.
    #[error("Unknown place: {query}")]
    UnresolvedPlace {
        /// The text that failed to resolve.
        query: String,
    },
}
