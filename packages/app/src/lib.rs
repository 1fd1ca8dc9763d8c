#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Application layer of the traffic map.
//!
//! Holds the explicit [`AppState`] that every event handler receives, the
//! [`RoutePlanner`] that fetches both route sources and commits the
//! composition under the sequence guard, and the two view contracts: the
//! [`SimulatedScene`] drawn without a mapping provider and the
//! [`LiveMapView`] overlay handed to the provider's map.
//!
//! Every view reads positions and colors from one [`MapContext`], so the
//! projection bounds and the traffic scale exist exactly once.

pub mod context;
pub mod live;
pub mod planner;
pub mod scene;
pub mod state;

pub use context::{MapContext, MapMode};
pub use live::{LiveMapView, ZoneCircle};
pub use planner::{PlanOutcome, RoutePlanner};
pub use scene::SimulatedScene;
pub use state::{ActiveTab, AppEvent, AppState, RouteCommit};

use chapchap_route::RouteError;
use thiserror::Error;

/// Errors that can occur while planning a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Origin or destination is blank.
    #[error("Origin and destination are required")]
    MissingInput,

    /// Composition failed.
    #[error(transparent)]
    Route(#[from] RouteError),
}
