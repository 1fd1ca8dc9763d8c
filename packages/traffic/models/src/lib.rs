#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic intensity levels, the shared display scale, and traffic zones.
//!
//! [`TrafficScale`] is the only place level colors and labels are defined.
//! Renderers receive a reference to one scale instead of keeping their own
//! lookup tables.

pub mod scale;
pub mod timestamp;
pub mod zone;

pub use scale::{Color, ScaleEntry, TrafficScale};
pub use zone::{TrafficZone, ZoneCoordinates};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Traffic intensity from 1 (free-flowing) to 5 (gridlock).
///
/// Serialized as its integer value. Integers outside `1..=5` have no
/// variant; use [`TrafficScale::color_of`] / [`TrafficScale::label_of`]
/// directly on raw values to get the fallback for those.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "i64", into = "i64")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TrafficLevel {
    /// Level 1: free-flowing
    Fluide = 1,
    /// Level 2: good
    Bon = 2,
    /// Level 3: moderate
    Modere = 3,
    /// Level 4: dense
    Dense = 4,
    /// Level 5: blocked
    Bloque = 5,
}

impl TrafficLevel {
    /// Returns the numeric value of this level.
    #[must_use]
    pub const fn value(self) -> i64 {
        self as i64
    }

    /// Creates a level from a numeric value, `None` outside `1..=5`.
    #[must_use]
    pub const fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Fluide),
            2 => Some(Self::Bon),
            3 => Some(Self::Modere),
            4 => Some(Self::Dense),
            5 => Some(Self::Bloque),
            _ => None,
        }
    }

    /// Returns all levels, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fluide,
            Self::Bon,
            Self::Modere,
            Self::Dense,
            Self::Bloque,
        ]
    }
}

/// Error returned when deserializing a [`TrafficLevel`] from an integer
/// outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTrafficLevelError {
    /// The rejected value.
    pub value: i64,
}

impl std::fmt::Display for InvalidTrafficLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid traffic level {}: expected 1-5", self.value)
    }
}

impl std::error::Error for InvalidTrafficLevelError {}

impl TryFrom<i64> for TrafficLevel {
    type Error = InvalidTrafficLevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(InvalidTrafficLevelError { value })
    }
}

impl From<TrafficLevel> for i64 {
    fn from(level: TrafficLevel) -> Self {
        level.value()
    }
}
