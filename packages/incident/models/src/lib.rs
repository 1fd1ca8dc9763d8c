#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic incident report types.
//!
//! [`IncidentReport`] is what the backend returns, [`IncidentCreate`] is
//! what it accepts, and [`IncidentDraft`] is the in-progress report form
//! whose `location` is the pending incident location set by a map click.

use chapchap_geography_models::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of incident a user can report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IncidentType {
    /// Traffic jam
    #[default]
    Embouteillage,
    /// Collision or breakdown
    Accident,
    /// Police checkpoint
    Police,
    /// Road works
    Travaux,
    /// Any type this client does not know about
    #[serde(other)]
    Other,
}

impl IncidentType {
    /// User-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Embouteillage => "Embouteillage",
            Self::Accident => "Accident",
            Self::Police => "Contrôle police",
            Self::Travaux => "Travaux",
            Self::Other => "Autre",
        }
    }

    /// Whether users may pick this type when reporting.
    #[must_use]
    pub const fn is_reportable(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// The types offered in the report form, default first.
    #[must_use]
    pub const fn reportable() -> &'static [Self] {
        &[Self::Embouteillage, Self::Accident, Self::Police, Self::Travaux]
    }
}

/// Lifecycle state of a report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentStatus {
    /// Still affecting traffic
    #[default]
    Active,
    /// Marked resolved
    Resolved,
}

/// An incident as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Backend identifier.
    pub id: String,
    /// Incident kind.
    #[serde(rename = "type")]
    pub kind: IncidentType,
    /// Where it happened.
    pub location: GeoPoint,
    /// Free-text description.
    pub description: String,
    /// Opaque reporter identifier.
    pub reporter_id: String,
    /// When it was reported.
    #[serde(with = "chapchap_traffic_models::timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: IncidentStatus,
}

/// Request body for reporting a new incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentCreate {
    /// Incident kind.
    #[serde(rename = "type")]
    pub kind: IncidentType,
    /// Free-text description.
    pub description: String,
    /// Where it happened.
    pub location: GeoPoint,
    /// Opaque reporter identifier.
    pub reporter_id: String,
}

/// Reasons a draft cannot be submitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentValidationError {
    /// No map position has been picked.
    MissingLocation,
    /// The description is empty or whitespace.
    MissingDescription,
}

impl std::fmt::Display for IncidentValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLocation => write!(f, "click the map to locate the incident"),
            Self::MissingDescription => write!(f, "add a description of the incident"),
        }
    }
}

impl std::error::Error for IncidentValidationError {}

/// The report form while it is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentDraft {
    /// Selected kind.
    #[serde(rename = "type")]
    pub kind: IncidentType,
    /// Typed description.
    pub description: String,
    /// Pending location picked on the map, if any.
    pub location: Option<GeoPoint>,
}

impl IncidentDraft {
    /// Builds the request body, stamping a reporter id from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentValidationError`] if the location is unset or the
    /// description is blank.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<IncidentCreate, IncidentValidationError> {
        let location = self
            .location
            .ok_or(IncidentValidationError::MissingLocation)?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(IncidentValidationError::MissingDescription);
        }

        Ok(IncidentCreate {
            kind: self.kind,
            description: description.to_string(),
            location,
            reporter_id: reporter_id(now),
        })
    }
}

/// Anonymous reporter id of the form `user_<epoch millis>`.
#[must_use]
pub fn reporter_id(now: DateTime<Utc>) -> String {
    format!("user_{}", now.timestamp_millis())
}
