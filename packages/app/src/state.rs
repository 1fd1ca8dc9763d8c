//! Explicit, serializable application state and its event handlers.
//!
//! The current route is an `Option<ComposedRoute>` that is only ever
//! replaced as a whole, and only by the calculation holding the newest
//! [`Ticket`]. The incident report form is `Some` exactly while it is open;
//! its `location` is the pending incident location.

use chapchap_geography_models::{GeoPoint, PixelPoint, ViewportSize};
use chapchap_incident_models::{
    IncidentCreate, IncidentDraft, IncidentReport, IncidentType, IncidentValidationError,
};
use chapchap_projection::{IncidentLocator, ProjectionError};
use chapchap_route::{RouteError, SequenceGuard, Ticket};
use chapchap_route_models::{ComposedRoute, RouteHistoryEntry, RouteRequest};
use chapchap_traffic_models::TrafficZone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::PlanError;

/// Side panel tab.
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
pub enum ActiveTab {
    /// Route planning
    #[default]
    Route,
    /// Traffic zones
    Traffic,
    /// Incident reports
    Incidents,
    /// Past routes
    History,
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// A tab was selected.
    SelectTab {
        /// The new tab.
        tab: ActiveTab,
    },
    /// The origin field changed.
    EditOrigin {
        /// New text.
        text: String,
    },
    /// The destination field changed.
    EditDestination {
        /// New text.
        text: String,
    },
    /// The report form was opened.
    OpenIncidentForm,
    /// The report form was closed without submitting.
    CancelIncidentForm,
    /// An incident type was picked.
    SelectIncidentType {
        /// The picked type.
        kind: IncidentType,
    },
    /// The description changed.
    EditIncidentDescription {
        /// New text.
        text: String,
    },
    /// The simulated map was clicked.
    SimulatedMapClick {
        /// Pointer position on the surface.
        pointer: PixelPoint,
        /// Surface size.
        viewport: ViewportSize,
    },
    /// The live map was clicked; the provider already resolved the point.
    LiveMapClick {
        /// Clicked location.
        location: GeoPoint,
    },
}

/// What happened to a finished calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCommit {
    /// The new route replaced the displayed one.
    Displayed,
    /// The calculation failed; the displayed route is unchanged.
    Rejected,
    /// A newer calculation was started; the result was discarded.
    Stale,
}

/// Everything the UI shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Selected side panel tab.
    pub active_tab: ActiveTab,
    /// Origin field text.
    pub origin: String,
    /// Destination field text.
    pub destination: String,
    /// Displayed route.
    pub current_route: Option<ComposedRoute>,
    /// User-visible message from the last failed calculation.
    pub route_status: Option<String>,
    /// Whether a calculation is in flight.
    pub calculating: bool,
    /// Latest-request-wins guard for calculations.
    pub sequence: SequenceGuard,
    /// Open report form, `None` when closed.
    pub incident_form: Option<IncidentDraft>,
    /// Latest traffic zones.
    pub zones: Vec<TrafficZone>,
    /// Active incidents, newest first.
    pub incidents: Vec<IncidentReport>,
    /// Past routes, newest first.
    pub history: Vec<RouteHistoryEntry>,
}

impl AppState {
    /// Applies a user interaction.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidViewport`] if a simulated map click
    /// reports an unusable surface size. The state is unchanged in that case.
    pub fn apply(
        &mut self,
        event: AppEvent,
        locator: &IncidentLocator,
    ) -> Result<(), ProjectionError> {
        match event {
            AppEvent::SelectTab { tab } => self.active_tab = tab,
            AppEvent::EditOrigin { text } => self.origin = text,
            AppEvent::EditDestination { text } => self.destination = text,
            AppEvent::OpenIncidentForm => self.open_incident_form(),
            AppEvent::CancelIncidentForm => self.incident_form = None,
            AppEvent::SelectIncidentType { kind } => {
                if let Some(form) = &mut self.incident_form {
                    form.kind = kind;
                }
            }
            AppEvent::EditIncidentDescription { text } => {
                if let Some(form) = &mut self.incident_form {
                    form.description = text;
                }
            }
            AppEvent::SimulatedMapClick { pointer, viewport } => {
                self.simulated_map_clicked(locator, pointer, viewport)?;
            }
            AppEvent::LiveMapClick { location } => {
                self.map_clicked_at(location);
            }
        }
        Ok(())
    }

    /// Opens the report form, keeping an already open draft.
    pub fn open_incident_form(&mut self) {
        if self.incident_form.is_none() {
            self.incident_form = Some(IncidentDraft::default());
        }
    }

    /// The pending incident location, if the form is open and a point has
    /// been picked.
    #[must_use]
    pub fn pending_incident_location(&self) -> Option<GeoPoint> {
        self.incident_form.as_ref().and_then(|form| form.location)
    }

    /// Sets the pending location if the report form is open.
    ///
    /// Returns whether the click was taken.
    pub fn map_clicked_at(&mut self, location: GeoPoint) -> bool {
        match &mut self.incident_form {
            Some(form) => {
                form.location = Some(location);
                true
            }
            None => false,
        }
    }

    /// Converts a simulated map click through `locator` and sets the
    /// pending location. Clicks while the form is closed are ignored and
    /// never reach the locator.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidViewport`] for an unusable surface.
    pub fn simulated_map_clicked(
        &mut self,
        locator: &IncidentLocator,
        pointer: PixelPoint,
        viewport: ViewportSize,
    ) -> Result<Option<GeoPoint>, ProjectionError> {
        if self.incident_form.is_none() {
            return Ok(None);
        }
        let location = locator.locate(pointer, viewport)?;
        self.map_clicked_at(location);
        Ok(Some(location))
    }

    /// Builds the report request from the open form.
    ///
    /// The form stays open until [`AppState::incident_reported`].
    ///
    /// # Errors
    ///
    /// Returns [`IncidentValidationError::MissingLocation`] if the form is
    /// closed or no point was picked, and
    /// [`IncidentValidationError::MissingDescription`] for a blank
    /// description.
    pub fn submit_incident(
        &self,
        now: DateTime<Utc>,
    ) -> Result<IncidentCreate, IncidentValidationError> {
        self.incident_form
            .as_ref()
            .ok_or(IncidentValidationError::MissingLocation)?
            .submit(now)
    }

    /// Records a report accepted by the backend and closes the form.
    pub fn incident_reported(&mut self, report: IncidentReport) {
        self.incident_form = None;
        self.incidents.retain(|existing| existing.id != report.id);
        self.incidents.insert(0, report);
    }

    /// Drops a resolved incident from the active list.
    pub fn incident_resolved(&mut self, id: &str) {
        self.incidents.retain(|incident| incident.id != id);
    }

    /// Starts a calculation for the current form.
    ///
    /// Every earlier in-flight calculation becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::MissingInput`] if origin or destination is blank;
    /// no ticket is issued then.
    pub fn begin_route(&mut self) -> Result<(Ticket, RouteRequest), PlanError> {
        let request = RouteRequest::new(self.origin.trim(), self.destination.trim());
        if !request.is_complete() {
            self.route_status = Some(MISSING_INPUT_MESSAGE.to_string());
            return Err(PlanError::MissingInput);
        }

        let ticket = self.sequence.issue();
        self.calculating = true;
        self.route_status = None;
        log::debug!(
            "Route {ticket} started: {} -> {}",
            request.origin,
            request.destination
        );
        Ok((ticket, request))
    }

    /// Applies a finished calculation if `ticket` is still the latest.
    pub fn commit_route(
        &mut self,
        ticket: Ticket,
        result: &Result<ComposedRoute, RouteError>,
    ) -> RouteCommit {
        if !self.sequence.is_current(ticket) {
            log::debug!("Discarding stale route {ticket}");
            return RouteCommit::Stale;
        }

        self.calculating = false;
        match result {
            Ok(route) => {
                self.current_route = Some(route.clone());
                self.route_status = None;
                RouteCommit::Displayed
            }
            Err(e) => {
                log::warn!("Route {ticket} failed: {e}");
                self.route_status = Some(user_message(e));
                RouteCommit::Rejected
            }
        }
    }

    /// Replaces the zone list.
    pub fn zones_loaded(&mut self, zones: Vec<TrafficZone>) {
        self.zones = zones;
    }

    /// Replaces the incident list.
    pub fn incidents_loaded(&mut self, incidents: Vec<IncidentReport>) {
        self.incidents = incidents;
    }

    /// Replaces the history list.
    pub fn history_loaded(&mut self, history: Vec<RouteHistoryEntry>) {
        self.history = history;
    }
}

const MISSING_INPUT_MESSAGE: &str = "Veuillez saisir l'origine et la destination.";

/// Message shown to the user for a failed calculation.
#[must_use]
pub fn user_message(error: &RouteError) -> String {
    match error {
        RouteError::IncompleteRoute { .. } => {
            "Erreur lors du calcul de l'itinéraire. Veuillez réessayer.".to_string()
        }
        RouteError::ExternalProvider { status } => {
            format!("Impossible de calculer l'itinéraire: {status}")
        }
        RouteError::UnresolvedPlace { query } => format!("Lieu introuvable: {query}"),
    }
}

#[cfg(test)]
mod tests {
    use chapchap_geography_models::GeoBounds;
    use chapchap_projection::GeoProjector;
    use chapchap_route_models::{RouteGeometry, RouteSource, RouteSummary};
    use chrono::TimeZone as _;

    use super::*;

    fn locator() -> IncidentLocator {
        IncidentLocator::new(GeoProjector::new(GeoBounds::ABIDJAN).unwrap())
    }

    fn route(origin: &str) -> ComposedRoute {
        ComposedRoute {
            summary: RouteSummary {
                origin: origin.to_string(),
                duration_text: "20 min".to_string(),
                distance_text: "8 km".to_string(),
                ai_suggestion: "Bon voyage !".to_string(),
                ..RouteSummary::default()
            },
            geometry: RouteGeometry::default(),
            source: RouteSource::Simulated,
        }
    }

    fn click() -> AppEvent {
        AppEvent::SimulatedMapClick {
            pointer: PixelPoint::new(400.0, 300.0),
            viewport: ViewportSize::new(800.0, 600.0),
        }
    }

    #[test]
    fn click_is_ignored_while_form_is_closed() {
        let mut state = AppState::default();
        state.apply(click(), &locator()).unwrap();
        assert_eq!(state.pending_incident_location(), None);
        assert!(state.incident_form.is_none());
    }

    #[test]
    fn click_sets_pending_location_while_form_is_open() {
        let mut state = AppState::default();
        state.apply(AppEvent::OpenIncidentForm, &locator()).unwrap();
        state.apply(click(), &locator()).unwrap();

        let pending = state.pending_incident_location().unwrap();
        assert!((pending.lat - 5.3).abs() < 1e-9);
        assert!((pending.lng + 4.0).abs() < 1e-9);
    }

    #[test]
    fn cancel_clears_pending_location() {
        let mut state = AppState::default();
        state.open_incident_form();
        state.map_clicked_at(GeoPoint::new(5.3, -4.0));
        state.apply(AppEvent::CancelIncidentForm, &locator()).unwrap();
        assert_eq!(state.pending_incident_location(), None);

        state.open_incident_form();
        assert_eq!(state.pending_incident_location(), None);
    }

    #[test]
    fn unusable_viewport_leaves_state_unchanged() {
        let mut state = AppState::default();
        state.open_incident_form();
        let before = state.clone();
        let err = state
            .apply(
                AppEvent::SimulatedMapClick {
                    pointer: PixelPoint::new(1.0, 1.0),
                    viewport: ViewportSize::new(0.0, 600.0),
                },
                &locator(),
            )
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidViewport { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn submit_requires_location_and_description() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let mut state = AppState::default();
        assert_eq!(
            state.submit_incident(now),
            Err(IncidentValidationError::MissingLocation)
        );

        state.open_incident_form();
        state.map_clicked_at(GeoPoint::new(5.3, -4.0));
        assert_eq!(
            state.submit_incident(now),
            Err(IncidentValidationError::MissingDescription)
        );

        let l = locator();
        state
            .apply(
                AppEvent::SelectIncidentType {
                    kind: IncidentType::Travaux,
                },
                &l,
            )
            .unwrap();
        state
            .apply(
                AppEvent::EditIncidentDescription {
                    text: " Chaussée fermée ".to_string(),
                },
                &l,
            )
            .unwrap();
        let create = state.submit_incident(now).unwrap();
        assert_eq!(create.kind, IncidentType::Travaux);
        assert_eq!(create.description, "Chaussée fermée");
        assert!(state.incident_form.is_some());
    }

    #[test]
    fn reported_incident_closes_form_and_is_listed_first() {
        let mut state = AppState::default();
        state.open_incident_form();
        let report: IncidentReport = serde_json::from_value(serde_json::json!({
            "id": "i9",
            "type": "accident",
            "location": {"lat": 5.3, "lng": -4.0},
            "description": "Collision",
            "reporter_id": "user_1",
            "timestamp": "2024-01-15T08:00:00"
        }))
        .unwrap();

        state.incident_reported(report);

        assert!(state.incident_form.is_none());
        assert_eq!(state.incidents[0].id, "i9");
        state.incident_resolved("i9");
        assert!(state.incidents.is_empty());
    }

    #[test]
    fn blank_form_issues_no_ticket() {
        let mut state = AppState {
            origin: "Plateau".to_string(),
            destination: "  ".to_string(),
            ..AppState::default()
        };
        assert_eq!(state.begin_route(), Err(PlanError::MissingInput));
        assert_eq!(state.sequence.latest(), None);
        assert!(state.route_status.is_some());
    }

    #[test]
    fn stale_result_never_replaces_newer_route() {
        let mut state = AppState {
            origin: "Plateau".to_string(),
            destination: "Cocody".to_string(),
            ..AppState::default()
        };
        let (first, _) = state.begin_route().unwrap();
        let (second, _) = state.begin_route().unwrap();

        assert_eq!(
            state.commit_route(second, &Ok(route("second"))),
            RouteCommit::Displayed
        );
        assert_eq!(
            state.commit_route(first, &Ok(route("first"))),
            RouteCommit::Stale
        );
        assert_eq!(state.current_route, Some(route("second")));
        assert!(!state.calculating);
    }

    #[test]
    fn failure_keeps_previous_route() {
        let mut state = AppState {
            origin: "Plateau".to_string(),
            destination: "Cocody".to_string(),
            ..AppState::default()
        };
        let (ticket, _) = state.begin_route().unwrap();
        state.commit_route(ticket, &Ok(route("kept")));

        let (ticket, _) = state.begin_route().unwrap();
        let outcome = state.commit_route(
            ticket,
            &Err(RouteError::IncompleteRoute {
                missing: vec!["summary"],
            }),
        );

        assert_eq!(outcome, RouteCommit::Rejected);
        assert_eq!(state.current_route, Some(route("kept")));
        assert_eq!(
            state.route_status.as_deref(),
            Some("Erreur lors du calcul de l'itinéraire. Veuillez réessayer.")
        );
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = AppState::default();
        state.apply(
            AppEvent::SelectTab {
                tab: ActiveTab::History,
            },
            &locator(),
        )
        .unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["active_tab"], "history");
        let back: AppState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: AppEvent = serde_json::from_value(serde_json::json!({
            "event": "simulated_map_click",
            "pointer": {"x": 10.0, "y": 20.0},
            "viewport": {"width": 800.0, "height": 600.0}
        }))
        .unwrap();
        assert!(matches!(event, AppEvent::SimulatedMapClick { .. }));
    }
}
