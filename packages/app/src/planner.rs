//! Route calculation: fetch both sources, compose, commit if still latest.
//!
//! The backend summary and the provider geometry are requested
//! concurrently. A failed backend call becomes an absent summary, so the
//! composer reports an incomplete route. A failed provider call becomes an
//! unknown provider status. No lock on [`AppState`] is held while waiting.

use std::sync::Arc;

use chapchap_client::{MappingProvider, RouteSummarySource};
use chapchap_route::{
    Gazetteer, GeometrySource, RouteComposer, RouteError, Ticket, geometry_from_provider,
};
use chapchap_route_models::{
    ComposedRoute, ProviderRequest, ProviderResponse, ProviderStatus, RouteRequest, RouteSummary,
};
use tokio::sync::Mutex;

use crate::{AppState, PlanError, RouteCommit};

/// Result of a calculation that produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The route is now displayed.
    Displayed(Ticket),
    /// A newer calculation started meanwhile; this result was discarded.
    Stale(Ticket),
}

/// Orchestrates one route calculation end to end.
pub struct RoutePlanner {
    summaries: Arc<dyn RouteSummarySource>,
    provider: Option<Arc<dyn MappingProvider>>,
    gazetteer: Gazetteer,
    composer: RouteComposer,
}

impl std::fmt::Debug for RoutePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("live", &self.provider.is_some())
            .field("composer", &self.composer)
            .finish_non_exhaustive()
    }
}

impl RoutePlanner {
    /// A planner for the simulated map: geometry is synthesized between
    /// places resolved by `gazetteer`.
    #[must_use]
    pub fn simulated(summaries: Arc<dyn RouteSummarySource>, gazetteer: Gazetteer) -> Self {
        Self {
            summaries,
            provider: None,
            gazetteer,
            composer: RouteComposer::new(),
        }
    }

    /// A planner for the live map: geometry comes from `provider`.
    #[must_use]
    pub fn live(
        summaries: Arc<dyn RouteSummarySource>,
        provider: Arc<dyn MappingProvider>,
    ) -> Self {
        Self {
            summaries,
            provider: Some(provider),
            gazetteer: Gazetteer::default(),
            composer: RouteComposer::new(),
        }
    }

    /// Replaces the composer.
    #[must_use]
    pub const fn with_composer(mut self, composer: RouteComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Starts a calculation for the form in `state` and runs it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::MissingInput`] for a blank form and
    /// [`PlanError::Route`] if the current calculation failed. A stale
    /// result is not an error.
    pub async fn plan(&self, state: &Mutex<AppState>) -> Result<PlanOutcome, PlanError> {
        let (ticket, request) = state.lock().await.begin_route()?;
        self.complete(state, ticket, &request).await
    }

    /// Runs an already started calculation and commits its result.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Route`] if `ticket` is current and the
    /// calculation failed.
    pub async fn complete(
        &self,
        state: &Mutex<AppState>,
        ticket: Ticket,
        request: &RouteRequest,
    ) -> Result<PlanOutcome, PlanError> {
        let result = self.calculate(request).await;
        let commit = state.lock().await.commit_route(ticket, &result);

        match (commit, result) {
            (RouteCommit::Stale, _) => Ok(PlanOutcome::Stale(ticket)),
            (_, Err(e)) => Err(PlanError::Route(e)),
            (_, Ok(_)) => Ok(PlanOutcome::Displayed(ticket)),
        }
    }

    /// Fetches both sources and composes, without touching any state.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if either source is unusable.
    pub async fn calculate(&self, request: &RouteRequest) -> Result<ComposedRoute, RouteError> {
        let Some(provider) = &self.provider else {
            let endpoints = self.gazetteer.resolve_request(request)?;
            let summary = self.fetch_summary(request).await;
            return self
                .composer
                .compose(GeometrySource::Simulated(endpoints), summary);
        };

        let provider_request = ProviderRequest::from(request);
        let directions = async {
            provider
                .directions(&provider_request)
                .await
                .unwrap_or_else(|e| {
                    log::warn!("Mapping provider unavailable: {e}");
                    ProviderResponse {
                        status: ProviderStatus::UnknownError,
                        geometry: None,
                    }
                })
        };
        let (summary, response) = futures::join!(self.fetch_summary(request), directions);

        let geometry = geometry_from_provider(response)?;
        self.composer
            .compose(GeometrySource::External(geometry), summary)
    }

    async fn fetch_summary(&self, request: &RouteRequest) -> Option<RouteSummary> {
        match self.summaries.route_summary(request).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("Route summary unavailable: {e}");
                None
            }
        }
    }
}
