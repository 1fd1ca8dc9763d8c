#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the traffic map.
//!
//! ```text
//! chapchap zones
//! chapchap incidents
//! chapchap history
//! chapchap route "Plateau" "Cocody" [--simulated] [--json]
//! chapchap report --type accident --description "..." --pixel 400,300 [--viewport 800x600]
//! chapchap report --type police --description "..." --lat 5.31 --lng -4.02
//! chapchap resolve <id>
//! chapchap scene [--origin Plateau --destination Cocody] [--live]
//! chapchap config
//! ```
//!
//! The backend URL comes from `CHAPCHAP_BACKEND_URL` (or the TOML file named
//! by `CHAPCHAP_CONFIG`); a `GOOGLE_MAPS_API_KEY` switches routes to the
//! live mapping provider.

use std::sync::Arc;

use chapchap_app::{
    AppEvent, AppState, LiveMapView, MapContext, MapMode, PlanError, RoutePlanner, SimulatedScene,
};
use chapchap_client::{BackendClient, DirectionsClient, RouteSummarySource};
use chapchap_config::AppConfig;
use chapchap_geography_models::{GeoPoint, PixelPoint, ViewportSize};
use chapchap_incident_models::IncidentType;
use chapchap_route_models::{ComposedRoute, TrafficIndicator};
use chapchap_traffic_models::TrafficScale;
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(name = "chapchap", about = "Traffic-aware routing for Abidjan")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List current traffic zones
    Zones,
    /// List active incidents
    Incidents,
    /// List recent routes
    History,
    /// Calculate a route
    Route {
        /// Origin, a place name or "lat,lng"
        origin: String,
        /// Destination, a place name or "lat,lng"
        destination: String,
        /// Use the simulated map even if a mapping credential is set
        #[arg(long)]
        simulated: bool,
        /// Print the composed route as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report an incident
    Report {
        /// Incident type
        #[arg(long = "type", default_value = "embouteillage", value_parser = parse_incident_type)]
        kind: IncidentType,
        /// What is happening
        #[arg(long)]
        description: String,
        /// Simulated map click position in pixels
        #[arg(long, value_name = "X,Y", value_parser = parse_pixel, conflicts_with_all = ["lat", "lng"])]
        pixel: Option<PixelPoint>,
        /// Simulated map size in pixels
        #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_viewport, default_value = "800x600")]
        viewport: ViewportSize,
        /// Latitude
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Mark an incident as resolved
    Resolve {
        /// Incident ID
        id: String,
    },
    /// Print the map scene as JSON
    Scene {
        /// Route origin to draw
        #[arg(long, requires = "destination")]
        origin: Option<String>,
        /// Route destination to draw
        #[arg(long, requires = "origin")]
        destination: Option<String>,
        /// Print the live map overlay instead of the simulated scene
        #[arg(long)]
        live: bool,
    },
    /// Print the effective configuration
    Config,
}

fn parse_incident_type(s: &str) -> Result<IncidentType, String> {
    s.parse::<IncidentType>()
        .ok()
        .filter(|kind| kind.is_reportable())
        .ok_or_else(|| {
            let choices: Vec<&str> = IncidentType::reportable()
                .iter()
                .map(AsRef::<str>::as_ref)
                .collect();
            format!("unknown incident type {s:?}, expected one of {}", choices.join(", "))
        })
}

fn parse_pixel(s: &str) -> Result<PixelPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("invalid x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("invalid y: {e}"))?;
    Ok(PixelPoint::new(x, y))
}

fn parse_viewport(s: &str) -> Result<ViewportSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = w.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height = h.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    Ok(ViewportSize::new(width, height))
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let local = AppConfig::load()?;
    let backend = BackendClient::from_config(&local)?;
    let config = match backend.config().await {
        Ok(remote) => local.with_remote(remote),
        Err(e) => {
            log::warn!("Backend configuration unavailable, using local settings: {e}");
            local
        }
    };
    let config = chapchap_config::init(config)?;
    let context = MapContext::from_config(config)?;
    let scale = &context.scale;

    match cli.command {
        Commands::Zones => {
            let zones = backend.traffic_zones().await?;
            println!(
                "{:<24} {:<6} {:<10} {:<8} OBSERVED",
                "NAME", "LEVEL", "LABEL", "COLOR"
            );
            println!("{}", "-".repeat(70));
            for zone in &zones {
                println!(
                    "{:<24} {:<6} {:<10} {:<8} {}",
                    zone.name,
                    zone.traffic_level,
                    scale.label_of(zone.traffic_level),
                    scale.color_of(zone.traffic_level),
                    zone.observed_at().format("%Y-%m-%d %H:%M")
                );
            }
            println!("\n{} zone(s)", zones.len());
        }
        Commands::Incidents => {
            let incidents = backend.incidents().await?;
            if incidents.is_empty() {
                println!("No active incidents.");
                return Ok(());
            }
            for incident in &incidents {
                println!(
                    "{}  {:<16} ({:.4}, {:.4})  {}  {}",
                    incident.id,
                    incident.kind.label(),
                    incident.location.lat,
                    incident.location.lng,
                    incident.timestamp.format("%Y-%m-%d %H:%M"),
                    incident.description
                );
            }
        }
        Commands::History => {
            let history = backend.route_history().await?;
            if history.is_empty() {
                println!("No routes yet.");
                return Ok(());
            }
            for entry in &history {
                let traffic = entry
                    .traffic_level
                    .as_ref()
                    .map(|t| t.display_label(scale))
                    .unwrap_or_default();
                let when = entry
                    .timestamp
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{when:<16} {} -> {}  {} / {}  {traffic}",
                    entry.origin, entry.destination, entry.duration_text, entry.distance_text
                );
            }
        }
        Commands::Route {
            origin,
            destination,
            simulated,
            json,
        } => {
            let mode = if simulated {
                MapMode::Simulated
            } else {
                MapMode::for_config(config)
            };
            let planner = planner_for(mode, config, &context, backend)?;
            let state = Mutex::new(AppState {
                origin,
                destination,
                ..AppState::default()
            });

            if let Err(e) = planner.plan(&state).await {
                report_failure(&state, &e).await;
                std::process::exit(1);
            }

            let state = state.lock().await;
            if let Some(route) = &state.current_route {
                if json {
                    println!("{}", serde_json::to_string_pretty(route)?);
                } else {
                    print_route(route, scale);
                }
            }
        }
        Commands::Report {
            kind,
            description,
            pixel,
            viewport,
            lat,
            lng,
        } => {
            let locator = context.locator();
            let mut state = AppState::default();
            state.apply(AppEvent::OpenIncidentForm, &locator)?;
            state.apply(AppEvent::SelectIncidentType { kind }, &locator)?;
            state.apply(
                AppEvent::EditIncidentDescription { text: description },
                &locator,
            )?;
            if let Some(pointer) = pixel {
                state.apply(AppEvent::SimulatedMapClick { pointer, viewport }, &locator)?;
            } else if let Some((lat, lng)) = lat.zip(lng) {
                state.apply(
                    AppEvent::LiveMapClick {
                        location: GeoPoint::new(lat, lng),
                    },
                    &locator,
                )?;
            }

            let create = state.submit_incident(chrono::Utc::now())?;
            let report = backend.report_incident(&create).await?;
            state.incident_reported(report.clone());
            println!(
                "Reported {} at ({:.5}, {:.5}): {}",
                report.kind.label(),
                report.location.lat,
                report.location.lng,
                report.id
            );
        }
        Commands::Resolve { id } => {
            let message = backend.resolve_incident(&id).await?;
            println!("{message}");
        }
        Commands::Scene {
            origin,
            destination,
            live,
        } => {
            let mut state = AppState::default();
            match backend.traffic_zones().await {
                Ok(zones) => state.zones_loaded(zones),
                Err(e) => log::warn!("Traffic zones unavailable: {e}"),
            }
            match backend.incidents().await {
                Ok(incidents) => state.incidents_loaded(incidents),
                Err(e) => log::warn!("Incidents unavailable: {e}"),
            }

            let mode = if live {
                MapMode::Live
            } else {
                MapMode::Simulated
            };
            let state = Mutex::new(state);
            if let (Some(origin), Some(destination)) = (origin, destination) {
                {
                    let mut s = state.lock().await;
                    s.origin = origin;
                    s.destination = destination;
                }
                let planner = planner_for(mode, config, &context, backend)?;
                if let Err(e) = planner.plan(&state).await {
                    report_failure(&state, &e).await;
                }
            }

            let state = state.lock().await;
            let json = if live {
                let view = LiveMapView::build(config, &context, &state)
                    .ok_or("no mapping credential configured (GOOGLE_MAPS_API_KEY)")?;
                serde_json::to_string_pretty(&view)?
            } else {
                serde_json::to_string_pretty(&SimulatedScene::build(&context, &state))?
            };
            println!("{json}");
        }
        Commands::Config => {
            println!("backend:  {}", config.backend_url);
            println!("map:      {}", MapMode::for_config(config));
            println!(
                "center:   {:.4}, {:.4} (zoom {})",
                config.default_center.lat, config.default_center.lng, config.default_zoom
            );
            println!(
                "bounds:   lat {}..{}, lng {}..{}",
                config.bounds.min_lat,
                config.bounds.max_lat,
                config.bounds.min_lng,
                config.bounds.max_lng
            );
        }
    }

    Ok(())
}

fn planner_for(
    mode: MapMode,
    config: &AppConfig,
    context: &MapContext,
    backend: BackendClient,
) -> Result<RoutePlanner, Box<dyn std::error::Error>> {
    let summaries: Arc<dyn RouteSummarySource> = Arc::new(backend);
    match (mode, config.google_maps_api_key.as_deref()) {
        (MapMode::Live, Some(key)) => Ok(RoutePlanner::live(
            summaries,
            Arc::new(DirectionsClient::new(key)?),
        )),
        _ => Ok(RoutePlanner::simulated(
            summaries,
            context.gazetteer.clone(),
        )),
    }
}

async fn report_failure(state: &Mutex<AppState>, error: &PlanError) {
    let message = state
        .lock()
        .await
        .route_status
        .clone()
        .unwrap_or_else(|| error.to_string());
    log::error!("Route calculation failed: {error}");
    eprintln!("{message}");
}

fn traffic_text(traffic: &TrafficIndicator, scale: &TrafficScale) -> String {
    format!("{} ({})", traffic.display_label(scale), traffic.color(scale))
}

fn print_route(route: &ComposedRoute, scale: &TrafficScale) {
    let summary = &route.summary;
    println!("{} -> {}", summary.origin, summary.destination);
    println!("  duration: {}", summary.duration_text);
    println!("  distance: {}", summary.distance_text);
    if let Some(traffic) = &summary.traffic_level {
        println!("  traffic:  {}", traffic_text(traffic, scale));
    }
    println!(
        "  geometry: {} ({} points)",
        route.source,
        route.geometry.polyline.len()
    );
    println!("\n{}", summary.ai_suggestion);
}
