#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the safe-route application.
//!
//! Serves point, route, and road-segment safety scores computed from the
//! Taipei open datasets. Datasets are fetched lazily through the source
//! store's expiring cache; alternative routes come from an OSRM server.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use safe_route_routing::{OsrmClient, RouteProvider};
use safe_route_score_models::ScoreMaxima;
use safe_route_source::{SourceStore, registry};

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Cached access to every dataset.
    pub store: SourceStore,
    /// Source of alternative routes.
    pub routing: Arc<dyn RouteProvider>,
    /// Saturation counts used by the scorer.
    pub maxima: ScoreMaxima,
}

impl AppState {
    /// Builds the state for `config`: every registered dataset, an OSRM
    /// client, and the default score maxima.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> std::io::Result<Self> {
        let store = SourceStore::new(registry::all_sources(), config.fetch_timeout)
            .map_err(std::io::Error::other)?;
        let routing = OsrmClient::new(config.osrm_base_url.clone(), config.routing_timeout)
            .map_err(std::io::Error::other)?;

        Ok(Self {
            store,
            routing: Arc::new(routing),
            maxima: ScoreMaxima::default(),
        })
    }
}

/// Registers the `/api` routes, plus the unprefixed paths existing map
/// clients still call.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/safety", web::get().to(handlers::safety))
            .route("/route-safety", web::post().to(handlers::route_safety))
            .route("/safe-routes", web::post().to(handlers::safe_routes))
            .route("/road-safety", web::post().to(handlers::road_safety)),
    )
    .route("/get_safety_data", web::get().to(handlers::safety))
    .route("/get_route_safety", web::post().to(handlers::route_safety))
    .route("/find_safe_routes", web::post().to(handlers::safe_routes));
}

/// Starts the HTTP server and runs until it is shut down.
///
/// # Errors
///
/// Returns an error if the state cannot be built or the address cannot
/// be bound.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config)?);
    log::info!(
        "Registered {} dataset(s), routing via {}",
        state.store.definitions().len(),
        config.osrm_base_url
    );

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
