#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the road safety dashboard.
//!
//! Exposes the [`DataAccess`] facade contract as a JSON API under `/api` so
//! the dashboard's HTTP backend can talk to it. Responses come from the mock
//! backend; swapping in a real data source only means handing a different
//! [`DataAccess`] to [`AppState`].

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use road_safety_api::DataAccess;
use road_safety_api::config::ClientConfig;
use road_safety_api::mock::{MockBackend, MockLatency};

/// Largest hotspot page a single request may ask for.
pub const MAX_HOTSPOT_LIMIT: u32 = 1000;

/// Hotspot page size when the request names none.
pub const DEFAULT_HOTSPOT_LIMIT: u32 = 20;

/// Shared application state.
pub struct AppState {
    /// Backend answering every request.
    pub api: Arc<dyn DataAccess>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/auth/login", web::post().to(handlers::login))
            .route("/auth/signup", web::post().to(handlers::signup))
            .route("/predict", web::post().to(handlers::predict))
            .route("/data/stats", web::get().to(handlers::stats))
            .route("/data/hotspots", web::get().to(handlers::hotspots))
            .route("/admin/stats", web::get().to(handlers::admin_stats))
            .route("/admin/users", web::get().to(handlers::admin_users)),
    );
}

/// Bind address and port from `BIND_ADDR` (default `127.0.0.1`) and `PORT`
/// (default `8080`).
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    (bind_addr, port)
}

/// Starts the road safety API server on the address from [`bind_from_env`].
///
/// This is a regular async function; the caller provides the runtime (e.g.
/// via `#[actix_web::main]`) and initialises logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid, the
/// mock fixtures fail to load, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let (bind_addr, port) = bind_from_env();
    run_server_on(&bind_addr, port).await
}

/// Starts the road safety API server on `bind_addr:port`.
///
/// `ROAD_SAFETY_MOCK_LATENCY` controls whether the backing mock simulates
/// network delays.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid, the
/// mock fixtures fail to load, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server_on(bind_addr: &str, port: u16) -> std::io::Result<()> {
    let config = ClientConfig::from_env().map_err(std::io::Error::other)?;

    let latency = if config.mock_latency {
        MockLatency::default()
    } else {
        MockLatency::none()
    };

    log::info!("Loading mock backend...");
    let api = MockBackend::new(latency).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState { api: Arc::new(api) });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
