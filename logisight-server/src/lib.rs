// Copyright 2025 Logisight Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Logisight HTTP server
//!
//! Serves the dashboard views as JSON over axum. Configuration comes from
//! [`config::ServerConfig`]; the engine is shared through [`api::AppState`].

pub mod api;
pub mod config;

use anyhow::Result;
use axum::{routing::get, Router};
use logisight_query::Logisight;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::AppState;
use config::{LogFormat, LoggingConfig, ServerConfig};

/// Install the global subscriber. RUST_LOG overrides the configured filter.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Full application router with CORS and request tracing
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let api_routes = Router::new()
        .route("/deliveries", get(api::deliveries_trend))
        .route("/kpi", get(api::kpi_snapshot))
        .route("/partners", get(api::partner_performance))
        .route("/regions", get(api::region_summary))
        .route("/service-modes", get(api::service_mode_breakdown))
        .route("/weather", get(api::weather_impact))
        .route("/filters", get(api::filter_options))
        .route("/views/:view", get(api::run_named_view))
        .route("/health", get(api::warehouse_health));

    let cors = if config.server.enable_cors {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if config.server.cors_origins.is_empty() {
            tracing::warn!("CORS: Allowing all origins (development mode). Set cors_origins in production!");
            cors.allow_origin(Any)
        } else {
            tracing::info!("CORS: Allowing origins: {:?}", config.server.cors_origins);
            cors.allow_origin(AllowOrigin::list(config.cors_origins()?))
        }
    } else {
        CorsLayer::new()
    };

    let app = Router::new()
        .route("/health", get(api::health_check))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    init_tracing(&config.logging);

    tracing::info!("Starting Logisight Server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;
    let addr = config.socket_addr()?;

    let engine = Logisight::connect(&config.warehouse).await?;
    let state = AppState {
        engine: engine.clone(),
    };
    let app = build_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Logisight Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine.close().await;
    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
