//! # Community Board API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use board_core::ports::RateLimiter;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    if config.jwt.uses_default_secret() {
        if config.is_production() {
            tracing::error!("JWT_SECRET is not set; tokens are signed with the built-in development secret");
        } else {
            tracing::warn!("JWT_SECRET is not set; using the development secret");
        }
    }

    tracing::info!(
        environment = %config.environment,
        report_threshold = config.policy.reports.threshold,
        "Starting Community Board API on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let limiter = rate_limiter(&config);

    HttpServer::new(move || {
        App::new()
            .wrap(RateLimitMiddleware::new(limiter.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "rate-limit")]
fn rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    use board_infra::InMemoryRateLimiter;

    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));

    let purger = limiter.clone();
    let period = config.rate_limit.window.max(std::time::Duration::from_secs(1));
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            purger.purge_idle();
        }
    });

    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Rate limiting enabled"
    );
    Some(limiter)
}

#[cfg(not(feature = "rate-limit"))]
fn rate_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    None
}
