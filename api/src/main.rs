use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use pv_api::{app, settings, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = settings::load_settings().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(environment = ?config.environment, "Starting Prabhav trust API");

    let insecure = config.insecure_defaults();
    if !insecure.is_empty() {
        if config.environment.is_development() {
            info!(settings = ?insecure, "Using built-in development secrets");
        } else {
            warn!(
                settings = ?insecure,
                "Default secrets in use outside development; set them before exposing this service"
            );
        }
    }

    let services = pv_infra::initialize(&config)
        .await
        .context("failed to initialize services")?;
    let state = web::Data::new(app::AppState::new(services.clone()));

    let bind_address = (config.server.host.clone(), config.server.port);
    info!(host = %bind_address.0, port = bind_address.1, "Binding HTTP server");

    let mut server = HttpServer::new(move || app::create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(bind_address)
        .context("failed to bind HTTP listener")?
        .run()
        .await
        .context("HTTP server terminated with an error")?;

    services.shutdown().await;
    info!("Server stopped");
    Ok(())
}
