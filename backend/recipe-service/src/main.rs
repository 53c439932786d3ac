use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use recipe_service::{handlers, store, AppState, Config, RecipeCatalog};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load config")?;

    info!(
        service = %config.service.service_name,
        port = config.service.http_port,
        backend = ?config.store.backend,
        "Starting recipe service"
    );

    let catalog = match config.catalog.path.as_deref() {
        Some(path) => RecipeCatalog::load(Path::new(path))
            .with_context(|| format!("Failed to load catalog from {}", path))?,
        None => RecipeCatalog::sample().context("Failed to load bundled catalog")?,
    };
    info!(recipes = catalog.len(), "Catalog loaded");

    let store = store::connect(&config.store)
        .await
        .context("Failed to connect to store")?;

    let state = web::Data::new(AppState::new(catalog, store, &config.trending));
    let bind_addr = (config.service.host.clone(), config.service.http_port);

    info!("HTTP server listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .shutdown_timeout(10)
    .run()
    .await
    .map_err(|e| {
        error!("HTTP server error: {}", e);
        anyhow::Error::from(e)
    })?;

    info!("Recipe service stopped");
    Ok(())
}
