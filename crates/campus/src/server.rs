//! Wiring and process lifecycle for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use campus_core::{CourseService, FilterColumns, PersonService};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    database::Database,
    http::{self, AppState},
};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins; otherwise `fallback` is used as the filter directive.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Services over the SQLite repositories.
pub fn app_state(db: &Database) -> AppState {
    let courses = Arc::new(db.courses());
    let persons = PersonService::new(
        Arc::new(db.persons()),
        courses.clone(),
        FilterColumns::for_persons(),
    );
    let courses = CourseService::new(courses, FilterColumns::for_courses());
    AppState::new(persons, courses)
}

/// Connect storage, bind the listener and serve until Ctrl-C.
///
/// # Errors
///
/// Returns error if the database cannot be reached or the address cannot be
/// bound.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let db = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;
    let app: Router = http::router(app_state(&db), config.http.health_route);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(address = %address, database = %config.database.url, "Campus listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Campus stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
