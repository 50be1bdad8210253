// File: services/slotbook_backend/src/main.rs
use slotbook_backend::{build_app, AppState, SlotbookServiceFactory};
use slotbook_booking::{BookingService, BookingState, BusinessHours, SystemClock};
use slotbook_common::logging;
use slotbook_common::services::ServiceFactory;
use slotbook_common::{config_error, Context, SlotbookError};
use slotbook_config::load_config;
use slotbook_db::{AppointmentRepository, DbClient, SqlAppointmentRepository};
use slotbook_mailer::{spawn_dispatcher, EmailTemplates};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// How long pending confirmation emails may take to drain on shutdown.
const DISPATCHER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!("Server failed: {}", err);
        eprintln!("Server failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SlotbookError> {
    let config = Arc::new(load_config().map_err(config_error)?);
    let _log_guard = logging::init_with_config(&config.logging);
    info!(
        "Starting Slotbook {} in {} mode",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    // Store
    let db = DbClient::new(&config).await?;
    info!("Connected to appointment store: {}", db);
    let repository = SqlAppointmentRepository::new(db.clone());
    repository.init_schema().await?;

    // Booking rules
    let hours = BusinessHours::try_from(&config.business_hours)?;
    let clock = SystemClock::from_config(&config.business_hours)?;

    // Notifications
    let service_factory = Arc::new(SlotbookServiceFactory::new(config.clone()));
    let (notifier, dispatcher) = spawn_dispatcher(
        service_factory.notification_service(),
        EmailTemplates::from_config(config.mail.as_ref()),
    );

    let booking = Arc::new(BookingState {
        service: BookingService::new(repository, hours, Arc::new(clock), notifier),
        expose_error_details: config.is_development(),
    });
    let state = AppState::new(config.clone(), service_factory, booking);
    let app = build_app(&state);
    // The router now owns the only other handles to the notifier.
    drop(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped; flushing pending notifications");
    if tokio::time::timeout(DISPATCHER_DRAIN_TIMEOUT, dispatcher)
        .await
        .is_err()
    {
        warn!("Notification dispatcher did not drain in time");
    }

    db.close().await;
    info!("Database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
