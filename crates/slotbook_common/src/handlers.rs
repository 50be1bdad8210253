// --- File: crates/slotbook_common/src/handlers.rs ---

// Handlers shared by every deployment: health probe, API index, 404 fallback.

use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::services::StoreProbe;

/// State for the shared routes.
#[derive(Clone)]
pub struct CommonState {
    pub version: String,
    pub environment: String,
    pub store: Option<Arc<dyn StoreProbe>>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub database: &'static str,
    pub version: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: String,
    pub environment: String,
    pub endpoints: Value,
}

/// Reports liveness and whether the appointment store answers.
pub async fn health_handler(State(state): State<Arc<CommonState>>) -> Json<HealthResponse> {
    let database = match &state.store {
        Some(store) => {
            if store.is_healthy().await {
                "connected"
            } else {
                warn!("Health check: appointment store is unreachable");
                "disconnected"
            }
        }
        None => "not configured",
    };

    Json(HealthResponse {
        status: "OK",
        message: "Appointment booking server is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        database,
        version: state.version.clone(),
        environment: state.environment.clone(),
    })
}

pub async fn index_handler(State(state): State<Arc<CommonState>>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Appointment Booking API",
        version: state.version.clone(),
        environment: state.environment.clone(),
        endpoints: json!({
            "health": "/api/health",
            "availableSlots": "/api/appointments/available-slots/{date}",
            "createAppointment": "/api/appointments/create",
            "getAppointment": "/api/appointments/booking/{bookingId}",
            "listAppointments": "/api/appointments/all",
            "updateAppointment": "/api/appointments/update/{bookingId}",
            "cancelAppointment": "/api/appointments/cancel/{bookingId}",
        }),
    })
}

pub async fn fallback_handler(method: Method, OriginalUri(uri): OriginalUri) -> (StatusCode, Json<Value>) {
    debug!("No route for {} {}", method, uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
