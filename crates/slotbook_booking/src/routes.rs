// --- File: crates/slotbook_booking/src/routes.rs ---

use crate::handlers::{
    cancel_appointment_handler, create_appointment_handler, get_appointment_handler,
    get_availability_handler, list_appointments_handler, missing_date_handler,
    update_appointment_handler, BookingState,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all appointment routes.
///
/// Paths are relative; the backend nests this router under `/api/appointments`.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/available-slots/{date}", get(get_availability_handler))
        .route("/available-slots", get(missing_date_handler))
        .route("/create", post(create_appointment_handler))
        .route("/booking/{booking_id}", get(get_appointment_handler))
        .route("/all", get(list_appointments_handler))
        .route("/update/{booking_id}", put(update_appointment_handler))
        .route("/cancel/{booking_id}", put(cancel_appointment_handler))
        .with_state(state)
}
