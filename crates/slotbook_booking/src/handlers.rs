// File: crates/slotbook_booking/src/handlers.rs
use crate::logic::{
    AppointmentListResponse, AppointmentResponse, AvailabilityResponse, BookingService,
    CancelAppointmentRequest, CreateAppointmentRequest, ListQuery, UpdateAppointmentRequest,
    MSG_CANCELLED, MSG_CREATED, MSG_DATE_REQUIRED, MSG_UPDATED,
};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{Json, Response},
};
use slotbook_common::{handle_result, validation_error, IntoHttpResponse, SlotbookError};
use slotbook_db::SqlAppointmentRepository;
use std::sync::Arc;
use tracing::debug;

// Shared state for the appointment handlers
pub struct BookingState {
    pub service: BookingService<SqlAppointmentRepository>,
    /// Include server-side error details in 5xx bodies (development only)
    pub expose_error_details: bool,
}

type HandlerResult<T> = Result<T, Response>;

fn body_error(rejection: JsonRejection) -> SlotbookError {
    debug!("Rejected request body: {}", rejection.body_text());
    validation_error(format!("Invalid request body: {}", rejection.body_text()))
}

/// Handler to get the free slots of a date.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/available-slots/{date}", // Path relative to /api
    params(("date" = String, Path, description = "Date in YYYY-MM-DD format", example = "2099-01-01")),
    responses(
        (status = 200, description = "Free slots for the date", body = AvailabilityResponse),
        (status = 400, description = "Malformed, missing or past date")
    ),
    tag = "Appointments"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Path(date): Path<String>,
) -> HandlerResult<Json<AvailabilityResponse>> {
    let result = state.service.availability(Some(&date)).await.map(Json);
    handle_result(result, state.expose_error_details)
}

/// `GET /appointments/available-slots` without a date.
pub async fn missing_date_handler() -> Response {
    validation_error(MSG_DATE_REQUIRED).into_http_response()
}

/// Handler to create a booking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments/create",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentResponse),
        (status = 400, description = "Missing fields, bad date or time, or past date"),
        (status = 409, description = "This time slot is already booked")
    ),
    tag = "Appointments"
))]
pub async fn create_appointment_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<AppointmentResponse>)> {
    let result = match payload {
        Ok(Json(request)) => state.service.create(request).await,
        Err(rejection) => Err(body_error(rejection)),
    };
    let result = result.map(|appointment| {
        (
            StatusCode::CREATED,
            Json(AppointmentResponse::with_message(MSG_CREATED, appointment)),
        )
    });
    handle_result(result, state.expose_error_details)
}

/// Handler to look up a booking by its identifier.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/booking/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking identifier", example = "BK4070908800000ABCDE")),
    responses(
        (status = 200, description = "The appointment", body = AppointmentResponse),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Appointments"
))]
pub async fn get_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(booking_id): Path<String>,
) -> HandlerResult<Json<AppointmentResponse>> {
    let result = state
        .service
        .get(&booking_id)
        .await
        .map(|appointment| Json(AppointmentResponse::bare(appointment)));
    handle_result(result, state.expose_error_details)
}

/// Handler to list bookings, newest first.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/all",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of appointments", body = AppointmentListResponse),
        (status = 400, description = "Bad page, limit or status")
    ),
    tag = "Appointments"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<ListQuery>,
) -> HandlerResult<Json<AppointmentListResponse>> {
    let result = state.service.list(query).await.map(Json);
    handle_result(result, state.expose_error_details)
}

/// Handler to change a booking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/appointments/update/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking identifier")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentResponse),
        (status = 400, description = "Invalid input or cancelled appointment"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "This time slot is already booked")
    ),
    tag = "Appointments"
))]
pub async fn update_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(booking_id): Path<String>,
    payload: Result<Json<UpdateAppointmentRequest>, JsonRejection>,
) -> HandlerResult<Json<AppointmentResponse>> {
    let result = match payload {
        Ok(Json(request)) => state.service.update(&booking_id, request).await,
        Err(rejection) => Err(body_error(rejection)),
    };
    let result =
        result.map(|appointment| Json(AppointmentResponse::with_message(MSG_UPDATED, appointment)));
    handle_result(result, state.expose_error_details)
}

/// Handler to cancel a booking. The JSON body with a `reason` is optional.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/appointments/cancel/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking identifier")),
    request_body(content = CancelAppointmentRequest, description = "Optional cancellation reason"),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 404, description = "Appointment not found or already cancelled")
    ),
    tag = "Appointments"
))]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(booking_id): Path<String>,
    body: Bytes,
) -> HandlerResult<Json<AppointmentResponse>> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(CancelAppointmentRequest::default())
    } else {
        serde_json::from_slice::<CancelAppointmentRequest>(&body).map_err(SlotbookError::from)
    };

    let result = match request {
        Ok(request) => state.service.cancel(&booking_id, request).await,
        Err(err) => Err(err),
    };
    let result = result
        .map(|appointment| Json(AppointmentResponse::with_message(MSG_CANCELLED, appointment)));
    handle_result(result, state.expose_error_details)
}
