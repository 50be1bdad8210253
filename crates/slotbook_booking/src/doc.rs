// File: crates/slotbook_booking/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AppointmentListResponse, AppointmentResponse, AvailabilityResponse, CancelAppointmentRequest,
    CreateAppointmentRequest, UpdateAppointmentRequest,
};
use slotbook_common::models::{Appointment, AppointmentStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::create_appointment_handler,
        crate::handlers::get_appointment_handler,
        crate::handlers::list_appointments_handler,
        crate::handlers::update_appointment_handler,
        crate::handlers::cancel_appointment_handler,
    ),
    components(schemas(
        Appointment,
        AppointmentStatus,
        AvailabilityResponse,
        CreateAppointmentRequest,
        UpdateAppointmentRequest,
        CancelAppointmentRequest,
        AppointmentResponse,
        AppointmentListResponse,
    )),
    tags(
        (name = "Appointments", description = "Slot availability and the booking lifecycle")
    ),
    servers((url = "/api", description = "API base path"))
)]
pub struct BookingApiDoc;
