// --- File: crates/slotbook_booking/src/logic.rs ---
use crate::clock::Clock;
use crate::slots::{generate_slots_for, is_valid_slot, BusinessHours};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slotbook_common::models::{Appointment, AppointmentChanges, AppointmentStatus, NewAppointment};
use slotbook_common::{conflict, invalid_state, not_found, validation_error, SlotbookError};
use slotbook_db::{AppointmentRepository, DbError};
use slotbook_mailer::Notifier;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

pub const MSG_INVALID_DATE: &str = "Invalid date format. Expected YYYY-MM-DD";
pub const MSG_DATE_REQUIRED: &str = "Date parameter is required";
pub const MSG_PAST_BOOKING: &str =
    "Cannot book appointments for today or past dates. Please select a future date.";
pub const MSG_PAST_RESCHEDULE: &str =
    "Cannot schedule appointments for today or past dates. Please select a future date.";
pub const MSG_MISSING_FIELDS: &str =
    "Missing required fields: customerName, customerEmail, appointmentDate, appointmentTime";
pub const MSG_SLOT_TAKEN: &str = "This time slot is already booked";
pub const MSG_NOT_FOUND: &str = "Appointment not found";
pub const MSG_UPDATE_CANCELLED: &str = "Cannot update a cancelled appointment";
pub const MSG_UPDATE_FAILED: &str = "Failed to update appointment";
pub const MSG_CANCEL_NOT_FOUND: &str = "Appointment not found or already cancelled";

pub const MSG_CREATED: &str = "Appointment created successfully";
pub const MSG_UPDATED: &str = "Appointment updated successfully";
pub const MSG_CANCELLED: &str = "Appointment cancelled successfully";

const DEFAULT_DURATION_MINUTES: i64 = 30;
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
const BOOKING_ID_ATTEMPTS: usize = 3;

// --- Request / response types ---

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[cfg_attr(feature = "openapi", schema(example = "2099-01-01"))]
    pub date: String,
    pub available_slots: Vec<String>,
    pub total_slots: usize,
    pub booked_slots: usize,
    pub available_count: usize,
}

/// Body of `POST /appointments/create`. Every field is optional on the wire
/// so that missing fields produce one consistent validation message.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Ada Lovelace"))]
    pub customer_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "ada@example.com"))]
    pub customer_email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2099-01-01"))]
    pub appointment_date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub appointment_time: Option<String>,
    /// Minutes; 30 when absent or zero
    pub duration: Option<i64>,
    pub notes: Option<String>,
}

/// Body of `PUT /appointments/update/{bookingId}`.
///
/// Absent, null and empty values leave a field unchanged, except `notes`
/// where an empty string clears the notes.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    #[cfg_attr(feature = "openapi", schema(example = "client request"))]
    pub reason: Option<String>,
}

/// Query string of `GET /appointments/all`. Kept as raw strings so bad
/// numbers surface as validation errors in our own JSON shape.
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// 1-based page number, default 1
    pub page: Option<String>,
    /// Page size, default 10
    pub limit: Option<String>,
    /// confirmed, pending or cancelled
    pub status: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub appointment: Appointment,
}

impl AppointmentResponse {
    pub fn with_message(message: &str, appointment: Appointment) -> Self {
        Self {
            message: Some(message.to_string()),
            appointment,
        }
    }

    pub fn bare(appointment: Appointment) -> Self {
        Self {
            message: None,
            appointment,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total: u64,
}

// --- Helpers ---

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, SlotbookError> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(validation_error(MSG_INVALID_DATE));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| validation_error(MSG_INVALID_DATE))
}

/// `BK` + unix millis + five uppercase hex digits.
pub fn generate_booking_id() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(5)
        .collect::<String>()
        .to_uppercase();
    format!("BK{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Trimmed, non-empty text or `None`.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(raw: Option<&str>, name: &str, default: u32) -> Result<u32, SlotbookError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(validation_error(format!(
                "{} must be a positive integer",
                name
            ))),
        },
    }
}

fn normalize_duration(duration: Option<i64>) -> Result<Option<i64>, SlotbookError> {
    match duration {
        Some(minutes) if minutes < 0 => Err(validation_error(
            "Duration must be a positive number of minutes",
        )),
        Some(0) | None => Ok(None),
        Some(minutes) => Ok(Some(minutes)),
    }
}

// --- Booking rules ---

/// The booking rules: availability, creation, lookup, update and cancel.
///
/// Slot exclusivity is checked here before every write and enforced again by
/// the store's unique index, whose violation surfaces as the same conflict.
pub struct BookingService<R> {
    repository: R,
    hours: BusinessHours,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
}

impl<R: AppointmentRepository> BookingService<R> {
    pub fn new(repository: R, hours: BusinessHours, clock: Arc<dyn Clock>, notifier: Notifier) -> Self {
        Self {
            repository,
            hours,
            clock,
            notifier,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn business_hours(&self) -> &BusinessHours {
        &self.hours
    }

    /// The first bookable date.
    pub fn tomorrow(&self) -> NaiveDate {
        let today = self.clock.today();
        today.succ_opt().unwrap_or(today)
    }

    fn ensure_bookable(&self, date: NaiveDate, message: &str) -> Result<(), SlotbookError> {
        if date < self.tomorrow() {
            debug!("Rejecting {}: before {}", date, self.tomorrow());
            return Err(validation_error(message));
        }
        Ok(())
    }

    fn ensure_on_grid(&self, time: &str) -> Result<(), SlotbookError> {
        if !is_valid_slot(&self.hours, time) {
            return Err(validation_error(format!(
                "Invalid appointment time '{}'. Choose one of the available slots",
                time
            )));
        }
        Ok(())
    }

    /// Free slots on a date. `raw_date` is `None` when the caller omitted it.
    pub async fn availability(
        &self,
        raw_date: Option<&str>,
    ) -> Result<AvailabilityResponse, SlotbookError> {
        let raw_date = raw_date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| validation_error(MSG_DATE_REQUIRED))?;
        let date = parse_date(raw_date)?;
        self.ensure_bookable(date, MSG_PAST_BOOKING)?;

        let booked: HashSet<String> = self
            .repository
            .find_active_on_date(date)
            .await?
            .into_iter()
            .map(|appointment| appointment.appointment_time)
            .collect();

        let grid = generate_slots_for(&self.hours);
        let total_slots = grid.len();
        let available_slots: Vec<String> = grid
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .collect();
        let available_count = available_slots.len();

        debug!(
            "Availability for {}: {}/{} free",
            date, available_count, total_slots
        );

        Ok(AvailabilityResponse {
            date: raw_date.to_string(),
            available_slots,
            total_slots,
            booked_slots: total_slots - available_count,
            available_count,
        })
    }

    /// Validate and persist a new booking, then queue its confirmation email.
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SlotbookError> {
        let (Some(customer_name), Some(customer_email), Some(raw_date), Some(appointment_time)) = (
            present(request.customer_name),
            present(request.customer_email),
            present(request.appointment_date),
            present(request.appointment_time),
        ) else {
            return Err(validation_error(MSG_MISSING_FIELDS));
        };

        let appointment_date = parse_date(&raw_date)?;
        self.ensure_on_grid(&appointment_time)?;
        let duration = normalize_duration(request.duration)?.unwrap_or(DEFAULT_DURATION_MINUTES);
        self.ensure_bookable(appointment_date, MSG_PAST_BOOKING)?;

        if self
            .repository
            .find_active_at(appointment_date, &appointment_time, None)
            .await?
            .is_some()
        {
            debug!("Slot {} {} already taken", appointment_date, appointment_time);
            return Err(conflict(MSG_SLOT_TAKEN));
        }

        let mut new_appointment = NewAppointment {
            booking_id: generate_booking_id(),
            customer_name,
            customer_email: customer_email.to_lowercase(),
            appointment_date,
            appointment_time,
            duration,
            status: AppointmentStatus::Confirmed,
            notes: present(request.notes),
        };

        let mut attempt = 1;
        let appointment = loop {
            match self.repository.insert(&new_appointment).await {
                Ok(appointment) => break appointment,
                Err(DbError::DuplicateBookingId) if attempt < BOOKING_ID_ATTEMPTS => {
                    warn!(
                        "Booking id {} collided, retrying ({}/{})",
                        new_appointment.booking_id, attempt, BOOKING_ID_ATTEMPTS
                    );
                    attempt += 1;
                    new_appointment.booking_id = generate_booking_id();
                }
                Err(err) => return Err(err.into()),
            }
        };

        info!(
            "Booked {} on {} at {}",
            appointment.booking_id, appointment.appointment_date, appointment.appointment_time
        );
        self.notifier.booking_confirmed(&appointment);
        Ok(appointment)
    }

    pub async fn get(&self, booking_id: &str) -> Result<Appointment, SlotbookError> {
        self.repository
            .find_by_booking_id(booking_id.trim())
            .await?
            .ok_or_else(|| not_found(MSG_NOT_FOUND))
    }

    pub async fn list(&self, query: ListQuery) -> Result<AppointmentListResponse, SlotbookError> {
        let page = parse_positive(query.page.as_deref(), "page", DEFAULT_PAGE)?;
        let limit = parse_positive(query.limit.as_deref(), "limit", DEFAULT_LIMIT)?;
        if limit > MAX_LIMIT {
            return Err(validation_error(format!("limit must be at most {}", MAX_LIMIT)));
        }
        let status = match query.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<AppointmentStatus>()?),
            _ => None,
        };

        let result = self.repository.list(page, limit, status).await?;

        Ok(AppointmentListResponse {
            appointments: result.appointments,
            total_pages: result.total.div_ceil(u64::from(limit)),
            current_page: page,
            total: result.total,
        })
    }

    /// Apply a partial update to a non-cancelled booking.
    pub async fn update(
        &self,
        booking_id: &str,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SlotbookError> {
        let booking_id = booking_id.trim();
        let existing = self
            .repository
            .find_by_booking_id(booking_id)
            .await?
            .ok_or_else(|| not_found(MSG_NOT_FOUND))?;

        if existing.status == AppointmentStatus::Cancelled {
            return Err(invalid_state(MSG_UPDATE_CANCELLED));
        }

        let new_date = match present(request.appointment_date) {
            Some(raw) => Some(parse_date(&raw)?),
            None => None,
        };
        let new_time = present(request.appointment_time);

        let changes = AppointmentChanges {
            customer_name: present(request.customer_name),
            customer_email: present(request.customer_email).map(|email| email.to_lowercase()),
            duration: normalize_duration(request.duration)?,
            notes: request.notes.map(|notes| present(Some(notes))),
            appointment_date: new_date,
            appointment_time: new_time.clone(),
        };
        if changes.is_empty() {
            debug!("Update of {} carries no field changes", booking_id);
        }

        if new_date.is_some() || new_time.is_some() {
            let effective_date = new_date.unwrap_or(existing.appointment_date);
            let effective_time = new_time.unwrap_or_else(|| existing.appointment_time.clone());

            if changes.appointment_time.is_some() {
                self.ensure_on_grid(&effective_time)?;
            }
            self.ensure_bookable(effective_date, MSG_PAST_RESCHEDULE)?;

            if self
                .repository
                .find_active_at(effective_date, &effective_time, Some(booking_id))
                .await?
                .is_some()
            {
                return Err(conflict(MSG_SLOT_TAKEN));
            }
        }

        let updated = self
            .repository
            .update(booking_id, &changes)
            .await?
            .ok_or_else(|| not_found(MSG_UPDATE_FAILED))?;

        info!("Updated booking {}", updated.booking_id);
        Ok(updated)
    }

    /// Cancel a booking, recording the reason in its notes.
    pub async fn cancel(
        &self,
        booking_id: &str,
        request: CancelAppointmentRequest,
    ) -> Result<Appointment, SlotbookError> {
        let notes = match present(request.reason) {
            Some(reason) => format!("Cancelled: {}", reason),
            None => "Cancelled by user".to_string(),
        };

        let cancelled = self
            .repository
            .cancel(booking_id.trim(), &notes)
            .await?
            .ok_or_else(|| not_found(MSG_CANCEL_NOT_FOUND))?;

        info!("Cancelled booking {}", cancelled.booking_id);
        Ok(cancelled)
    }
}
