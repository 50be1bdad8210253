//! Repository for appointments
//!
//! The store keeps one row per booking. It never deletes: cancellation is a
//! status change. At most one non-cancelled row may hold a given date and
//! time; the schema enforces this with a partial unique index, and writes that
//! violate it fail with [`DbError::SlotTaken`].

use crate::error::DbError;
use chrono::NaiveDate;
use slotbook_common::models::{Appointment, AppointmentChanges, AppointmentStatus, NewAppointment};
use std::future::Future;

/// One page of a listing plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentPage {
    pub appointments: Vec<Appointment>,
    pub total: u64,
}

/// Repository for appointments
pub trait AppointmentRepository: Send + Sync {
    /// Create the `appointments` table and its indexes if they don't exist.
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Insert a new appointment, stamping `created_at` and `updated_at`.
    ///
    /// Fails with `SlotTaken` when a non-cancelled appointment already holds
    /// the slot and with `DuplicateBookingId` when the identifier is taken.
    fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> impl Future<Output = Result<Appointment, DbError>> + Send;

    /// Find an appointment by booking identifier, whatever its status.
    fn find_by_booking_id(
        &self,
        booking_id: &str,
    ) -> impl Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// All non-cancelled appointments on a date, ordered by time.
    fn find_active_on_date(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Appointment>, DbError>> + Send;

    /// The non-cancelled appointment holding a slot, ignoring `exclude_booking_id`.
    fn find_active_at(
        &self,
        date: NaiveDate,
        time: &str,
        exclude_booking_id: Option<&str>,
    ) -> impl Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// A page of appointments, newest first, optionally filtered by status.
    ///
    /// `page` is 1-based.
    fn list(
        &self,
        page: u32,
        limit: u32,
        status: Option<AppointmentStatus>,
    ) -> impl Future<Output = Result<AppointmentPage, DbError>> + Send;

    /// Apply the supplied changes to a non-cancelled appointment.
    ///
    /// Returns `None` when no non-cancelled appointment has this identifier.
    fn update(
        &self,
        booking_id: &str,
        changes: &AppointmentChanges,
    ) -> impl Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// Mark a non-cancelled appointment as cancelled, replacing its notes.
    ///
    /// Returns `None` when the appointment is missing or already cancelled.
    fn cancel(
        &self,
        booking_id: &str,
        notes: &str,
    ) -> impl Future<Output = Result<Option<Appointment>, DbError>> + Send;
}
