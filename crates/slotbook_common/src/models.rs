// --- File: crates/slotbook_common/src/models.rs ---

// Data structures shared by the store, the booking rules and the mailer.

use crate::error::{validation_error, SlotbookError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an appointment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Confirmed and pending appointments occupy their slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "pending" => Ok(AppointmentStatus::Pending),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(validation_error(format!(
                "Invalid status '{}'. Expected one of: confirmed, pending, cancelled",
                other
            ))),
        }
    }
}

/// A persisted appointment.
///
/// `appointment_date` carries no time component; it serializes as `YYYY-MM-DD`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Opaque identifier handed to the customer
    #[cfg_attr(feature = "openapi", schema(example = "BK1735689600000A1B2C"))]
    pub booking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "2099-01-01"))]
    pub appointment_date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub appointment_time: String,
    /// Duration in minutes
    pub duration: i64,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the store needs to insert an appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub booking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub duration: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// A partial update. `None` leaves the stored value untouched.
///
/// `notes` is doubly optional: `Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentChanges {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub duration: Option<i64>,
    pub notes: Option<Option<String>>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_email.is_none()
            && self.duration.is_none()
            && self.notes.is_none()
            && self.appointment_date.is_none()
            && self.appointment_time.is_none()
    }
}
