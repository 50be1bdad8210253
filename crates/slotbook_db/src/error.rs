//! Error types for the appointment store

use slotbook_common::{internal_error, SlotbookError};
use thiserror::Error;

/// Message used whenever a non-cancelled booking already holds a slot.
pub const SLOT_TAKEN_MESSAGE: &str = "This time slot is already booked";

/// Errors that can occur when working with the appointment store
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// The active-slot unique index rejected the write
    #[error("{}", SLOT_TAKEN_MESSAGE)]
    SlotTaken,

    /// The generated booking identifier is already in use
    #[error("Booking identifier already exists")]
    DuplicateBookingId,

    /// A stored row could not be mapped back into an appointment
    #[error("Corrupt appointment row: {0}")]
    CorruptRow(String),
}

impl DbError {
    /// Classifies a failed write, recognising unique-index violations.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return if db_err.message().contains("booking_id") {
                    DbError::DuplicateBookingId
                } else {
                    DbError::SlotTaken
                };
            }
        }
        DbError::QueryError(err.to_string())
    }
}

impl From<DbError> for SlotbookError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::SlotTaken => SlotbookError::ConflictError(SLOT_TAKEN_MESSAGE.to_string()),
            DbError::ConfigError(msg) | DbError::UrlError(msg) => SlotbookError::ConfigError(msg),
            DbError::DuplicateBookingId => internal_error("Booking identifier already exists"),
            other => SlotbookError::DatabaseError(other.to_string()),
        }
    }
}
