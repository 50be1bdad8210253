// --- File: crates/slotbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Slotbook errors.
///
/// Crate-local errors (store, mailer) convert into this type so handlers can
/// map every failure onto one HTTP taxonomy.
#[derive(Error, Debug)]
pub enum SlotbookError {
    /// Missing, malformed or past-dated input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Mutation of a booking whose status does not allow it
    #[error("Invalid state: {0}")]
    InvalidStateError(String),

    /// Unknown booking identifier
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The requested slot is already taken
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SlotbookError {
    /// Machine-readable error kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            SlotbookError::ValidationError(_) => "validation",
            SlotbookError::InvalidStateError(_) => "invalid_state",
            SlotbookError::NotFoundError(_) => "not_found",
            SlotbookError::ConflictError(_) => "conflict",
            SlotbookError::ExternalServiceError { .. } => "external_service",
            SlotbookError::DatabaseError(_)
            | SlotbookError::ConfigError(_)
            | SlotbookError::InternalError(_) => "internal",
        }
    }

    /// The human-readable message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            SlotbookError::ValidationError(msg)
            | SlotbookError::InvalidStateError(msg)
            | SlotbookError::NotFoundError(msg)
            | SlotbookError::ConflictError(msg)
            | SlotbookError::DatabaseError(msg)
            | SlotbookError::ConfigError(msg)
            | SlotbookError::InternalError(msg) => msg.clone(),
            SlotbookError::ExternalServiceError {
                service_name,
                message,
            } => format!("{}: {}", service_name, message),
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SlotbookError {
    fn status_code(&self) -> u16 {
        match self {
            SlotbookError::ValidationError(_) => 400,
            SlotbookError::InvalidStateError(_) => 400,
            SlotbookError::NotFoundError(_) => 404,
            SlotbookError::ConflictError(_) => 409,
            SlotbookError::DatabaseError(_) => 500,
            SlotbookError::ConfigError(_) => 500,
            SlotbookError::ExternalServiceError { .. } => 502,
            SlotbookError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| SlotbookError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| SlotbookError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<serde_json::Error> for SlotbookError {
    fn from(err: serde_json::Error) -> Self {
        SlotbookError::ValidationError(format!("Invalid JSON body: {}", err))
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::ValidationError(message.to_string())
}

pub fn invalid_state<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::InvalidStateError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SlotbookError {
    SlotbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(validation_error("x").status_code(), 400);
        assert_eq!(invalid_state("x").status_code(), 400);
        assert_eq!(not_found("x").status_code(), 404);
        assert_eq!(conflict("x").status_code(), 409);
        assert_eq!(internal_error("x").status_code(), 500);
        assert_eq!(
            SlotbookError::DatabaseError("locked".into()).status_code(),
            500
        );
        assert_eq!(external_service_error("smtp", "down").status_code(), 502);
    }

    #[test]
    fn message_drops_the_category_prefix() {
        let err = conflict("This time slot is already booked");
        assert_eq!(err.message(), "This time slot is already booked");
        assert_eq!(err.to_string(), "Conflict: This time slot is already booked");
        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let err = result.context("writing audit log").unwrap_err();
        assert_eq!(err.kind(), "internal");
        assert_eq!(err.message(), "writing audit log: disk full");
    }
}
