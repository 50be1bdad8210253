// --- File: crates/slotbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod handlers; // Health, index and fallback handlers
pub mod http; // HTTP error mapping
pub mod logging; // Logging utilities
pub mod models; // Data structures and models
pub mod routes; // Route definitions
pub mod services; // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::{api_routes, routes};

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, internal_error, invalid_state, not_found,
    validation_error, Context, HttpStatusCode, SlotbookError,
};

// Re-export HTTP utilities for easier access
pub use http::{handle_result, IntoHttpResponse, INTERNAL_ERROR_MESSAGE};

pub use features::{is_feature_enabled, is_mail_enabled};

pub use models::{Appointment, AppointmentChanges, AppointmentStatus, NewAppointment};
