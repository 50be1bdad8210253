//! Repository implementations
//!
//! This module contains the appointment repository trait and its SQL
//! implementation.

pub mod appointment;
pub mod appointment_sql;

pub use appointment::{AppointmentPage, AppointmentRepository};
pub use appointment_sql::SqlAppointmentRepository;
