//! Appointment store for Slotbook
//!
//! This crate owns the `appointments` table. It talks to the database through
//! SQLx's `Any` driver so the same code runs against a file-backed SQLite
//! database in production and `sqlite::memory:` in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use slotbook_db::{AppointmentRepository, DbClient, SqlAppointmentRepository};
//!
//! async fn setup() -> Result<SqlAppointmentRepository, slotbook_db::DbError> {
//!     let client = DbClient::from_url("sqlite://data/slotbook.db").await?;
//!     let repository = SqlAppointmentRepository::new(client);
//!     repository.init_schema().await?;
//!     Ok(repository)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

// Re-export the client, error and repository types for ease of use
pub use client::DbClient;
pub use error::DbError;
pub use repositories::{AppointmentPage, AppointmentRepository, SqlAppointmentRepository};
