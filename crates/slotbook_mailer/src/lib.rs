// --- File: crates/slotbook_mailer/src/lib.rs ---
//! Outbound email for Slotbook.
//!
//! - [`service`]: SMTP delivery through `lettre`
//! - [`templates`]: confirmation email rendering
//! - [`dispatcher`]: the queue between the booking workflow and delivery

pub mod dispatcher;
pub mod service;
pub mod templates;

pub use dispatcher::{spawn_dispatcher, BookingEvent, Notifier};
pub use service::{MailerError, SmtpNotificationService};
pub use templates::EmailTemplates;
