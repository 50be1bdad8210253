// --- File: crates/slotbook_mailer/src/dispatcher.rs ---
//! The outbound notification queue.
//!
//! Request handlers hold a cheap [`Notifier`] and push [`BookingEvent`]s into
//! an unbounded channel. A single background task renders and delivers them.
//! Delivery failures are logged and dropped; they never reach the request
//! that caused them.

use crate::service::MailerError;
use crate::templates::EmailTemplates;
use slotbook_common::models::Appointment;
use slotbook_common::services::{BoxedError, NotificationService};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// A type-erased notification service, as handed out by the service factory.
pub type DynNotificationService = Arc<dyn NotificationService<Error = BoxedError>>;

/// Something that happened to a booking and may warrant an email.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    Confirmed(Appointment),
}

/// Producer handle for the notification queue.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    sender: Option<UnboundedSender<BookingEvent>>,
}

impl Notifier {
    /// A notifier that drops every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A notifier paired with the receiving end of its queue.
    pub fn channel() -> (Self, UnboundedReceiver<BookingEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Queue a confirmation for a freshly created booking. Never fails.
    pub fn booking_confirmed(&self, appointment: &Appointment) {
        match &self.sender {
            Some(sender) => {
                if sender
                    .send(BookingEvent::Confirmed(appointment.clone()))
                    .is_err()
                {
                    warn!(
                        "Notification dispatcher has stopped; no confirmation for {}",
                        appointment.booking_id
                    );
                }
            }
            None => debug!(
                "Notifications disabled; no confirmation for {}",
                appointment.booking_id
            ),
        }
    }
}

/// Start the background delivery task.
///
/// With `service` set to `None` events are still drained and logged, so the
/// booking flow is identical whether or not mail is configured. The task ends
/// once every [`Notifier`] clone has been dropped.
pub fn spawn_dispatcher(
    service: Option<DynNotificationService>,
    templates: EmailTemplates,
) -> (Notifier, JoinHandle<()>) {
    let (notifier, receiver) = Notifier::channel();
    let handle = tokio::spawn(run_dispatcher(receiver, service, templates));
    (notifier, handle)
}

async fn run_dispatcher(
    mut receiver: UnboundedReceiver<BookingEvent>,
    service: Option<DynNotificationService>,
    templates: EmailTemplates,
) {
    match &service {
        Some(_) => info!("Notification dispatcher started"),
        None => warn!("Email not configured; confirmation emails will be skipped"),
    }

    while let Some(event) = receiver.recv().await {
        deliver(service.as_deref(), &templates, event).await;
    }

    info!("Notification dispatcher stopped");
}

/// Render and send the email for one event. Returns whether an email went out.
pub async fn deliver(
    service: Option<&dyn NotificationService<Error = BoxedError>>,
    templates: &EmailTemplates,
    event: BookingEvent,
) -> bool {
    let BookingEvent::Confirmed(appointment) = event;

    let Some(service) = service else {
        info!(
            "Skipping confirmation email for {} ({}) on {} at {}",
            appointment.booking_id,
            appointment.customer_email,
            appointment.appointment_date,
            appointment.appointment_time
        );
        return false;
    };

    let message = templates.confirmation(&appointment);
    match service.send_email(message).await {
        Ok(result) => {
            info!(
                "Confirmation email sent to {} for {} (status {})",
                appointment.customer_email, appointment.booking_id, result.status
            );
            true
        }
        Err(err) => {
            error!(
                "Failed to send confirmation email for {}: {}",
                appointment.booking_id, err
            );
            let auth_failed = err
                .0
                .downcast_ref::<MailerError>()
                .is_some_and(MailerError::is_auth_failure);
            if auth_failed {
                error!(
                    "SMTP authentication failed. Check mail.username and mail.password \
                     (MAIL_USERNAME / MAIL_PASSWORD); Gmail requires an app password."
                );
            }
            false
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
