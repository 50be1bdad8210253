// --- File: crates/slotbook_common/src/services.rs ---
//! Service abstractions for collaborators outside the booking rules.
//!
//! These traits decouple the HTTP layer and the booking workflow from concrete
//! infrastructure, so tests can plug in recording fakes.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for outbound notifications.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an email.
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Outcome of a delivered notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Transport-level identifier or response line, if any.
    pub id: Option<String>,
    pub status: String,
}

/// Reports whether the appointment store is reachable.
pub trait StoreProbe: Send + Sync {
    fn is_healthy(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// A factory for creating service instances.
pub trait ServiceFactory: Send + Sync {
    /// Get a notification service instance, if mail is configured.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;
}
