// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the outbound collaborators once at startup from `AppConfig` and
//! hands them out behind the type-erased traits from `slotbook_common`.
use slotbook_common::is_mail_enabled;
use slotbook_common::services::{
    BoxFuture, BoxedError, EmailMessage, NotificationResult, NotificationService, ServiceFactory,
};
use slotbook_config::AppConfig;
use slotbook_mailer::SmtpNotificationService;
use std::sync::Arc;
use tracing::{error, info};

/// Adapts a concrete notification service to the boxed-error trait object.
struct BoxedNotificationService<S> {
    inner: S,
}

impl<S> NotificationService for BoxedNotificationService<S>
where
    S: NotificationService,
{
    type Error = BoxedError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            self.inner
                .send_email(message)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Service factory for the backend.
pub struct SlotbookServiceFactory {
    notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

impl SlotbookServiceFactory {
    /// Create a new service factory.
    ///
    /// An SMTP setup that fails to build only disables email; the server
    /// still starts and bookings still succeed.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let mut factory = Self {
            notification_service: None,
        };

        if is_mail_enabled(&config) {
            if let Some(mail_config) = config.mail.as_ref() {
                info!("Initializing SMTP notification service...");
                match SmtpNotificationService::from_config(mail_config) {
                    Ok(service) => {
                        factory.notification_service =
                            Some(Arc::new(BoxedNotificationService { inner: service }));
                    }
                    Err(e) => {
                        error!("Failed to initialize SMTP notification service: {}", e);
                    }
                }
            }
        } else {
            info!("Mail is disabled; confirmation emails will not be sent");
        }

        factory
    }

    /// A factory with explicitly provided services, mainly for tests.
    pub fn with_notification_service(
        service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
    ) -> Self {
        Self {
            notification_service: service,
        }
    }
}

impl ServiceFactory for SlotbookServiceFactory {
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        self.notification_service.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_config::MailConfig;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: Some(587),
            username: "bookings@example.com".to_string(),
            password: "app-password".to_string(),
            from: None,
            frontend_url: None,
        }
    }

    #[test]
    fn mail_disabled_by_default() {
        let factory = SlotbookServiceFactory::new(Arc::new(AppConfig::default()));
        assert!(factory.notification_service().is_none());
    }

    #[tokio::test]
    async fn smtp_service_when_mail_is_configured() {
        let config = AppConfig {
            use_mail: true,
            mail: Some(mail_config()),
            ..AppConfig::default()
        };
        let factory = SlotbookServiceFactory::new(Arc::new(config));
        assert!(factory.notification_service().is_some());
    }

    #[test]
    fn unusable_smtp_settings_disable_mail() {
        let config = AppConfig {
            use_mail: true,
            mail: Some(MailConfig {
                password: String::new(),
                ..mail_config()
            }),
            ..AppConfig::default()
        };
        let factory = SlotbookServiceFactory::new(Arc::new(config));
        assert!(factory.notification_service().is_none());
    }
}
