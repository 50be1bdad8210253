// --- File: crates/slotbook_mailer/src/service.rs ---
use lettre::address::AddressError;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use slotbook_common::services::{BoxFuture, EmailMessage, NotificationResult, NotificationService};
use slotbook_common::{external_service_error, SlotbookError};
use slotbook_config::MailConfig;
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_SMTP_PORT: u16 = 587;

/// Mailer-specific error types.
#[derive(Error, Debug)]
pub enum MailerError {
    /// SMTP host, credentials or sender are missing or unusable
    #[error("Mail configuration missing or incomplete: {0}")]
    ConfigError(String),

    /// A sender or recipient address did not parse
    #[error("Invalid email address: {0}")]
    AddressError(#[from] AddressError),

    /// The message could not be assembled
    #[error("Failed to build email: {0}")]
    BuildError(#[from] lettre::error::Error),

    /// The SMTP exchange failed
    #[error("SMTP delivery failed: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),
}

impl MailerError {
    /// True when the SMTP server rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            MailerError::SmtpError(err) => {
                err.status().is_some_and(|code| code.to_string() == "535")
                    || err.to_string().to_lowercase().contains("authentication")
            }
            _ => false,
        }
    }
}

impl From<MailerError> for SlotbookError {
    fn from(err: MailerError) -> Self {
        match err {
            MailerError::ConfigError(msg) => SlotbookError::ConfigError(msg),
            other => external_service_error("smtp", other),
        }
    }
}

/// Email delivery over an SMTP relay with STARTTLS.
pub struct SmtpNotificationService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationService {
    /// Create a new SMTP notification service from the `[mail]` config section.
    pub fn from_config(config: &MailConfig) -> Result<Self, MailerError> {
        if config.smtp_host.is_empty() {
            return Err(MailerError::ConfigError("smtp_host is empty".to_string()));
        }
        if config.username.is_empty() || config.password.is_empty() {
            return Err(MailerError::ConfigError(
                "username and password are required".to_string(),
            ));
        }

        let from: Mailbox = config
            .from
            .as_deref()
            .unwrap_or(&config.username)
            .parse()?;
        let port = config.smtp_port.unwrap_or(DEFAULT_SMTP_PORT);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        info!(
            "SMTP notification service configured for {}:{} as {}",
            config.smtp_host, port, from
        );
        Ok(Self { transport, from })
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message, MailerError> {
        let builder = Message::builder()
            .from(self.from.clone())
            .to(message.to.parse::<Mailbox>()?)
            .subject(message.subject.as_str());

        let email = match &message.html_body {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                html.clone(),
            ))?,
            None => builder.singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(message.text_body.clone()),
            )?,
        };
        Ok(email)
    }
}

impl NotificationService for SmtpNotificationService {
    type Error = MailerError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            let email = self.build_message(&message)?;
            debug!("Sending '{}' to {}", message.subject, message.to);

            let response = self.transport.send(email).await?;
            let reply = response.message().collect::<Vec<_>>().join(" ");

            Ok(NotificationResult {
                id: if reply.is_empty() { None } else { Some(reply) },
                status: response.code().to_string(),
            })
        })
    }
}
