//! Runtime feature switches.
//!
//! A feature is on only when its `use_*` flag is set and its config section
//! is present. With mail disabled, bookings still succeed; the confirmation
//! email is just skipped.

use slotbook_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(
    _config: &AppConfig,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if confirmation emails should be sent.
pub fn is_mail_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config, config.use_mail, config.mail.as_ref())
        && config
            .mail
            .as_ref()
            .is_some_and(|mail| !mail.smtp_host.is_empty() && !mail.username.is_empty())
}
