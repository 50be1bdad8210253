// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built single-page client, served as fallback.
    #[serde(default)]
    pub static_dir: Option<String>,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/slotbook.db, loaded via SLOTBOOK__DATABASE__URL
    #[serde(default)]
    pub max_connections: Option<u32>,
}

// --- CORS Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// --- Business Hours Config ---
// The daily booking grid. Every day shares the same grid.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BusinessHoursConfig {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
    /// IANA zone name used to decide what "today" is. Server local time when unset.
    #[serde(default)]
    pub time_zone: Option<String>,
}

fn default_start_hour() -> u32 {
    9
}

fn default_end_hour() -> u32 {
    17
}

fn default_step_minutes() -> u32 {
    30
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            step_minutes: default_step_minutes(),
            time_zone: None,
        }
    }
}

// --- Mail Config ---
// SMTP relay used for confirmation emails. Password is usually "secret_from_env" (MAIL_PASSWORD).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub password: String,
    /// Sender address; the SMTP username when unset.
    #[serde(default)]
    pub from: Option<String>,
    /// Base URL of the client, used for the "manage your booking" link.
    #[serde(default)]
    pub frontend_url: Option<String>,
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
    /// When set, logs are also written to daily rolling files in this directory.
    #[serde(default)]
    pub directory: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default = "default_environment")]
    pub environment: String,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_mail: bool,

    // --- Sections ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub business_hours: BusinessHoursConfig,
    #[serde(default)]
    pub mail: Option<MailConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                static_dir: None,
            },
            environment: default_environment(),
            use_mail: false,
            database: None,
            cors: CorsConfig::default(),
            business_hours: BusinessHoursConfig::default(),
            mail: None,
            logging: LoggingConfig::default(),
        }
    }
}
