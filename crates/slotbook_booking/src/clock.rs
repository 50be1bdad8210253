// --- File: crates/slotbook_booking/src/clock.rs ---
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use slotbook_common::{config_error, SlotbookError};
use slotbook_config::BusinessHoursConfig;
use std::str::FromStr;

/// Source of "today" for the past-date rule.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, evaluated in the business time zone or the server's local zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    time_zone: Option<Tz>,
}

impl SystemClock {
    pub fn new(time_zone: Option<Tz>) -> Self {
        Self { time_zone }
    }

    pub fn from_config(config: &BusinessHoursConfig) -> Result<Self, SlotbookError> {
        let time_zone = match config.time_zone.as_deref() {
            Some(name) if !name.is_empty() => Some(Tz::from_str(name).map_err(|e| {
                config_error(format!("Unknown business_hours.time_zone '{}': {}", name, e))
            })?),
            _ => None,
        };
        Ok(Self { time_zone })
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.time_zone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
