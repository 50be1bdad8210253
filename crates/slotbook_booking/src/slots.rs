// --- File: crates/slotbook_booking/src/slots.rs ---

// The daily booking grid. Every date offers the same half-open range
// [start_hour, end_hour) cut into `step_minutes` intervals.

use slotbook_common::{config_error, SlotbookError};
use slotbook_config::BusinessHoursConfig;

/// Opening hours and slot length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub step_minutes: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            step_minutes: 30,
        }
    }
}

impl TryFrom<&BusinessHoursConfig> for BusinessHours {
    type Error = SlotbookError;

    fn try_from(config: &BusinessHoursConfig) -> Result<Self, Self::Error> {
        if config.step_minutes == 0 {
            return Err(config_error("business_hours.step_minutes must be positive"));
        }
        if config.start_hour >= config.end_hour || config.end_hour > 24 {
            return Err(config_error(format!(
                "business_hours must satisfy start_hour < end_hour <= 24 (got {}..{})",
                config.start_hour, config.end_hour
            )));
        }
        Ok(Self {
            start_hour: config.start_hour,
            end_hour: config.end_hour,
            step_minutes: config.step_minutes,
        })
    }
}

/// The default grid: "09:00", "09:30", ..., "16:30".
pub fn generate_slots() -> Vec<String> {
    generate_slots_for(&BusinessHours::default())
}

/// The grid for the given hours, ascending, formatted `HH:MM`.
pub fn generate_slots_for(hours: &BusinessHours) -> Vec<String> {
    if hours.step_minutes == 0 {
        return Vec::new();
    }
    let start = hours.start_hour * 60;
    let end = hours.end_hour.min(24) * 60;

    (start..end)
        .step_by(hours.step_minutes as usize)
        .map(|minutes| format!("{:02}:{:02}", minutes / 60, minutes % 60))
        .collect()
}

/// Whether `time` is exactly one of the grid's slot labels.
pub fn is_valid_slot(hours: &BusinessHours, time: &str) -> bool {
    generate_slots_for(hours).iter().any(|slot| slot == time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_sixteen_half_hours() {
        let slots = generate_slots();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("16:30"));
        assert_eq!(slots[1], "09:30");
    }

    #[test]
    fn validity_is_exact_membership() {
        let hours = BusinessHours::default();
        assert!(is_valid_slot(&hours, "09:00"));
        assert!(is_valid_slot(&hours, "16:30"));
        assert!(!is_valid_slot(&hours, "17:00"));
        assert!(!is_valid_slot(&hours, "9:00"));
        assert!(!is_valid_slot(&hours, "09:15"));
    }

    #[test]
    fn config_is_validated() {
        let mut config = BusinessHoursConfig::default();
        assert_eq!(
            BusinessHours::try_from(&config).unwrap(),
            BusinessHours::default()
        );

        config.step_minutes = 0;
        assert!(BusinessHours::try_from(&config).is_err());

        config.step_minutes = 15;
        config.end_hour = 8;
        assert!(BusinessHours::try_from(&config).is_err());
    }
}
