#[cfg(test)]
mod tests {
    use crate::logic::parse_date;
    use crate::slots::{generate_slots_for, is_valid_slot, BusinessHours};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn minutes_of(slot: &str) -> u32 {
        let (h, m) = slot.split_at(2);
        h.parse::<u32>().unwrap() * 60 + m[1..].parse::<u32>().unwrap()
    }

    proptest! {
        // Slots are strictly ascending and fall inside [start, end)
        #[test]
        fn test_slots_ascending_within_hours(
            start_hour in 0..23u32,
            span in 1..12u32,
            step_minutes in 5..180u32,
        ) {
            let end_hour = (start_hour + span).min(24);
            let hours = BusinessHours { start_hour, end_hour, step_minutes };
            let slots = generate_slots_for(&hours);

            prop_assert!(!slots.is_empty());
            prop_assert_eq!(minutes_of(&slots[0]), start_hour * 60);

            let minutes: Vec<u32> = slots.iter().map(|s| minutes_of(s)).collect();
            for pair in minutes.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], step_minutes);
            }
            for m in &minutes {
                prop_assert!(*m >= start_hour * 60 && *m < end_hour * 60);
            }
        }

        // The grid size is the number of steps that fit in the opening span
        #[test]
        fn test_slot_count_matches_span(
            start_hour in 0..20u32,
            span in 1..4u32,
            step_minutes in 1..90u32,
        ) {
            let end_hour = start_hour + span;
            let hours = BusinessHours { start_hour, end_hour, step_minutes };
            let expected = (span * 60).div_ceil(step_minutes) as usize;
            prop_assert_eq!(generate_slots_for(&hours).len(), expected);
        }

        // Every generated label is HH:MM and accepted by the validator
        #[test]
        fn test_every_slot_is_valid(step_minutes in 1..120u32) {
            let hours = BusinessHours { step_minutes, ..BusinessHours::default() };
            for slot in generate_slots_for(&hours) {
                prop_assert_eq!(slot.len(), 5);
                prop_assert_eq!(&slot[2..3], ":");
                prop_assert!(is_valid_slot(&hours, &slot));
            }
        }

        // Times off the default half-hour grid are rejected
        #[test]
        fn test_off_grid_minutes_rejected(hour in 0..24u32, minute in 0..60u32) {
            let label = format!("{:02}:{:02}", hour, minute);
            let on_grid = (9..17).contains(&hour) && (minute == 0 || minute == 30);
            prop_assert_eq!(is_valid_slot(&BusinessHours::default(), &label), on_grid);
        }

        // Any real calendar date survives formatting and strict parsing
        #[test]
        fn test_parse_date_accepts_formatted_dates(days in 0i64..200_000) {
            let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Duration::days(days);
            let raw = date.format("%Y-%m-%d").to_string();
            prop_assert_eq!(parse_date(&raw).unwrap(), date);
        }

        // Anything that is not exactly ten characters is rejected
        #[test]
        fn test_parse_date_rejects_wrong_length(raw in "[0-9-]{0,9}|[0-9-]{11,16}") {
            prop_assert!(parse_date(&raw).is_err());
        }
    }
}
