//! Value normalisation for eLabFTW parameters

use chrono::{DateTime, NaiveDateTime, Weekday};

/// Date layouts seen in eLabFTW tables and timestamps, tried in order.
/// A leading weekday name is stripped before matching.
const DATE_FORMATS: [&str; 4] = [
    "%d. %b. %Y, %H:%M", // (Mon.,) 11. Dec. 2023, 14:45
    "%d %b %Y, %H:%M",   // (Mon,) 11 Dec 2023, 14:45
    "%Y-%m-%d %H:%M:%S", // 2024-06-13 15:04:03
    "%d.%m.%Y %H:%M",    // 24.09.2020 10:30
];

/// Drop a leading `Mon.,` / `Mon,` so a wrong weekday cannot reject the date
fn strip_weekday(date: &str) -> &str {
    match date.split_once(", ") {
        Some((head, rest)) if head.trim_end_matches('.').parse::<Weekday>().is_ok() => rest,
        _ => date,
    }
}

/// Reformat a date string as `YYYY-MM-DD`, `None` if no known layout matches
pub fn format_experiment_date(date: &str) -> Option<String> {
    let date = date.trim();
    let without_weekday = strip_weekday(date);
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(without_weekday, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|d| d.naive_local()))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Move a unit into the value: `("Temperature, °C", "800")` → `("Temperature", "800 °C")`.
///
/// A unit after the last space of the value wins over one after the last
/// comma of the parameter.
pub fn correct_unit(parameter: &str, value: &str) -> (String, String) {
    let (parameter, mut unit) = parameter.rsplit_once(',').unwrap_or((parameter, ""));
    let value = match value.rsplit_once(' ') {
        Some((value, value_unit)) => {
            unit = value_unit;
            value
        }
        None => value,
    };

    let corrected = format!("{} {}", value.trim(), unit.trim());
    (parameter.trim().to_string(), corrected.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_localized_long_date() {
        assert_eq!(
            format_experiment_date("Mon., 11. Dec. 2023, 14:45").as_deref(),
            Some("2023-12-11")
        );
    }

    #[test]
    fn formats_short_date() {
        assert_eq!(
            format_experiment_date("Mon, 11 Dec 2023, 14:45").as_deref(),
            Some("2023-12-11")
        );
    }

    #[test]
    fn formats_timestamp_and_german_date() {
        assert_eq!(
            format_experiment_date("2024-06-13 15:04:03").as_deref(),
            Some("2024-06-13")
        );
        assert_eq!(
            format_experiment_date(" 24.09.2020 10:30 ").as_deref(),
            Some("2020-09-24")
        );
    }

    #[test]
    fn formats_rfc3339_timestamp() {
        assert_eq!(
            format_experiment_date("2024-06-13T15:04:03+02:00").as_deref(),
            Some("2024-06-13")
        );
    }

    #[test]
    fn weekday_is_not_checked_against_the_date() {
        // 11 Dec 2023 was a Monday
        assert_eq!(
            format_experiment_date("Tue., 11. Dec. 2023, 14:45").as_deref(),
            Some("2023-12-11")
        );
        assert_eq!(
            format_experiment_date("Fri, 11 Dec 2023, 14:45").as_deref(),
            Some("2023-12-11")
        );
    }

    #[test]
    fn rejects_unknown_layouts() {
        assert_eq!(format_experiment_date(""), None);
        assert_eq!(format_experiment_date("yesterday"), None);
        assert_eq!(format_experiment_date("24.09.2020"), None);
        assert_eq!(format_experiment_date("Someday., 11. Dec. 2023, 14:45"), None);
    }

    #[test]
    fn unit_from_parameter_name() {
        assert_eq!(
            correct_unit("Temperature, °C", "800"),
            ("Temperature".to_string(), "800 °C".to_string())
        );
    }

    #[test]
    fn unit_from_value() {
        assert_eq!(
            correct_unit("Duration", "2 h"),
            ("Duration".to_string(), "2 h".to_string())
        );
    }

    #[test]
    fn value_unit_overrides_parameter_unit() {
        assert_eq!(
            correct_unit("Length, mm", "1.5 cm"),
            ("Length".to_string(), "1.5 cm".to_string())
        );
    }

    #[test]
    fn only_last_comma_and_space_split() {
        assert_eq!(
            correct_unit("Heating rate, ramp, K/min", "1 2 3"),
            ("Heating rate, ramp".to_string(), "1 2 3".to_string())
        );
    }

    #[test]
    fn plain_values_stay_plain() {
        assert_eq!(
            correct_unit("Operator", "Jane"),
            ("Operator".to_string(), "Jane".to_string())
        );
    }
}
