use chrono::{DateTime, Local, Utc};

/// Date and time in the user's local zone, as shown on the leaderboard.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value
        .with_timezone(&Local)
        .format("%-m/%-d/%Y %-I:%M:%S %p")
        .to_string()
}

/// One decimal place followed by `%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(85.0), "85.0%");
        assert_eq!(format_percent(66.666), "66.7%");
    }

    #[test]
    fn datetime_keeps_year() {
        assert!(format_datetime(fixed_now()).contains("2023"));
    }
}
