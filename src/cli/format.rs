use chrono::{DateTime, Datelike, Utc};

/// Last-activity column: relative under a week ("2h ago", "3d ago"), else a date
/// ("Jan 15", or "Dec 3, 2024" outside the current year)
pub fn format_last_activity(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);

    if elapsed.num_days() < 7 {
        format_relative(elapsed.num_seconds())
    } else if timestamp.year() == now.year() {
        timestamp.format("%b %-d").to_string()
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        // Also covers clock skew putting the timestamp in the future
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_relative_within_a_week() {
        let now = now();
        assert_eq!(format_last_activity(&(now - Duration::seconds(30)), &now), "just now");
        assert_eq!(format_last_activity(&(now - Duration::minutes(5)), &now), "5m ago");
        assert_eq!(format_last_activity(&(now - Duration::hours(2)), &now), "2h ago");
        assert_eq!(format_last_activity(&(now - Duration::days(6)), &now), "6d ago");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        let now = now();
        assert_eq!(format_last_activity(&(now + Duration::hours(1)), &now), "just now");
    }

    #[test]
    fn test_absolute_same_year() {
        let now = now();
        assert_eq!(format_last_activity(&(now - Duration::days(30)), &now), "May 16");
    }

    #[test]
    fn test_absolute_previous_year() {
        let now = now();
        let timestamp: DateTime<Utc> = "2024-12-03T08:00:00Z".parse().unwrap();
        assert_eq!(format_last_activity(&timestamp, &now), "Dec 3, 2024");
    }
}
