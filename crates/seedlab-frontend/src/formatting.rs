use chrono::{DateTime, Utc};

/// Highest count the badge prints verbatim.
const BADGE_MAX: u64 = 99;

/// Text of the bell badge, or `None` when the badge should be hidden.
pub fn badge_label(unread: u64) -> Option<String> {
    match unread {
        0 => None,
        n if n > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}

/// Formats how long ago `at` happened, e.g. `hace 5 min`.
///
/// Anything older than a week is shown as a plain date. Timestamps from the
/// future (clock skew between client and server) count as "just now".
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "hace un momento".to_owned()
    } else if minutes < 60 {
        format!("hace {minutes} min")
    } else if hours < 24 {
        format!("hace {hours} h")
    } else if days == 1 {
        "ayer".to_owned()
    } else if days < 7 {
        format!("hace {days} días")
    } else {
        at.format("%d/%m/%Y").to_string()
    }
}

/// Parses an integer typed in a form. Blank input is `None`.
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parses a decimal typed with either a comma or a dot.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse().ok()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn badge_hides_at_zero_and_caps_at_99() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(7).as_deref(), Some("7"));
        assert_eq!(badge_label(99).as_deref(), Some("99"));
        assert_eq!(badge_label(100).as_deref(), Some("99+"));
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let ago = |d: Duration| relative_time(now - d, now);

        assert_eq!(ago(Duration::seconds(20)), "hace un momento");
        assert_eq!(ago(Duration::minutes(5)), "hace 5 min");
        assert_eq!(ago(Duration::hours(3)), "hace 3 h");
        assert_eq!(ago(Duration::hours(30)), "ayer");
        assert_eq!(ago(Duration::days(4)), "hace 4 días");
        assert_eq!(ago(Duration::days(12)), "26/02/2025");
        assert_eq!(relative_time(now + Duration::minutes(2), now), "hace un momento");
    }

    #[test]
    fn parses_form_numbers() {
        assert_eq!(parse_integer(" 42 "), Some(42));
        assert_eq!(parse_integer("-3"), Some(-3));
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("4,5"), None);
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("3.25"), Some(3.25));
        assert_eq!(parse_decimal("abc"), None);
    }
}
