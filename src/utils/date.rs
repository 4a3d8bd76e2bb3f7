use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Renders a backend timestamp as `dd.mm.YYYY HH:MM`. Values that do not
/// parse are returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format(DISPLAY_FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_common_backend_shapes() {
        assert_eq!(format_timestamp("2025-03-07T09:05:00"), "07.03.2025 09:05");
        assert_eq!(format_timestamp("2025-03-07T09:05:00.123456"), "07.03.2025 09:05");
        assert_eq!(format_timestamp("2025-03-07 21:40:10"), "07.03.2025 21:40");
        assert_eq!(format_timestamp("2025-03-07T09:05:00+03:00"), "07.03.2025 09:05");
        assert_eq!(format_timestamp("2025-03-07"), "07.03.2025");
    }

    #[test]
    fn unparsable_values_pass_through() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }
}
