use chrono::{DateTime, Utc};

const SIZE_UNITS: &[&str] = &["Bytes", "kB", "MB", "GB", "TB"];

/// Formats a byte count into the largest 1024-based unit, e.g. "546.03 kB".
/// Up to two decimals, trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exp = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exp as i32);

    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');

    format!("{} {}", rendered, SIZE_UNITS[exp])
}

/// Formats a timestamp the way the public API presents dates,
/// e.g. "May 17, 2025 1:49 PM".
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(10), "10 Bytes");
        assert_eq!(format_file_size(1024), "1 kB");
        assert_eq!(format_file_size(1536), "1.5 kB");
        assert_eq!(format_file_size(1048576), "1 MB");
        assert_eq!(format_file_size(559_135), "546.03 kB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_format_file_size_caps_at_largest_unit() {
        // Petabyte-scale input still renders in TB
        let huge = 1024_u64.pow(5) * 3;
        assert!(format_file_size(huge).ends_with(" TB"));
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 5, 17, 13, 49, 12).unwrap();
        assert_eq!(format_timestamp(ts), "May 17, 2025 1:49 PM");

        let morning = Utc.with_ymd_and_hms(2025, 1, 3, 9, 5, 0).unwrap();
        assert_eq!(format_timestamp(morning), "Jan 3, 2025 9:05 AM");
    }
}
