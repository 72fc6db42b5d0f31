use chrono::{DateTime, NaiveDateTime};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human file size with up to two decimals, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes > 0 {
        format!("{minutes}m {rest}s")
    } else {
        format!("{rest}s")
    }
}

/// Cuts `text` to `max` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

/// Renders a backend timestamp as `YYYY-MM-DD HH:MM:SS`, passing unknown
/// shapes through unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y%m%d_%H%M%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes_trim_trailing_zeros() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2_621_440), "2.5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn durations_switch_to_minutes() {
        assert_eq!(format_duration(8), "8s");
        assert_eq!(format_duration(75), "1m 15s");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_text("short", 50), "short");
        assert_eq!(truncate_text("一隻貓在屋頂", 3), "一隻貓...");
    }

    #[test]
    fn timestamps_normalize_known_shapes() {
        assert_eq!(format_timestamp("2024-05-01T08:30:00Z"), "2024-05-01 08:30:00");
        assert_eq!(format_timestamp("2024-05-01T08:30:00.123456"), "2024-05-01 08:30:00");
        assert_eq!(format_timestamp("20240501_083000"), "2024-05-01 08:30:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
