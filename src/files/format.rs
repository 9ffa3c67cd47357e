//! Display helpers for file metadata.

use chrono::{DateTime, Utc};

/// Placeholder for unknown values.
pub const UNKNOWN: &str = "—";

pub fn format_bytes(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return UNKNOWN.to_string();
    };
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut index = 0;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    if index > 0 && value < 10.0 {
        format!("{:.1} {}", value, UNITS[index])
    } else {
        format!("{:.0} {}", value, UNITS[index])
    }
}

/// Short month-day form, e.g. `Mar 5`.
pub fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%b %-d").to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Keep `head` leading and `tail` trailing characters around `...`.
pub fn truncate_middle(value: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= head + tail + 1 {
        return value.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{start}...{end}")
}

pub fn category_label(category: Option<&str>) -> &'static str {
    match category {
        Some("audio") => "Audio",
        Some("image") => "Image",
        Some("video") => "Video",
        Some("ImageVideo") => "Media",
        Some("file") => "Files",
        Some("all") => "All",
        _ => "Other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bytes_use_binary_units() {
        assert_eq!(format_bytes(None), "—");
        assert_eq!(format_bytes(Some(0)), "0 B");
        assert_eq!(format_bytes(Some(512)), "512 B");
        assert_eq!(format_bytes(Some(1536)), "1.5 KB");
        assert_eq!(format_bytes(Some(20 * 1024)), "20 KB");
        assert_eq!(format_bytes(Some(5 * 1024 * 1024 * 1024)), "5.0 GB");
        assert_eq!(format_bytes(Some(3 * 1024_u64.pow(5))), "3072 TB");
    }

    #[test]
    fn dates_are_month_and_day() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap();
        assert_eq!(format_date(Some(ts)), "Mar 5");
        assert_eq!(format_date(None), "—");
    }

    #[test]
    fn long_names_are_shortened_in_the_middle() {
        assert_eq!(truncate_middle("short.txt", 18, 10), "short.txt");
        let long = "quarterly-report-final-final-v7-approved.pdf";
        assert_eq!(truncate_middle(long, 18, 10), "quarterly-report-f...proved.pdf");
    }

    #[test]
    fn category_labels() {
        assert_eq!(category_label(Some("ImageVideo")), "Media");
        assert_eq!(category_label(Some("file")), "Files");
        assert_eq!(category_label(Some("spreadsheet")), "Other");
        assert_eq!(category_label(None), "Other");
    }
}
