//! String, number and date formatting for display.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

/// Truncate to `max_len` characters, adding an ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// First 8 characters of a UUID id; other ids are returned whole.
pub fn short_id(id: &str) -> String {
    match Uuid::parse_str(id) {
        Ok(uuid) => uuid.to_string()[..8].to_string(),
        Err(_) => id.to_string(),
    }
}

/// Format a timestamp, in `timezone` when pretty.
pub fn format_datetime(dt: &DateTime<Utc>, timezone: Option<Tz>, pretty: bool) -> String {
    if !pretty {
        return dt.to_rfc3339();
    }
    match timezone {
        Some(tz) => dt.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// Two-decimal currency amount.
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Whole numbers without decimals, everything else with two.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Replace newlines so a value fits on one table line.
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}
