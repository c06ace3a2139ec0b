//! Shared form-field plumbing for the wizard screens.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use crossterm::event::KeyCode;

/// One editable line in a wizard form.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }

    pub fn with_value(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.value.push(c),
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Money/number entry: anything unparseable is 0.
pub fn parse_amount(value: &str) -> f64 {
    value.trim().replace(',', "").parse::<f64>().unwrap_or(0.0)
}

/// Optional numeric id entry; blank or garbage means none.
pub fn parse_optional_id(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}

/// Comma-separated tag entry.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_default_to_zero_on_parse_failure() {
        assert_eq!(parse_amount("1200.50"), 1200.50);
        assert_eq!(parse_amount("1,200"), 1200.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
    }

    #[test]
    fn dates_and_times_parse_strictly() {
        assert!(parse_date("2025-03-01").is_some());
        assert!(parse_date("03/01/2025").is_none());
        assert!(parse_time("10:00").is_some());
        assert!(parse_time("10am").is_none());
        assert!(parse_datetime("2025-03-01 10:00").is_some());
    }

    #[test]
    fn tags_split_and_trim() {
        assert_eq!(
            parse_tags("retirement, hnw ,, estate"),
            vec!["retirement", "hnw", "estate"]
        );
        assert!(parse_tags("").is_empty());
    }
}
