//! Due-date urgency classification.
//!
//! Urgency depends on the current time, so it is recomputed on every query
//! and never stored on an order.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OrderflowError;

/// Years at or above this are read as Buddhist era.
const BUDDHIST_ERA_THRESHOLD: i32 = 2400;
const BUDDHIST_ERA_OFFSET: i32 = 543;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum DueDateClass {
    Normal,
    Today,
    Tomorrow,
    Overdue { days: u32 },
}

impl DueDateClass {
    /// True for classes that need operational attention.
    pub fn is_urgent(self) -> bool {
        !matches!(self, DueDateClass::Normal)
    }

    pub fn overdue_days(self) -> u32 {
        match self {
            DueDateClass::Overdue { days } => days,
            _ => 0,
        }
    }
}

impl std::fmt::Display for DueDateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DueDateClass::Normal => write!(f, "normal"),
            DueDateClass::Today => write!(f, "due today"),
            DueDateClass::Tomorrow => write!(f, "due tomorrow"),
            DueDateClass::Overdue { days } => write!(f, "overdue by {} day(s)", days),
        }
    }
}

/// Classifies due dates by calendar day in a fixed business offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyClassifier {
    offset: FixedOffset,
}

impl UrgencyClassifier {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar days from `now` to `due`; negative once the due day passed.
    pub fn days_until(&self, now: DateTime<Utc>, due: DateTime<Utc>) -> i64 {
        let today = now.with_timezone(&self.offset).date_naive();
        let due_day = due.with_timezone(&self.offset).date_naive();
        due_day.signed_duration_since(today).num_days()
    }

    pub fn classify(&self, now: DateTime<Utc>, due_date: Option<DateTime<Utc>>) -> DueDateClass {
        let Some(due) = due_date else {
            return DueDateClass::Normal;
        };

        match self.days_until(now, due) {
            d if d < 0 => DueDateClass::Overdue {
                days: u32::try_from(-d).unwrap_or(u32::MAX),
            },
            0 => DueDateClass::Today,
            1 => DueDateClass::Tomorrow,
            _ => DueDateClass::Normal,
        }
    }
}

impl Default for UrgencyClassifier {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

/// Classifies by UTC calendar days.
pub fn classify(now: DateTime<Utc>, due_date: Option<DateTime<Utc>>) -> DueDateClass {
    UrgencyClassifier::default().classify(now, due_date)
}

/// Parses a due date the way order records carry it.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` and `DD/MM/YYYY`. Date-only
/// values mean the start of that day in `offset`. Buddhist-era years are
/// converted to the Gregorian calendar.
pub fn parse_due_date(value: &str, offset: FixedOffset) -> Result<DateTime<Utc>, OrderflowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(value, "empty value"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = if let Some((y, m, d)) = split3(trimmed, '-') {
        parse_ymd(value, y, m, d)?
    } else if let Some((d, m, y)) = split3(trimmed, '/') {
        parse_ymd(value, y, m, d)?
    } else {
        return Err(invalid(value, "expected RFC 3339, YYYY-MM-DD or DD/MM/YYYY"));
    };

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| invalid(value, "invalid time"))?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid(value, "ambiguous local time"))
}

fn split3(value: &str, sep: char) -> Option<(&str, &str, &str)> {
    let mut parts = value.split(sep);
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second, third))
}

fn parse_ymd(original: &str, year: &str, month: &str, day: &str) -> Result<NaiveDate, OrderflowError> {
    let number = |part: &str, what: &str| -> Result<u32, OrderflowError> {
        part.parse::<u32>()
            .map_err(|_| invalid(original, &format!("invalid {}", what)))
    };

    let mut year = i32::try_from(number(year, "year")?)
        .map_err(|_| invalid(original, "invalid year"))?;
    if year >= BUDDHIST_ERA_THRESHOLD {
        year -= BUDDHIST_ERA_OFFSET;
    }
    let month = number(month, "month")?;
    let day = number(day, "day")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .filter(|d| d.year() > 0)
        .ok_or_else(|| invalid(original, "no such calendar date"))
}

fn invalid(value: &str, reason: &str) -> OrderflowError {
    OrderflowError::InvalidDueDate {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_no_due_date_is_normal() {
        assert_eq!(classify(now(), None), DueDateClass::Normal);
    }

    #[test]
    fn test_relative_due_dates() {
        let now = now();
        assert_eq!(
            classify(now, Some(now - Duration::days(3))),
            DueDateClass::Overdue { days: 3 }
        );
        assert_eq!(classify(now, Some(now)), DueDateClass::Today);
        assert_eq!(classify(now, Some(now + Duration::days(1))), DueDateClass::Tomorrow);
        assert_eq!(classify(now, Some(now + Duration::days(2))), DueDateClass::Normal);
        assert_eq!(classify(now, Some(now + Duration::days(30))), DueDateClass::Normal);
    }

    #[test]
    fn test_calendar_day_boundaries() {
        let now = now();
        let start_of_day = Utc.with_ymd_and_hms(2024, 6, 15, 0, 1, 0).unwrap();
        let end_of_day = Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 0).unwrap();
        assert_eq!(classify(now, Some(start_of_day)), DueDateClass::Today);
        assert_eq!(classify(now, Some(end_of_day)), DueDateClass::Today);

        // Two hours ago but yesterday by the calendar.
        let late_now = Utc.with_ymd_and_hms(2024, 6, 16, 1, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 6, 15, 23, 0, 0).unwrap();
        assert_eq!(
            classify(late_now, Some(yesterday)),
            DueDateClass::Overdue { days: 1 }
        );
    }

    #[test]
    fn test_offset_changes_calendar_day() {
        let bangkok = UrgencyClassifier::new(FixedOffset::east_opt(7 * 3600).unwrap());
        // 18:00 UTC on the 15th is already the 16th in Bangkok.
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(classify(now, Some(due)), DueDateClass::Today);
        assert_eq!(
            bangkok.classify(now, Some(due)),
            DueDateClass::Overdue { days: 1 }
        );
    }

    #[test]
    fn test_class_helpers() {
        assert!(!DueDateClass::Normal.is_urgent());
        assert!(DueDateClass::Today.is_urgent());
        assert!(DueDateClass::Tomorrow.is_urgent());
        assert!(DueDateClass::Overdue { days: 2 }.is_urgent());
        assert_eq!(DueDateClass::Overdue { days: 2 }.overdue_days(), 2);
        assert_eq!(DueDateClass::Today.overdue_days(), 0);
    }

    #[test]
    fn test_class_serialization() {
        let json = serde_json::to_value(DueDateClass::Overdue { days: 4 }).unwrap();
        assert_eq!(json["class"], "overdue");
        assert_eq!(json["days"], 4);
        let json = serde_json::to_value(DueDateClass::Tomorrow).unwrap();
        assert_eq!(json["class"], "tomorrow");
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_due_date("2024-06-20T17:00:00+07:00", Utc.fix()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 20, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_in_offset() {
        let bangkok = FixedOffset::east_opt(7 * 3600).unwrap();
        let parsed = parse_due_date("2024-06-20", bangkok).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 19, 17, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_thai_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("29/02/2024", Utc.fix()).unwrap(), expected);
        assert_eq!(parse_due_date("29/02/2567", Utc.fix()).unwrap(), expected);
        assert_eq!(parse_due_date("2567-02-29", Utc.fix()).unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        for value in ["", "   ", "tomorrow", "31/02/2024", "2024-13-01", "1/2", "a/b/c"] {
            assert!(
                matches!(
                    parse_due_date(value, Utc.fix()),
                    Err(OrderflowError::InvalidDueDate { .. })
                ),
                "expected '{}' to be rejected",
                value
            );
        }
    }
}
