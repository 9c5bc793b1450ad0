//! Week and date arithmetic in the bot's canonical timezone.
//!
//! A week id is the ISO date of that week's Monday, computed in the
//! configured local timezone (default Australia/Adelaide) rather than
//! UTC, so check-ins near midnight file under the correct local day.

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};

/// Canonical timezone when the config does not override it.
pub const DEFAULT_TIMEZONE: &str = "Australia/Adelaide";

/// Days of history the streak engine looks back over.
pub const LOOKBACK_DAYS: i64 = 90;

/// Today's date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// The Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Week id (ISO date of the Monday) for the week containing `date`.
pub fn week_id(date: NaiveDate) -> String {
    monday_of(date).to_string()
}

/// Parse a stored week id back into its Monday date.
pub fn parse_week_id(week_id: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(week_id, "%Y-%m-%d")
        .map_err(|e| CoreError::BadInput(format!("Invalid week id '{week_id}': {e}")))
}

/// Days elapsed in the week containing `today`, counting today itself.
pub fn days_elapsed(week_monday: NaiveDate, today: NaiveDate) -> u32 {
    ((today - week_monday).num_days() + 1).clamp(0, 7) as u32
}

/// Days left in the week after today.
pub fn days_remaining(week_monday: NaiveDate, today: NaiveDate) -> u32 {
    7 - days_elapsed(week_monday, today)
}

/// Which calendar date a check-in applies to, relative to "today".
///
/// A bare selector means today. A weekday selects that day within the
/// Monday-anchored week `week_offset` weeks away from the current one;
/// with no weekday, a nonzero offset keeps today's weekday in the
/// shifted week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySelector {
    pub weekday: Option<Weekday>,
    pub week_offset: i64,
}

impl DaySelector {
    /// Resolve the selector to a concrete date.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        let monday = monday_of(today) + Duration::weeks(self.week_offset);
        match self.weekday {
            Some(day) => monday + Duration::days(day.num_days_from_monday() as i64),
            None => today + Duration::weeks(self.week_offset),
        }
    }
}

/// Parse a weekday name token (full name, case-insensitive).
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    match token.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a week-offset token: `last`, `next`, or a signed integer.
pub fn parse_week_offset(token: &str) -> Option<i64> {
    match token.to_ascii_lowercase().as_str() {
        "last" => Some(-1),
        "next" => Some(1),
        other => {
            // Bare digits are habit values, not offsets; require a sign.
            if other.starts_with('+') || other.starts_with('-') {
                other.parse::<i64>().ok()
            } else {
                None
            }
        }
    }
}

/// Look up a timezone by IANA name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| {
        CoreError::Config(crate::error::ConfigError::InvalidValue {
            key: "timezone".to_string(),
            message: format!("unknown timezone '{name}'"),
        })
    })
}
