// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::time::SystemTime;

use chrono::{Datelike, Weekday};

use crate::{Result, Zone};

/// Day of the month and weekday shown in the dial's calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarInfo {
    /// Day of the month, `1..=31`.
    pub day: u32,
    /// Day of the week.
    pub weekday: Weekday,
}

impl CalendarInfo {
    /// The three-letter English abbreviation of the weekday, e.g. `Mon`.
    #[must_use]
    pub const fn weekday_abbreviation(&self) -> &'static str {
        match self.weekday {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for CalendarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday_abbreviation(), self.day)
    }
}

/// Samples the calendar fields of `instant` in `timezone`.
///
/// The result depends only on the target zone, never on the host's zone. Two zones on either
/// side of UTC can legitimately report different days for the same instant.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when `timezone` is not recognized.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
///
/// use meridian::calendar;
///
/// let info = calendar::calendar("UTC", SystemTime::UNIX_EPOCH)?;
/// assert_eq!(info.to_string(), "Thu 1");
/// # Ok::<(), meridian::Error>(())
/// ```
pub fn calendar(timezone: &str, instant: SystemTime) -> Result<CalendarInfo> {
    Ok(Zone::parse(timezone)?.calendar(instant))
}

impl Zone {
    /// The calendar fields of `instant` in this zone.
    #[must_use]
    pub fn calendar(&self, instant: SystemTime) -> CalendarInfo {
        let local = self.local(instant);

        CalendarInfo {
            day: local.day(),
            weekday: local.weekday(),
        }
    }
}
