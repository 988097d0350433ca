// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Sampling of local wall-clock time for a timezone.
//!
//! Every function here is a pure function of `(timezone, instant)`. The UTC offset and the
//! daylight-saving rule are resolved for the given instant on each call, so the functions are
//! safe to call on every tick for the same location.

use std::time::SystemTime;

use chrono::Timelike;

use crate::{Result, Zone};

/// Hour, minute and second of a wall-clock reading on a 12-hour dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeParts {
    /// Hour on a 12-hour clock, `1..=12`.
    pub hours: u32,
    /// Minute, `0..=59`.
    pub minutes: u32,
    /// Second, `0..=59`.
    pub seconds: u32,
}

/// Samples the 12-hour wall-clock reading of `instant` in `timezone`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when `timezone` is not recognized.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use meridian::time_sampler::{self, TimeParts};
///
/// // 1970-01-01T13:04:05Z
/// let instant = SystemTime::UNIX_EPOCH + Duration::from_secs(13 * 3600 + 4 * 60 + 5);
///
/// assert_eq!(
///     time_sampler::sample("UTC", instant)?,
///     TimeParts { hours: 1, minutes: 4, seconds: 5 }
/// );
/// # Ok::<(), meridian::Error>(())
/// ```
pub fn sample(timezone: &str, instant: SystemTime) -> Result<TimeParts> {
    Ok(Zone::parse(timezone)?.time_parts(instant))
}

/// Formats `instant` in `timezone` as a 24-hour `HH:MM:SS` string.
///
/// The hour is never rendered as `24`; see [`normalize_midnight`].
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when `timezone` is not recognized.
pub fn digital_time(timezone: &str, instant: SystemTime) -> Result<String> {
    Ok(Zone::parse(timezone)?.digital_time(instant))
}

/// Rewrites a leading `24:` hour to `00:`.
///
/// Some formatters render local midnight as `24:00:00`. Any other input is returned unchanged.
#[must_use]
pub fn normalize_midnight(formatted: &str) -> String {
    match formatted.strip_prefix("24:") {
        Some(rest) => format!("00:{rest}"),
        None => formatted.to_owned(),
    }
}

impl Zone {
    /// The 12-hour wall-clock reading of `instant` in this zone.
    #[must_use]
    pub fn time_parts(&self, instant: SystemTime) -> TimeParts {
        let local = self.local(instant);
        let (_is_pm, hours) = local.hour12();

        TimeParts {
            hours,
            minutes: local.minute(),
            seconds: local.second(),
        }
    }

    /// The 24-hour `HH:MM:SS` reading of `instant` in this zone.
    #[must_use]
    pub fn digital_time(&self, instant: SystemTime) -> String {
        normalize_midnight(&self.local(instant).format("%H:%M:%S").to_string())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ErrorKind;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn sample_afternoon_is_twelve_hour() {
        // 1970-01-01T15:30:45Z
        let parts = sample("UTC", at(15 * 3600 + 30 * 60 + 45)).unwrap();

        assert_eq!(
            parts,
            TimeParts {
                hours: 3,
                minutes: 30,
                seconds: 45
            }
        );
    }

    #[test]
    fn sample_midnight_and_noon_are_twelve() {
        assert_eq!(sample("UTC", at(0)).unwrap().hours, 12);
        assert_eq!(sample("UTC", at(12 * 3600)).unwrap().hours, 12);
    }

    #[test]
    fn sample_applies_offset() {
        // 1970-01-01T00:00:00Z is 09:00 in Tokyo and 19:00 the previous day in New York.
        assert_eq!(sample("Asia/Tokyo", at(0)).unwrap().hours, 9);
        assert_eq!(sample("America/New_York", at(0)).unwrap().hours, 7);
    }

    #[test]
    fn sample_applies_half_hour_offset() {
        // India is +05:30 all year.
        let parts = sample("Asia/Kolkata", at(0)).unwrap();

        assert_eq!((parts.hours, parts.minutes), (5, 30));
    }

    #[test]
    fn sample_follows_daylight_saving_transition() {
        // 2024-03-10T06:59:59Z is 01:59:59 EST, one second later it is 03:00:00 EDT.
        let before = sample("America/New_York", at(1_710_053_999)).unwrap();
        let after = sample("America/New_York", at(1_710_054_000)).unwrap();

        assert_eq!(
            before,
            TimeParts {
                hours: 1,
                minutes: 59,
                seconds: 59
            }
        );
        assert_eq!(
            after,
            TimeParts {
                hours: 3,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn sample_invalid_timezone() {
        let error = sample("Not/AZone", at(0)).unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::InvalidTimezone { timezone } if timezone == "Not/AZone"));
    }

    #[test]
    fn digital_time_is_twenty_four_hour() {
        assert_eq!(digital_time("UTC", at(23 * 3600 + 5 * 60 + 9)).unwrap(), "23:05:09");
        assert_eq!(digital_time("Asia/Tokyo", at(23 * 3600)).unwrap(), "08:00:00");
    }

    #[test]
    fn digital_time_midnight_is_zero_hour() {
        let formatted = digital_time("UTC", at(86_400)).unwrap();

        assert_eq!(formatted, "00:00:00");
        assert!(!formatted.starts_with("24"));
    }

    #[test]
    fn digital_time_invalid_timezone() {
        digital_time("Local/Host", at(0)).unwrap_err();
    }

    #[test]
    fn normalize_midnight_rewrites_hour_24() {
        assert_eq!(normalize_midnight("24:00:01"), "00:00:01");
        assert_eq!(normalize_midnight("23:59:59"), "23:59:59");
        assert_eq!(normalize_midnight("12:24:00"), "12:24:00");
    }
}
