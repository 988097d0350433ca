// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Conversion of a wall-clock reading into analog hand angles.

use crate::time_sampler::TimeParts;

/// Degrees the hour hand travels per hour.
pub const HOUR_STEP: f64 = 360.0 / 12.0;

/// Degrees the minute and second hands travel per minute or second.
pub const MINUTE_STEP: f64 = 360.0 / 60.0;

/// Absolute angles of the three hands, in degrees clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrowDegrees {
    /// Hour hand angle.
    pub hour: f64,
    /// Minute hand angle.
    pub minute: f64,
    /// Second hand angle.
    pub second: f64,
}

/// Computes continuous hand angles for a 12-hour reading.
///
/// Sub-unit contributions are composed so the hands sweep instead of jumping: seconds nudge
/// the minute hand and minutes and seconds both nudge the hour hand. An hour of `12` is the
/// top of the dial and contributes nothing, like `0`.
///
/// # Examples
///
/// ```
/// use meridian::angles::{ArrowDegrees, angles_from};
///
/// assert_eq!(
///     angles_from(3, 30, 0),
///     ArrowDegrees { hour: 105.0, minute: 180.0, second: 0.0 }
/// );
/// ```
#[must_use]
pub fn angles_from(hours: u32, minutes: u32, seconds: u32) -> ArrowDegrees {
    let hours = f64::from(hours % 12);
    let minutes = f64::from(minutes);
    let seconds = f64::from(seconds);

    ArrowDegrees {
        hour: HOUR_STEP * hours + (HOUR_STEP / 60.0) * minutes + (HOUR_STEP / 3600.0) * seconds,
        minute: MINUTE_STEP * minutes + (MINUTE_STEP / 60.0) * seconds,
        second: MINUTE_STEP * seconds,
    }
}

impl From<TimeParts> for ArrowDegrees {
    fn from(parts: TimeParts) -> Self {
        angles_from(parts.hours, parts.minutes, parts.seconds)
    }
}
