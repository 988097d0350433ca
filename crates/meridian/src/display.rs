// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::angles::ArrowDegrees;
use crate::calendar::CalendarInfo;
use crate::rotation::Hand;
use crate::Result;

/// The render target of one dial.
///
/// A [`RefreshLoop`][crate::RefreshLoop] publishes to its display once per tick: the digital
/// time, the calendar and a rotation for each of the three hands, in that order.
///
/// Rotations are unwrapped and keep growing past 360° so that hands never visibly spin
/// backward; a display that animates between rotations must not reduce them modulo 360.
pub trait ClockDisplay {
    /// Shows the 24-hour `HH:MM:SS` time.
    fn show_digital_time(&mut self, time: &str);

    /// Shows the day of month and weekday.
    fn show_calendar(&mut self, calendar: CalendarInfo);

    /// Rotates `hand` to `degrees`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingDisplayTarget`][crate::ErrorKind::MissingDisplayTarget] when the
    /// hand is no longer present on the display. The refresh loop logs the failure and keeps
    /// the hand's previous rotation.
    fn rotate_hand(&mut self, hand: Hand, degrees: f64) -> Result<()>;
}

impl<D: ClockDisplay + ?Sized> ClockDisplay for &mut D {
    fn show_digital_time(&mut self, time: &str) {
        (**self).show_digital_time(time);
    }

    fn show_calendar(&mut self, calendar: CalendarInfo) {
        (**self).show_calendar(calendar);
    }

    fn rotate_hand(&mut self, hand: Hand, degrees: f64) -> Result<()> {
        (**self).rotate_hand(hand, degrees)
    }
}

impl<D: ClockDisplay + ?Sized> ClockDisplay for Box<D> {
    fn show_digital_time(&mut self, time: &str) {
        (**self).show_digital_time(time);
    }

    fn show_calendar(&mut self, calendar: CalendarInfo) {
        (**self).show_calendar(calendar);
    }

    fn rotate_hand(&mut self, hand: Hand, degrees: f64) -> Result<()> {
        (**self).rotate_hand(hand, degrees)
    }
}

/// Everything one tick published.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The 24-hour digital time.
    pub digital_time: String,
    /// The calendar.
    pub calendar: CalendarInfo,
    /// The rotation of each hand after the tick.
    ///
    /// A hand whose display target was missing keeps its rotation from the previous tick.
    pub rotations: ArrowDegrees,
}
