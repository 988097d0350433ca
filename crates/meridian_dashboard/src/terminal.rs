// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use meridian::{CalendarInfo, ClockDisplay, Hand, Result};

/// Shown instead of the digital time until a dial has published.
pub const PLACEHOLDER_TIME: &str = "--:--:--";

const PLACEHOLDER_CALENDAR: &str = "--- --";

/// Arrows for the eight compass directions, clockwise from twelve o'clock.
const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];

/// A dial rendered as one line of text.
///
/// The display keeps whatever was published last. Until the first publication it renders
/// placeholders, which is also what a dial with an unusable timezone keeps showing.
///
/// # Examples
///
/// ```
/// use meridian::{ClockDisplay, Hand};
/// use meridian_dashboard::TerminalDisplay;
///
/// let mut display = TerminalDisplay::new();
/// assert_eq!(display.to_string(), "--- --  --:--:--");
///
/// display.show_digital_time("09:15:00");
/// display.rotate_hand(Hand::Minute, 450.0)?;
/// assert_eq!(display.to_string(), "--- --  09:15:00  h ·  m →  s ·");
/// # Ok::<(), meridian::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalDisplay {
    digital_time: Option<String>,
    calendar: Option<CalendarInfo>,
    rotations: [Option<f64>; 3],
}

impl TerminalDisplay {
    /// Creates a display showing placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The digital time last shown.
    #[must_use]
    pub fn digital_time(&self) -> Option<&str> {
        self.digital_time.as_deref()
    }

    /// The calendar last shown.
    #[must_use]
    pub const fn calendar(&self) -> Option<CalendarInfo> {
        self.calendar
    }

    /// The rotation last applied to `hand`.
    #[must_use]
    pub const fn rotation(&self, hand: Hand) -> Option<f64> {
        self.rotations[hand.index()]
    }

    /// Whether anything was published yet.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.digital_time.is_none()
    }
}

const fn initial(hand: Hand) -> char {
    match hand {
        Hand::Hour => 'h',
        Hand::Minute => 'm',
        Hand::Second => 's',
    }
}

/// The arrow pointing closest to `rotation` on the dial.
fn arrow(rotation: f64) -> char {
    let octant = ((rotation.rem_euclid(360.0) + 22.5) / 45.0).floor();

    // `octant` is in `0.0..=8.0`; 8 is twelve o'clock again.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the octant is a small non-negative integer"
    )]
    let index = octant as usize % ARROWS.len();

    ARROWS[index]
}

impl ClockDisplay for TerminalDisplay {
    fn show_digital_time(&mut self, time: &str) {
        self.digital_time = Some(time.to_string());
    }

    fn show_calendar(&mut self, calendar: CalendarInfo) {
        self.calendar = Some(calendar);
    }

    fn rotate_hand(&mut self, hand: Hand, degrees: f64) -> Result<()> {
        self.rotations[hand.index()] = Some(degrees);
        Ok(())
    }
}

impl fmt::Display for TerminalDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.calendar {
            Some(calendar) => write!(f, "{:<6}", calendar.to_string())?,
            None => f.write_str(PLACEHOLDER_CALENDAR)?,
        }

        write!(f, "  {}", self.digital_time().unwrap_or(PLACEHOLDER_TIME))?;

        if self.rotations.iter().any(Option::is_some) {
            for hand in Hand::ALL {
                let glyph = self.rotation(hand).map_or('·', arrow);
                write!(f, "  {} {glyph}", initial(hand))?;
            }
        }

        Ok(())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(TerminalDisplay: Send, Sync, Clone, Default);
    }

    #[test]
    fn blank_display_shows_placeholders() {
        let display = TerminalDisplay::new();

        assert!(display.is_blank());
        assert_eq!(display.digital_time(), None);
        assert_eq!(display.to_string(), "--- --  --:--:--");
    }

    #[test]
    fn renders_published_frame() {
        let mut display = TerminalDisplay::new();

        display.show_digital_time("15:00:30");
        display.show_calendar(CalendarInfo {
            day: 4,
            weekday: Weekday::Fri,
        });
        display.rotate_hand(Hand::Hour, 90.0).unwrap();
        display.rotate_hand(Hand::Minute, 3.0).unwrap();
        display.rotate_hand(Hand::Second, 540.0).unwrap();

        assert!(!display.is_blank());
        assert_eq!(display.rotation(Hand::Second), Some(540.0));
        assert_eq!(display.to_string(), "Fri 4   15:00:30  h →  m ↑  s ↓");
    }

    #[test]
    fn arrows_follow_dial() {
        assert_eq!(arrow(0.0), '↑');
        assert_eq!(arrow(22.4), '↑');
        assert_eq!(arrow(22.5), '↗');
        assert_eq!(arrow(225.0), '↙');
        assert_eq!(arrow(350.0), '↑');
        assert_eq!(arrow(720.0 + 270.0), '←');
    }
}
