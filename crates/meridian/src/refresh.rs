// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::future::poll_fn;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_core::Stream;

use crate::angles::ArrowDegrees;
use crate::display::{ClockDisplay, Frame};
use crate::rotation::{Hand, RotationTracker};
use crate::timing::{DialClock, RefreshTimer};
use crate::{Location, Result, Zone};

/// Configuration of a [`RefreshLoop`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use meridian::RefreshOptions;
///
/// let options = RefreshOptions::default().with_period(Duration::from_millis(250));
/// assert_eq!(options.period(), Duration::from_millis(250));
///
/// // A dial refreshes at least once per second.
/// let options = RefreshOptions::default().with_period(Duration::from_secs(5));
/// assert_eq!(options.period(), RefreshOptions::MAX_PERIOD);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    period: Duration,
}

impl RefreshOptions {
    /// The shortest period between two ticks.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// The longest period between two ticks.
    pub const MAX_PERIOD: Duration = Duration::from_secs(1);

    /// Sets the period between two ticks, clamped to `[1 ms, 1 s]`.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period.clamp(Self::MIN_PERIOD, Self::MAX_PERIOD);
        self
    }

    /// The period between two ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            period: Self::MAX_PERIOD,
        }
    }
}

/// Periodically samples one timezone and publishes the result to a [`ClockDisplay`].
///
/// A loop is either stopped or running for exactly one zone. While running it owns exactly
/// one timer on its [`DialClock`]; stopping, switching to another zone, failing to start and
/// dropping the loop all release that timer. The timer starts counting down the first time
/// the loop is polled.
///
/// Every tick samples the clock once and publishes, in order, the digital time, the calendar
/// and the rotation of the hour, minute and second hands. Rotations come from a
/// [`RotationTracker`] owned by the running loop, so hands always move forward across the
/// 12 o'clock wrap. The tracker is reset whenever the loop is started.
///
/// # Examples
///
/// ```
/// use meridian::timing::DialClock;
/// use meridian::{CalendarInfo, ClockDisplay, Hand, RefreshLoop, RefreshOptions};
///
/// #[derive(Default)]
/// struct Digital(String);
///
/// impl ClockDisplay for Digital {
///     fn show_digital_time(&mut self, time: &str) {
///         self.0 = time.to_string();
///     }
///
///     fn show_calendar(&mut self, _calendar: CalendarInfo) {}
///
///     fn rotate_hand(&mut self, _hand: Hand, _degrees: f64) -> meridian::Result<()> {
///         Ok(())
///     }
/// }
///
/// let (clock, _driver) = tick::runtime::InactiveClock::default().activate();
/// let clock = DialClock::new(clock);
/// let mut dial = RefreshLoop::new(&clock, Digital::default(), RefreshOptions::default());
///
/// let frame = dial.start_zone("Europe/Prague")?;
/// assert_eq!(dial.display().0, frame.digital_time);
/// assert_eq!(clock.active_timers(), 1);
///
/// dial.stop();
/// assert_eq!(clock.active_timers(), 0);
/// # Ok::<(), meridian::Error>(())
/// ```
#[derive(Debug)]
pub struct RefreshLoop<D> {
    clock: DialClock,
    display: D,
    options: RefreshOptions,
    running: Option<Running>,
}

#[derive(Debug)]
struct Running {
    zone: Zone,
    timer: RefreshTimer,
    tracker: RotationTracker,
}

impl<D: ClockDisplay> RefreshLoop<D> {
    /// Creates a stopped loop publishing to `display`.
    #[must_use]
    pub fn new(clock: &DialClock, display: D, options: RefreshOptions) -> Self {
        Self {
            clock: clock.clone(),
            display,
            options,
            running: None,
        }
    }

    /// Starts showing `location`; see [`RefreshLoop::start_zone`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when the
    /// location's timezone is unknown. The loop is stopped afterwards.
    pub fn start(&mut self, location: &Location) -> Result<Frame> {
        self.start_zone(&location.timezone)
    }

    /// Starts showing `timezone` and publishes the first frame right away.
    ///
    /// A loop that is already running is stopped first, so at most one timer exists per loop.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when
    /// `timezone` is unknown. The loop is stopped afterwards and nothing is published.
    pub fn start_zone(&mut self, timezone: &str) -> Result<Frame> {
        self.stop();

        let zone = Zone::parse(timezone).inspect_err(|error| {
            tracing::debug!(timezone, %error, "refresh loop not started");
        })?;

        let timer = self.clock.refresh_timer(self.options.period());

        tracing::debug!(
            timezone = zone.name(),
            period_ms = self.options.period().as_millis(),
            "refresh loop started"
        );

        let running = self.running.insert(Running {
            zone,
            timer,
            tracker: RotationTracker::new(),
        });

        Ok(publish(&self.clock, &mut self.display, running))
    }

    /// Stops the loop and releases its timer. Stopping a stopped loop does nothing.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            tracing::debug!(timezone = running.zone.name(), "refresh loop stopped");
        }
    }

    /// Whether the loop is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The zone of the running loop.
    #[must_use]
    pub fn zone(&self) -> Option<Zone> {
        self.running.as_ref().map(|running| running.zone)
    }

    /// The options the loop was created with.
    #[must_use]
    pub const fn options(&self) -> &RefreshOptions {
        &self.options
    }

    /// The display the loop publishes to.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// The display the loop publishes to.
    pub const fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Samples the clock and publishes a frame now, independent of the timer.
    ///
    /// Returns `None` when the loop is stopped.
    pub fn tick(&mut self) -> Option<Frame> {
        let running = self.running.as_mut()?;

        Some(publish(&self.clock, &mut self.display, running))
    }

    /// Ticks when the loop's timer has fired.
    ///
    /// Returns `Poll::Ready(None)` when the loop is stopped. The first poll after starting arms
    /// the timer and every tick arms it again with the waker of `cx`.
    pub fn poll_tick(&mut self, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        let Some(running) = self.running.as_mut() else {
            return Poll::Ready(None);
        };

        match Pin::new(&mut running.timer).poll_next(cx) {
            Poll::Ready(_) => {
                let frame = publish(&self.clock, &mut self.display, running);

                // Arming for the next period always yields `Pending`.
                _ = Pin::new(&mut running.timer).poll_next(cx);

                Poll::Ready(Some(frame))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    /// Waits for the next timer-driven tick.
    ///
    /// Returns `None` right away when the loop is stopped.
    pub async fn next_tick(&mut self) -> Option<Frame> {
        poll_fn(|cx| self.poll_tick(cx)).await
    }

    /// Ticks until the loop is stopped.
    ///
    /// A running loop can only be stopped through `&mut self`, so in practice this runs until
    /// the future is dropped.
    pub async fn run(&mut self) {
        while self.next_tick().await.is_some() {}
    }
}

fn publish<D: ClockDisplay>(clock: &DialClock, display: &mut D, running: &mut Running) -> Frame {
    let now = clock.system_time();
    let zone = running.zone;

    let targets = ArrowDegrees::from(zone.time_parts(now));
    let digital_time = zone.digital_time(now);
    let calendar = zone.calendar(now);

    display.show_digital_time(&digital_time);
    display.show_calendar(calendar);

    for hand in Hand::ALL {
        let rotation = running.tracker.next(hand, hand.select(&targets));

        match display.rotate_hand(hand, rotation) {
            Ok(()) => running.tracker.commit(hand, rotation),
            Err(error) if error.is_missing_display_target() => {
                tracing::warn!(timezone = zone.name(), %hand, %error, "hand not rotated");
            }
            Err(error) => {
                tracing::error!(timezone = zone.name(), %hand, %error, "display failed to rotate hand");
            }
        }
    }

    let rotations = ArrowDegrees {
        hour: running.tracker.applied(Hand::Hour),
        minute: running.tracker.applied(Hand::Minute),
        second: running.tracker.applied(Hand::Second),
    };

    tracing::trace!(timezone = zone.name(), time = %digital_time, "tick");

    Frame {
        digital_time,
        calendar,
        rotations,
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, reason = "the rotations under test are exactly representable")]

    use std::task::Waker;

    use tick::ClockControl;
    use tracing_test::traced_test;

    use super::*;
    use crate::calendar::CalendarInfo;
    use crate::{Error, ErrorKind};

    #[derive(Debug, Default)]
    struct RecordingDisplay {
        times: Vec<String>,
        calendars: Vec<CalendarInfo>,
        rotations: Vec<(Hand, f64)>,
        missing: Option<Hand>,
        broken: Option<Hand>,
    }

    impl ClockDisplay for RecordingDisplay {
        fn show_digital_time(&mut self, time: &str) {
            self.times.push(time.to_string());
        }

        fn show_calendar(&mut self, calendar: CalendarInfo) {
            self.calendars.push(calendar);
        }

        fn rotate_hand(&mut self, hand: Hand, degrees: f64) -> Result<()> {
            if self.missing == Some(hand) {
                return Err(Error::missing_display_target(hand));
            }

            if self.broken == Some(hand) {
                return Err(ErrorKind::InvalidTimezone {
                    timezone: "display".to_string(),
                }
                .into());
            }

            self.rotations.push((hand, degrees));
            Ok(())
        }
    }

    fn at_seconds(seconds: u64) -> ClockControl {
        ClockControl::new_at(Duration::from_secs(seconds))
    }

    fn dial_clock(control: &ClockControl) -> DialClock {
        DialClock::new(control.to_clock())
    }

    fn poll_dial(dial: &mut RefreshLoop<RecordingDisplay>) -> Poll<Option<Frame>> {
        dial.poll_tick(&mut Context::from_waker(Waker::noop()))
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(RefreshLoop<RecordingDisplay>: Send, Sync);
        static_assertions::assert_impl_all!(RefreshOptions: Send, Sync, Copy);
    }

    #[test]
    fn options_clamp_period() {
        assert_eq!(RefreshOptions::default().period(), Duration::from_secs(1));
        assert_eq!(
            RefreshOptions::default().with_period(Duration::ZERO).period(),
            RefreshOptions::MIN_PERIOD
        );
        assert_eq!(
            RefreshOptions::default().with_period(Duration::from_secs(60)).period(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn new_loop_is_stopped() {
        let clock = dial_clock(&ClockControl::new());
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());

        assert!(!dial.is_running());
        assert_eq!(dial.zone(), None);
        assert_eq!(dial.tick(), None);
        assert_eq!(poll_dial(&mut dial), Poll::Ready(None));
        assert_eq!(clock.active_timers(), 0);
    }

    #[test]
    fn start_publishes_first_frame() {
        // 1970-01-01 00:00:59 UTC, 05:30:59 in Kolkata.
        let clock = dial_clock(&at_seconds(59));
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());

        let frame = dial.start(&Location::new("Kolkata", "Asia/Kolkata")).unwrap();

        assert_eq!(frame.digital_time, "05:30:59");
        assert_eq!(frame.calendar.to_string(), "Thu 1");
        assert_eq!(frame.rotations.second, 354.0);

        let display = dial.display();
        assert_eq!(display.times, vec!["05:30:59".to_string()]);
        assert_eq!(display.calendars, vec![frame.calendar]);
        assert_eq!(
            display.rotations.iter().map(|(hand, _)| *hand).collect::<Vec<_>>(),
            Hand::ALL.to_vec()
        );
        assert_eq!(dial.zone().map(|zone| zone.name()), Some("Asia/Kolkata"));
    }

    #[test]
    fn running_loop_owns_one_timer() {
        let clock = dial_clock(&ClockControl::new());
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());

        dial.start_zone("Europe/Paris").unwrap();
        assert_eq!(clock.active_timers(), 1);

        dial.start_zone("America/New_York").unwrap();
        assert_eq!(clock.active_timers(), 1);
        assert_eq!(dial.zone().map(|zone| zone.name()), Some("America/New_York"));

        dial.stop();
        assert_eq!(clock.active_timers(), 0);
        assert!(!dial.is_running());

        // Stopping twice is harmless.
        dial.stop();
        assert_eq!(clock.active_timers(), 0);
    }

    #[test]
    fn drop_releases_timer() {
        let clock = dial_clock(&ClockControl::new());

        {
            let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());
            dial.start_zone("Asia/Tokyo").unwrap();
            assert_eq!(poll_dial(&mut dial), Poll::Pending);
            assert_eq!(clock.active_timers(), 1);
        }

        assert_eq!(clock.active_timers(), 0);
    }

    #[test]
    fn invalid_zone_leaves_loop_stopped() {
        let clock = dial_clock(&ClockControl::new());
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());
        dial.start_zone("Europe/Paris").unwrap();

        let error = dial.start_zone("Mars/Olympus_Mons").unwrap_err();

        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidTimezone {
                timezone: "Mars/Olympus_Mons".to_string()
            }
        );
        assert!(!dial.is_running());
        assert_eq!(clock.active_timers(), 0);
        assert_eq!(dial.display().times.len(), 1);
    }

    #[test]
    fn timer_drives_ticks() {
        let control = at_seconds(0);
        let clock = dial_clock(&control);
        let options = RefreshOptions::default().with_period(Duration::from_millis(500));
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), options);
        dial.start_zone("UTC").unwrap();

        assert_eq!(poll_dial(&mut dial), Poll::Pending);

        control.advance_millis(499);
        assert_eq!(poll_dial(&mut dial), Poll::Pending);

        control.advance_millis(1);
        assert!(matches!(poll_dial(&mut dial), Poll::Ready(Some(_))));
        assert_eq!(clock.active_timers(), 1);
        assert_eq!(poll_dial(&mut dial), Poll::Pending);

        control.advance_millis(500);
        let frame = poll_dial(&mut dial);
        assert!(matches!(&frame, Poll::Ready(Some(frame)) if frame.digital_time == "00:00:01"));
        assert_eq!(dial.display().times.len(), 3);
    }

    #[test]
    fn hands_stay_continuous_over_hours_of_half_second_ticks() {
        // 2024-07-01 11:30:00 in Auckland.
        let control = at_seconds(1_719_790_200);
        let clock = dial_clock(&control);
        let options = RefreshOptions::default().with_period(Duration::from_millis(500));
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), options);
        let zone = Zone::parse("Pacific/Auckland").unwrap();

        let mut previous = dial.start_zone(zone.name()).unwrap().rotations;
        assert_eq!(poll_dial(&mut dial), Poll::Pending);

        let mut last = None;
        for tick in 0..2 * 7_200 {
            control.advance_millis(500);
            let frame = match poll_dial(&mut dial) {
                Poll::Ready(frame) => frame.expect("the loop is running"),
                Poll::Pending => unreachable!("tick {tick} did not fire"),
            };

            let targets = ArrowDegrees::from(zone.time_parts(clock.system_time()));
            for hand in Hand::ALL {
                let before = hand.select(&previous);
                let after = hand.select(&frame.rotations);
                let off_dial = (after.rem_euclid(360.0) - hand.select(&targets)).abs();

                assert!(after >= before, "{hand} at tick {tick}: {after} < {before}");
                assert!(after - before < 180.0, "{hand} at tick {tick}: {before} -> {after}");
                assert!(off_dial < 1e-6 || 360.0 - off_dial < 1e-6, "{hand} at tick {tick}: {after}");
            }

            previous = frame.rotations;
            last = Some(frame);
        }

        let last = last.unwrap();
        assert_eq!(last.digital_time, "13:30:00");
        assert_eq!(last.rotations.hour, 405.0);
        assert!((last.rotations.minute - 900.0).abs() < 1e-6);
        assert_eq!(last.rotations.second, 120.0 * 360.0);
        assert_eq!(clock.active_timers(), 1);
    }

    #[test]
    fn second_hand_moves_forward_across_wrap() {
        let control = at_seconds(59);
        let clock = dial_clock(&control);
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());

        let first = dial.start_zone("UTC").unwrap();
        assert_eq!(first.rotations.second, 354.0);

        control.advance_millis(1_000);
        let second = dial.tick().unwrap();

        assert_eq!(second.digital_time, "00:01:00");
        assert_eq!(second.rotations.second, 360.0);
        assert_eq!(second.rotations.minute, 6.0);
        assert_eq!(second.rotations.hour, 0.5);
    }

    #[test]
    fn restart_resets_rotations() {
        let control = at_seconds(59);
        let clock = dial_clock(&control);
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), RefreshOptions::default());

        dial.start_zone("UTC").unwrap();
        control.advance_millis(1_000);
        assert_eq!(dial.tick().unwrap().rotations.second, 360.0);

        let restarted = dial.start_zone("UTC").unwrap();
        assert_eq!(restarted.rotations.second, 0.0);
    }

    #[traced_test]
    #[test]
    fn missing_hand_keeps_previous_rotation() {
        let control = at_seconds(30);
        let clock = dial_clock(&control);
        let display = RecordingDisplay {
            missing: Some(Hand::Second),
            ..RecordingDisplay::default()
        };
        let mut dial = RefreshLoop::new(&clock, display, RefreshOptions::default());

        let frame = dial.start_zone("UTC").unwrap();

        assert_eq!(frame.rotations.second, 0.0);
        assert_eq!(frame.rotations.minute, 3.0);
        assert_eq!(frame.digital_time, "00:00:30");
        assert!(logs_contain("hand not rotated"));
        assert!(logs_contain("the second hand is no longer present on the display"));
        assert!(!logs_contain("display failed to rotate hand"));

        // Once the hand is back, it catches up from its last committed rotation.
        dial.display_mut().missing = None;
        control.advance_millis(1_000);
        assert_eq!(dial.tick().unwrap().rotations.second, 186.0);
    }

    #[traced_test]
    #[test]
    fn other_display_errors_are_logged_as_errors() {
        let control = at_seconds(30);
        let clock = dial_clock(&control);
        let display = RecordingDisplay {
            broken: Some(Hand::Minute),
            ..RecordingDisplay::default()
        };
        let mut dial = RefreshLoop::new(&clock, display, RefreshOptions::default());

        let frame = dial.start_zone("UTC").unwrap();

        assert_eq!(frame.rotations.minute, 0.0);
        assert_eq!(frame.rotations.second, 180.0);
        assert!(logs_contain("ERROR"));
        assert!(logs_contain("display failed to rotate hand"));
        assert!(!logs_contain("hand not rotated"));
        assert!(dial.is_running());
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn next_tick_with_tokio_clock() {
        let clock = DialClock::new_tokio();
        let options = RefreshOptions::default().with_period(Duration::from_millis(5));
        let mut dial = RefreshLoop::new(&clock, RecordingDisplay::default(), options);
        dial.start_zone("Australia/Sydney").unwrap();

        let frame = tokio::time::timeout(Duration::from_secs(5), dial.next_tick()).await;

        assert!(matches!(frame, Ok(Some(_))));
        assert_eq!(dial.display().times.len(), 2);
        assert_eq!(clock.active_timers(), 1);
    }
}
