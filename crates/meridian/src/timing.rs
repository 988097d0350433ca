// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The clock that drives refresh loops.
//!
//! Time and timers come from [`tick`]. A [`DialClock`] adds one thing on top: it counts the
//! refresh timers that exist on it, so that switching or dropping a dial can be checked to never
//! leave a timer behind.
//!
//! Timers only fire when something drives the underlying [`tick::Clock`]:
//!
//! - [`DialClock::new_tokio`] drives it from the current Tokio runtime (feature `tokio`).
//! - [`tick::runtime::InactiveClock::activate`] hands out a driver for custom event loops.
//! - `tick::ClockControl` (tick's `test-util` feature) fires timers when a test advances time.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, SystemTime};

use futures_core::Stream;
use tick::{Clock, PeriodicTimer};

/// A [`tick::Clock`] that keeps count of the refresh timers armed on it.
///
/// Clones share the clock and the count.
///
/// # Examples
///
/// ```
/// use meridian::timing::DialClock;
/// use tick::runtime::InactiveClock;
///
/// let (clock, _driver) = InactiveClock::default().activate();
/// let clock = DialClock::new(clock);
///
/// assert!(clock.system_time() <= std::time::SystemTime::now());
/// assert_eq!(clock.active_timers(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct DialClock {
    clock: Clock,
    timers: Arc<AtomicUsize>,
}

impl DialClock {
    /// Wraps `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            timers: Arc::default(),
        }
    }

    /// Creates a clock whose timers are fired by the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    #[cfg(any(feature = "tokio", test))]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
    #[must_use]
    pub fn new_tokio() -> Self {
        Self::new(Clock::new_tokio())
    }

    /// The underlying clock.
    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The current wall-clock time in UTC.
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        self.clock.system_time()
    }

    /// The number of refresh timers that currently exist on this clock.
    ///
    /// A stopped refresh loop holds none and a running one holds exactly one.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers.load(Ordering::Acquire)
    }

    pub(crate) fn refresh_timer(&self, period: Duration) -> RefreshTimer {
        self.timers.fetch_add(1, Ordering::AcqRel);

        RefreshTimer {
            timer: PeriodicTimer::new(&self.clock, period),
            timers: Arc::clone(&self.timers),
        }
    }
}

impl From<Clock> for DialClock {
    fn from(clock: Clock) -> Self {
        Self::new(clock)
    }
}

/// A periodic timer counted by the [`DialClock`] that created it until it is dropped.
#[derive(Debug)]
pub(crate) struct RefreshTimer {
    timer: PeriodicTimer,
    timers: Arc<AtomicUsize>,
}

impl Stream for RefreshTimer {
    type Item = ();

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().timer).poll_next(cx)
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.timers.fetch_sub(1, Ordering::AcqRel);
    }
}
