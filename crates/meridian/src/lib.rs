// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(
    test,
    allow(
        clippy::arithmetic_side_effects,
        clippy::unchecked_time_subtraction,
        reason = "allow these lints in tests to improve the readability of the tests"
    )
)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Time computation for world clocks.
//!
//! The crate turns a timezone identifier and an instant into everything an analog dial with a
//! digital readout needs, and keeps that up to date:
//!
//! - [`time_sampler`] reads the wall-clock time of an instant in a zone, honoring the zone's
//!   UTC offset and daylight-saving rules at that instant.
//! - [`angles`] converts a reading into continuous hand angles.
//! - [`calendar`] reads the day of month and weekday in a zone.
//! - [`rotation`] keeps hand rotations moving forward across the 12 o'clock wrap.
//! - [`RefreshLoop`] ties these together and publishes to a [`ClockDisplay`] at least once per
//!   second, driven by the timers of a [`timing::DialClock`].
//!
//! # Quick Start
//!
//! ```
//! use meridian::timing::DialClock;
//! use meridian::{CalendarInfo, ClockDisplay, Hand, Location, RefreshLoop, RefreshOptions};
//!
//! struct Stdout;
//!
//! impl ClockDisplay for Stdout {
//!     fn show_digital_time(&mut self, time: &str) {
//!         println!("{time}");
//!     }
//!
//!     fn show_calendar(&mut self, calendar: CalendarInfo) {
//!         println!("{calendar}");
//!     }
//!
//!     fn rotate_hand(&mut self, hand: Hand, degrees: f64) -> meridian::Result<()> {
//!         println!("{hand}: {degrees:.1}°");
//!         Ok(())
//!     }
//! }
//!
//! let (clock, _driver) = tick::runtime::InactiveClock::default().activate();
//! let clock = DialClock::new(clock);
//! let mut dial = RefreshLoop::new(&clock, Stdout, RefreshOptions::default());
//!
//! // Starting publishes the first frame right away.
//! let frame = dial.start(&Location::new("Reykjavík", "Atlantic/Reykjavik"))?;
//! assert_eq!(frame.digital_time.len(), "HH:MM:SS".len());
//! # Ok::<(), meridian::Error>(())
//! ```
//!
//! With the `tokio` feature, `DialClock::new_tokio` fires timers on the current runtime and
//! [`RefreshLoop::run`] keeps the dial ticking until the future is dropped.
//!
//! # Features
//!
//! - `tokio` - enables `DialClock::new_tokio`.
//! - `serde` - serialization of [`Location`] records.
//!
//! Tests control time through `tick::ClockControl`, available with tick's `test-util` feature.

pub mod angles;
pub mod calendar;
mod display;
mod error;
mod location;
mod refresh;
pub mod rotation;
pub mod time_sampler;
pub mod timing;
mod zone;

pub use angles::ArrowDegrees;
pub use calendar::CalendarInfo;
pub use display::{ClockDisplay, Frame};
pub use error::{Error, ErrorKind, Result};
pub use location::Location;
pub use refresh::{RefreshLoop, RefreshOptions};
pub use rotation::{Hand, RotationTracker};
pub use time_sampler::TimeParts;
pub use zone::Zone;
