// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{Error, Result};

/// A validated IANA timezone.
///
/// Parsing a `Zone` is the single place where an unknown identifier is rejected.
/// Once a zone exists, every conversion from an instant to local wall-clock time is
/// infallible and applies the UTC offset and daylight-saving rule in effect at that
/// instant.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use meridian::Zone;
///
/// let zone: Zone = "Asia/Tokyo".parse()?;
/// let local = zone.local(SystemTime::UNIX_EPOCH + Duration::from_secs(3600));
///
/// assert_eq!(local.to_rfc3339(), "1970-01-01T10:00:00+09:00");
/// # Ok::<(), meridian::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zone(Tz);

impl Zone {
    /// Parses an IANA identifier such as `Europe/Paris`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when the identifier is not
    /// present in the timezone database.
    pub fn parse(timezone: &str) -> Result<Self> {
        timezone
            .trim()
            .parse::<Tz>()
            .map(Self)
            .map_err(|_parse_error| Error::invalid_timezone(timezone))
    }

    /// The canonical IANA name of the zone.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Converts `instant` to wall-clock time in this zone.
    #[must_use]
    pub fn local(&self, instant: SystemTime) -> DateTime<Tz> {
        DateTime::<Utc>::from(instant).with_timezone(&self.0)
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
