// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Result, Zone};

/// A place shown on a dial, as delivered by a location lookup service.
///
/// Locations are values: they are never modified after they were looked up, only replaced.
/// With the `serde` feature, a location serializes to the record format of the lookup
/// service and the persisted dashboard state, which spells two fields in camel case
/// (`isDST` and `utcOffset`).
///
/// # Examples
///
/// ```
/// use meridian::Location;
///
/// let berlin = Location {
///     city: "Berlin".to_string(),
///     country: "Germany".to_string(),
///     timezone: "Europe/Berlin".to_string(),
///     is_dst: true,
///     ..Location::default()
/// };
///
/// assert_eq!(berlin.title(), "Berlin");
/// assert_eq!(berlin.description(), "Timezone: Europe/Berlin (DST)");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Location {
    /// The city name, possibly with diacritics. Empty for locations that are only a timezone.
    pub city: String,
    /// The city name in plain ASCII.
    pub city_ascii: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Population of the city.
    pub pop: f64,
    /// Country name.
    pub country: String,
    /// ISO 3166-1 alpha-2 country code.
    pub iso2: String,
    /// ISO 3166-1 alpha-3 country code.
    pub iso3: String,
    /// Province or state.
    pub province: String,
    /// IANA timezone identifier.
    pub timezone: String,
    /// Whether daylight-saving time was in effect when the location was looked up.
    #[cfg_attr(feature = "serde", serde(rename = "isDST"))]
    pub is_dst: bool,
    /// UTC offset when the location was looked up.
    ///
    /// Informational only; dials always compute the offset for the sampled instant.
    #[cfg_attr(feature = "serde", serde(rename = "utcOffset"))]
    pub utc_offset: f64,
}

impl Location {
    /// Creates a location for `city` in `timezone`, leaving the remaining fields empty.
    #[must_use]
    pub fn new(city: impl Into<String>, timezone: impl Into<String>) -> Self {
        let city = city.into();

        Self {
            city_ascii: city.clone(),
            city,
            timezone: timezone.into(),
            ..Self::default()
        }
    }

    /// The heading of the dial: the city, or the timezone for a location without a city.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.city.is_empty() { &self.timezone } else { &self.city }
    }

    /// The line under the heading: the country, shown only when a city is present.
    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        (!self.city.is_empty()).then_some(self.country.as_str())
    }

    /// A short description of the timezone, such as `Timezone: Europe/Paris (DST)`.
    #[must_use]
    pub fn description(&self) -> String {
        let dst = if self.is_dst { " (DST)" } else { "" };
        format!("Timezone: {}{dst}", self.timezone)
    }

    /// Validates the location's timezone.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTimezone`][crate::ErrorKind::InvalidTimezone] when the
    /// timezone identifier is unknown.
    pub fn zone(&self) -> Result<Zone> {
        Zone::parse(&self.timezone)
    }
}
