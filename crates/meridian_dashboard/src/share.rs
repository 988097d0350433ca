// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Share links that reopen a dashboard with the same cities.
//!
//! A link carries the city names, comma separated, in the `locations` query parameter. The
//! value is percent-encoded the way browsers encode a URI component, so the comma separator
//! itself is sent as `%2C`.

use meridian::Location;
use pct_str::{Encoder, PctStr, PctString};

/// The query parameter that carries the shared cities.
pub const LOCATIONS_PARAMETER: &str = "locations";

/// Encodes every character outside the URI-component safe set.
#[derive(Debug, Clone, Copy)]
struct UriComponent;

impl Encoder for UriComponent {
    fn encode(&self, c: char) -> bool {
        !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')'))
    }
}

/// Builds the query string naming the cities of `locations`.
///
/// # Examples
///
/// ```
/// use meridian::Location;
/// use meridian_dashboard::share::share_query;
///
/// let query = share_query(&[
///     Location::new("New York", "America/New_York"),
///     Location::new("Tokyo", "Asia/Tokyo"),
/// ]);
///
/// assert_eq!(query, "locations=New%20York%2CTokyo");
/// ```
#[must_use]
pub fn share_query(locations: &[Location]) -> String {
    let cities = locations
        .iter()
        .map(|location| location.city.trim())
        .collect::<Vec<_>>()
        .join(",");

    format!("{LOCATIONS_PARAMETER}={}", PctString::encode(cities.chars(), UriComponent).as_str())
}

/// Builds a link to the dashboard at `origin` showing the cities of `locations`.
#[must_use]
pub fn share_link(origin: &str, locations: &[Location]) -> String {
    format!("{}/?{}", origin.trim_end_matches('/'), share_query(locations))
}

/// Extracts the shared city names from a query string.
///
/// The query may start with `?`. A `+` in the value stands for a space. Blank names are
/// skipped, and a query without the `locations` parameter yields no names.
///
/// # Examples
///
/// ```
/// use meridian_dashboard::share::query_locations;
///
/// assert_eq!(query_locations("?locations=New+York%2CTokyo"), vec!["New York", "Tokyo"]);
/// assert!(query_locations("theme=dark").is_empty());
/// ```
#[must_use]
pub fn query_locations(query: &str) -> Vec<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').filter(|(name, _)| *name == LOCATIONS_PARAMETER))
        .map(|(_, value)| decode_component(value))
        .next()
        .map(|cities| {
            cities
                .split(',')
                .map(str::trim)
                .filter(|city| !city.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");

    match PctStr::new(value.as_str()) {
        Ok(encoded) => encoded.decode(),
        Err(_invalid) => {
            tracing::debug!(value = %value, "malformed percent-encoding in share link, using it verbatim");
            value
        }
    }
}
