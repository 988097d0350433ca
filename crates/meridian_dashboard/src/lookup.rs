// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs;
use std::path::Path;

use meridian::Location;

use crate::{DashboardError, Result};

/// Resolves a place typed by the user into a [`Location`].
pub trait LocationLookup {
    /// Finds the location best matching `place`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownPlace`] when nothing matches.
    fn lookup(&self, place: &str) -> Result<Location>;

    /// Resolves every place in `places`, in order.
    ///
    /// # Errors
    ///
    /// Fails with the first place that cannot be resolved.
    fn lookup_all<S: AsRef<str>>(&self, places: &[S]) -> Result<Vec<Location>>
    where
        Self: Sized,
    {
        places.iter().map(|place| self.lookup(place.as_ref())).collect()
    }
}

/// An in-memory set of known locations.
///
/// A place matches a location when it equals the location's city or ASCII city name, ignoring
/// case and surrounding whitespace. Among several matches the most populous one wins, so
/// `paris` finds the French capital rather than Paris, Texas.
///
/// # Examples
///
/// ```
/// use meridian::Location;
/// use meridian_dashboard::{Catalog, LocationLookup};
///
/// let catalog = Catalog::new(vec![Location::new("Reykjavík", "Atlantic/Reykjavik")]);
///
/// let found = catalog.lookup("reykjavik")?;
/// assert_eq!(found.timezone, "Atlantic/Reykjavik");
/// # Ok::<(), meridian_dashboard::DashboardError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locations: Vec<Location>,
}

impl Catalog {
    /// Creates a catalog of `locations`.
    ///
    /// The `city_ascii` field is matched as well as `city`; a location with an empty
    /// `city_ascii` is only found by its city.
    #[must_use]
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// Loads a catalog from a JSON file holding an array of location records.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] when the file cannot be read and [`DashboardError::Json`]
    /// when it is not an array of location records.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| DashboardError::io(path, error))?;
        let locations: Vec<Location> = serde_json::from_str(&contents).map_err(|error| DashboardError::json(path, error))?;

        tracing::debug!(path = %path.display(), count = locations.len(), "catalog loaded");
        Ok(Self::new(locations))
    }

    /// The number of known locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the catalog knows no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl LocationLookup for Catalog {
    fn lookup(&self, place: &str) -> Result<Location> {
        let wanted = place.trim().to_lowercase();

        self.locations
            .iter()
            .filter(|location| {
                location.city.to_lowercase() == wanted
                    || (!location.city_ascii.is_empty() && location.city_ascii.to_lowercase() == wanted)
            })
            .max_by(|left, right| left.pop.total_cmp(&right.pop))
            .cloned()
            .ok_or_else(|| DashboardError::unknown_place(place.trim()))
    }
}
