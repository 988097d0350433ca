// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;

/// The result type of dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// An error raised by the dashboard's collaborators.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DashboardError {
    /// No known location matches the requested place.
    #[error("no location matches '{place}'")]
    UnknownPlace {
        /// The place as the user typed it.
        place: String,
    },

    /// Reading or writing a file failed.
    #[error("cannot access '{}'", path.display())]
    Io {
        /// The file that was accessed.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A file does not hold the expected JSON.
    #[error("'{}' holds malformed data", path.display())]
    Json {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: serde_json::Error,
    },

    /// The clock engine rejected a request.
    #[error(transparent)]
    Engine(#[from] meridian::Error),
}

impl DashboardError {
    pub(crate) fn unknown_place(place: impl Into<String>) -> Self {
        Self::UnknownPlace { place: place.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(DashboardError: Send, Sync, std::error::Error);
    }

    #[test]
    fn unknown_place_names_the_place() {
        assert_eq!(DashboardError::unknown_place("Atlantis").to_string(), "no location matches 'Atlantis'");
    }

    #[test]
    fn io_keeps_source() {
        let error = DashboardError::io("missing.json", std::io::Error::from(std::io::ErrorKind::NotFound));

        assert_eq!(error.to_string(), "cannot access 'missing.json'");
        assert!(error.source().is_some());
    }

    #[test]
    fn engine_errors_are_transparent() {
        let engine = meridian::Zone::parse("Nowhere/Special").unwrap_err();
        let error = DashboardError::from(engine);

        assert_eq!(error.to_string(), "unrecognized timezone identifier 'Nowhere/Special'");
    }
}
