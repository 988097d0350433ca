// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Hand;

/// The result type for fallible operations that use the [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while computing or publishing clock state.
///
/// Two kinds of failure exist:
///
/// * [`ErrorKind::InvalidTimezone`] - the timezone identifier is not known to the
///   timezone database. This surfaces to the caller; the engine never substitutes
///   the host's local zone.
/// * [`ErrorKind::MissingDisplayTarget`] - a hand element is gone from the display.
///   The refresh loop recovers from this locally and only logs it.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
///
/// use meridian::{ErrorKind, time_sampler};
///
/// let error = time_sampler::sample("Mars/Olympus_Mons", SystemTime::UNIX_EPOCH).unwrap_err();
/// assert!(matches!(error.kind(), ErrorKind::InvalidTimezone { .. }));
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

/// The kind of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The identifier is not a recognized IANA timezone.
    #[error("unrecognized timezone identifier '{timezone}'")]
    InvalidTimezone {
        /// The rejected identifier.
        timezone: String,
    },

    /// The display element for a hand no longer exists.
    #[error("the {hand} hand is no longer present on the display")]
    MissingDisplayTarget {
        /// The hand that could not be updated.
        hand: Hand,
    },
}

impl Error {
    pub(crate) const fn from_kind(kind: ErrorKind) -> Self {
        Self(kind)
    }

    pub(crate) fn invalid_timezone(timezone: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::InvalidTimezone {
            timezone: timezone.into(),
        })
    }

    /// Creates the error a display reports when a hand element is gone.
    #[must_use]
    pub fn missing_display_target(hand: Hand) -> Self {
        Self::from_kind(ErrorKind::MissingDisplayTarget { hand })
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Whether this is an [`ErrorKind::MissingDisplayTarget`] error.
    #[must_use]
    pub const fn is_missing_display_target(&self) -> bool {
        matches!(self.0, ErrorKind::MissingDisplayTarget { .. })
    }
}
