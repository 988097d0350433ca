// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A terminal world-clock dashboard on top of [`meridian`].
//!
//! The dashboard shows one dial per location. Locations are resolved against a JSON
//! [`Catalog`], persisted in a [`LocationStore`] and can be handed to others as a share link
//! built by the [`share`] module.

mod dashboard;
mod error;
mod lookup;
pub mod share;
pub mod store;
mod terminal;

pub use dashboard::{Dashboard, Slot, startup_locations};
pub use error::{DashboardError, Result};
pub use lookup::{Catalog, LocationLookup};
pub use store::LocationStore;
pub use terminal::{PLACEHOLDER_TIME, TerminalDisplay};
