#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory geography record store.
//!
//! Loads the full universe of inhabited geography records once at process
//! start, indexes them by 5-digit code, and serves lookups and
//! distribution queries to every downstream engine. The store is
//! immutable between explicit reloads.

pub mod query;
pub mod store;

pub use store::GeoRecordStore;

use thiserror::Error;

/// Errors that can occur during geo store operations.
#[derive(Debug, Error)]
pub enum GeoStoreError {
    /// The geo source was empty or unreachable at load.
    #[error("Data unavailable: {message}")]
    DataUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// Underlying source failure.
    #[error("Source error: {0}")]
    Source(#[from] audience_atlas_sources::SourceError),
}
