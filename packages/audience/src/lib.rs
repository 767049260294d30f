#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weighted audience segment membership index.
//!
//! Holds every segment's weighted geography membership in memory, keyed
//! by segment name with case-insensitive lookup. Like the geo store it
//! is loaded once and immutable between explicit reloads.

pub mod index;

pub use index::AudienceMembershipIndex;

use thiserror::Error;

/// Errors that can occur during audience index operations.
#[derive(Debug, Error)]
pub enum AudienceError {
    /// The audience weight source was empty or unreachable at load.
    #[error("Data unavailable: {message}")]
    DataUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// Underlying source failure.
    #[error("Source error: {0}")]
    Source(#[from] audience_atlas_sources::SourceError),
}
