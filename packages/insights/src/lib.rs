#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Config-driven static insight rules.
//!
//! Keyword rules map a segment name to an insight template plus an
//! explicit confidence score. The orchestration layer decides whether
//! to escalate to a generative service from the score alone, never by
//! sniffing rendered text. Rule configs are TOML files baked into the
//! binary at compile time; adding a rule is adding a file and one list
//! entry.

pub mod registry;
pub mod rules;

pub use registry::all_rules;
pub use rules::{InsightMatch, InsightRule, evaluate};
