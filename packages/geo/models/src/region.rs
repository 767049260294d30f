//! US census region utilities.
//!
//! Maps two-letter state abbreviations to the four census regions
//! (and their divisions) for the 50 US states + DC. Used by the
//! region-level market rollup.

/// The four census regions.
pub const REGIONS: &[&str] = &["Northeast", "Midwest", "South", "West"];

/// Maps a two-letter state abbreviation to its census region.
///
/// Returns `"Unknown"` for unrecognized abbreviations.
#[must_use]
pub fn region_for_state(abbr: &str) -> &'static str {
    match abbr.to_uppercase().as_str() {
        "CT" | "ME" | "MA" | "NH" | "RI" | "VT" | "NJ" | "NY" | "PA" => "Northeast",
        "IL" | "IN" | "MI" | "OH" | "WI" | "IA" | "KS" | "MN" | "MO" | "NE" | "ND" | "SD" => {
            "Midwest"
        }
        "DE" | "DC" | "FL" | "GA" | "MD" | "NC" | "SC" | "VA" | "WV" | "AL" | "KY" | "MS" | "TN"
        | "AR" | "LA" | "OK" | "TX" => "South",
        "AZ" | "CO" | "ID" | "MT" | "NV" | "NM" | "UT" | "WY" | "AK" | "CA" | "HI" | "OR" | "WA" => {
            "West"
        }
        _ => "Unknown",
    }
}

/// Maps a two-letter state abbreviation to its census division.
///
/// Returns `"Unknown"` for unrecognized abbreviations.
#[must_use]
pub fn division_for_state(abbr: &str) -> &'static str {
    match abbr.to_uppercase().as_str() {
        "CT" | "ME" | "MA" | "NH" | "RI" | "VT" => "New England",
        "NJ" | "NY" | "PA" => "Middle Atlantic",
        "IL" | "IN" | "MI" | "OH" | "WI" => "East North Central",
        "IA" | "KS" | "MN" | "MO" | "NE" | "ND" | "SD" => "West North Central",
        "DE" | "DC" | "FL" | "GA" | "MD" | "NC" | "SC" | "VA" | "WV" => "South Atlantic",
        "AL" | "KY" | "MS" | "TN" => "East South Central",
        "AR" | "LA" | "OK" | "TX" => "West South Central",
        "AZ" | "CO" | "ID" | "MT" | "NV" | "NM" | "UT" | "WY" => "Mountain",
        "AK" | "CA" | "HI" | "OR" | "WA" => "Pacific",
        _ => "Unknown",
    }
}
