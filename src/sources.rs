//! Static lookup tables for the FluView portal.

/// Download endpoint behind the FluView portal dashboard.
pub const FLUVIEW_URL: &str = "http://gis.cdc.gov/grasp/fluview/FluViewPhase2CustomDownload.ashx";

/// Canonical data source names in the order the portal lists them.
pub const CANONICAL_SOURCES: [&str; 2] = ["ILINet", "WHO_NREVSS"];

/// Resolve a data source alias (case-insensitive) to its canonical name.
pub fn canonical_source(alias: &str) -> Option<&'static str> {
    match alias.trim().to_ascii_lowercase().as_str() {
        "ili" | "ilinet" => Some("ILINet"),
        "who" | "nrevss" => Some("WHO_NREVSS"),
        _ => None,
    }
}

/// Resolve a region synonym (case-insensitive) to its region id.
pub fn region_synonym(name: &str) -> Option<i64> {
    match name.trim().to_ascii_lowercase().as_str() {
        "hhs" | "hhs region" => Some(1),
        "census" => Some(2),
        "national" => Some(3),
        _ => None,
    }
}

/// Census divisions, by ordinal.
pub const CENSUS_DIVISIONS: [(&str, i64); 9] = [
    ("new england", 1),
    ("mid-atlantic", 2),
    ("east north central", 3),
    ("west north central", 4),
    ("south atlantic", 5),
    ("east south central", 6),
    ("west south central", 7),
    ("mountain", 8),
    ("pacific", 9),
];

pub fn census_division(label: &str) -> Option<i64> {
    let label = label.trim().to_ascii_lowercase();
    CENSUS_DIVISIONS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, id)| *id)
}

pub fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
