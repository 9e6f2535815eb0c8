use serde::Serialize;

/// A cultural origin a chef can tag a dish with, pinned to a map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    pub key: &'static str,
    pub lat: f64,
    pub lng: f64,
}

pub const ORIGINS: &[Origin] = &[
    Origin { key: "punjabi", lat: 31.1471, lng: 75.3412 },
    Origin { key: "japanese", lat: 35.6762, lng: 139.6503 },
    Origin { key: "middle eastern", lat: 30.0444, lng: 31.2357 },
    Origin { key: "mexican", lat: 19.4326, lng: -99.1332 },
];

/// Looks up an origin key, ignoring case and surrounding whitespace.
pub fn resolve(key: &str) -> Option<&'static Origin> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    ORIGINS.iter().find(|o| o.key.eq_ignore_ascii_case(key))
}
