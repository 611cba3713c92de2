//! Cache key construction
//!
//! Every cached endpoint builds its key here so that each parameter which
//! affects the cached value is encoded exactly once, in a fixed order.

use std::fmt::Display;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Separator between key parts
const SEPARATOR: char = '_';

/// Placeholder for an unset optional filter
const ALL: &str = "all";

/// Builder for underscore-joined cache keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    parts: Vec<String>,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            parts: vec![namespace.into()],
        }
    }

    /// Appends a required part
    pub fn part(mut self, value: impl Display) -> Self {
        self.parts.push(value.to_string());
        self
    }

    /// Appends a free-form part with separators escaped
    pub fn text(mut self, value: &str) -> Self {
        self.parts.push(escape_part(value));
        self
    }

    /// Appends an optional free-form part, `all` when unset
    pub fn optional_text(mut self, value: Option<&str>) -> Self {
        match value {
            Some(ALL) => self.parts.push(format!("%{}", ALL)),
            Some(v) => self.parts.push(escape_part(v)),
            None => self.parts.push(ALL.to_string()),
        }
        self
    }

    pub fn build(self) -> String {
        let mut key = String::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                key.push(SEPARATOR);
            }
            key.push_str(part);
        }
        key
    }

    /// The key with a trailing separator, for prefix invalidation
    pub fn prefix(self) -> String {
        let mut key = self.build();
        key.push(SEPARATOR);
        key
    }
}

/// Escapes `%` and the separator so a part never spans two slots
///
/// A literal `all` is written `%all` by `optional_text` so it cannot read as
/// an unset filter.
fn escape_part(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            SEPARATOR => escaped.push_str("%5F"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Lower-cases a location name and replaces whitespace runs with `_`
pub fn normalize_location_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Key for location extraction from free text
pub fn location_extraction_key(description: &str) -> String {
    CacheKey::new("gemini_location")
        .part(STANDARD.encode(description))
        .build()
}

/// Key for a direct geocode of a location name
pub fn geocode_key(location_name: &str) -> String {
    CacheKey::new("geocode")
        .part(normalize_location_name(location_name))
        .build()
}

/// Parameters of a radius search around a disaster
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQueryKey<'a> {
    pub disaster_id: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub resource_type: Option<&'a str>,
    pub status: &'a str,
}

pub fn resources_key(params: &ResourceQueryKey<'_>) -> String {
    CacheKey::new("resources")
        .text(params.disaster_id)
        .part(params.lat)
        .part(params.lng)
        .part(params.radius_km)
        .optional_text(params.resource_type)
        .text(params.status)
        .build()
}

/// Prefix matching every resource search cached for one disaster
pub fn resources_prefix(disaster_id: &str) -> String {
    CacheKey::new("resources").text(disaster_id).prefix()
}

pub fn social_media_key(disaster_id: &str, limit: usize) -> String {
    CacheKey::new("social_media")
        .text(disaster_id)
        .part(limit)
        .build()
}

pub fn social_media_prefix(disaster_id: &str) -> String {
    CacheKey::new("social_media").text(disaster_id).prefix()
}

pub fn official_updates_key(
    disaster_id: &str,
    priority: Option<&str>,
    category: Option<&str>,
    limit: usize,
) -> String {
    CacheKey::new("official_updates")
        .text(disaster_id)
        .optional_text(priority)
        .optional_text(category)
        .part(limit)
        .build()
}

pub fn official_updates_prefix(disaster_id: &str) -> String {
    CacheKey::new("official_updates").text(disaster_id).prefix()
}

pub fn image_verification_key(image_url: &str) -> String {
    CacheKey::new("image_verification")
        .part(STANDARD.encode(image_url))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_location_name() {
        assert_eq!(normalize_location_name("Lower East Side"), "lower_east_side");
        assert_eq!(normalize_location_name("  New   York "), "new_york");
        assert_eq!(normalize_location_name("NYC"), "nyc");
    }

    #[test]
    fn test_geocode_key_is_case_insensitive() {
        assert_eq!(geocode_key("Brooklyn"), "geocode_brooklyn");
        assert_eq!(geocode_key("brooklyn"), geocode_key("BROOKLYN"));
    }

    #[test]
    fn test_location_extraction_key_encodes_description() {
        let key = location_extraction_key("Flooding in Manhattan");
        assert_eq!(key, "gemini_location_Rmxvb2RpbmcgaW4gTWFuaGF0dGFu");
        assert_ne!(key, location_extraction_key("Flooding in Brooklyn"));
    }

    #[test]
    fn test_resources_key_format() {
        let key = resources_key(&ResourceQueryKey {
            disaster_id: "d1",
            lat: 40.7128,
            lng: -74.006,
            radius_km: 10.0,
            resource_type: None,
            status: "active",
        });

        assert_eq!(key, "resources_d1_40.7128_-74.006_10_all_active");
        assert!(key.starts_with(&resources_prefix("d1")));
    }

    #[test]
    fn test_resources_key_differs_per_filter() {
        let base = ResourceQueryKey {
            disaster_id: "d1",
            lat: 40.7128,
            lng: -74.006,
            radius_km: 10.0,
            resource_type: None,
            status: "active",
        };

        let variants = [
            ResourceQueryKey { disaster_id: "d2", ..base.clone() },
            ResourceQueryKey { lat: 40.0, ..base.clone() },
            ResourceQueryKey { lng: -73.0, ..base.clone() },
            ResourceQueryKey { radius_km: 5.0, ..base.clone() },
            ResourceQueryKey { resource_type: Some("shelter"), ..base.clone() },
            ResourceQueryKey { status: "full", ..base.clone() },
        ];

        let base_key = resources_key(&base);
        for variant in &variants {
            assert_ne!(resources_key(variant), base_key);
        }

        let split_early = ResourceQueryKey {
            resource_type: Some("water"),
            status: "full_active",
            ..base.clone()
        };
        let split_late = ResourceQueryKey {
            resource_type: Some("water_full"),
            status: "active",
            ..base.clone()
        };
        assert_ne!(resources_key(&split_early), resources_key(&split_late));

        let literal_all = ResourceQueryKey { resource_type: Some("all"), ..base.clone() };
        assert_ne!(resources_key(&literal_all), base_key);
    }

    #[test]
    fn test_escaped_parts_keep_prefix_invalidation() {
        let key = resources_key(&ResourceQueryKey {
            disaster_id: "d_1",
            lat: 40.7128,
            lng: -74.006,
            radius_km: 10.0,
            resource_type: Some("water_full"),
            status: "active",
        });

        assert_eq!(key, "resources_d%5F1_40.7128_-74.006_10_water%5Ffull_active");
        assert!(key.starts_with(&resources_prefix("d_1")));
        assert!(!key.starts_with(&resources_prefix("d")));
    }

    #[test]
    fn test_official_updates_key() {
        assert_eq!(
            official_updates_key("d1", None, None, 20),
            "official_updates_d1_all_all_20"
        );
        assert_eq!(
            official_updates_key("d1", Some("high"), Some("shelter"), 5),
            "official_updates_d1_high_shelter_5"
        );
        assert_ne!(
            official_updates_key("d1", Some("high_shelter"), None, 5),
            official_updates_key("d1", Some("high"), Some("shelter"), 5)
        );
        assert_ne!(
            official_updates_key("d1", Some("all"), None, 5),
            official_updates_key("d1", None, None, 5)
        );
    }

    #[test]
    fn test_escape_part() {
        assert_eq!(escape_part("water"), "water");
        assert_eq!(escape_part("water_full"), "water%5Ffull");
        assert_eq!(escape_part("100%_safe"), "100%25%5Fsafe");
    }

    #[test]
    fn test_prefix_does_not_match_other_disaster() {
        let prefix = resources_prefix("d1");
        let other = resources_key(&ResourceQueryKey {
            disaster_id: "d10",
            lat: 0.0,
            lng: 0.0,
            radius_km: 1.0,
            resource_type: None,
            status: "active",
        });

        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_social_and_image_keys() {
        assert_eq!(social_media_key("d1", 20), "social_media_d1_20");
        assert!(image_verification_key("https://x/img.jpg").starts_with("image_verification_"));
    }
}
