//! Geographic point type

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Latitude/longitude pair in degrees, `{ "lat", "lng" }` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    /// New York City, used when a query has no usable reference point
    pub const NEW_YORK: GeoPoint = GeoPoint {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    /// Creates a validated point
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let point = Self {
            latitude,
            longitude,
        };

        if !point.is_valid() {
            return Err(DomainError::validation(format!(
                "Invalid coordinates: lat={}, lng={}",
                latitude, longitude
            )));
        }

        Ok(point)
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_validates_ranges() {
        assert!(GeoPoint::new(40.7128, -74.006).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_wire_format() {
        let point = GeoPoint::new(40.6782, -73.9442).unwrap();
        assert_eq!(
            serde_json::to_value(point).unwrap(),
            json!({ "lat": 40.6782, "lng": -73.9442 })
        );

        let parsed: GeoPoint =
            serde_json::from_value(json!({ "lat": 1.5, "lng": 2.5 })).unwrap();
        assert_eq!(parsed.latitude, 1.5);
        assert_eq!(parsed.longitude, 2.5);
    }
}
