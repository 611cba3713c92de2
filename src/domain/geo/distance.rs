//! Great-circle distance and radius matching

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::point::GeoPoint;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Anything that may carry a location
pub trait Locatable {
    fn location(&self) -> Option<GeoPoint>;
}

impl Locatable for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

/// A matched candidate with its distance to the reference point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    /// Kilometres from the reference point
    pub distance: f64,
}

/// Haversine distance in kilometres
///
/// Symmetric in its arguments and zero for identical points. The
/// intermediate term is clamped so antipodal inputs cannot yield NaN.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let sin_phi = (d_phi / 2.0).sin();
    let sin_lambda = (d_lambda / 2.0).sin();

    let a = sin_phi * sin_phi + phi1.cos() * phi2.cos() * sin_lambda * sin_lambda;
    let a = a.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance between two points in kilometres
pub fn distance_between(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Candidates within `radius_km` of the reference point, nearest first
///
/// The radius is inclusive. Candidates without a valid location are
/// skipped; ties keep their input order. Returns nothing for a negative or
/// non-finite radius or an invalid reference point.
pub fn filter_by_radius<T>(
    candidates: &[T],
    ref_lat: f64,
    ref_lon: f64,
    radius_km: f64,
) -> Vec<Ranked<T>>
where
    T: Locatable + Clone,
{
    let reference = GeoPoint {
        latitude: ref_lat,
        longitude: ref_lon,
    };

    if !reference.is_valid() || !radius_km.is_finite() || radius_km < 0.0 {
        debug!(
            ref_lat,
            ref_lon, radius_km, "Rejected radius query with invalid reference or radius"
        );
        return Vec::new();
    }

    let mut matched: Vec<Ranked<T>> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let Some(location) = candidate.location().filter(GeoPoint::is_valid) else {
                debug!(index, "Skipping candidate without a valid location");
                return None;
            };

            let distance = distance_between(&reference, &location);

            (distance <= radius_km).then(|| Ranked {
                item: candidate.clone(),
                distance,
            })
        })
        .collect();

    matched.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Site {
        name: &'static str,
        location: Option<GeoPoint>,
    }

    impl Locatable for Site {
        fn location(&self) -> Option<GeoPoint> {
            self.location
        }
    }

    fn site(name: &'static str, lat: f64, lng: f64) -> Site {
        Site {
            name,
            location: Some(GeoPoint {
                latitude: lat,
                longitude: lng,
            }),
        }
    }

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(haversine_distance_km(40.7128, -74.006, 40.7128, -74.006), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (40.7128, -74.006, 40.7831, -73.9712),
            (-33.8688, 151.2093, 51.5074, -0.1278),
            (0.0, 179.9, 0.0, -179.9),
        ];

        for (lat1, lon1, lat2, lon2) in pairs {
            assert_eq!(
                haversine_distance_km(lat1, lon1, lat2, lon2),
                haversine_distance_km(lat2, lon2, lat1, lon1)
            );
        }
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_distance_km(0.0, 0.0, 0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;

        assert!(d.is_finite());
        assert!((d - half_circumference).abs() < 1e-6);

        let poles = haversine_distance_km(90.0, 0.0, -90.0, 0.0);
        assert!((poles - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_known_distance_manhattan() {
        let d = haversine_distance_km(40.7128, -74.0060, 40.7831, -73.9712);
        assert!((d - 8.3).abs() < 0.2, "unexpected distance {}", d);
    }

    #[test]
    fn test_manhattan_scenario() {
        let a = site("A", 40.7128, -74.0060);
        let b = site("B", 40.7831, -73.9712);
        let candidates = vec![b.clone(), a.clone()];

        let near = filter_by_radius(&candidates, 40.7128, -74.0060, 5.0);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].item, a);
        assert_eq!(near[0].distance, 0.0);

        let wide = filter_by_radius(&candidates, 40.7128, -74.0060, 15.0);
        assert_eq!(wide.len(), 2);
        assert_eq!(wide[0].item.name, "A");
        assert_eq!(wide[1].item.name, "B");
        assert!(wide[1].distance > 8.0 && wide[1].distance < 8.6);
    }

    #[test]
    fn test_results_are_within_radius_and_sorted() {
        let candidates = vec![
            site("far", 40.9, -73.8),
            site("mid", 40.75, -73.98),
            site("near", 40.72, -74.0),
            site("out", 34.05, -118.24),
        ];

        let result = filter_by_radius(&candidates, 40.7128, -74.0060, 30.0);

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|r| r.distance <= 30.0));
        assert!(result.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            site("first", 40.7589, -73.9851),
            site("second", 40.7589, -73.9851),
            site("third", 40.7589, -73.9851),
        ];

        let result = filter_by_radius(&candidates, 40.7128, -74.0060, 10.0);
        let names: Vec<_> = result.iter().map(|r| r.item.name).collect();

        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_radius_zero_keeps_only_coincident() {
        let candidates = vec![site("here", 40.7128, -74.0060), site("there", 40.72, -74.0)];

        let result = filter_by_radius(&candidates, 40.7128, -74.0060, 0.0);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.name, "here");
    }

    #[test]
    fn test_invalid_radius_yields_empty() {
        let candidates = vec![site("here", 40.7128, -74.0060)];

        assert!(filter_by_radius(&candidates, 40.7128, -74.0060, -1.0).is_empty());
        assert!(filter_by_radius(&candidates, 40.7128, -74.0060, f64::NAN).is_empty());
        assert!(filter_by_radius(&candidates, 40.7128, -74.0060, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_invalid_reference_yields_empty() {
        let candidates = vec![site("here", 40.7128, -74.0060)];

        assert!(filter_by_radius(&candidates, 91.0, 0.0, 10.0).is_empty());
        assert!(filter_by_radius(&candidates, f64::NAN, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_skips_missing_and_invalid_locations() {
        let candidates = vec![
            Site {
                name: "nowhere",
                location: None,
            },
            site("broken", f64::NAN, -74.0),
            site("offworld", 120.0, -74.0),
            site("ok", 40.7128, -74.0060),
        ];

        let result = filter_by_radius(&candidates, 40.7128, -74.0060, 100.0);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.name, "ok");
    }

    #[test]
    fn test_empty_input() {
        let candidates: Vec<Site> = Vec::new();
        assert!(filter_by_radius(&candidates, 40.7128, -74.0060, 10.0).is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let candidates = vec![site("b", 40.78, -73.97), site("a", 40.7128, -74.006)];
        let before = candidates.clone();

        let _ = filter_by_radius(&candidates, 40.7128, -74.0060, 50.0);

        assert_eq!(candidates, before);
    }

    #[test]
    fn test_ranked_serializes_flat() {
        let ranked = Ranked {
            item: GeoPoint {
                latitude: 1.0,
                longitude: 2.0,
            },
            distance: 3.5,
        };

        assert_eq!(
            serde_json::to_value(&ranked).unwrap(),
            serde_json::json!({ "lat": 1.0, "lng": 2.0, "distance": 3.5 })
        );
    }
}
