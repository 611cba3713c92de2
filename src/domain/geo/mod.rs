//! Geospatial domain - points and distance matching

mod distance;
mod point;

pub use distance::{
    distance_between, filter_by_radius, haversine_distance_km, Locatable, Ranked,
    EARTH_RADIUS_KM,
};
pub use point::GeoPoint;
