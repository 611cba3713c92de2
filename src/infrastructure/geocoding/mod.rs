//! Geocoding infrastructure - stand-ins for the extraction and geocoding services

mod pattern_extractor;
mod table_geocoder;

pub use pattern_extractor::PatternLocationExtractor;
pub use table_geocoder::TableGeocoder;
