//! Domain layer - Core entities, traits and pure logic

pub mod cache;
pub mod disaster;
pub mod error;
pub mod events;
pub mod geo;
pub mod geocoding;
pub mod priority;
pub mod resource;
pub mod social;
pub mod storage;
pub mod update;
pub mod user;
pub mod verification;

pub use cache::{CacheEntry, CacheKey, CacheLookup, CacheOutcome, CachePolicy, CacheStore};
pub use disaster::{AuditAction, AuditEntry, Disaster, DisasterChanges};
pub use error::DomainError;
pub use events::RealtimeEvent;
pub use geo::{filter_by_radius, haversine_distance_km, GeoPoint, Locatable, Ranked};
pub use geocoding::{Geocoder, LocationExtractor};
pub use priority::Priority;
pub use resource::{Resource, ResourceStatus, ResourceType};
pub use social::{Report, SocialFeed, SocialMediaPost};
pub use storage::{Record, Storage};
pub use update::{OfficialUpdate, UpdateCatalog, UpdateScraper, UpdateSource};
pub use user::{Role, User, UserDirectory};
pub use verification::{ImageVerification, ImageVerifier, VerificationRecord, VerificationStatus};
