//! Infrastructure layer - Storage backends, the cache and mock collaborators

pub mod cache;
pub mod events;
pub mod geocoding;
pub mod logging;
pub mod observability;
pub mod rate_limit;
pub mod resource;
pub mod services;
pub mod social;
pub mod storage;
pub mod updates;
pub mod user;
pub mod verification;
