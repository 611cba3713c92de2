//! Cache infrastructure - Cache stores and the TTL cache manager

mod factory;
mod in_memory;
mod manager;
mod postgres;

pub use factory::{CacheBackend, CacheFactory, CacheStoreConfig};
pub use in_memory::{InMemoryCacheConfig, InMemoryCacheStore};
pub use manager::{CacheManager, CacheStats};
pub use postgres::{PostgresCacheStore, CACHE_TABLE};
