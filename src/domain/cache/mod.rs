//! Cache domain - entries, keys and the backing-store trait

mod entry;
pub mod key;
mod repository;

pub use entry::{
    CacheEntry, CacheLookup, CacheOutcome, CachePolicy, DEFAULT_TTL_SECONDS,
};
pub use key::CacheKey;
pub use repository::CacheStore;

#[cfg(test)]
pub use repository::mock::MockCacheStore;
