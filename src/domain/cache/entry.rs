//! Cache entry and lookup result types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default time-to-live for cache entries (1 hour)
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// TTLs are clamped to this magnitude so expiry stays representable in every backend
const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// A single row of the cache table
///
/// At most one entry exists per key; writing an existing key replaces both
/// the value and the expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry that expires `ttl_seconds` after `now`
    ///
    /// A TTL of zero or less produces an entry that is already expired.
    pub fn new(
        key: impl Into<String>,
        value: serde_json::Value,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let ttl = ttl_seconds.clamp(-MAX_TTL_SECONDS, MAX_TTL_SECONDS);

        Self {
            key: key.into(),
            value,
            expires_at: now + Duration::seconds(ttl),
        }
    }

    /// An entry is live strictly before its expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime, `None` once expired
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired_at(now) {
            None
        } else {
            Some(self.expires_at - now)
        }
    }
}

/// Observable result of a cache read
///
/// Storage failures surface as `Unavailable` here; the plain `get` API folds
/// them into an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<V> {
    Hit(V),
    Miss,
    Unavailable(String),
}

impl<V> CacheLookup<V> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Unavailable(_) => None,
        }
    }

    /// Label used for metrics and logs
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Self::Hit(_) => "hit",
            Self::Miss => "miss",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// How a cached query was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOutcome {
    /// Served from the cache without recomputation
    Hit,
    /// Computed because no live entry existed
    Miss,
    /// Computed because the caller asked for fresh data
    Bypassed,
}

impl CacheOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl std::fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
            Self::Bypassed => write!(f, "bypassed"),
        }
    }
}

/// Per-endpoint caching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl_seconds: i64,
    pub bypass_read: bool,
}

impl CachePolicy {
    pub fn ttl(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            bypass_read: false,
        }
    }

    /// Skip the read (fresh data requested) while still refreshing the entry
    pub fn with_bypass_read(mut self, bypass: bool) -> Self {
        self.bypass_read = bypass;
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::ttl(DEFAULT_TTL_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_expiry_from_ttl() {
        let now = Utc::now();
        let entry = CacheEntry::new("k", json!(1), 60, now);

        assert_eq!(entry.expires_at, now + Duration::seconds(60));
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn test_non_positive_ttl_is_expired_immediately() {
        let now = Utc::now();

        assert!(CacheEntry::new("k", json!(1), 0, now).is_expired_at(now));
        assert!(CacheEntry::new("k", json!(1), -5, now).is_expired_at(now));
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let now = Utc::now();
        let entry = CacheEntry::new("k", json!(1), i64::MAX, now);

        assert!(entry.expires_at > now);
        assert!(entry.ttl_remaining(now).is_some());
    }

    #[test]
    fn test_lookup_into_option() {
        assert_eq!(CacheLookup::Hit(3).into_option(), Some(3));
        assert_eq!(CacheLookup::<i32>::Miss.into_option(), None);
        assert_eq!(
            CacheLookup::<i32>::Unavailable("down".into()).into_option(),
            None
        );
    }

    #[test]
    fn test_policy_defaults() {
        let policy = CachePolicy::default();
        assert_eq!(policy.ttl_seconds, 3600);
        assert!(!policy.bypass_read);

        let fresh = CachePolicy::ttl(300).with_bypass_read(true);
        assert_eq!(fresh.ttl_seconds, 300);
        assert!(fresh.bypass_read);
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_string(&CacheOutcome::Hit).unwrap(), "\"hit\"");
        assert_eq!(
            serde_json::to_string(&CacheOutcome::Bypassed).unwrap(),
            "\"bypassed\""
        );
    }
}
