//! Rate limiting infrastructure

mod limiter;

pub use limiter::{RateLimitDecision, RateLimitPolicy, RateLimiter};
