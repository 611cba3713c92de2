//! Real-time events infrastructure

mod broadcaster;

pub use broadcaster::{EventBroadcaster, DEFAULT_CHANNEL_CAPACITY};
