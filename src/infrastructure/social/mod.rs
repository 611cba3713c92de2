//! Social media infrastructure

mod simulated_feed;

pub use simulated_feed::SimulatedSocialFeed;
