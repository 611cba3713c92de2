//! Social media domain - posts, citizen reports and the feed trait

mod entity;
mod feed;

pub use entity::{
    sort_by_recency, sort_by_urgency, Report, SocialMediaPost, DISASTER_KEYWORDS,
    PRIORITY_MARKERS,
};
pub use feed::SocialFeed;

#[cfg(test)]
pub use feed::MockSocialFeed;
