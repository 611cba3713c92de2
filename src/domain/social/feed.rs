//! Social media source trait

use async_trait::async_trait;

use super::SocialMediaPost;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Source of social media posts about a disaster
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SocialFeed: Send + Sync {
    /// Posts currently known to the monitored platforms
    async fn recent_posts(&self) -> Result<Vec<SocialMediaPost>, DomainError>;

    /// Freshly observed posts for a disaster with the given tags
    async fn realtime_posts(
        &self,
        disaster_id: &str,
        tags: &[String],
    ) -> Result<Vec<SocialMediaPost>, DomainError>;
}
