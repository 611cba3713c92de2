//! Social media service - cached disaster feed and citizen reports

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::cache::key::social_media_key;
use crate::domain::cache::{CacheOutcome, CachePolicy};
use crate::domain::events::SocialMediaUpdate;
use crate::domain::social::{sort_by_recency, sort_by_urgency, PRIORITY_MARKERS};
use crate::domain::storage::Storage;
use crate::domain::{
    DomainError, Priority, RealtimeEvent, Report, SocialFeed, SocialMediaPost, User,
};
use crate::infrastructure::cache::CacheManager;
use crate::infrastructure::events::EventBroadcaster;

use super::DisasterService;

pub const FEED_TTL_SECS: i64 = 1800;
/// Real-time feeds go stale faster
pub const REALTIME_FEED_TTL_SECS: i64 = 300;
pub const DEFAULT_FEED_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialFeedResult {
    pub disaster_id: String,
    pub posts: Vec<SocialMediaPost>,
    pub count: usize,
    pub realtime: bool,
    pub cache: CacheOutcome,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityFeedResult {
    pub disaster_id: String,
    pub priority_posts: Vec<SocialMediaPost>,
    pub count: usize,
    pub criteria: Vec<&'static str>,
    pub last_updated: DateTime<Utc>,
}

/// A citizen report submission
#[derive(Debug, Clone, Default)]
pub struct SubmitReportRequest {
    pub content: String,
    pub location: Option<String>,
    pub urgency: Option<Priority>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedReport {
    pub report: Report,
    pub social_media_post: SocialMediaPost,
    pub message: &'static str,
}

#[derive(Clone)]
pub struct SocialMediaService {
    reports: Arc<dyn Storage<Report>>,
    disasters: Arc<DisasterService>,
    feed: Arc<dyn SocialFeed>,
    cache: Arc<CacheManager>,
    events: EventBroadcaster,
}

impl std::fmt::Debug for SocialMediaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialMediaService")
            .field("reports", &self.reports)
            .finish_non_exhaustive()
    }
}

impl SocialMediaService {
    pub fn new(
        reports: Arc<dyn Storage<Report>>,
        disasters: Arc<DisasterService>,
        feed: Arc<dyn SocialFeed>,
        cache: Arc<CacheManager>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            reports,
            disasters,
            feed,
            cache,
            events,
        }
    }

    /// Relevant posts, newest first
    ///
    /// A real-time request skips the cached feed, prepends freshly observed
    /// posts and stores the result with a shorter TTL.
    pub async fn feed(
        &self,
        disaster_id: &str,
        limit: usize,
        realtime: bool,
    ) -> Result<SocialFeedResult, DomainError> {
        let disaster = self.disasters.get_required(disaster_id).await?;

        let policy = if realtime {
            CachePolicy::ttl(REALTIME_FEED_TTL_SECS).with_bypass_read(true)
        } else {
            CachePolicy::ttl(FEED_TTL_SECS)
        };

        let (posts, outcome) = self
            .cache
            .fetch_through(&social_media_key(disaster_id, limit), policy, || async {
                let mut posts: Vec<SocialMediaPost> = self
                    .feed
                    .recent_posts()
                    .await?
                    .into_iter()
                    .filter(|p| p.is_relevant(&disaster.tags))
                    .collect();

                if realtime {
                    let fresh = self.feed.realtime_posts(disaster_id, &disaster.tags).await?;
                    info!(
                        disaster_id = %disaster_id,
                        count = fresh.len(),
                        "Generated realtime posts"
                    );
                    posts.splice(0..0, fresh);
                }

                sort_by_recency(&mut posts);
                posts.truncate(limit);
                Ok(posts)
            })
            .await?;

        if outcome.is_hit() {
            debug!(disaster_id = %disaster_id, "Using cached social media posts");
        } else {
            info!(disaster_id = %disaster_id, count = posts.len(), "Retrieved social media posts");
        }

        if realtime {
            let new_posts: Vec<SocialMediaPost> =
                posts.iter().filter(|p| p.is_realtime).cloned().collect();

            if !new_posts.is_empty() {
                self.events
                    .send(RealtimeEvent::SocialMediaUpdated(SocialMediaUpdate {
                        disaster_id: disaster_id.to_string(),
                        new_posts,
                        total_posts: Some(posts.len()),
                        action: None,
                    }));
            }
        }

        Ok(SocialFeedResult {
            disaster_id: disaster_id.to_string(),
            count: posts.len(),
            posts,
            realtime,
            cache: outcome,
            last_updated: Utc::now(),
        })
    }

    /// Urgent posts, most urgent first
    pub async fn priority(&self, disaster_id: &str) -> Result<PriorityFeedResult, DomainError> {
        let disaster = self.disasters.get_required(disaster_id).await?;

        let mut posts: Vec<SocialMediaPost> = self
            .feed
            .recent_posts()
            .await?
            .into_iter()
            .filter(|p| p.is_relevant(&disaster.tags) && p.is_priority())
            .collect();
        sort_by_urgency(&mut posts);

        info!(disaster_id = %disaster_id, count = posts.len(), "Retrieved priority posts");

        let mut criteria = vec![Priority::Critical.as_str(), Priority::High.as_str()];
        criteria.extend_from_slice(PRIORITY_MARKERS);

        Ok(PriorityFeedResult {
            disaster_id: disaster_id.to_string(),
            count: posts.len(),
            priority_posts: posts,
            criteria,
            last_updated: Utc::now(),
        })
    }

    /// Stores a citizen report and publishes it as a feed post
    pub async fn submit_report(
        &self,
        disaster_id: &str,
        request: SubmitReportRequest,
        user: &User,
    ) -> Result<SubmittedReport, DomainError> {
        if request.content.trim().is_empty() {
            return Err(DomainError::validation("Content is required"));
        }

        self.disasters.get_required(disaster_id).await?;

        let mut report = Report::new(disaster_id, &user.id, request.content);
        if let Some(url) = request.image_url.filter(|u| !u.trim().is_empty()) {
            report = report.with_image_url(url);
        }
        let report = self.reports.insert(report).await?;

        let post = SocialMediaPost::from_report(
            &report,
            request.location,
            request.urgency.unwrap_or_default(),
        );

        info!(
            disaster_id = %disaster_id,
            report_id = %report.id,
            user_id = %user.id,
            "Social media report submitted"
        );

        self.events
            .send(RealtimeEvent::SocialMediaUpdated(SocialMediaUpdate {
                disaster_id: disaster_id.to_string(),
                new_posts: vec![post.clone()],
                total_posts: None,
                action: Some("user_report".to_string()),
            }));

        Ok(SubmittedReport {
            report,
            social_media_post: post,
            message: "Report submitted successfully",
        })
    }

    pub async fn get_report(&self, id: &str) -> Result<Option<Report>, DomainError> {
        self.reports.get(id).await
    }
}
