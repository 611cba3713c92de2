//! Social media posts and user reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::priority::Priority;
use crate::domain::storage::Record;
use crate::domain::verification::{ImageVerification, VerificationStatus};

/// Words that make a post relevant to any disaster
pub const DISASTER_KEYWORDS: &[&str] = &[
    "flood",
    "earthquake",
    "fire",
    "hurricane",
    "tornado",
    "emergency",
    "disaster",
    "relief",
    "help",
    "urgent",
    "sos",
    "evacuation",
    "shelter",
    "rescue",
    "medical",
    "supplies",
    "food",
    "water",
    "power",
    "outage",
];

/// Content markers that make a post a priority regardless of urgency
pub const PRIORITY_MARKERS: &[&str] = &["urgent", "sos", "emergency"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaPost {
    pub id: String,
    pub user: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
    pub location: String,
    pub urgency: Priority,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_realtime: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
}

impl SocialMediaPost {
    /// Mentions a disaster keyword or one of the extra tags
    pub fn is_relevant(&self, extra_tags: &[String]) -> bool {
        let content = self.content.to_lowercase();

        DISASTER_KEYWORDS.iter().any(|k| content.contains(k))
            || extra_tags
                .iter()
                .any(|tag| content.contains(&tag.to_lowercase()))
    }

    /// Critical/high urgency or an urgent marker in the text
    pub fn is_priority(&self) -> bool {
        if self.urgency.is_urgent() {
            return true;
        }

        let content = self.content.to_lowercase();
        PRIORITY_MARKERS.iter().any(|m| content.contains(m))
    }

    /// A report rendered in feed form
    pub fn from_report(report: &Report, location: Option<String>, urgency: Priority) -> Self {
        Self {
            id: format!("user_report_{}", report.id),
            user: report.user_id.clone(),
            content: report.content.clone(),
            timestamp: report.created_at,
            platform: "user_report".to_string(),
            location: location.unwrap_or_else(|| "Unknown".to_string()),
            urgency,
            keywords: Vec::new(),
            is_realtime: false,
            report_id: Some(report.id.clone()),
            verification_status: Some(report.verification_status),
        }
    }
}

/// Newest first
pub fn sort_by_recency(posts: &mut [SocialMediaPost]) {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Most urgent first, then newest first
pub fn sort_by_urgency(posts: &mut [SocialMediaPost]) {
    posts.sort_by(|a, b| {
        b.urgency
            .rank()
            .cmp(&a.urgency.rank())
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}

/// A citizen report submitted for a disaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub disaster_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub verification_status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<ImageVerification>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        disaster_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            disaster_id: disaster_id.into(),
            user_id: user_id.into(),
            content: content.into(),
            image_url: None,
            verification_status: VerificationStatus::Pending,
            verification: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Records a verification outcome on the report
    pub fn attach_verification(&mut self, verification: ImageVerification) {
        self.verification_status = verification.verification_status;
        self.verification = Some(verification);
    }
}

impl Record for Report {
    const COLLECTION: &'static str = "reports";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(id: &str, content: &str, urgency: Priority, minutes_ago: i64) -> SocialMediaPost {
        SocialMediaPost {
            id: id.to_string(),
            user: "tester".to_string(),
            content: content.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            platform: "twitter".to_string(),
            location: "NYC".to_string(),
            urgency,
            keywords: Vec::new(),
            is_realtime: false,
            report_id: None,
            verification_status: None,
        }
    }

    #[test]
    fn test_relevance_uses_keywords_and_tags() {
        let generic = post("1", "Nice weather today", Priority::Low, 1);
        let flood = post("2", "Flood on 5th avenue", Priority::Low, 1);
        let tagged = post("3", "Heatwave advisory issued", Priority::Low, 1);

        assert!(!generic.is_relevant(&[]));
        assert!(flood.is_relevant(&[]));
        assert!(!tagged.is_relevant(&[]));
        assert!(tagged.is_relevant(&["HeatWave".to_string()]));
    }

    #[test]
    fn test_priority_detection() {
        assert!(post("1", "calm", Priority::Critical, 1).is_priority());
        assert!(post("2", "SOS stuck on roof", Priority::Low, 1).is_priority());
        assert!(!post("3", "shelter open", Priority::Medium, 1).is_priority());
    }

    #[test]
    fn test_sort_by_urgency_then_recency() {
        let mut posts = vec![
            post("old-high", "x", Priority::High, 60),
            post("critical", "x", Priority::Critical, 90),
            post("new-high", "x", Priority::High, 5),
            post("medium", "x", Priority::Medium, 1),
        ];

        sort_by_urgency(&mut posts);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["critical", "new-high", "old-high", "medium"]);
    }

    #[test]
    fn test_post_from_report() {
        let report = Report::new("d1", "citizen1", "Water rising");
        let post = SocialMediaPost::from_report(&report, None, Priority::High);

        assert_eq!(post.id, format!("user_report_{}", report.id));
        assert_eq!(post.platform, "user_report");
        assert_eq!(post.location, "Unknown");
        assert_eq!(post.verification_status, Some(VerificationStatus::Pending));
    }
}
