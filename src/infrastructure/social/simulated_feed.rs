//! Simulated social media monitoring

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::priority::Priority;
use crate::domain::social::{SocialFeed, SocialMediaPost};
use crate::domain::DomainError;

const FLOOD_TEMPLATES: &[&str] = &[
    "Water levels rising in {location}. Need immediate help! #flood #emergency",
    "Basement flooded in {location}. Looking for shelter. #floodrelief",
    "Road closures due to flooding in {location}. Avoid area. #flood #traffic",
];

const EARTHQUAKE_TEMPLATES: &[&str] = &[
    "Building damage reported in {location}. #earthquake #emergency",
    "Aftershocks felt in {location}. Stay safe everyone. #earthquake",
    "Emergency services responding to {location}. #earthquake #rescue",
];

const FIRE_TEMPLATES: &[&str] = &[
    "Smoke visible from {location}. Evacuating now. #fire #evacuation",
    "Fire spreading in {location}. Need firefighters! #fire #emergency",
    "Air quality poor in {location} due to fire. #fire #health",
];

const BOROUGHS: &[&str] = &["Manhattan", "Brooklyn", "Queens", "Bronx", "Staten Island"];

const ACCOUNTS: &[&str] = &[
    "citizen_alert",
    "local_resident",
    "emergency_watch",
    "community_help",
];

fn templates_for(tag: &str) -> &'static [&'static str] {
    match tag {
        "earthquake" => EARTHQUAKE_TEMPLATES,
        "fire" => FIRE_TEMPLATES,
        _ => FLOOD_TEMPLATES,
    }
}

/// Fixed NYC posts plus randomly generated "live" ones
#[derive(Debug, Default, Clone)]
pub struct SimulatedSocialFeed;

impl SimulatedSocialFeed {
    pub fn new() -> Self {
        Self
    }

    fn post(
        id: &str,
        user: &str,
        content: &str,
        minutes_ago: i64,
        location: &str,
        urgency: Priority,
        keywords: &[&str],
    ) -> SocialMediaPost {
        SocialMediaPost {
            id: id.to_string(),
            user: user.to_string(),
            content: content.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            platform: "twitter".to_string(),
            location: location.to_string(),
            urgency,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            is_realtime: false,
            report_id: None,
            verification_status: None,
        }
    }
}

#[async_trait]
impl SocialFeed for SimulatedSocialFeed {
    async fn recent_posts(&self) -> Result<Vec<SocialMediaPost>, DomainError> {
        Ok(vec![
            Self::post(
                "post_1",
                "citizen1",
                "#floodrelief Need food in Lower East Side NYC. Water levels rising fast!",
                30,
                "Lower East Side, NYC",
                Priority::High,
                &["flood", "relief", "food", "urgent"],
            ),
            Self::post(
                "post_2",
                "reliefworker_ny",
                "Shelter available at Manhattan Community Center. #disasterrelief #shelter",
                45,
                "Manhattan, NYC",
                Priority::Medium,
                &["shelter", "relief", "available"],
            ),
            Self::post(
                "post_3",
                "nyc_emergency",
                "URGENT: Evacuation recommended for areas near East River. #evacuation #flood",
                15,
                "East River, NYC",
                Priority::Critical,
                &["urgent", "evacuation", "flood"],
            ),
            Self::post(
                "post_4",
                "volunteer_help",
                "Medical supplies needed in Brooklyn. Can deliver. #medical #supplies #brooklyn",
                60,
                "Brooklyn, NYC",
                Priority::Medium,
                &["medical", "supplies", "volunteer"],
            ),
            Self::post(
                "post_5",
                "local_news",
                "Power outages reported across Queens. Crews working to restore. #poweroutage #queens",
                90,
                "Queens, NYC",
                Priority::Low,
                &["power", "outage", "crews"],
            ),
        ])
    }

    async fn realtime_posts(
        &self,
        disaster_id: &str,
        tags: &[String],
    ) -> Result<Vec<SocialMediaPost>, DomainError> {
        let mut rng = rand::thread_rng();
        let now = Utc::now();
        let count = rng.gen_range(1..=3);

        let posts: Vec<SocialMediaPost> = (0..count)
            .map(|i| {
                let tag = tags
                    .choose(&mut rng)
                    .map(String::as_str)
                    .unwrap_or("emergency");
                let template = templates_for(tag)
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(FLOOD_TEMPLATES[0]);
                let location = BOROUGHS.choose(&mut rng).copied().unwrap_or("Manhattan");
                let user = ACCOUNTS.choose(&mut rng).copied().unwrap_or("citizen_alert");
                let urgency = if rng.gen_bool(0.3) {
                    Priority::High
                } else {
                    Priority::Medium
                };

                SocialMediaPost {
                    id: format!("realtime_{}_{}", now.timestamp_millis(), i),
                    user: user.to_string(),
                    content: template.replace("{location}", location),
                    timestamp: now,
                    platform: "twitter".to_string(),
                    location: location.to_string(),
                    urgency,
                    keywords: vec![tag.to_string(), "emergency".to_string()],
                    is_realtime: true,
                    report_id: None,
                    verification_status: None,
                }
            })
            .collect();

        debug!(disaster_id = %disaster_id, count = posts.len(), "Generated realtime posts");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recent_posts_fixture() {
        let posts = SimulatedSocialFeed::new().recent_posts().await.unwrap();

        assert_eq!(posts.len(), 5);
        assert_eq!(posts[2].id, "post_3");
        assert_eq!(posts[2].urgency, Priority::Critical);
        assert!(posts.iter().all(|p| !p.is_realtime));
    }

    #[tokio::test]
    async fn test_realtime_posts_shape() {
        let tags = vec!["fire".to_string()];
        let posts = SimulatedSocialFeed::new()
            .realtime_posts("d1", &tags)
            .await
            .unwrap();

        assert!((1..=3).contains(&posts.len()));
        for post in &posts {
            assert!(post.is_realtime);
            assert!(post.id.starts_with("realtime_"));
            assert!(post.content.contains("#fire"));
            assert_eq!(post.keywords, vec!["fire", "emergency"]);
            assert!(BOROUGHS.contains(&post.location.as_str()));
            assert!(matches!(post.urgency, Priority::High | Priority::Medium));
        }
    }

    #[tokio::test]
    async fn test_realtime_posts_without_tags_use_flood_templates() {
        let posts = SimulatedSocialFeed::new()
            .realtime_posts("d1", &[])
            .await
            .unwrap();

        for post in &posts {
            assert_eq!(post.keywords[0], "emergency");
            assert!(post.content.contains("flood"));
        }
    }

    #[tokio::test]
    async fn test_realtime_post_ids_are_distinct() {
        let posts = SimulatedSocialFeed::new()
            .realtime_posts("d1", &["flood".to_string()])
            .await
            .unwrap();

        let mut ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), posts.len());
    }
}
