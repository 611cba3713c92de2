//! Curated official updates for NYC agencies

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::priority::Priority;
use crate::domain::update::{OfficialUpdate, SourceKind, UpdateCatalog, UpdateSource};
use crate::domain::DomainError;

fn source(name: &str, description: &str, url: &str, kind: SourceKind) -> UpdateSource {
    UpdateSource {
        name: name.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        kind,
    }
}

/// Static catalog standing in for an agency feed aggregator
#[derive(Debug, Default, Clone)]
pub struct StaticUpdateCatalog;

impl StaticUpdateCatalog {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    fn update(
        id: &str,
        source: &str,
        title: &str,
        content: &str,
        url: &str,
        minutes_ago: i64,
        priority: Priority,
        category: &str,
        tags: &[&str],
    ) -> OfficialUpdate {
        OfficialUpdate {
            id: id.to_string(),
            source: source.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            url: url.to_string(),
            published_at: Utc::now() - Duration::minutes(minutes_ago),
            priority,
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_scraped: false,
        }
    }
}

#[async_trait]
impl UpdateCatalog for StaticUpdateCatalog {
    async fn updates(&self) -> Result<Vec<OfficialUpdate>, DomainError> {
        Ok(vec![
            Self::update(
                "update_1",
                "FEMA",
                "Emergency Declaration for NYC Flooding",
                "Federal Emergency Management Agency has declared a state of emergency for New York City due to severe flooding. Federal assistance is now available to affected residents.",
                "https://www.fema.gov/disaster/current/nyc-flooding-2025",
                120,
                Priority::High,
                "official",
                &["flood", "emergency", "federal"],
            ),
            Self::update(
                "update_2",
                "NYC Emergency Management",
                "Evacuation Orders for Lower Manhattan",
                "NYC Emergency Management has issued evacuation orders for residents in flood-prone areas of Lower Manhattan. Evacuation centers have been established at designated locations.",
                "https://www1.nyc.gov/site/em/emergency_management/current-emergencies.page",
                60,
                Priority::Critical,
                "evacuation",
                &["evacuation", "manhattan", "flood"],
            ),
            Self::update(
                "update_3",
                "American Red Cross",
                "Emergency Shelters Now Open",
                "The American Red Cross has opened emergency shelters across NYC. Shelters provide food, water, and temporary housing for displaced residents.",
                "https://www.redcross.org/local/new-york/new-york-city",
                30,
                Priority::Medium,
                "shelter",
                &["shelter", "redcross", "housing"],
            ),
            Self::update(
                "update_4",
                "NYC Department of Health",
                "Health Advisory for Flood-Affected Areas",
                "Health advisory issued for residents in flood-affected areas. Avoid contact with floodwater and seek medical attention if experiencing symptoms.",
                "https://www1.nyc.gov/site/doh/health/emergency-preparedness/emergencies.page",
                45,
                Priority::Medium,
                "health",
                &["health", "advisory", "flood"],
            ),
            Self::update(
                "update_5",
                "MTA",
                "Subway Service Disruptions",
                "Multiple subway lines suspended due to flooding. Alternative transportation options available. Check MTA website for latest service updates.",
                "https://new.mta.info/alerts",
                90,
                Priority::Medium,
                "transportation",
                &["transportation", "subway", "mta"],
            ),
        ])
    }

    fn sources(&self) -> Vec<UpdateSource> {
        vec![
            source(
                "FEMA",
                "Federal Emergency Management Agency",
                "https://www.fema.gov",
                SourceKind::Federal,
            ),
            source(
                "NYC Emergency Management",
                "New York City Emergency Management Department",
                "https://www1.nyc.gov/site/em",
                SourceKind::Local,
            ),
            source(
                "American Red Cross",
                "American Red Cross Disaster Relief",
                "https://www.redcross.org",
                SourceKind::Nonprofit,
            ),
            source(
                "NYC Department of Health",
                "New York City Department of Health and Mental Hygiene",
                "https://www1.nyc.gov/site/doh",
                SourceKind::Local,
            ),
            source(
                "MTA",
                "Metropolitan Transportation Authority",
                "https://new.mta.info",
                SourceKind::Transportation,
            ),
        ]
    }

    fn scrape_targets(&self) -> Vec<UpdateSource> {
        let mut targets: Vec<UpdateSource> = self
            .sources()
            .into_iter()
            .filter(|s| s.kind != SourceKind::Transportation)
            .collect();

        targets.push(source(
            "National Weather Service",
            "National Weather Service forecasts and warnings",
            "https://www.weather.gov",
            SourceKind::Weather,
        ));

        targets
    }
}
