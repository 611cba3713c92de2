//! Official update and source types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::priority::Priority;

/// An announcement from an official agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialUpdate {
    pub id: String,
    pub source: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_scraped: bool,
}

impl OfficialUpdate {
    /// Shares at least one tag; an untagged disaster matches everything
    pub fn matches_tags(&self, disaster_tags: &[String]) -> bool {
        disaster_tags.is_empty() || self.tags.iter().any(|t| disaster_tags.contains(t))
    }
}

/// Most important first, then newest first
pub fn sort_by_priority(updates: &mut [OfficialUpdate]) {
    updates.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
}

/// Kind of agency publishing updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Federal,
    Local,
    Nonprofit,
    Transportation,
    Weather,
}

/// A monitored update source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSource {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

/// An item scraped from an agency page before it is tagged and prioritized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedItem {
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
}
