//! Real-time events pushed to connected clients

use serde::{Deserialize, Serialize};

use crate::domain::disaster::{AuditAction, Disaster};
use crate::domain::geo::{GeoPoint, Ranked};
use crate::domain::resource::Resource;
use crate::domain::social::SocialMediaPost;

/// Change notification, `{ "event": ..., "data": ... }` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RealtimeEvent {
    DisasterUpdated {
        action: AuditAction,
        disaster: Disaster,
    },
    ResourcesUpdated(ResourcesUpdate),
    SocialMediaUpdated(SocialMediaUpdate),
}

impl RealtimeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DisasterUpdated { .. } => "disaster_updated",
            Self::ResourcesUpdated(_) => "resources_updated",
            Self::SocialMediaUpdated(_) => "social_media_updated",
        }
    }

    pub fn disaster(action: AuditAction, disaster: Disaster) -> Self {
        Self::DisasterUpdated { action, disaster }
    }
}

/// Resource search results or a single resource change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesUpdate {
    pub disaster_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Ranked<Resource>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl ResourcesUpdate {
    pub fn search(
        disaster_id: impl Into<String>,
        resources: Vec<Ranked<Resource>>,
        search_location: GeoPoint,
        radius: f64,
    ) -> Self {
        Self {
            disaster_id: disaster_id.into(),
            action: None,
            resource: None,
            resources: Some(resources),
            search_location: Some(search_location),
            radius: Some(radius),
        }
    }

    pub fn changed(disaster_id: impl Into<String>, action: AuditAction, resource: Resource) -> Self {
        Self {
            disaster_id: disaster_id.into(),
            action: Some(action),
            resource: Some(resource),
            resources: None,
            search_location: None,
            radius: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaUpdate {
    pub disaster_id: String,
    pub new_posts: Vec<SocialMediaPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_format() {
        let event = RealtimeEvent::SocialMediaUpdated(SocialMediaUpdate {
            disaster_id: "d1".into(),
            new_posts: Vec::new(),
            total_posts: Some(3),
            action: None,
        });

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], json!("social_media_updated"));
        assert_eq!(value["data"]["disaster_id"], json!("d1"));
        assert_eq!(value["data"]["total_posts"], json!(3));
        assert!(value["data"].get("action").is_none());
        assert_eq!(event.name(), "social_media_updated");
    }

    #[test]
    fn test_disaster_event_name_matches_tag() {
        let event = RealtimeEvent::disaster(AuditAction::Create, Disaster::new("t", "d", "o"));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["event"], json!(event.name()));
        assert_eq!(value["data"]["action"], json!("create"));
    }
}
