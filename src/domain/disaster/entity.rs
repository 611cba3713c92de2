//! Disaster entity and audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::geo::{GeoPoint, Locatable};
use crate::domain::storage::Record;

/// Kind of change recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<DisasterChanges>,
}

/// Fields a caller may change on an existing disaster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisasterChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl DisasterChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.location_name.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }
}

/// A disaster record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disaster {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub owner_id: String,
    #[serde(default)]
    pub audit_trail: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Disaster {
    /// Creates a disaster owned by `owner_id` with a `create` audit entry
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let owner_id = owner_id.into();

        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            location_name: None,
            location: None,
            description: description.into(),
            tags: Vec::new(),
            audit_trail: vec![AuditEntry {
                action: AuditAction::Create,
                user_id: owner_id.clone(),
                timestamp: now,
                changes: None,
            }],
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_location_name(mut self, name: impl Into<String>) -> Self {
        self.location_name = Some(name.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Applies the changes and appends an `update` audit entry
    pub fn apply(&mut self, changes: DisasterChanges, user_id: impl Into<String>) {
        let now = Utc::now();

        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(location_name) = &changes.location_name {
            if self.location_name.as_deref() != Some(location_name.as_str()) {
                self.location = None;
            }
            self.location_name = Some(location_name.clone());
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(tags) = &changes.tags {
            self.tags = tags.clone();
        }

        self.audit_trail.push(AuditEntry {
            action: AuditAction::Update,
            user_id: user_id.into(),
            timestamp: now,
            changes: Some(changes),
        });
        self.updated_at = now;
    }
}

impl Record for Disaster {
    const COLLECTION: &'static str = "disasters";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Locatable for Disaster {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_disaster_has_create_audit() {
        let disaster = Disaster::new("NYC Flood", "Heavy flooding", "netrunnerX");

        assert_eq!(disaster.owner_id, "netrunnerX");
        assert_eq!(disaster.audit_trail.len(), 1);
        assert_eq!(disaster.audit_trail[0].action, AuditAction::Create);
        assert!(Uuid::parse_str(&disaster.id).is_ok());
    }

    #[test]
    fn test_apply_changes_appends_audit() {
        let mut disaster = Disaster::new("NYC Flood", "Heavy flooding", "netrunnerX")
            .with_location_name("Manhattan")
            .with_location(GeoPoint::NEW_YORK);

        disaster.apply(
            DisasterChanges {
                title: Some("NYC Flood (updated)".into()),
                location_name: Some("Brooklyn".into()),
                ..Default::default()
            },
            "reliefAdmin",
        );

        assert_eq!(disaster.title, "NYC Flood (updated)");
        assert_eq!(disaster.location_name.as_deref(), Some("Brooklyn"));
        assert_eq!(disaster.location, None);
        assert_eq!(disaster.description, "Heavy flooding");
        assert_eq!(disaster.audit_trail.len(), 2);
        assert_eq!(disaster.audit_trail[1].user_id, "reliefAdmin");
    }

    #[test]
    fn test_has_tag_ignores_case() {
        let disaster =
            Disaster::new("t", "d", "o").with_tags(vec!["flood".into(), "Urgent".into()]);

        assert!(disaster.has_tag("FLOOD"));
        assert!(disaster.has_tag("urgent"));
        assert!(!disaster.has_tag("fire"));
    }
}
