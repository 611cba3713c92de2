//! Disaster service - CRUD with audit trail and real-time notifications

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::storage::Storage;
use crate::domain::{AuditAction, Disaster, DisasterChanges, DomainError, RealtimeEvent, User};
use crate::infrastructure::events::EventBroadcaster;

use super::GeocodingService;

pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Request to create a new disaster
#[derive(Debug, Clone, Default)]
pub struct CreateDisasterRequest {
    pub title: String,
    pub location_name: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
}

/// Listing filters, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisasterFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip)]
    pub limit: usize,
    #[serde(skip)]
    pub offset: usize,
}

impl Default for DisasterFilter {
    fn default() -> Self {
        Self {
            tag: None,
            owner_id: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl DisasterFilter {
    fn matches(&self, disaster: &Disaster) -> bool {
        self.tag.as_deref().is_none_or(|tag| disaster.has_tag(tag))
            && self
                .owner_id
                .as_deref()
                .is_none_or(|owner| disaster.owner_id == owner)
    }
}

/// Disaster CRUD service
#[derive(Debug, Clone)]
pub struct DisasterService {
    storage: Arc<dyn Storage<Disaster>>,
    geocoding: Arc<GeocodingService>,
    events: EventBroadcaster,
}

impl DisasterService {
    pub fn new(
        storage: Arc<dyn Storage<Disaster>>,
        geocoding: Arc<GeocodingService>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            storage,
            geocoding,
            events,
        }
    }

    pub async fn list(&self, filter: &DisasterFilter) -> Result<Vec<Disaster>, DomainError> {
        let mut disasters = self.storage.find(&|d: &Disaster| filter.matches(d)).await?;
        disasters.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let disasters: Vec<Disaster> = disasters
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        info!(count = disasters.len(), "Retrieved disasters");
        Ok(disasters)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Disaster>, DomainError> {
        self.storage.get(id).await
    }

    /// Get a disaster by ID, returning an error if not found
    pub async fn get_required(&self, id: &str) -> Result<Disaster, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Disaster not found"))
    }

    pub async fn create(
        &self,
        request: CreateDisasterRequest,
        user: &User,
    ) -> Result<Disaster, DomainError> {
        if request.title.trim().is_empty() || request.description.trim().is_empty() {
            return Err(DomainError::validation(
                "Missing required fields: title, description",
            ));
        }

        let mut disaster = Disaster::new(request.title, request.description, &user.id)
            .with_tags(request.tags);

        if let Some(name) = request.location_name.filter(|n| !n.trim().is_empty()) {
            if let Some(point) = self.locate(&name).await {
                disaster = disaster.with_location(point);
            }
            disaster = disaster.with_location_name(name);
        }

        let disaster = self.storage.insert(disaster).await?;
        info!(disaster_id = %disaster.id, user_id = %user.id, "Disaster created");

        self.events
            .send(RealtimeEvent::disaster(AuditAction::Create, disaster.clone()));

        Ok(disaster)
    }

    /// Owner or admin only; appends an `update` audit entry
    pub async fn update(
        &self,
        id: &str,
        changes: DisasterChanges,
        user: &User,
    ) -> Result<Disaster, DomainError> {
        let mut disaster = self.get_required(id).await?;

        if !user.can_modify(&disaster.owner_id) {
            return Err(DomainError::forbidden(
                "Not authorized to update this disaster",
            ));
        }

        disaster.apply(changes, &user.id);

        if disaster.location.is_none() {
            if let Some(name) = disaster.location_name.clone() {
                disaster.location = self.locate(&name).await;
            }
        }

        let disaster = self.storage.replace(disaster).await?;
        info!(disaster_id = %id, user_id = %user.id, "Disaster updated");

        self.events
            .send(RealtimeEvent::disaster(AuditAction::Update, disaster.clone()));

        Ok(disaster)
    }

    /// Admin only
    pub async fn delete(&self, id: &str, user: &User) -> Result<Disaster, DomainError> {
        if !user.is_admin() {
            return Err(DomainError::forbidden("Insufficient permissions"));
        }

        let disaster = self.get_required(id).await?;
        self.storage.delete(id).await?;
        info!(disaster_id = %id, user_id = %user.id, "Disaster deleted");

        self.events
            .send(RealtimeEvent::disaster(AuditAction::Delete, disaster.clone()));

        Ok(disaster)
    }

    /// Storage connectivity for readiness probes
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.storage.ping().await
    }

    /// Geocoding failures leave the disaster without coordinates
    async fn locate(&self, name: &str) -> Option<crate::domain::GeoPoint> {
        match self.geocoding.geocode(name).await {
            Ok(point) => Some(point),
            Err(e) => {
                warn!(location = %name, error = %e, "Failed to geocode disaster location");
                None
            }
        }
    }
}
