//! Resource entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::geo::{GeoPoint, Locatable};
use crate::domain::storage::Record;

/// Kind of aid a resource provides
///
/// Unknown kinds round-trip as their original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Shelter,
    Food,
    Medical,
    Supplies,
    Other(String),
}

impl ResourceType {
    /// The built-in kinds, in display order
    pub const KNOWN: [ResourceType; 4] = [
        ResourceType::Shelter,
        ResourceType::Medical,
        ResourceType::Food,
        ResourceType::Supplies,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Shelter => "shelter",
            Self::Food => "food",
            Self::Medical => "medical",
            Self::Supplies => "supplies",
            Self::Other(other) => other,
        }
    }

    /// Display name, description and icon for the built-in kinds
    pub fn descriptor(&self) -> Option<(&'static str, &'static str, &'static str)> {
        match self {
            Self::Shelter => Some((
                "Emergency Shelters",
                "Temporary housing and accommodation",
                "home",
            )),
            Self::Medical => Some((
                "Medical Facilities",
                "Emergency medical care and treatment",
                "medical",
            )),
            Self::Food => Some((
                "Food Distribution",
                "Food banks and meal distribution centers",
                "food",
            )),
            Self::Supplies => Some((
                "Emergency Supplies",
                "Essential supplies and equipment",
                "supplies",
            )),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "shelter" => Self::Shelter,
            "food" => Self::Food,
            "medical" => Self::Medical,
            "supplies" => Self::Supplies,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Availability of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Active,
    Inactive,
    Full,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Full => "full",
        }
    }
}

impl std::str::FromStr for ResourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "full" => Ok(Self::Full),
            other => Err(format!("Unknown resource status: {}", other)),
        }
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An aid resource
///
/// Resources without a `disaster_id` belong to the shared catalog and are
/// visible to every disaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disaster_id: Option<String>,
    pub name: String,
    pub location_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_occupancy: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub services: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(
        name: impl Into<String>,
        location_name: impl Into<String>,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            disaster_id: None,
            name: name.into(),
            location_name: location_name.into(),
            location: None,
            resource_type,
            capacity: None,
            current_occupancy: None,
            contact: None,
            status: ResourceStatus::Active,
            services: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn for_disaster(mut self, disaster_id: impl Into<String>) -> Self {
        self.disaster_id = Some(disaster_id.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_capacity(mut self, capacity: u32, occupancy: u32) -> Self {
        self.capacity = Some(capacity);
        self.current_occupancy = Some(occupancy);
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_services(mut self, services: &[&str]) -> Self {
        self.services = services.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Catalog resources and this disaster's own resources
    pub fn is_visible_to(&self, disaster_id: &str) -> bool {
        self.disaster_id
            .as_deref()
            .is_none_or(|owner| owner == disaster_id)
    }
}

impl Record for Resource {
    const COLLECTION: &'static str = "resources";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Locatable for Resource {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// Partial update of a resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceChanges {
    pub name: Option<String>,
    pub location_name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub capacity: Option<u32>,
    pub current_occupancy: Option<u32>,
    pub contact: Option<String>,
    pub status: Option<ResourceStatus>,
    pub services: Option<Vec<String>>,
}
