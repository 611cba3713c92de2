//! Resource domain

mod entity;

pub use entity::{Resource, ResourceChanges, ResourceStatus, ResourceType};
