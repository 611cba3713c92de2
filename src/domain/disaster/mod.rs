//! Disaster domain

mod entity;

pub use entity::{AuditAction, AuditEntry, Disaster, DisasterChanges};
