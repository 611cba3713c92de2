//! Shared resource catalog loaded at start-up

use chrono::{Duration, Utc};

use crate::domain::geo::GeoPoint;
use crate::domain::resource::{Resource, ResourceType};

fn point(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint {
        latitude,
        longitude,
    }
}

/// Five NYC relief sites visible to every disaster
pub fn seed_resources() -> Vec<Resource> {
    let now = Utc::now();

    vec![
        Resource::new(
            "Red Cross Emergency Shelter",
            "Manhattan Community Center",
            ResourceType::Shelter,
        )
        .with_id("resource_1")
        .with_location(point(40.7589, -73.9851))
        .with_capacity(200, 45)
        .with_contact("(212) 555-0123")
        .with_services(&["food", "medical", "clothing"])
        .with_created_at(now - Duration::hours(2)),
        Resource::new("NYC Emergency Food Bank", "Lower East Side", ResourceType::Food)
            .with_id("resource_2")
            .with_location(point(40.7209, -73.9896))
            .with_capacity(500, 120)
            .with_contact("(212) 555-0456")
            .with_services(&["food", "water"])
            .with_created_at(now - Duration::hours(3)),
        Resource::new(
            "Mount Sinai Emergency Medical",
            "Upper East Side",
            ResourceType::Medical,
        )
        .with_id("resource_3")
        .with_location(point(40.7829, -73.9654))
        .with_capacity(50, 12)
        .with_contact("(212) 555-0789")
        .with_services(&["medical", "emergency"])
        .with_created_at(now - Duration::hours(1)),
        Resource::new("Brooklyn Relief Center", "Downtown Brooklyn", ResourceType::Shelter)
            .with_id("resource_4")
            .with_location(point(40.6892, -73.9442))
            .with_capacity(150, 89)
            .with_contact("(718) 555-0321")
            .with_services(&["shelter", "food", "clothing"])
            .with_created_at(now - Duration::hours(4)),
        Resource::new(
            "Queens Emergency Supply Hub",
            "Flushing, Queens",
            ResourceType::Supplies,
        )
        .with_id("resource_5")
        .with_location(point(40.7282, -73.7949))
        .with_capacity(1000, 234)
        .with_contact("(718) 555-0654")
        .with_services(&["supplies", "clothing", "tools"])
        .with_created_at(now - Duration::hours(5)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_shared_and_located() {
        let resources = seed_resources();

        assert_eq!(resources.len(), 5);
        assert!(resources.iter().all(|r| r.disaster_id.is_none()));
        assert!(resources.iter().all(|r| r.location.is_some_and(|p| p.is_valid())));
    }

    #[test]
    fn test_seed_type_mix() {
        let shelters = seed_resources()
            .into_iter()
            .filter(|r| r.resource_type == ResourceType::Shelter)
            .count();

        assert_eq!(shelters, 2);
    }
}
