//! Fixed user directory

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::user::{Role, User, UserDirectory};

/// Identities accepted by the header-based auth stub
#[derive(Debug, Clone)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, User>,
}

impl InMemoryUserDirectory {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    /// The four built-in accounts
    pub fn seeded() -> Self {
        Self::with_users(vec![
            User::new("netrunnerX", "NetRunner X", Role::Admin),
            User::new("reliefAdmin", "Relief Admin", Role::Admin),
            User::new("contributor1", "Contributor One", Role::Contributor),
            User::new("citizen1", "Citizen One", Role::Contributor),
        ])
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, id: &str) -> Option<User> {
        self.users.get(id).cloned()
    }
}
