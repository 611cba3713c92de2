//! User lookup trait

use async_trait::async_trait;

use super::User;

#[cfg(test)]
use mockall::automock;

/// Resolves caller ids to users
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, id: &str) -> Option<User>;
}
