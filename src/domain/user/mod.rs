//! User domain - mock identities and roles

mod entity;
mod repository;

pub use entity::{Role, User};
pub use repository::UserDirectory;

#[cfg(test)]
pub use repository::MockUserDirectory;
