//! User infrastructure

mod directory;

pub use directory::InMemoryUserDirectory;
