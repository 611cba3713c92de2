//! Storage infrastructure - Record storage implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageBackend, StorageFactory};
pub use in_memory::InMemoryStorage;
pub use migrations::{run_storage_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig, PostgresStorage};
