//! Storage domain - Generic record storage abstraction

mod record;
mod repository;

pub use record::Record;
pub use repository::Storage;

#[cfg(test)]
pub use repository::mock;

#[cfg(test)]
pub(crate) use record::fixtures;
