//! Resource infrastructure

mod catalog;

pub use catalog::seed_resources;
