//! CLI module for the Disaster Response API
//!
//! Provides subcommands for:
//! - `serve`: HTTP API and real-time stream (default)
//! - `cache`: maintenance of the configured cache table

pub mod cache;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Disaster Response API - coordinated disaster data with cached geospatial lookups
#[derive(Parser)]
#[command(name = "disaster-response-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (default mode)
    Serve,

    /// Maintain the cache table
    #[command(subcommand)]
    Cache(cache::CacheCommand),
}

/// Loads `.env` and the layered configuration, then installs logging
pub fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };

    logging::init_logging(&config.logging);
    config
}
