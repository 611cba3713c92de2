//! Cache maintenance commands against the configured backing store

use clap::Subcommand;
use tracing::info;

use crate::infrastructure::cache::CacheManager;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CacheCommand {
    /// Delete every expired entry
    Cleanup,

    /// Delete every entry
    Clear,

    /// Delete a single key
    Delete {
        /// Cache key to remove
        key: String,
    },
}

/// Run a cache maintenance command
pub async fn run(command: CacheCommand) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let pool = crate::connect_database(&config).await?;
    let cache = crate::create_cache_manager(&config, pool.as_ref())?;

    let summary = execute(&cache, &command).await?;
    info!(backend = cache.backend_name(), "{}", summary);
    println!("{}", summary);

    Ok(())
}

async fn execute(cache: &CacheManager, command: &CacheCommand) -> anyhow::Result<String> {
    match command {
        CacheCommand::Cleanup => {
            let removed = cache
                .cleanup_count()
                .await
                .ok_or_else(|| anyhow::anyhow!("Cache cleanup failed"))?;
            Ok(format!("Removed {} expired cache entries", removed))
        }
        CacheCommand::Clear => {
            let removed = cache
                .clear_count()
                .await
                .ok_or_else(|| anyhow::anyhow!("Cache clear failed"))?;
            Ok(format!("Removed {} cache entries", removed))
        }
        CacheCommand::Delete { key } => {
            if !cache.delete(key).await {
                anyhow::bail!("Failed to delete cache key {}", key);
            }
            Ok(format!("Deleted cache key {}", key))
        }
    }
}
