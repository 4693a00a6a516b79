use super::model::{Metadata, Target};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// One independently failing way of retrieving metadata for a target
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Name of the strategy (for logging)
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the source answered but had nothing usable
    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error>;
}

/// Ordered strategies for one classification
pub type Cascade = Vec<Box<dyn Strategy>>;

/// Run strategies in order and return the first non-empty result.
///
/// Each attempt gets its own `limit`. Errors, timeouts and empty results all move on to the
/// next strategy; nothing is retried and nothing escapes.
pub async fn run_cascade(
    strategies: &[Box<dyn Strategy>],
    target: &Target,
    limit: Duration,
) -> Option<Metadata> {
    for strategy in strategies {
        match timeout(limit, strategy.attempt(target)).await {
            Ok(Ok(Some(metadata))) if !metadata.is_empty() => {
                debug!(url = %target.url, strategy = strategy.name(), "Strategy succeeded");
                return Some(metadata);
            }
            Ok(Ok(_)) => {
                warn!(url = %target.url, strategy = strategy.name(), "Strategy returned no result");
            }
            Ok(Err(error)) => {
                let error = format!("{:#}", error);
                warn!(url = %target.url, strategy = strategy.name(), error = %error, "Strategy failed");
            }
            Err(_) => {
                warn!(url = %target.url, strategy = strategy.name(), timeout = ?limit, "Strategy timed out");
            }
        }
    }
    None
}
