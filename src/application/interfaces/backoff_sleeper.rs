use std::time::Duration;

use async_trait::async_trait;

/// Suspends the retry loop between attempts.
#[async_trait]
pub trait BackoffSleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}
