use std::time::Duration;

use async_trait::async_trait;

use crate::application::BackoffSleeper;

/// Waits on the tokio timer; other tasks keep running meanwhile.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl BackoffSleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
