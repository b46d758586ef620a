// file: src/registration/scheduler.rs
// version: 1.0.0
// guid: 727a5bb6-d8ac-4bca-aa0f-ee0ef5034509

//! Delays between workflow attempts.

use std::time::Duration;

/// Suspends the workflow between attempts without blocking a thread
#[async_trait::async_trait]
pub trait Scheduler: Send + Sync {
    async fn after(&self, delay: Duration);
}

/// Real timer backed by `tokio::time`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait::async_trait]
impl Scheduler for TokioScheduler {
    async fn after(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
