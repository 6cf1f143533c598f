//! Pending-answer reaper: periodically drops deferred answers nobody came
//! back for, so abandoned sessions cannot grow the registry without bound.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::pending::PendingAnswers;

/// Start a background loop evicting entries older than `ttl` every `every`.
pub fn spawn_pending_reaper(
    pending: PendingAnswers,
    ttl: Duration,
    every: Duration,
) -> JoinHandle<()> {
    info!(ttl_secs = ttl.as_secs(), every_secs = every.as_secs(), "Starting pending-answer reaper");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            pending.evict_expired(ttl).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reaper_evicts_abandoned_answers() {
        let pending = PendingAnswers::new();
        pending
            .spawn("s:1".into(), "s", async { Ok("unclaimed".to_string()) })
            .await;

        let reaper = spawn_pending_reaper(
            pending.clone(),
            Duration::from_secs(60),
            Duration::from_secs(10),
        );

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(pending.len().await, 1);

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(pending.len().await, 0);

        reaper.abort();
    }
}
