//! Cron jobs for periodic tasks

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::stores::SessionStore;

/// Shortest allowed gap between session sweeps
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Start all cron jobs
pub fn start_cron_jobs(sessions: Arc<SessionStore>, sweep_interval: Duration) {
    let sweep_interval = clamp_interval(sweep_interval);

    // Idle session sweep
    tokio::spawn(async move {
        let mut interval = time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sweep_sessions(&sessions);
        }
    });
}

/// `tokio::time::interval` panics on a zero period
fn clamp_interval(every: Duration) -> Duration {
    if every.is_zero() {
        tracing::warn!(
            "Session sweep interval of 0s is not allowed, using {}s",
            MIN_SWEEP_INTERVAL.as_secs()
        );
        return MIN_SWEEP_INTERVAL;
    }
    every
}

/// Drop sessions that have been idle longer than the store's ttl
fn sweep_sessions(sessions: &SessionStore) {
    let removed = sessions.purge_expired();
    if removed > 0 {
        tracing::info!("Session sweep removed {} idle sessions", removed);
    } else {
        tracing::debug!("Session sweep found nothing to remove");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_removes_idle_sessions() {
        let sessions = Arc::new(SessionStore::new(-1));
        sessions.create();
        sessions.create();
        assert_eq!(sessions.len(), 2);

        start_cron_jobs(Arc::clone(&sessions), Duration::from_millis(10));
        time::sleep(Duration::from_millis(50)).await;

        assert!(sessions.is_empty());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        assert_eq!(clamp_interval(Duration::ZERO), MIN_SWEEP_INTERVAL);
        assert_eq!(clamp_interval(Duration::from_millis(10)), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_zero_interval_still_sweeps() {
        let sessions = Arc::new(SessionStore::new(-1));
        sessions.create();

        start_cron_jobs(Arc::clone(&sessions), Duration::ZERO);
        // first tick fires immediately
        time::sleep(Duration::from_millis(50)).await;

        assert!(sessions.is_empty());
    }
}
