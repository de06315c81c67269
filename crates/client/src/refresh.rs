//! Periodic full-list refresh.
//!
//! A [`RefreshLoop`] is a scoped subscription: it fetches the full customer list
//! immediately, then again on every interval, replacing the store each time.
//! Dropping the loop (or calling [`RefreshLoop::stop`]) cancels the timer and any
//! tick still in flight.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, CustomerRemote};
use crate::store::CollectionStore;

/// Handle to a running refresh loop.
#[derive(Debug)]
pub struct RefreshLoop {
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl RefreshLoop {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start<R>(remote: R, store: CollectionStore, interval: Duration) -> Self
    where
        R: CustomerRemote + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let handle = tokio::spawn(run(remote, store, interval));

        info!(interval_ms = interval.as_millis(), "Refresh loop started");
        Self {
            handle: Some(handle),
            interval,
        }
    }

    /// Cancel the loop. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Refresh loop stopped");
        }
    }

    /// Whether the loop is still scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Interval between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<R: CustomerRemote>(remote: R, store: CollectionStore, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if store.is_closed() {
            debug!("Store closed, ending refresh loop");
            break;
        }
        // Failures are logged by refresh_once; the loop keeps its schedule.
        let _ = refresh_once(&remote, &store).await;
    }
}

/// Perform a single refresh tick.
///
/// On success the store is replaced with the fetched list and the number of
/// customers is returned. On failure the store keeps its last known contents.
///
/// # Errors
///
/// Returns the error from [`CustomerRemote::list`].
#[instrument(skip_all)]
pub async fn refresh_once<R: CustomerRemote>(
    remote: &R,
    store: &CollectionStore,
) -> Result<usize, ApiError> {
    match remote.list().await {
        Ok(customers) => {
            let count = customers.len();
            store.replace_all(customers);
            debug!(count, "Refresh tick applied");
            Ok(count)
        }
        Err(e) => {
            warn!(error = %e, "Refresh tick failed, keeping last known customers");
            Err(e)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::testing::{FakeRemote, customer};

    const INTERVAL: Duration = Duration::from_millis(3000);

    #[tokio::test]
    async fn test_refresh_once_replaces_store() {
        let remote = FakeRemote::with_customers(vec![customer(1, "Ana", "Souza")]);
        let store = CollectionStore::with_customers(vec![customer(7, "Old", "Entry")]);

        let count = refresh_once(&remote, &store).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.snapshot(), vec![customer(1, "Ana", "Souza")]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_prior_contents() {
        let remote = FakeRemote::default();
        remote.fail("list", ApiError::NoResponse("connection refused".to_string()));
        let store = CollectionStore::with_customers(vec![customer(7, "Old", "Entry")]);

        let result = refresh_once(&remote, &store).await;

        assert!(matches!(result, Err(ApiError::NoResponse(_))));
        assert_eq!(store.snapshot(), vec![customer(7, "Old", "Entry")]);
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_fetches_immediately_then_on_interval() {
        let remote = FakeRemote::with_customers(vec![customer(1, "Ana", "Souza")]);
        let store = CollectionStore::new();
        let refresh = RefreshLoop::start(remote.clone(), store.clone(), INTERVAL);

        sleep(Duration::from_millis(10)).await;
        assert_eq!(store.len(), 1);
        assert_eq!(remote.calls(), vec!["list"]);

        remote.set_customers(vec![customer(1, "Ana", "Souza"), customer(2, "Bia", "Lima")]);
        sleep(Duration::from_millis(3100)).await;
        assert_eq!(store.len(), 2);
        assert_eq!(remote.calls().len(), 2);
        assert!(refresh.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_survives_failed_ticks() {
        let remote = FakeRemote::with_customers(vec![customer(1, "Ana", "Souza")]);
        let store = CollectionStore::new();
        let _refresh = RefreshLoop::start(remote.clone(), store.clone(), INTERVAL);

        sleep(Duration::from_millis(10)).await;
        remote.fail("list", ApiError::NoResponse("timeout".to_string()));
        sleep(Duration::from_millis(3100)).await;
        assert_eq!(store.len(), 1);

        remote.recover("list");
        remote.set_customers(Vec::new());
        sleep(Duration::from_millis(3000)).await;
        assert!(store.is_empty());
        assert_eq!(remote.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let remote = FakeRemote::with_customers(vec![customer(1, "Ana", "Souza")]);
        let store = CollectionStore::new();
        let mut refresh = RefreshLoop::start(remote.clone(), store.clone(), INTERVAL);

        sleep(Duration::from_millis(10)).await;
        refresh.stop();
        refresh.stop();
        remote.set_customers(Vec::new());
        sleep(Duration::from_millis(10_000)).await;

        assert!(!refresh.is_running());
        assert_eq!(store.len(), 1);
        assert_eq!(remote.calls(), vec!["list"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_timer() {
        let remote = FakeRemote::with_customers(vec![customer(1, "Ana", "Souza")]);
        let store = CollectionStore::new();
        {
            let _refresh = RefreshLoop::start(remote.clone(), store.clone(), INTERVAL);
            sleep(Duration::from_millis(10)).await;
        }
        sleep(Duration::from_millis(10_000)).await;
        assert_eq!(remote.calls(), vec!["list"]);
    }
}
