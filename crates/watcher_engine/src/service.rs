use tokio::sync::Mutex;
use watcher_core::{RefreshPolicy, Snapshots, WatchView};
use watcher_logging::{watcher_debug, watcher_info};

use crate::orchestrator::RefreshEngine;
use crate::repository::StateRepository;
use crate::store::{StoreError, WatchStore};

/// Surface handed to the view layer: reads, watch-list edits, and refresh
/// cycles that persist their results.
///
/// Refresh cycles are serialized. An automatic refresh waiting behind a manual
/// one re-checks the gate once it gets its turn.
pub struct Watcher<R> {
    store: WatchStore<R>,
    engine: RefreshEngine,
    policy: RefreshPolicy,
    cycle: Mutex<()>,
}

impl<R: StateRepository> Watcher<R> {
    pub fn new(store: WatchStore<R>, engine: RefreshEngine, policy: RefreshPolicy) -> Self {
        Self {
            store,
            engine,
            policy,
            cycle: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &WatchStore<R> {
        &self.store
    }

    pub fn favorites(&self) -> Result<Vec<String>, StoreError> {
        self.store.favorites()
    }

    pub fn snapshots(&self) -> Result<Snapshots, StoreError> {
        self.store.snapshots()
    }

    pub fn view(&self) -> Result<WatchView, StoreError> {
        Ok(self.store.state()?.view())
    }

    pub fn add_favorite(&self, username: &str) -> Result<bool, StoreError> {
        self.store.add_favorite(username)
    }

    pub fn remove_favorite(&self, username: &str) -> Result<bool, StoreError> {
        self.store.remove_favorite(username)
    }

    /// Manual refresh: always runs.
    pub async fn refresh_all(&self) -> Result<Snapshots, StoreError> {
        let _cycle = self.cycle.lock().await;
        self.run_cycle().await
    }

    /// Automatic refresh: runs only when the gate is open. `None` when
    /// skipped.
    pub async fn refresh_if_due(&self) -> Result<Option<Snapshots>, StoreError> {
        let _cycle = self.cycle.lock().await;
        let now = self.engine.now();
        let last_check_at = self.store.last_check_at()?;
        if !self.policy.is_due(now, last_check_at) {
            watcher_debug!(
                "Automatic refresh not due (last check {} ms ago)",
                now.saturating_sub(last_check_at)
            );
            return Ok(None);
        }
        self.run_cycle().await.map(Some)
    }

    async fn run_cycle(&self) -> Result<Snapshots, StoreError> {
        let favorites = self.store.favorites()?;
        watcher_info!("Refreshing {} watched users", favorites.len());
        let snapshots = self.engine.refresh_all(&favorites).await;
        self.store.commit_refresh(snapshots, self.engine.now())?;
        self.store.snapshots()
    }
}
