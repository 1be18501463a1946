use std::sync::Arc;

use futures_util::future::join_all;
use watcher_core::{EpochMillis, Snapshots, UserSnapshot};
use watcher_logging::watcher_info;

use crate::adapter::{fetch_user, ListingEndpoint};
use crate::fetch::Fetcher;

/// Wall clock in epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> EpochMillis + Send + Sync>;

/// Fans one listing fetch out per watched user and joins every outcome.
///
/// Fetches run concurrently on the calling task; a slow or failing user never
/// cancels or delays the others. Persisting the result is the caller's job.
#[derive(Clone)]
pub struct RefreshEngine {
    fetcher: Arc<dyn Fetcher>,
    endpoint: ListingEndpoint,
    clock: Clock,
}

impl RefreshEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoint: ListingEndpoint, clock: Clock) -> Self {
        Self {
            fetcher,
            endpoint,
            clock,
        }
    }

    pub fn now(&self) -> EpochMillis {
        (self.clock)()
    }

    /// Returns exactly one snapshot per distinct username, all stamped with
    /// the time the join completed.
    pub async fn refresh_all<S: AsRef<str>>(&self, usernames: &[S]) -> Snapshots {
        let mut distinct: Vec<&str> = Vec::with_capacity(usernames.len());
        for name in usernames.iter().map(AsRef::as_ref) {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }

        let fetcher = self.fetcher.as_ref();
        let outcomes = join_all(
            distinct
                .iter()
                .map(|name| fetch_user(fetcher, &self.endpoint, name)),
        )
        .await;

        let stamped_at = self.now();
        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        watcher_info!(
            "Refreshed {} users ({} failed)",
            outcomes.len(),
            failed
        );

        outcomes
            .into_iter()
            .map(|outcome| {
                let username = outcome.username.clone();
                (username, UserSnapshot::from_outcome(outcome, stamped_at))
            })
            .collect()
    }
}
