use std::collections::BTreeMap;

use crate::model::{EpochMillis, UserSnapshot};
use crate::view_model::WatchView;

/// Snapshot mapping keyed by username.
pub type Snapshots = BTreeMap<String, UserSnapshot>;

/// The durable aggregate: watched users, their last snapshots, and the time
/// of the last completed refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchState {
    favorites: Vec<String>,
    snapshots: Snapshots,
    last_check_at: EpochMillis,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the aggregate from persisted parts. Duplicate favorites are
    /// dropped keeping the first occurrence.
    pub fn from_parts(
        favorites: Vec<String>,
        snapshots: Snapshots,
        last_check_at: EpochMillis,
    ) -> Self {
        let mut state = Self {
            favorites: Vec::with_capacity(favorites.len()),
            snapshots: Snapshots::new(),
            last_check_at,
        };
        for name in favorites {
            state.add_favorite(&name);
        }
        state.replace_snapshots(snapshots);
        state
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn snapshots(&self) -> &Snapshots {
        &self.snapshots
    }

    pub fn last_check_at(&self) -> EpochMillis {
        self.last_check_at
    }

    pub fn is_favorite(&self, username: &str) -> bool {
        self.favorites.iter().any(|name| name == username)
    }

    /// Appends `username` to the watch list. Returns `false` when it is
    /// already present.
    pub fn add_favorite(&mut self, username: &str) -> bool {
        if self.is_favorite(username) {
            return false;
        }
        self.favorites.push(username.to_string());
        true
    }

    /// Removes `username` and any snapshot stored under it. Returns `false`
    /// when it was not watched; a stray snapshot is dropped either way.
    pub fn remove_favorite(&mut self, username: &str) -> bool {
        self.snapshots.remove(username);
        let Some(index) = self.favorites.iter().position(|name| name == username) else {
            return false;
        };
        self.favorites.remove(index);
        true
    }

    /// Replaces the whole snapshot mapping.
    pub fn replace_snapshots(&mut self, snapshots: Snapshots) {
        self.snapshots = snapshots;
    }

    pub fn set_last_check_at(&mut self, at: EpochMillis) {
        self.last_check_at = at;
    }

    /// Applies the result of a refresh cycle. Entries for users removed while
    /// the cycle was in flight are dropped.
    pub fn complete_refresh(&mut self, snapshots: Snapshots, at: EpochMillis) {
        let favorites = &self.favorites;
        self.snapshots = snapshots
            .into_iter()
            .filter(|(name, _)| favorites.iter().any(|fav| fav == name))
            .collect();
        self.last_check_at = at;
    }

    pub fn view(&self) -> WatchView {
        WatchView::from_state(self)
    }
}
