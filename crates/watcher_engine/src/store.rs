use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use watcher_core::codec::{
    self, check_version, decode_favorites, decode_last_check, decode_snapshots,
    encode_favorites, encode_last_check, encode_snapshots, encode_version,
};
use watcher_core::{CodecError, EpochMillis, Snapshots, WatchState};
use watcher_logging::{watcher_debug, watcher_info};

use crate::repository::{RepositoryError, StateKey, StateRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Durable watch state on top of a [`StateRepository`].
///
/// Every operation holds one lock for its whole read-modify-write, so
/// concurrent callers never interleave partial updates.
pub struct WatchStore<R> {
    repo: R,
    lock: Mutex<()>,
}

impl<R: StateRepository> WatchStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            lock: Mutex::new(()),
        }
    }

    /// Creates the store and seeds missing entries.
    pub fn open(repo: R) -> Result<Self, StoreError> {
        let store = Self::new(repo);
        store.init()?;
        Ok(store)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Seeds absent entries with empty defaults. Present entries are kept.
    pub fn init(&self) -> Result<(), StoreError> {
        let _guard = self.guard();
        let version = self.repo.load(StateKey::SchemaVersion)?;
        check_version(version.as_deref())?;

        if self.repo.load(StateKey::Favorites)?.is_none() {
            self.repo.save(StateKey::Favorites, &encode_favorites(&[])?)?;
        }
        if self.repo.load(StateKey::Snapshots)?.is_none() {
            self.repo
                .save(StateKey::Snapshots, &encode_snapshots(&Snapshots::new())?)?;
        }
        if version.is_none() {
            self.repo.save(StateKey::SchemaVersion, &encode_version()?)?;
        }
        watcher_debug!("Watch store initialized (schema v{})", codec::SCHEMA_VERSION);
        Ok(())
    }

    pub fn state(&self) -> Result<WatchState, StoreError> {
        let _guard = self.guard();
        self.load_state()
    }

    pub fn favorites(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.guard();
        self.load_favorites()
    }

    pub fn snapshots(&self) -> Result<Snapshots, StoreError> {
        let _guard = self.guard();
        self.load_snapshots()
    }

    pub fn last_check_at(&self) -> Result<EpochMillis, StoreError> {
        let _guard = self.guard();
        self.load_last_check()
    }

    /// Appends a user to the watch list. Returns `false` if already watched.
    pub fn add_favorite(&self, username: &str) -> Result<bool, StoreError> {
        let username = normalize(username)?;
        let _guard = self.guard();
        let mut state = self.load_state()?;
        if !state.add_favorite(username) {
            return Ok(false);
        }
        self.save_favorites(&state)?;
        watcher_info!("Watching {}", username);
        Ok(true)
    }

    /// Stops watching a user and drops their snapshot in the same
    /// transaction. Returns `false` if the user was not watched; a snapshot
    /// stored under that name is still removed.
    ///
    /// Snapshots are written before favorites: if the second write fails,
    /// the user stays watched with no snapshot, which the next refresh fills.
    pub fn remove_favorite(&self, username: &str) -> Result<bool, StoreError> {
        let username = normalize(username)?;
        let _guard = self.guard();
        let mut state = self.load_state()?;
        let had_snapshot = state.snapshots().contains_key(username);
        let was_watched = state.remove_favorite(username);
        if had_snapshot {
            self.save_snapshots(&state)?;
        }
        if !was_watched {
            return Ok(false);
        }
        self.save_favorites(&state)?;
        watcher_info!("Stopped watching {}", username);
        Ok(true)
    }

    pub fn replace_snapshots(&self, snapshots: Snapshots) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut state = self.load_state()?;
        state.replace_snapshots(snapshots);
        self.save_snapshots(&state)
    }

    pub fn set_last_check_at(&self, at: EpochMillis) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.repo.save(StateKey::LastCheck, &encode_last_check(at)?)?;
        Ok(())
    }

    /// Stores the result of a refresh cycle and its completion time together.
    /// Users removed while the cycle ran stay removed.
    pub fn commit_refresh(&self, snapshots: Snapshots, at: EpochMillis) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut state = self.load_state()?;
        state.complete_refresh(snapshots, at);
        self.save_snapshots(&state)?;
        self.repo
            .save(StateKey::LastCheck, &encode_last_check(state.last_check_at())?)?;
        Ok(())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load_state(&self) -> Result<WatchState, StoreError> {
        Ok(WatchState::from_parts(
            self.load_favorites()?,
            self.load_snapshots()?,
            self.load_last_check()?,
        ))
    }

    fn load_favorites(&self) -> Result<Vec<String>, StoreError> {
        match self.repo.load(StateKey::Favorites)? {
            Some(raw) => Ok(decode_favorites(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn load_snapshots(&self) -> Result<Snapshots, StoreError> {
        match self.repo.load(StateKey::Snapshots)? {
            Some(raw) => Ok(decode_snapshots(&raw)?),
            None => Ok(Snapshots::new()),
        }
    }

    fn load_last_check(&self) -> Result<EpochMillis, StoreError> {
        match self.repo.load(StateKey::LastCheck)? {
            Some(raw) => Ok(decode_last_check(&raw)?),
            None => Ok(0),
        }
    }

    fn save_favorites(&self, state: &WatchState) -> Result<(), StoreError> {
        self.repo
            .save(StateKey::Favorites, &encode_favorites(state.favorites())?)?;
        Ok(())
    }

    fn save_snapshots(&self, state: &WatchState) -> Result<(), StoreError> {
        self.repo
            .save(StateKey::Snapshots, &encode_snapshots(state.snapshots())?)?;
        Ok(())
    }
}

fn normalize(username: &str) -> Result<&str, StoreError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        Err(StoreError::EmptyUsername)
    } else {
        Ok(trimmed)
    }
}
