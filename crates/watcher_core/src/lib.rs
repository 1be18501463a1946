//! Puzzle watcher core: data model, watch-state aggregate, refresh gate, and
//! persisted-entry codec. No IO happens here.
pub mod codec;
mod model;
pub mod schedule;
mod state;
mod view_model;

pub use codec::{CodecError, SCHEMA_VERSION};
pub use model::{EpochMillis, ErrorKind, PuzzleRecord, PuzzleStatus, UserOutcome, UserSnapshot};
pub use schedule::{
    is_auto_refresh_due, RefreshPolicy, CHECK_INTERVAL, DAILY_CHECK_INTERVAL,
};
pub use state::{Snapshots, WatchState};
pub use view_model::{UserRowView, UserStatusView, WatchView};
