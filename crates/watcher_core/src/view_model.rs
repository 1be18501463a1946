use crate::model::{EpochMillis, ErrorKind, PuzzleRecord};
use crate::state::WatchState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchView {
    pub users: Vec<UserRowView>,
    pub last_check_at: EpochMillis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRowView {
    pub username: String,
    pub status: UserStatusView,
    pub last_update: Option<EpochMillis>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStatusView {
    NotChecked,
    Failed(ErrorKind),
    NoNewPuzzles,
    Puzzles(Vec<PuzzleRecord>),
}

impl WatchView {
    /// One row per watched user, in watch-list order.
    pub fn from_state(state: &WatchState) -> Self {
        let users = state
            .favorites()
            .iter()
            .map(|username| {
                let snapshot = state.snapshots().get(username);
                let status = match snapshot {
                    None => UserStatusView::NotChecked,
                    Some(s) => match s.error() {
                        Some(kind) => UserStatusView::Failed(kind),
                        None if s.puzzles().is_empty() => UserStatusView::NoNewPuzzles,
                        None => UserStatusView::Puzzles(s.puzzles().to_vec()),
                    },
                };
                UserRowView {
                    username: username.clone(),
                    status,
                    last_update: snapshot.map(|s| s.last_update()),
                }
            })
            .collect();

        Self {
            users,
            last_check_at: state.last_check_at(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
