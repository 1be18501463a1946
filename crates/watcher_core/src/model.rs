use std::fmt;

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Collapsed status marker of a listed puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleStatus {
    New,
    Unsolved,
}

/// One puzzle appearing on a user's listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    pub name: String,
    /// Relative URL exactly as it appears in the listing.
    pub link: String,
    pub status: PuzzleStatus,
    /// Display text; the portal formats it, so it is not parsed.
    #[serde(rename = "solved")]
    pub solved_count: String,
    pub difficulty: String,
    pub difficulty_title: String,
    pub rating: String,
}

impl PuzzleRecord {
    pub const UNKNOWN_DIFFICULTY: &'static str = "?";
    pub const NO_RATING: &'static str = "N/A";
}

/// Per-user failure of a fetch. Never fatal for a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "User does not exist")]
    UserNotFound,
    #[serde(rename = "Failed to parse puzzle data")]
    ParseError,
    #[serde(rename = "Network error")]
    NetworkError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UserNotFound => write!(f, "User does not exist"),
            ErrorKind::ParseError => write!(f, "Failed to parse puzzle data"),
            ErrorKind::NetworkError => write!(f, "Network error"),
        }
    }
}

/// Result of fetching one user's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOutcome {
    pub username: String,
    pub puzzles: Vec<PuzzleRecord>,
    pub error: Option<ErrorKind>,
}

impl UserOutcome {
    pub fn loaded(username: impl Into<String>, puzzles: Vec<PuzzleRecord>) -> Self {
        Self {
            username: username.into(),
            puzzles,
            error: None,
        }
    }

    pub fn failed(username: impl Into<String>, error: ErrorKind) -> Self {
        Self {
            username: username.into(),
            puzzles: Vec::new(),
            error: Some(error),
        }
    }
}

/// Last known state for one watched user. The username is the key of the
/// snapshot mapping.
///
/// Puzzles and error are mutually exclusive: a failed snapshot never carries
/// puzzles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    puzzles: Vec<PuzzleRecord>,
    error: Option<ErrorKind>,
    last_update: EpochMillis,
}

impl UserSnapshot {
    pub fn loaded(puzzles: Vec<PuzzleRecord>, last_update: EpochMillis) -> Self {
        Self {
            puzzles,
            error: None,
            last_update,
        }
    }

    pub fn failed(error: ErrorKind, last_update: EpochMillis) -> Self {
        Self {
            puzzles: Vec::new(),
            error: Some(error),
            last_update,
        }
    }

    pub fn from_outcome(outcome: UserOutcome, last_update: EpochMillis) -> Self {
        match outcome.error {
            Some(error) => Self::failed(error, last_update),
            None => Self::loaded(outcome.puzzles, last_update),
        }
    }

    pub fn puzzles(&self) -> &[PuzzleRecord] {
        &self.puzzles
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn last_update(&self) -> EpochMillis {
        self.last_update
    }

    /// Restores the puzzles/error exclusivity on data read from storage.
    pub(crate) fn normalized(mut self) -> Self {
        if self.error.is_some() {
            self.puzzles.clear();
        }
        self
    }
}
