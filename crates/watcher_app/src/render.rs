use std::fmt::Write;

use chrono::DateTime;
use watcher_core::{EpochMillis, PuzzleRecord, UserStatusView, WatchView};
use watcher_engine::ListingEndpoint;

/// Renders the watch list; each username is followed by its listing URL.
pub fn render_view(view: &WatchView, endpoint: &ListingEndpoint) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Puzzle Watcher (last check: {})", format_time(view.last_check_at));

    if view.is_empty() {
        out.push_str("No users being watched.\n");
        return out;
    }

    for user in &view.users {
        let _ = writeln!(out, "\n{} <{}>", user.username, endpoint.user_url(&user.username));
        match &user.status {
            UserStatusView::NotChecked => out.push_str("  Not checked yet...\n"),
            UserStatusView::Failed(kind) => {
                let _ = writeln!(out, "  {kind}");
            }
            UserStatusView::NoNewPuzzles => out.push_str("  No new puzzles\n"),
            UserStatusView::Puzzles(puzzles) => {
                for puzzle in puzzles {
                    let _ = writeln!(out, "  {}", puzzle_line(puzzle));
                }
            }
        }
    }
    out
}

fn puzzle_line(puzzle: &PuzzleRecord) -> String {
    format!(
        "{} (Level {}, {}, {} solved) {}",
        puzzle.name, puzzle.difficulty, puzzle.rating, puzzle.solved_count, puzzle.link
    )
}

fn format_time(at: EpochMillis) -> String {
    if at <= 0 {
        return "never".to_string();
    }
    DateTime::from_timestamp_millis(at)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| at.to_string())
}
