mod support;

use pretty_assertions::assert_eq;
use support::{bare_row, error_page, listing_page, puzzle_row};
use watcher_engine::{parse_listing, ListingError};
use watcher_core::{PuzzleRecord, PuzzleStatus};

#[test]
fn keeps_new_row_without_solved_phrase_and_drops_solved_one() {
    let html = listing_page(&[
        puzzle_row("neu", "000A", "Alice's Sudoku", "von alice"),
        puzzle_row("neu", "000B", "Bob's Kakuro", "von bob (gelöst am 2024-01-01)"),
    ]);

    let puzzles = parse_listing(&html).unwrap();
    assert_eq!(
        puzzles,
        vec![PuzzleRecord {
            name: "Alice's Sudoku".to_string(),
            link: "/Raetselportal/Raetsel/zeigen.php?id=000A".to_string(),
            status: PuzzleStatus::New,
            solved_count: "17".to_string(),
            difficulty: "3".to_string(),
            difficulty_title: "mittel".to_string(),
            rating: "4.2".to_string(),
        }]
    );
}

#[test]
fn header_row_is_never_a_record() {
    // A header that happens to look like a puzzle row is still skipped.
    let html = format!(
        r#"<table class="rp_raetselliste">{}{}</table>"#,
        puzzle_row("neu", "HEAD", "Header", ""),
        puzzle_row("neu", "0001", "Body", ""),
    );
    let names: Vec<_> = parse_listing(&html)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Body".to_string()]);
}

#[test]
fn solved_phrases_are_case_insensitive_in_both_languages() {
    let html = listing_page(&[
        puzzle_row("new", "0001", "One", "by carol (Solved today)"),
        puzzle_row("new", "0002", "Two", "by carol (Solved on 2024-02-02)"),
        puzzle_row("neu", "0003", "Three", "von carol (Gelöst heute)"),
        puzzle_row("new", "0004", "Four", "by carol"),
    ]);
    let names: Vec<_> = parse_listing(&html)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Four".to_string()]);
}

#[test]
fn unsolved_rows_are_kept_regardless_of_description() {
    let html = listing_page(&[
        puzzle_row("ungeloest", "0001", "Eins", "von dave (gelöst am 2024-01-01)"),
        puzzle_row("unsolved", "0002", "Two", "by dave"),
        puzzle_row("geloest", "0003", "Drei", "von dave"),
    ]);
    let puzzles = parse_listing(&html).unwrap();
    assert_eq!(puzzles.len(), 2);
    assert!(puzzles.iter().all(|p| p.status == PuzzleStatus::Unsolved));
    assert_eq!(puzzles[0].name, "Eins");
    assert_eq!(puzzles[1].name, "Two");
}

#[test]
fn missing_optional_fields_use_placeholders() {
    let html = listing_page(&[bare_row("neu", "0009", "Plain")]);
    let puzzles = parse_listing(&html).unwrap();
    assert_eq!(puzzles.len(), 1);
    assert_eq!(puzzles[0].difficulty, "?");
    assert_eq!(puzzles[0].difficulty_title, "");
    assert_eq!(puzzles[0].rating, "N/A");
    assert_eq!(puzzles[0].solved_count, "0");
}

#[test]
fn malformed_rows_are_skipped_silently() {
    let html = listing_page(&[
        // Advertisement row with too few cells.
        r#"<tr><td colspan="4"><a href="/werbung">Anzeige</a></td></tr>"#.to_string(),
        // No status icon.
        r#"<tr><td></td><td><a href="/x">No marker</a></td><td>1</td><td></td></tr>"#.to_string(),
        // No link.
        r#"<tr><td><img title="neu"></td><td>No link</td><td>1</td><td></td></tr>"#.to_string(),
        puzzle_row("neu", "0005", "Kept", "von erin"),
    ]);
    let puzzles = parse_listing(&html).unwrap();
    assert_eq!(puzzles.len(), 1);
    assert_eq!(puzzles[0].name, "Kept");
}

#[test]
fn output_preserves_document_order() {
    let html = listing_page(&[
        puzzle_row("unsolved", "0003", "C", ""),
        puzzle_row("neu", "0001", "A", ""),
        puzzle_row("new", "0002", "B", ""),
    ]);
    let names: Vec<_> = parse_listing(&html)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[test]
fn error_marker_means_user_not_found() {
    assert_eq!(parse_listing(&error_page()), Err(ListingError::UserNotFound));
}

#[test]
fn page_without_listing_table_has_no_puzzles() {
    let html = "<html><body><p>Noch keine Rätsel eingestellt.</p></body></html>";
    assert_eq!(parse_listing(html), Ok(Vec::new()));
}
