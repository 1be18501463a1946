//! Listing page parser.
//!
//! Reads the portal's per-user "eingestellt" page and keeps the puzzles that
//! are new and not yet solved, or explicitly unsolved. German and English
//! localizations of the page are both recognized.
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use watcher_core::{PuzzleRecord, PuzzleStatus};

const ERROR_MARKER: &str = "p.rp_error";
const LISTING_ROWS: &str = "table.rp_raetselliste tr";

const NEW_MARKERS: [&str; 2] = ["neu", "new"];
const UNSOLVED_MARKERS: [&str; 2] = ["ungeloest", "unsolved"];

/// Phrases in a (lower-cased) row description showing the viewer already
/// solved the puzzle.
const SOLVED_PHRASES: [&str; 4] = ["gelöst am", "gelöst heute", "solved on", "solved today"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("portal reported that the user does not exist")]
    UserNotFound,
    #[error("invalid selector {0:?}")]
    Selector(&'static str),
}

struct Selectors {
    error_marker: Selector,
    rows: Selector,
    cell: Selector,
    img: Selector,
    anchor: Selector,
    span: Selector,
}

impl Selectors {
    fn new() -> Result<Self, ListingError> {
        let parse = |css: &'static str| Selector::parse(css).map_err(|_| ListingError::Selector(css));
        Ok(Self {
            error_marker: parse(ERROR_MARKER)?,
            rows: parse(LISTING_ROWS)?,
            cell: parse("td")?,
            img: parse("img")?,
            anchor: parse("a")?,
            span: parse("span")?,
        })
    }
}

/// Parses a listing page into the puzzles worth surfacing, in page order.
pub fn parse_listing(html: &str) -> Result<Vec<PuzzleRecord>, ListingError> {
    let selectors = Selectors::new()?;
    let doc = Html::parse_document(html);

    if doc.select(&selectors.error_marker).next().is_some() {
        return Err(ListingError::UserNotFound);
    }

    // First row is the table header.
    Ok(doc
        .select(&selectors.rows)
        .skip(1)
        .filter_map(|row| parse_row(row, &selectors))
        .collect())
}

fn parse_row(row: ElementRef<'_>, selectors: &Selectors) -> Option<PuzzleRecord> {
    let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();
    if cells.len() < 4 {
        return None;
    }

    let marker = cells[0]
        .select(&selectors.img)
        .next()
        .and_then(|img| img.value().attr("title"));
    let anchor = cells[1].select(&selectors.anchor).next();
    let (marker, anchor) = (marker?, anchor?);
    let link = anchor.value().attr("href")?;

    let description = cells[1]
        .select(&selectors.span)
        .next()
        .map(|span| text_of(span).to_lowercase())
        .unwrap_or_default();
    let status = classify(marker, &description)?;

    let difficulty_img = cells[3].select(&selectors.img).next();
    let rating = cells[3].select(&selectors.span).next().map(text_of);

    Some(PuzzleRecord {
        name: text_of(anchor),
        link: link.to_string(),
        status,
        solved_count: text_of(cells[2]),
        difficulty: difficulty_img
            .and_then(|img| img.value().attr("alt"))
            .unwrap_or(PuzzleRecord::UNKNOWN_DIFFICULTY)
            .to_string(),
        difficulty_title: difficulty_img
            .and_then(|img| img.value().attr("title"))
            .unwrap_or_default()
            .to_string(),
        rating: rating.unwrap_or_else(|| PuzzleRecord::NO_RATING.to_string()),
    })
}

/// Inclusion policy. `None` means the row is filtered out.
fn classify(marker: &str, description: &str) -> Option<PuzzleStatus> {
    if UNSOLVED_MARKERS.contains(&marker) {
        return Some(PuzzleStatus::Unsolved);
    }
    if NEW_MARKERS.contains(&marker) && !mentions_solved(description) {
        return Some(PuzzleStatus::New);
    }
    None
}

fn mentions_solved(description: &str) -> bool {
    SOLVED_PHRASES
        .iter()
        .any(|phrase| description.contains(phrase))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{classify, mentions_solved};
    use watcher_core::PuzzleStatus;

    #[test]
    fn each_solved_phrase_counts_on_its_own() {
        assert!(mentions_solved("von bob (gelöst am 2024-01-01)"));
        assert!(mentions_solved("von bob (gelöst heute)"));
        assert!(mentions_solved("by bob (solved on 2024-01-01)"));
        assert!(mentions_solved("by bob (solved today)"));
        assert!(!mentions_solved("von alice"));
    }

    #[test]
    fn new_marker_language_does_not_restrict_phrases() {
        assert_eq!(classify("neu", "by bob (solved today)"), None);
        assert_eq!(classify("new", "von bob (gelöst am 1.1.)"), None);
        assert_eq!(classify("new", "by alice"), Some(PuzzleStatus::New));
    }

    #[test]
    fn unsolved_ignores_description() {
        assert_eq!(
            classify("ungeloest", "gelöst am 2024-01-01"),
            Some(PuzzleStatus::Unsolved)
        );
        assert_eq!(classify("unsolved", ""), Some(PuzzleStatus::Unsolved));
    }

    #[test]
    fn other_markers_are_dropped() {
        assert_eq!(classify("geloest", ""), None);
        assert_eq!(classify("Neu", ""), None);
    }
}
