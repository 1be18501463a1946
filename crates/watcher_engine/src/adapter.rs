use thiserror::Error;
use url::Url;
use watcher_core::{ErrorKind, UserOutcome};
use watcher_logging::{watcher_debug, watcher_warn};

use crate::decode::decode_body;
use crate::fetch::Fetcher;
use crate::listing::{parse_listing, ListingError};

pub const DEFAULT_BASE_URL: &str = "https://logic-masters.de/Raetselportal";
const LISTING_PATH: &str = "Benutzer/eingestellt.php";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid portal base url {url:?}: {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("portal base url {0:?} cannot carry a path")]
    NotHierarchical(String),
}

/// Builds per-user listing URLs below the portal base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEndpoint {
    listing: Url,
}

impl ListingEndpoint {
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        let joined = format!("{}/{LISTING_PATH}", base_url.trim_end_matches('/'));
        let listing = Url::parse(&joined).map_err(|source| EndpointError::InvalidBase {
            url: base_url.to_string(),
            source,
        })?;
        if listing.cannot_be_a_base() {
            return Err(EndpointError::NotHierarchical(base_url.to_string()));
        }
        Ok(Self { listing })
    }

    /// `{base}/Benutzer/eingestellt.php?name={username}`, username encoded.
    pub fn user_url(&self, username: &str) -> String {
        let mut url = self.listing.clone();
        url.query_pairs_mut().clear().append_pair("name", username);
        url.into()
    }
}

/// Fetches and parses one user's listing. Every failure is folded into the
/// returned outcome.
pub async fn fetch_user(
    fetcher: &dyn Fetcher,
    endpoint: &ListingEndpoint,
    username: &str,
) -> UserOutcome {
    let url = endpoint.user_url(username);
    watcher_debug!("Fetching listing for {} from {}", username, url);

    let output = match fetcher.fetch(&url).await {
        Ok(output) => output,
        Err(err) => {
            watcher_warn!("Transport failure for {}: {}", username, err);
            return UserOutcome::failed(username, ErrorKind::NetworkError);
        }
    };

    if output.status != 200 {
        watcher_warn!("Listing for {} returned status {}", username, output.status);
        return UserOutcome::failed(username, ErrorKind::UserNotFound);
    }

    let html = match decode_body(&output.bytes, output.metadata.content_type.as_deref()) {
        Ok(html) => html,
        Err(err) => {
            watcher_warn!("Undecodable listing for {}: {}", username, err);
            return UserOutcome::failed(username, ErrorKind::ParseError);
        }
    };

    match parse_listing(&html) {
        Ok(puzzles) => {
            watcher_debug!("{} open puzzles for {}", puzzles.len(), username);
            UserOutcome::loaded(username, puzzles)
        }
        Err(ListingError::UserNotFound) => {
            watcher_warn!("Portal has no user named {}", username);
            UserOutcome::failed(username, ErrorKind::UserNotFound)
        }
        Err(err) => {
            watcher_warn!("Unrecognized listing for {}: {}", username, err);
            UserOutcome::failed(username, ErrorKind::ParseError)
        }
    }
}
