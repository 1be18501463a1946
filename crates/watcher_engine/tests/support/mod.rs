#![allow(dead_code)]

pub const HEADER_ROW: &str = r#"<tr><th>Status</th><th>Rätsel</th><th>Gelöst</th><th>Bewertung</th></tr>"#;

/// Wraps rows in a listing page shaped like the portal's "eingestellt" page.
pub fn listing_page(rows: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Rätselportal</title></head>
<body>
<div class="leftcolumn"></div>
<table class="rp_raetselliste">
{HEADER_ROW}
{}
</table>
</body></html>"#,
        rows.join("\n")
    )
}

pub fn error_page() -> String {
    r#"<html><body><p class="rp_error">Benutzer existiert nicht.</p></body></html>"#.to_string()
}

/// A fully populated puzzle row.
pub fn puzzle_row(status: &str, id: &str, name: &str, description: &str) -> String {
    format!(
        r#"<tr>
  <td><img src="/Raetselportal/Bilder/{status}.png" title="{status}" alt="{status}"></td>
  <td><a href="/Raetselportal/Raetsel/zeigen.php?id={id}">{name}</a><br><span class="rp_von">{description}</span></td>
  <td> 17 </td>
  <td><img src="/Raetselportal/Bilder/schwierigkeit3.png" alt="3" title="mittel"> <span>4.2</span></td>
</tr>"#
    )
}

/// A row whose rating cell has neither difficulty icon nor rating text.
pub fn bare_row(status: &str, id: &str, name: &str) -> String {
    format!(
        r#"<tr>
  <td><img src="/s.png" title="{status}"></td>
  <td><a href="/Raetselportal/Raetsel/zeigen.php?id={id}">{name}</a></td>
  <td>0</td>
  <td></td>
</tr>"#
    )
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use watcher_engine::{Clock, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher};

/// In-process portal keyed by username. Unknown users get a transport error.
#[derive(Default)]
pub struct FakePortal {
    pages: HashMap<String, (u16, String, Duration)>,
    pub requests: AtomicUsize,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, username: &str, status: u16, body: String) -> Self {
        self.pages
            .insert(username.to_string(), (status, body, Duration::ZERO));
        self
    }

    pub fn slow_page(mut self, username: &str, body: String, delay: Duration) -> Self {
        self.pages.insert(username.to_string(), (200, body, delay));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for FakePortal {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let parsed = url::Url::parse(url).map_err(|e| FetchError::new(FailureKind::InvalidUrl, e.to_string()))?;
        let username = parsed
            .query_pairs()
            .find(|(k, _)| k == "name")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        let Some((status, body, delay)) = self.pages.get(&username).cloned() else {
            return Err(FetchError::new(FailureKind::Network, "connection refused"));
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(FetchOutput {
            status,
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: body.len() as u64,
            },
            bytes: body.into_bytes(),
        })
    }
}

/// Settable clock for deterministic timestamps.
#[derive(Clone, Default)]
pub struct ManualClock(Arc<Mutex<i64>>);

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self(Arc::new(Mutex::new(ms)))
    }

    pub fn set(&self, ms: i64) {
        *self.0.lock().unwrap() = ms;
    }

    pub fn clock(&self) -> Clock {
        let inner = self.0.clone();
        Arc::new(move || *inner.lock().unwrap())
    }
}
