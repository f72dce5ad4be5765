//! In-memory [`Fetcher`] for unit tests

use crate::crawler::{FetchError, FetchedPage, Fetcher, ProbeResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned bodies and records every request it receives
///
/// Unknown URLs answer 404. Bodies are served as `text/html` regardless of
/// content; the crawler never inspects the content type.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    timeouts: Vec<String>,
    redirects: HashMap<String, String>,
    fetch_log: Mutex<Vec<String>>,
    probe_log: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Makes every request to `url` answer with `status`
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    pub fn with_timeout(mut self, url: &str) -> Self {
        self.timeouts.push(url.to_string());
        self
    }

    /// Serves `target`'s body for `url`, reporting `target` as the final URL
    pub fn with_redirect(mut self, url: &str, target: &str) -> Self {
        self.redirects.insert(url.to_string(), target.to_string());
        self
    }

    /// Every GET in request order
    pub fn fetched(&self) -> Vec<String> {
        self.fetch_log.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetch_log
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    pub fn probe_count(&self, url: &str) -> usize {
        self.probe_log
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetch_log.lock().unwrap().push(url.to_string());

        if self.timeouts.iter().any(|u| u == url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }
        if let Some(&status) = self.statuses.get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = self.redirects.get(url).map(String::as_str).unwrap_or(url);
        match self.pages.get(final_url) {
            Some(body) => Ok(FetchedPage {
                final_url: final_url.to_string(),
                status: 200,
                content_type: Some("text/html".to_string()),
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn probe(&self, url: &str) -> Result<ProbeResponse, FetchError> {
        self.probe_log.lock().unwrap().push(url.to_string());

        if self.timeouts.iter().any(|u| u == url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }

        let status = match self.statuses.get(url) {
            Some(&status) => status,
            None if self.pages.contains_key(url) => 200,
            None => 404,
        };
        Ok(ProbeResponse {
            status,
            content_type: None,
        })
    }
}
