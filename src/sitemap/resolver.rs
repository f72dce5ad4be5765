use crate::crawler::Fetcher;
use crate::sitemap::{is_remote, parse_sitemap, SeedEntry, SitemapDocument, SitemapError};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

/// Resolves sitemap sources into seed entries
///
/// The resolver remembers every sitemap location it has started processing,
/// across all calls to [`resolve`](Self::resolve). A location is never loaded
/// twice, which bounds recursion through sitemap indexes that reference
/// themselves or each other.
#[derive(Debug, Default)]
pub struct SitemapResolver {
    processed: HashSet<String>,
}

impl SitemapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `location` has already been processed
    pub fn is_processed(&self, location: &str) -> bool {
        self.processed.contains(location)
    }

    /// Number of distinct sitemap locations processed so far
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Resolves a sitemap source into its seed entries
    ///
    /// `source` may be a local file path or an http(s) URL. Index documents
    /// are expanded depth-first and child results are concatenated in index
    /// order.
    ///
    /// Failures are isolated: a source that cannot be loaded or parsed is
    /// logged and contributes no entries, while its siblings in the same
    /// index are still resolved. An already processed source also yields an
    /// empty list.
    pub async fn resolve<F: Fetcher + ?Sized>(
        &mut self,
        fetcher: &F,
        source: &str,
    ) -> Vec<SeedEntry> {
        self.resolve_source(fetcher, source.to_string()).await
    }

    /// Recursive worker for [`resolve`](Self::resolve)
    ///
    /// Boxed so the recursive future has a known size and stays `Send`.
    fn resolve_source<'a, F: Fetcher + ?Sized>(
        &'a mut self,
        fetcher: &'a F,
        source: String,
    ) -> Pin<Box<dyn Future<Output = Vec<SeedEntry>> + Send + 'a>> {
        Box::pin(async move {
            if !self.processed.insert(source.clone()) {
                tracing::debug!("Sitemap {} already processed, skipping", source);
                return Vec::new();
            }

            let document = match load_document(fetcher, &source).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Failed to resolve sitemap {}: {}", source, e);
                    return Vec::new();
                }
            };

            match document {
                SitemapDocument::UrlSet(entries) => {
                    tracing::info!("Found {} URLs in sitemap {}", entries.len(), source);
                    entries
                }
                SitemapDocument::Index(children) => {
                    tracing::info!(
                        "Sitemap index {} lists {} sub-sitemaps",
                        source,
                        children.len()
                    );

                    let mut entries = Vec::new();
                    for child in children {
                        entries.extend(self.resolve_source(fetcher, child).await);
                    }
                    entries
                }
            }
        })
    }
}

/// Reads a sitemap from disk or the network and parses it
async fn load_document<F: Fetcher + ?Sized>(
    fetcher: &F,
    source: &str,
) -> Result<SitemapDocument, SitemapError> {
    let xml = if is_remote(source) {
        fetcher.fetch(source).await?.body
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| SitemapError::Io {
                path: source.to_string(),
                source: e,
            })?
    };

    parse_sitemap(&xml)
}
