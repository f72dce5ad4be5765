//! Sitemap handling module
//!
//! Turns sitemap sources (local files or http(s) URLs) into seed entries.
//! Sitemap indexes are followed depth-first, and every location is processed
//! at most once per crawl so self-referencing or cyclic indexes terminate.
//! [`discover_sitemaps`] probes an origin for sitemaps nobody listed.

mod discovery;
mod parser;
mod resolver;

pub use discovery::{discover_sitemaps, SITEMAP_PATHS};
pub use parser::{parse_sitemap, SeedEntry, SitemapDocument};
pub use resolver::SitemapResolver;

use crate::crawler::FetchError;
use thiserror::Error;

/// Errors raised while loading a single sitemap source
///
/// These never abort a crawl; the resolver logs them and treats the source
/// as empty.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to read sitemap file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed sitemap XML: {0}")]
    Parse(String),
}

/// Returns true if the source should be fetched over the network
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
