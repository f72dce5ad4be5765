//! Robots.txt handling module
//!
//! This module fetches and parses robots.txt files. The crawler consults them
//! in two places: sitemap discovery reads their `Sitemap:` lines, and when
//! robots compliance is switched on, `Disallow` rules and `Crawl-delay` are
//! honored for every page.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::Fetcher;

/// Fetches robots.txt for an origin
///
/// Any failure (network error, non-2xx status, timeout) yields a permissive
/// [`ParsedRobots::allow_all`], since a missing robots.txt places no
/// restrictions on the crawl.
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for the request
/// * `origin` - The `scheme://host[:port]` origin, without trailing slash
///
/// # Returns
///
/// The parsed robots.txt, or an allow-all value when it could not be fetched
pub async fn fetch_robots<F: Fetcher + ?Sized>(fetcher: &F, origin: &str) -> ParsedRobots {
    let robots_url = format!("{}/robots.txt", origin.trim_end_matches('/'));

    match fetcher.fetch(&robots_url).await {
        Ok(page) => {
            tracing::debug!("Fetched robots.txt from {}", robots_url);
            ParsedRobots::from_content(&page.body)
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
