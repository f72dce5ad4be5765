use crate::extract::collapse_whitespace;
use crate::sitemap::SeedEntry;
use scraper::{Html, Selector};
use serde::Serialize;

/// Page-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    /// `<lastmod>` of the sitemap entry that seeded the page
    pub last_modified: Option<String>,
    /// `<priority>` of the sitemap entry that seeded the page
    pub priority: Option<String>,
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn first_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extracts title, description and sitemap dates for a page
///
/// The title comes from `<title>`, or from the first `<h1>` when the title
/// is missing or blank. The description comes from the description meta
/// tag, or from the Open Graph description when there is none.
pub fn extract_metadata(document: &Html, seed: Option<&SeedEntry>) -> PageMetadata {
    let title = first_text(document, "title")
        .or_else(|| first_text(document, "h1"))
        .unwrap_or_default();

    let description = first_content(document, "meta[name=\"description\"]")
        .or_else(|| first_content(document, "meta[property=\"og:description\"]"))
        .unwrap_or_default();

    PageMetadata {
        title,
        description,
        last_modified: seed.and_then(|s| s.last_modified.clone()),
        priority: seed.and_then(|s| s.priority.clone()),
    }
}
