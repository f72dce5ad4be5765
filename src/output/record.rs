//! Page records and the link graph
//!
//! A [`PageRecord`] is assembled once per successfully processed page. Its
//! `siblings` stay empty until [`finalize_siblings`] runs over the finished
//! collection, because a page's siblings may be discovered after it.

use crate::extract::{Breadcrumb, Link, PageExtraction, Section, Snippet};
use crate::output::markdown::url_to_filename;
use crate::sitemap::SeedEntry;
use crate::url::normalize_url;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// In-content links of a page, split by the base-domain filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub internal: Vec<Link>,
    pub external: Vec<Link>,
    pub internal_count: usize,
    pub external_count: usize,
}

/// The durable output unit for one crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    // Identification
    pub url: String,
    pub normalized_url: String,
    pub filename: String,

    // Position in the crawl
    pub parent_url: Option<String>,
    pub depth: u32,
    pub breadcrumbs: Vec<Breadcrumb>,

    // Metadata
    pub title: String,
    pub description: String,
    #[serde(rename = "lastmod")]
    pub last_modified: Option<String>,
    pub priority: Option<String>,
    pub crawled_at: DateTime<Utc>,

    // Text for retrieval indexing
    pub text_chunks: Vec<String>,
    pub full_text: String,

    pub sections: Vec<Section>,
    pub section_count: usize,

    pub code_snippets: Vec<Snippet>,
    pub code_snippet_count: usize,
    /// Distinct snippet languages, sorted
    pub code_languages: Vec<String>,

    pub links: PageLinks,

    pub siblings: Vec<String>,
    pub sibling_count: usize,
}

/// Outbound edges and position of one processed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkGraphEntry {
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub parent: Option<String>,
    pub depth: u32,
    /// The page is also linked from some navigation region
    pub from_navigation: bool,
}

/// Merges extraction output, sitemap metadata and crawl position into a record
///
/// Pure: no network or filesystem access, and the same inputs always give
/// the same record. Sitemap dates from `seed` take precedence over those
/// carried in the extraction.
pub fn assemble(
    url: &str,
    parent_url: Option<&str>,
    depth: u32,
    seed: Option<&SeedEntry>,
    extraction: &PageExtraction,
    crawled_at: DateTime<Utc>,
) -> PageRecord {
    let (internal, external): (Vec<Link>, Vec<Link>) = extraction
        .links
        .iter()
        .cloned()
        .partition(|link| link.is_internal);

    let code_languages: BTreeSet<String> = extraction
        .code_snippets
        .iter()
        .filter_map(|snippet| snippet.language.clone())
        .collect();

    PageRecord {
        url: url.to_string(),
        normalized_url: normalize_url(url),
        filename: url_to_filename(url),
        parent_url: parent_url.map(str::to_string),
        depth,
        breadcrumbs: extraction.breadcrumbs.clone(),
        title: extraction.metadata.title.clone(),
        description: extraction.metadata.description.clone(),
        last_modified: seed
            .and_then(|s| s.last_modified.clone())
            .or_else(|| extraction.metadata.last_modified.clone()),
        priority: seed
            .and_then(|s| s.priority.clone())
            .or_else(|| extraction.metadata.priority.clone()),
        crawled_at,
        full_text: extraction.text_chunks.join(" "),
        text_chunks: extraction.text_chunks.clone(),
        section_count: extraction.sections.len(),
        sections: extraction.sections.clone(),
        code_snippet_count: extraction.code_snippets.len(),
        code_snippets: extraction.code_snippets.clone(),
        code_languages: code_languages.into_iter().collect(),
        links: PageLinks {
            internal_count: internal.len(),
            external_count: external.len(),
            internal,
            external,
        },
        siblings: Vec::new(),
        sibling_count: 0,
    }
}

impl LinkGraphEntry {
    /// Builds the graph entry for a freshly assembled record
    pub fn from_record(record: &PageRecord, from_navigation: bool) -> Self {
        Self {
            internal_links: record.links.internal.iter().map(|l| l.url.clone()).collect(),
            external_links: record.links.external.iter().map(|l| l.url.clone()).collect(),
            parent: record.parent_url.clone(),
            depth: record.depth,
            from_navigation,
        }
    }
}

/// Fills in sibling lists once every record exists
///
/// Records sharing a `parent_url` are siblings of each other; a record is
/// never its own sibling. Records without a parent have no siblings. The
/// relation is symmetric by construction.
pub fn finalize_siblings(mut records: Vec<PageRecord>) -> Vec<PageRecord> {
    let mut children_by_parent: HashMap<String, Vec<String>> = HashMap::new();
    for record in &records {
        if let Some(parent) = &record.parent_url {
            children_by_parent
                .entry(parent.clone())
                .or_default()
                .push(record.url.clone());
        }
    }

    for record in &mut records {
        let Some(parent) = &record.parent_url else {
            continue;
        };
        if let Some(children) = children_by_parent.get(parent) {
            record.siblings = children
                .iter()
                .filter(|url| **url != record.url)
                .cloned()
                .collect();
            record.sibling_count = record.siblings.len();
        }
    }

    records
}
