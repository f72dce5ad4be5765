//! Content extraction module
//!
//! Turns one HTML document into everything the crawl keeps about a page:
//! metadata, main content (as markdown and as word chunks), the heading
//! outline, code snippets, in-content links, navigation links and the
//! breadcrumb trail.
//!
//! Extraction never fails. A document of unexpected shape simply yields
//! empty lists. The main-content, navigation and breadcrumb selectors are
//! heuristics and will misfire on some sites.

mod code;
mod content;
mod links;
mod metadata;
mod sections;

pub use code::extract_code_snippets;
pub use content::{
    chunk_text, chunk_words, find_main_content, visible_text, visible_words, ContentCandidate,
    ContentSource, MainContent, CONTENT_CANDIDATES,
};
pub use links::{
    extract_breadcrumbs, extract_links, extract_navigation_links, resolve_href,
    BREADCRUMB_SELECTORS, NAVIGATION_SELECTORS,
};
pub use metadata::{extract_metadata, PageMetadata};
pub use sections::extract_sections;

use crate::sitemap::SeedEntry;
use crate::url::DomainFilter;
use scraper::Html;
use serde::Serialize;
use url::Url;

/// A heading and the text that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading level, 1 through 6
    pub level: u8,
    pub title: String,
    #[serde(rename = "id")]
    pub anchor_id: Option<String>,
    #[serde(rename = "content")]
    pub body_text: String,
}

/// A block of code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub language: Option<String>,
    pub code: String,
}

/// An anchor found in the main content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    /// Resolved and normalized target
    pub url: String,
    pub is_internal: bool,
}

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub text: String,
    /// The href exactly as written in the page
    pub url: String,
}

/// Everything extracted from one page
#[derive(Debug, Clone)]
pub struct PageExtraction {
    pub metadata: PageMetadata,
    pub content_source: ContentSource,
    /// Main content rendered as markdown
    pub content_markdown: String,
    pub sections: Vec<Section>,
    pub links: Vec<Link>,
    pub code_snippets: Vec<Snippet>,
    pub navigation_links: Vec<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub text_chunks: Vec<String>,
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Runs the whole extraction pipeline over a fetched document
///
/// # Arguments
///
/// * `html` - Raw document body
/// * `page_url` - URL the document was served from, used to resolve links
/// * `filter` - Base-domain filter classifying links as internal
/// * `chunk_size` - Words per text chunk
/// * `seed` - Sitemap entry that listed this page, if any
///
/// # Example
///
/// ```
/// use sitemap_scribe::extract::extract_page;
/// use sitemap_scribe::url::{DomainFilter, DomainMatch};
/// use url::Url;
///
/// let html = r#"<html><head><title>Intro</title></head>
/// <body><main><h1>Intro</h1><p>Read <a href="/setup">setup</a>.</p></main></body></html>"#;
/// let url = Url::parse("https://docs.example.com/intro").unwrap();
/// let filter = DomainFilter::new("docs.example.com", DomainMatch::Substring);
///
/// let page = extract_page(html, &url, &filter, 500, None);
/// assert_eq!(page.metadata.title, "Intro");
/// assert_eq!(page.links[0].url, "https://docs.example.com/setup");
/// assert_eq!(page.text_chunks, vec!["Intro Read setup ."]);
/// ```
pub fn extract_page(
    html: &str,
    page_url: &Url,
    filter: &DomainFilter,
    chunk_size: usize,
    seed: Option<&SeedEntry>,
) -> PageExtraction {
    let document = Html::parse_document(html);

    let metadata = extract_metadata(&document, seed);
    let main = find_main_content(&document);

    PageExtraction {
        metadata,
        content_source: main.source,
        content_markdown: html2md::parse_html(&main.element.html()),
        sections: extract_sections(main.element),
        links: extract_links(main.element, page_url, filter),
        code_snippets: extract_code_snippets(main.element),
        navigation_links: extract_navigation_links(&document, page_url, filter),
        breadcrumbs: extract_breadcrumbs(&document),
        text_chunks: chunk_text(main.element, chunk_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::DomainMatch;

    const PAGE: &str = r#"<html>
<head>
  <title>Installing</title>
  <meta name="description" content="Install the tool">
</head>
<body>
  <nav class="breadcrumb"><a href="/">Docs</a><a href="/guide">Guide</a></nav>
  <aside class="sidebar"><a href="/guide/install">Install</a><a href="/guide/upgrade">Upgrade</a></aside>
  <main>
    <h1 id="install">Installing</h1>
    <p>Use the <code>installer</code> or build from source.</p>
    <pre><code class="language-shell">cargo install tool</code></pre>
    <h2>Next</h2>
    <p>See <a href="/guide/configure">configuration</a> and <a href="https://github.com/example/tool">the repo</a>.</p>
  </main>
</body>
</html>"#;

    fn extract() -> PageExtraction {
        let url = Url::parse("https://docs.example.com/guide/install").unwrap();
        let filter = DomainFilter::new("docs.example.com", DomainMatch::Substring);
        extract_page(PAGE, &url, &filter, 4, None)
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_full_extraction() {
        let page = extract();

        assert_eq!(page.metadata.title, "Installing");
        assert_eq!(page.metadata.description, "Install the tool");
        assert_eq!(page.content_source, ContentSource::Candidate("main"));

        assert_eq!(page.sections.len(), 2);
        assert_eq!(page.sections[0].anchor_id.as_deref(), Some("install"));
        assert_eq!(page.code_snippets.len(), 1);
        assert_eq!(page.code_snippets[0].language.as_deref(), Some("shell"));

        let internal: Vec<&str> = page
            .links
            .iter()
            .filter(|l| l.is_internal)
            .map(|l| l.url.as_str())
            .collect();
        assert_eq!(internal, vec!["https://docs.example.com/guide/configure"]);
        assert_eq!(page.links.len(), 2);

        assert_eq!(
            page.navigation_links,
            vec![
                "https://docs.example.com",
                "https://docs.example.com/guide",
                "https://docs.example.com/guide/install",
                "https://docs.example.com/guide/upgrade"
            ]
        );
        assert_eq!(page.breadcrumbs.len(), 2);
        assert!(page.content_markdown.contains("Installing"));
    }

    #[test]
    fn test_chunks_cover_main_content_only() {
        let page = extract();
        let all = page.text_chunks.join(" ");
        assert!(all.starts_with("Installing Use the installer"));
        assert!(!all.contains("Upgrade"));
        assert!(page.text_chunks.iter().all(|c| c.split(' ').count() <= 4));
    }

    #[test]
    fn test_empty_document() {
        let url = Url::parse("https://docs.example.com/").unwrap();
        let filter = DomainFilter::new("docs.example.com", DomainMatch::Substring);
        let page = extract_page("", &url, &filter, 500, None);

        assert_eq!(page.content_source, ContentSource::WholeDocument);
        assert!(page.text_chunks.is_empty());
        assert!(page.sections.is_empty());
        assert!(page.links.is_empty());
        assert!(page.code_snippets.is_empty());
    }
}
