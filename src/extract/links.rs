//! Link, navigation and breadcrumb extraction

use crate::extract::{collapse_whitespace, Breadcrumb, Link};
use crate::url::{is_eligible, normalize_url, DomainFilter};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Selectors for menu-like regions, in the order they are scanned
pub const NAVIGATION_SELECTORS: &[&str] = &[
    "nav",
    "header nav",
    "[role=\"navigation\"]",
    ".navigation",
    ".nav",
    ".menu",
    ".sidebar",
    ".side-nav",
    "[class*=\"nav\"]",
    "[id*=\"nav\"]",
];

/// Selectors for breadcrumb trails; only the first region found is used
pub const BREADCRUMB_SELECTORS: &[&str] = &[
    "nav[aria-label=\"breadcrumb\"]",
    ".breadcrumb",
    "[class*=\"breadcrumb\"]",
    "nav ol",
];

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(normalize_url(absolute_url.as_str()))
        }
        _ => None,
    }
}

/// Extracts every anchor in `content` as a [`Link`]
///
/// A link is internal when it belongs to the base domain according to
/// `filter`. Duplicates are kept, since each anchor is its own link.
pub fn extract_links(content: ElementRef<'_>, base_url: &Url, filter: &DomainFilter) -> Vec<Link> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    content
        .select(&selector)
        .filter_map(|anchor| {
            let url = resolve_href(anchor.value().attr("href")?, base_url)?;
            Some(Link {
                text: collapse_whitespace(&anchor.text().collect::<String>()),
                is_internal: filter.matches(&url),
                url,
            })
        })
        .collect()
}

/// Collects eligible links from the navigation regions of a document
///
/// Every region matched by any of [`NAVIGATION_SELECTORS`] is scanned, so
/// regions matched by several selectors are visited more than once. The
/// result is deduplicated and keeps first-seen order.
pub fn extract_navigation_links(
    document: &Html,
    base_url: &Url,
    filter: &DomainFilter,
) -> Vec<String> {
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for raw in NAVIGATION_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for region in document.select(&selector) {
            for anchor in region.select(&anchor_selector) {
                let Some(url) = anchor
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_href(href, base_url))
                else {
                    continue;
                };
                if is_eligible(&url, filter) && seen.insert(url.clone()) {
                    links.push(url);
                }
            }
        }
    }

    links
}

/// Extracts the breadcrumb trail of a document
///
/// Uses the first region matched by [`BREADCRUMB_SELECTORS`]; other
/// breadcrumb regions are ignored. Hrefs are kept exactly as written.
pub fn extract_breadcrumbs(document: &Html) -> Vec<Breadcrumb> {
    let Ok(anchor_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    for raw in BREADCRUMB_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(region) = document.select(&selector).next() {
            return region
                .select(&anchor_selector)
                .map(|anchor| Breadcrumb {
                    text: collapse_whitespace(&anchor.text().collect::<String>()),
                    url: anchor.value().attr("href").unwrap_or("").to_string(),
                })
                .collect();
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::DomainMatch;

    fn base_url() -> Url {
        Url::parse("https://docs.example.com/guide/intro").unwrap()
    }

    fn filter() -> DomainFilter {
        DomainFilter::new("docs.example.com", DomainMatch::Substring)
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = base_url();
        assert_eq!(
            resolve_href("setup", &base),
            Some("https://docs.example.com/guide/setup".to_string())
        );
        assert_eq!(
            resolve_href("/api/", &base),
            Some("https://docs.example.com/api".to_string())
        );
        assert_eq!(
            resolve_href("../faq#top", &base),
            Some("https://docs.example.com/faq".to_string())
        );
        assert_eq!(
            resolve_href("https://other.org/x", &base),
            Some("https://other.org/x".to_string())
        );
    }

    #[test]
    fn test_resolve_skips_special_links() {
        let base = base_url();
        assert_eq!(resolve_href("", &base), None);
        assert_eq!(resolve_href("#section", &base), None);
        assert_eq!(resolve_href("javascript:void(0)", &base), None);
        assert_eq!(resolve_href("JavaScript:alert(1)", &base), None);
        assert_eq!(resolve_href("mailto:docs@example.com", &base), None);
        assert_eq!(resolve_href("tel:+1234", &base), None);
        assert_eq!(resolve_href("data:text/html,hi", &base), None);
        assert_eq!(resolve_href("ftp://docs.example.com/file", &base), None);
    }

    #[test]
    fn test_extract_links_classifies() {
        let html = Html::parse_document(
            r##"<main>
                <a href="/setup">Set   up</a>
                <a href="https://github.com/example/docs">Source</a>
                <a href="#local">Skip</a>
                <a>No href</a>
            </main>"##,
        );
        let main = crate::extract::content::find_main_content(&html);
        let links = extract_links(main.element, &base_url(), &filter());

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "Set up");
        assert_eq!(links[0].url, "https://docs.example.com/setup");
        assert!(links[0].is_internal);
        assert!(!links[1].is_internal);
    }

    #[test]
    fn test_navigation_links_dedup_and_eligibility() {
        let html = Html::parse_document(
            r#"<body>
                <nav class="navbar">
                    <a href="/a">A</a>
                    <a href="/b/">B</a>
                    <a href="/a#x">A again</a>
                    <a href="/manual.pdf">PDF</a>
                    <a href="https://other.org/">Elsewhere</a>
                </nav>
                <div class="sidebar"><a href="/c">C</a><a href="/b">B</a></div>
                <main><a href="/body-only">Body</a></main>
            </body>"#,
        );
        let links = extract_navigation_links(&html, &base_url(), &filter());
        assert_eq!(
            links,
            vec![
                "https://docs.example.com/a",
                "https://docs.example.com/b",
                "https://docs.example.com/c",
            ]
        );
    }

    #[test]
    fn test_breadcrumbs_first_region_only() {
        let html = Html::parse_document(
            r#"<body>
                <nav aria-label="breadcrumb"><a href="/">Home</a> / <a href="/guide">Guide</a></nav>
                <div class="breadcrumb"><a href="/other">Other</a></div>
            </body>"#,
        );
        let crumbs = extract_breadcrumbs(&html);
        assert_eq!(
            crumbs,
            vec![
                Breadcrumb {
                    text: "Home".to_string(),
                    url: "/".to_string()
                },
                Breadcrumb {
                    text: "Guide".to_string(),
                    url: "/guide".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_breadcrumbs_missing() {
        let html = Html::parse_document("<body><p>no trail</p></body>");
        assert!(extract_breadcrumbs(&html).is_empty());
    }
}
