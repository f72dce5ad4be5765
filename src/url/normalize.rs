use crate::url::DomainFilter;
use url::Url;

/// Path extensions that never lead to a documentation page
pub const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "zip", "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "css", "js",
];

/// Normalizes a URL so that equivalent links share one visited-set key
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything from the first `#`)
/// 2. Remove trailing slashes
///
/// Nothing else is touched: scheme, host case and query string are kept as
/// written. Every trailing slash is removed, not just one, which keeps the
/// function idempotent.
///
/// # Examples
///
/// ```
/// use sitemap_scribe::url::normalize_url;
///
/// assert_eq!(normalize_url("https://docs.example.com/guide/#setup"), "https://docs.example.com/guide");
/// assert_eq!(normalize_url("https://docs.example.com/"), "https://docs.example.com");
/// ```
pub fn normalize_url(url: &str) -> String {
    let without_fragment = match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    };
    without_fragment.trim_end_matches('/').to_string()
}

/// Checks whether a URL is a crawl candidate
///
/// A URL is eligible when it is non-empty, uses http or https, does not point
/// at a known non-document file, and belongs to the base domain according to
/// `filter`.
///
/// # Arguments
///
/// * `url` - The (normalized) URL to check
/// * `filter` - Base-domain filter for the crawl
///
/// # Returns
///
/// * `true` - If the URL should be considered for crawling
/// * `false` - Otherwise
pub fn is_eligible(url: &str, filter: &DomainFilter) -> bool {
    if url.is_empty() {
        return false;
    }

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }

    if has_non_document_extension(url) {
        return false;
    }

    filter.matches(url)
}

/// Checks the path of `url` against [`NON_DOCUMENT_EXTENSIONS`]
fn has_non_document_extension(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    };

    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => NON_DOCUMENT_EXTENSIONS.contains(&ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::DomainMatch;

    fn docs_filter() -> DomainFilter {
        DomainFilter::new("docs.example.com", DomainMatch::Substring)
    }

    #[test]
    fn test_removes_fragment() {
        assert_eq!(
            normalize_url("https://docs.example.com/page#section"),
            "https://docs.example.com/page"
        );
    }

    #[test]
    fn test_removes_trailing_slash() {
        assert_eq!(
            normalize_url("https://docs.example.com/page/"),
            "https://docs.example.com/page"
        );
    }

    #[test]
    fn test_fragment_then_slash() {
        assert_eq!(
            normalize_url("https://docs.example.com/page/#top"),
            "https://docs.example.com/page"
        );
    }

    #[test]
    fn test_keeps_query() {
        assert_eq!(
            normalize_url("https://docs.example.com/search?q=rust"),
            "https://docs.example.com/search?q=rust"
        );
    }

    #[test]
    fn test_idempotent() {
        let urls = [
            "https://docs.example.com/a//",
            "https://docs.example.com/#",
            "https://docs.example.com/guide/#x/",
            "https://docs.example.com",
            "",
        ];
        for url in urls {
            let once = normalize_url(url);
            assert_eq!(normalize_url(&once), once, "not idempotent for {}", url);
        }
    }

    #[test]
    fn test_eligible_document_url() {
        assert!(is_eligible("https://docs.example.com/guide", &docs_filter()));
        assert!(is_eligible("http://docs.example.com/guide.html", &docs_filter()));
    }

    #[test]
    fn test_rejects_empty_and_other_schemes() {
        let filter = docs_filter();
        assert!(!is_eligible("", &filter));
        assert!(!is_eligible("ftp://docs.example.com/file", &filter));
        assert!(!is_eligible("mailto:team@docs.example.com", &filter));
        assert!(!is_eligible("docs.example.com/guide", &filter));
    }

    #[test]
    fn test_rejects_non_document_extensions() {
        let filter = docs_filter();
        assert!(!is_eligible("https://docs.example.com/manual.pdf", &filter));
        assert!(!is_eligible("https://docs.example.com/logo.PNG", &filter));
        assert!(!is_eligible("https://docs.example.com/static/app.js", &filter));
        assert!(!is_eligible("https://docs.example.com/style.css?v=3", &filter));
        assert!(is_eligible("https://docs.example.com/js/intro", &filter));
    }

    #[test]
    fn test_rejects_other_domains() {
        assert!(!is_eligible("https://other.com/guide", &docs_filter()));
    }
}
