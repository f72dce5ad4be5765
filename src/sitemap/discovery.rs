use crate::crawler::Fetcher;
use crate::robots::fetch_robots;
use crate::sitemap::SitemapResolver;

/// Conventional sitemap locations probed under every origin
pub const SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemaps/sitemap.xml",
    "/sitemap/sitemap.xml",
];

/// Looks for sitemaps under an origin that the resolver has not seen yet
///
/// Each path in [`SITEMAP_PATHS`] is probed with a HEAD request, and any
/// 2xx answer makes it a candidate. The origin's robots.txt is then read
/// for `Sitemap:` lines. Discovery is best-effort, so probe and robots.txt
/// failures are ignored.
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for the probes
/// * `origin` - The `scheme://host[:port]` origin to probe
/// * `resolver` - Resolver whose processed locations are skipped
///
/// # Returns
///
/// Candidate sitemap URLs in discovery order, without duplicates
pub async fn discover_sitemaps<F: Fetcher + ?Sized>(
    fetcher: &F,
    origin: &str,
    resolver: &SitemapResolver,
) -> Vec<String> {
    let origin = origin.trim_end_matches('/');
    let mut discovered: Vec<String> = Vec::new();

    for path in SITEMAP_PATHS {
        let candidate = format!("{}{}", origin, path);
        if resolver.is_processed(&candidate) {
            continue;
        }

        match fetcher.probe(&candidate).await {
            Ok(response) if response.is_success() => {
                tracing::info!("Discovered sitemap: {}", candidate);
                if let Some(content_type) = &response.content_type {
                    tracing::debug!("{} served as {}", candidate, content_type);
                }
                discovered.push(candidate);
            }
            Ok(response) => {
                tracing::debug!("No sitemap at {} (status {})", candidate, response.status);
            }
            Err(e) => {
                tracing::debug!("Sitemap probe failed for {}: {}", candidate, e);
            }
        }
    }

    let robots = fetch_robots(fetcher, origin).await;
    for sitemap in robots.sitemaps() {
        if resolver.is_processed(&sitemap) || discovered.contains(&sitemap) {
            continue;
        }
        tracing::info!("Found sitemap in robots.txt: {}", sitemap);
        discovered.push(sitemap);
    }

    discovered
}
