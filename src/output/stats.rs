//! Crawl statistics
//!
//! Counters are owned by the frontier while a crawl runs, embedded in the
//! exported corpus, and printed as a summary at the end.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Process-wide counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Pages marked visited (successful or not)
    pub total_visited: usize,

    /// Dequeued items dropped without a fetch (already visited, too deep,
    /// or disallowed by robots.txt)
    pub total_skipped: usize,

    /// Visited pages whose fetch failed
    pub total_failed: usize,

    /// Sitemaps found by auto-discovery and resolved
    pub sitemaps_discovered: usize,

    /// Distinct navigation links seen across all pages
    pub navigation_links_found: usize,

    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl CrawlStats {
    /// Pages that produced a record
    pub fn total_succeeded(&self) -> usize {
        self.total_visited.saturating_sub(self.total_failed)
    }

    /// Wall-clock duration of the run, once it has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `output_dir` - Directory the markdown and JSON files were written to
pub fn print_statistics(stats: &CrawlStats, output_dir: &str) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages visited: {}", stats.total_visited);
    println!("  Total pages skipped: {}", stats.total_skipped);
    println!("  Total pages failed: {}", stats.total_failed);
    println!("  Navigation links found: {}", stats.navigation_links_found);
    println!("  Sitemaps discovered: {}", stats.sitemaps_discovered);
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    let success_rate = if stats.total_visited > 0 {
        (stats.total_succeeded() as f64 / stats.total_visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        success_rate,
        stats.total_succeeded(),
        stats.total_visited
    );
    println!("Output written to: {}", output_dir);
}
