//! Crawl frontier
//!
//! The frontier owns the visited set, the FIFO queue of pending work and the
//! crawl counters. FIFO order makes the traversal breadth-first, so pages are
//! processed in non-decreasing depth order within a pass.

use crate::output::CrawlStats;
use crate::sitemap::SeedEntry;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    /// Normalized URL
    pub url: String,
    /// Page the URL was discovered on; `None` for seeds and navigation sweeps
    pub parent_url: Option<String>,
    pub depth: u32,
    /// Sitemap entry that listed the URL, if any
    pub seed: Option<SeedEntry>,
}

impl QueueItem {
    pub fn new(url: impl Into<String>, parent_url: Option<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            parent_url,
            depth,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: SeedEntry) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Visited set, pending queue and counters for one crawl run
///
/// Invariants:
/// - a URL is queued at most once at any time
/// - a URL is marked visited at most once and never unmarked
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    queue: VecDeque<QueueItem>,
    enqueued: HashSet<String>,
    stats: CrawlStats,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item to the back of the queue
    ///
    /// Returns false, leaving the queue untouched, if the URL was already
    /// visited or is currently queued.
    pub fn enqueue(&mut self, item: QueueItem) -> bool {
        if self.visited.contains(&item.url) || self.enqueued.contains(&item.url) {
            return false;
        }
        self.enqueued.insert(item.url.clone());
        self.queue.push_back(item);
        true
    }

    /// Removes and returns the oldest queued item
    pub fn pop(&mut self) -> Option<QueueItem> {
        let item = self.queue.pop_front()?;
        self.enqueued.remove(&item.url);
        Some(item)
    }

    /// Marks a URL visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut CrawlStats {
        &mut self.stats
    }
}
