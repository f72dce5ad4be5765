//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - The breadth-first frontier with its visited set and statistics
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher, ProbeResponse,
};
pub use frontier::{Frontier, QueueItem};
