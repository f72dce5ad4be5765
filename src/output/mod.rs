//! Output module for crawl results
//!
//! This module handles:
//! - Assembling page records and the link graph
//! - Rendering one markdown file per page
//! - Exporting the corpus and the per-chunk view as JSON
//! - Recording and printing crawl statistics

mod corpus;
mod markdown;
mod record;
pub mod stats;

pub use corpus::{ChunkEntry, Corpus, CorpusMetadata, CHUNKS_FILE, CORPUS_FILE};
pub use markdown::{
    render_page, url_to_filename, write_page, MAX_EXTERNAL_LINKS, MAX_INTERNAL_LINKS,
};
pub use record::{assemble, finalize_siblings, LinkGraphEntry, PageLinks, PageRecord};
pub use stats::{print_statistics, CrawlStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
