//! Corpus export
//!
//! Two JSON documents are written at the end of a crawl: the full corpus
//! (run metadata, every page record and the link graph) and a flattened
//! list with one entry per text chunk for direct ingestion into a retrieval
//! index.

use crate::extract::Breadcrumb;
use crate::output::record::{LinkGraphEntry, PageRecord};
use crate::output::{CrawlStats, OutputResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the full corpus export
pub const CORPUS_FILE: &str = "crawled_data.json";

/// File name of the per-chunk export
pub const CHUNKS_FILE: &str = "vector_data.json";

/// Run-level metadata of a corpus
#[derive(Debug, Clone, Serialize)]
pub struct CorpusMetadata {
    pub crawl_date: DateTime<Utc>,
    pub base_domain: String,
    pub total_pages: usize,
    pub statistics: CrawlStats,
    /// Hash of the configuration file the crawl ran with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

/// Everything one crawl produced
#[derive(Debug, Clone, Serialize)]
pub struct Corpus {
    pub metadata: CorpusMetadata,
    pub pages: Vec<PageRecord>,
    pub link_graph: BTreeMap<String, LinkGraphEntry>,
}

/// One text chunk with the context of the page it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkEntry {
    /// `<page url>#chunk-<index>`
    pub id: String,
    pub url: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub text: String,
    pub title: String,
    pub description: String,
    pub parent_url: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub depth: u32,
    pub section_titles: Vec<String>,
    pub has_code: bool,
    pub code_languages: Vec<String>,
}

impl Corpus {
    /// Flattens every page into its chunk entries, in page order
    pub fn chunk_entries(&self) -> Vec<ChunkEntry> {
        self.pages
            .iter()
            .flat_map(|page| {
                let total_chunks = page.text_chunks.len();
                let section_titles: Vec<String> =
                    page.sections.iter().map(|s| s.title.clone()).collect();

                page.text_chunks
                    .iter()
                    .enumerate()
                    .map(move |(index, text)| ChunkEntry {
                        id: format!("{}#chunk-{}", page.url, index),
                        url: page.url.clone(),
                        chunk_index: index,
                        total_chunks,
                        text: text.clone(),
                        title: page.title.clone(),
                        description: page.description.clone(),
                        parent_url: page.parent_url.clone(),
                        breadcrumbs: page.breadcrumbs.clone(),
                        depth: page.depth,
                        section_titles: section_titles.clone(),
                        has_code: page.code_snippet_count > 0,
                        code_languages: page.code_languages.clone(),
                    })
            })
            .collect()
    }

    /// Writes both JSON exports into `output_dir`
    ///
    /// # Returns
    ///
    /// * `Ok((corpus_path, chunks_path))` - Paths of the written files
    /// * `Err(OutputError)` - Failed to serialize or write
    pub fn write_to(&self, output_dir: &Path) -> OutputResult<(PathBuf, PathBuf)> {
        let corpus_path = output_dir.join(CORPUS_FILE);
        write_json(&corpus_path, self)?;

        let chunks = self.chunk_entries();
        let chunks_path = output_dir.join(CHUNKS_FILE);
        write_json(&chunks_path, &chunks)?;

        tracing::info!(
            "Wrote {} pages to {} and {} chunks to {}",
            self.pages.len(),
            corpus_path.display(),
            chunks.len(),
            chunks_path.display()
        );

        Ok((corpus_path, chunks_path))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
