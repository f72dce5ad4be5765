//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other modules together:
//! - Resolving sitemap sources into depth-0 seeds
//! - Draining the frontier breadth-first, one fetch at a time
//! - Extracting each page and writing its markdown file
//! - Following internal links up to the depth limit
//! - Sweeping navigation links the main pass never reached
//! - Exporting the corpus

use crate::config::Config;
use crate::crawler::frontier::{Frontier, QueueItem};
use crate::crawler::{Fetcher, HttpFetcher};
use crate::extract::extract_page;
use crate::output::{
    assemble, finalize_siblings, render_page, write_page, Corpus, CorpusMetadata, CrawlStats,
    LinkGraphEntry, PageRecord,
};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::sitemap::{discover_sitemaps, is_remote, SeedEntry, SitemapResolver};
use crate::url::{is_eligible, normalize_url, origin_of, DomainFilter};
use crate::{ConfigError, ScribeError};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
///
/// A coordinator runs a single crawl. The frontier, link graph and page
/// records are owned here and only touched between fetches.
pub struct Coordinator<F: Fetcher = HttpFetcher> {
    config: Config,
    fetcher: F,
    filter: DomainFilter,
    /// Product token matched against robots.txt groups
    robots_agent: String,
    output_dir: PathBuf,
    config_hash: Option<String>,

    resolver: SitemapResolver,
    frontier: Frontier,
    records: Vec<PageRecord>,
    link_graph: BTreeMap<String, LinkGraphEntry>,

    /// Navigation links in first-seen order
    navigation_links: Vec<String>,
    navigation_seen: HashSet<String>,

    /// Origins already probed for sitemaps
    discovered_origins: HashSet<String>,
    robots: HashMap<String, ParsedRobots>,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScribeError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self, ScribeError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around any [`Fetcher`]
    pub fn with_fetcher(config: Config, fetcher: F) -> Self {
        let filter = DomainFilter::new(
            config.source.base_domain.clone(),
            config.source.domain_match,
        );
        let robots_agent = config.user_agent.crawler_name.clone();
        let output_dir = PathBuf::from(&config.output.directory);

        Self {
            config,
            fetcher,
            filter,
            robots_agent,
            output_dir,
            config_hash: None,
            resolver: SitemapResolver::new(),
            frontier: Frontier::new(),
            records: Vec::new(),
            link_graph: BTreeMap::new(),
            navigation_links: Vec::new(),
            navigation_seen: HashSet::new(),
            discovered_origins: HashSet::new(),
            robots: HashMap::new(),
        }
    }

    /// Records the configuration hash in the exported corpus metadata
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn stats(&self) -> &CrawlStats {
        self.frontier.stats()
    }

    /// Runs the crawl to completion
    ///
    /// 1. Create the output directory
    /// 2. Resolve every sitemap source and seed the frontier at depth 0
    /// 3. Drain the frontier
    /// 4. Queue unvisited navigation links at depth 0 and drain again
    /// 5. Back-fill siblings and write the JSON exports
    ///
    /// Page-level failures are counted and logged but never end the run.
    ///
    /// # Returns
    ///
    /// * `Ok(Corpus)` - Everything the crawl collected
    /// * `Err(ScribeError)` - A local sitemap source is missing, or the
    ///   output directory or JSON exports could not be written
    pub async fn run(&mut self) -> Result<Corpus, ScribeError> {
        self.frontier.stats_mut().start_time = Some(Utc::now());

        self.check_local_sources()?;
        std::fs::create_dir_all(&self.output_dir)?;

        tracing::info!(
            "Crawling {} ({:?} match, recursive: {}, max depth: {})",
            self.filter.base_domain(),
            self.filter.mode(),
            self.config.crawler.recursive,
            self.config.crawler.max_depth
        );

        self.seed().await;
        self.drain().await;

        if self.config.crawler.navigation_sweep {
            self.navigation_sweep().await;
        }

        let navigation_links_found = self.navigation_links.len();
        let stats = self.frontier.stats_mut();
        stats.navigation_links_found = navigation_links_found;
        stats.end_time = Some(Utc::now());

        let corpus = self.build_corpus();
        corpus.write_to(&self.output_dir)?;

        tracing::info!(
            "Crawl complete: {} visited, {} skipped, {} failed",
            corpus.metadata.statistics.total_visited,
            corpus.metadata.statistics.total_skipped,
            corpus.metadata.statistics.total_failed
        );

        Ok(corpus)
    }

    /// Fails when every sitemap source is a missing local file
    ///
    /// A missing file next to other usable sources is only logged; the
    /// resolver then yields nothing for it.
    fn check_local_sources(&self) -> Result<(), ConfigError> {
        let missing: Vec<&String> = self
            .config
            .source
            .sitemaps
            .iter()
            .filter(|source| !is_remote(source) && !Path::new(source.as_str()).is_file())
            .collect();

        if !missing.is_empty() && missing.len() == self.config.source.sitemaps.len() {
            let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
            return Err(ConfigError::Validation(format!(
                "sitemap file not found: {}",
                names.join(", ")
            )));
        }

        for source in missing {
            tracing::warn!("Sitemap file not found, skipping: {}", source);
        }
        Ok(())
    }

    /// Resolves all configured sitemaps into depth-0 queue items
    async fn seed(&mut self) {
        for source in self.config.source.sitemaps.clone() {
            let entries = self.resolver.resolve(&self.fetcher, &source).await;
            for entry in entries {
                let url = normalize_url(&entry.url);
                if url.is_empty() {
                    continue;
                }
                self.frontier
                    .enqueue(QueueItem::new(url, None, 0).with_seed(entry));
            }
        }

        tracing::info!("Seeded frontier with {} URLs", self.frontier.len());
    }

    /// Processes queued items until the queue is empty
    async fn drain(&mut self) {
        while let Some(item) = self.frontier.pop() {
            if self.frontier.is_visited(&item.url) || item.depth > self.config.crawler.max_depth {
                tracing::debug!("Skipping {} (depth {})", item.url, item.depth);
                self.frontier.stats_mut().total_skipped += 1;
                continue;
            }

            if !self.robots_allow(&item.url).await {
                tracing::info!("URL {} disallowed by robots.txt", item.url);
                self.frontier.mark_visited(&item.url);
                self.frontier.stats_mut().total_skipped += 1;
                continue;
            }

            self.frontier.mark_visited(&item.url);
            self.frontier.stats_mut().total_visited += 1;

            tracing::info!(
                "[{}] Processing (depth {}): {}",
                self.frontier.stats().total_visited,
                item.depth,
                item.url
            );

            let delay = self.delay_for(&item.url);
            self.process_page(item).await;

            if !self.frontier.is_empty() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Fetches, extracts and records one page, then queues its links
    async fn process_page(&mut self, item: QueueItem) {
        let page = match self.fetcher.fetch(&item.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", item.url, e);
                self.frontier.stats_mut().total_failed += 1;
                return;
            }
        };
        tracing::debug!(
            "Fetched {} (HTTP {}, {})",
            page.final_url,
            page.status,
            page.content_type.as_deref().unwrap_or("no content type")
        );

        // Relative links resolve against where the page actually lives
        let base_url = match Url::parse(&page.final_url).or_else(|_| Url::parse(&item.url)) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot resolve links for {}: {}", item.url, e);
                self.frontier.stats_mut().total_failed += 1;
                return;
            }
        };

        let extraction = extract_page(
            &page.body,
            &base_url,
            &self.filter,
            self.config.crawler.chunk_size,
            item.seed.as_ref(),
        );
        tracing::debug!(
            "Main content of {} from {:?}",
            item.url,
            extraction.content_source
        );

        for link in &extraction.navigation_links {
            if self.navigation_seen.insert(link.clone()) {
                self.navigation_links.push(link.clone());
            }
        }

        if self.config.crawler.auto_discover_sitemaps && item.depth == 0 {
            self.discover_from(&item.url).await;
        }

        let record = assemble(
            &item.url,
            item.parent_url.as_deref(),
            item.depth,
            item.seed.as_ref(),
            &extraction,
            Utc::now(),
        );

        let markdown = render_page(&record, &extraction.content_markdown);
        if let Err(e) = write_page(&self.output_dir, &record.filename, &markdown) {
            tracing::warn!("Failed to write {}: {}", record.filename, e);
        }

        let from_navigation = self.navigation_seen.contains(&item.url);
        self.link_graph.insert(
            item.url.clone(),
            LinkGraphEntry::from_record(&record, from_navigation),
        );

        tracing::debug!(
            "{} sections, {} links, {} code snippets, {} text chunks",
            record.section_count,
            record.links.internal_count + record.links.external_count,
            record.code_snippet_count,
            record.text_chunks.len()
        );

        if self.config.crawler.recursive && item.depth < self.config.crawler.max_depth {
            let mut added = 0;
            for link in &record.links.internal {
                if !is_eligible(&link.url, &self.filter) {
                    continue;
                }
                let next = QueueItem::new(link.url.clone(), Some(item.url.clone()), item.depth + 1);
                if self.frontier.enqueue(next) {
                    added += 1;
                }
            }

            if added > 0 {
                tracing::info!(
                    "Added {} new URLs to queue (queue size: {})",
                    added,
                    self.frontier.len()
                );
            }
        }

        self.records.push(record);
    }

    /// Probes the origin of `page_url` for unlisted sitemaps, once per origin
    ///
    /// Entries of newly found sitemaps are queued at depth 0 with the probing
    /// page as parent.
    async fn discover_from(&mut self, page_url: &str) {
        let Some(origin) = origin_of(page_url) else {
            return;
        };
        if !self.discovered_origins.insert(origin.clone()) {
            return;
        }

        let candidates = discover_sitemaps(&self.fetcher, &origin, &self.resolver).await;
        for candidate in candidates {
            if self.resolver.is_processed(&candidate) {
                continue;
            }
            self.frontier.stats_mut().sitemaps_discovered += 1;

            let entries = self.resolver.resolve(&self.fetcher, &candidate).await;
            tracing::info!(
                "Found {} URLs in discovered sitemap {}",
                entries.len(),
                candidate
            );
            self.enqueue_discovered(entries, page_url);
        }
    }

    fn enqueue_discovered(&mut self, entries: Vec<SeedEntry>, parent_url: &str) {
        for entry in entries {
            let url = normalize_url(&entry.url);
            if !is_eligible(&url, &self.filter) {
                continue;
            }
            self.frontier.enqueue(
                QueueItem::new(url, Some(parent_url.to_string()), 0).with_seed(entry),
            );
        }
    }

    /// Queues navigation links never visited and drains the queue once more
    async fn navigation_sweep(&mut self) {
        let pending: Vec<String> = self
            .navigation_links
            .iter()
            .filter(|url| !self.frontier.is_visited(url))
            .cloned()
            .collect();

        if pending.is_empty() {
            return;
        }

        tracing::info!(
            "Processing {} navigation links not yet visited",
            pending.len()
        );

        for url in pending {
            if is_eligible(&url, &self.filter) {
                self.frontier.enqueue(QueueItem::new(url, None, 0));
            }
        }

        self.drain().await;
    }

    /// Checks robots.txt for `url` when robots compliance is enabled
    async fn robots_allow(&mut self, url: &str) -> bool {
        if !self.config.crawler.respect_robots_txt {
            return true;
        }
        let Some(origin) = origin_of(url) else {
            return true;
        };

        if !self.robots.contains_key(&origin) {
            let robots = fetch_robots(&self.fetcher, &origin).await;
            self.robots.insert(origin.clone(), robots);
        }

        self.robots
            .get(&origin)
            .map_or(true, |robots| robots.is_allowed(url, &self.robots_agent))
    }

    /// Pause after fetching `url`: the configured delay, raised to the
    /// robots.txt Crawl-delay when robots compliance is enabled
    fn delay_for(&self, url: &str) -> Duration {
        let mut seconds = self.config.crawler.delay_secs;

        if self.config.crawler.respect_robots_txt {
            let crawl_delay = origin_of(url)
                .and_then(|origin| self.robots.get(&origin))
                .and_then(|robots| robots.crawl_delay(&self.robots_agent));
            if let Some(crawl_delay) = crawl_delay {
                seconds = seconds.max(crawl_delay);
            }
        }

        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    }

    /// Moves the collected records and graph into a corpus
    fn build_corpus(&mut self) -> Corpus {
        let pages = finalize_siblings(std::mem::take(&mut self.records));

        Corpus {
            metadata: CorpusMetadata {
                crawl_date: Utc::now(),
                base_domain: self.filter.base_domain().to_string(),
                total_pages: pages.len(),
                statistics: self.frontier.stats().clone(),
                config_hash: self.config_hash.clone(),
            },
            pages,
            link_graph: std::mem::take(&mut self.link_graph),
        }
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use sitemap_scribe::config::load_config;
/// use sitemap_scribe::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scribe.toml"))?;
/// let corpus = run_crawl(config).await?;
/// println!("{} pages", corpus.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<Corpus, ScribeError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
