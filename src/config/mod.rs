//! Configuration module for Sitemap-Scribe
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a file only needs the keys it changes.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_scribe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scribe.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config};
pub use validation::validate;
