//! URL handling module for Sitemap-Scribe
//!
//! This module provides URL normalization, crawl eligibility checks, domain
//! extraction and base-domain matching.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, origin_of};
pub use matcher::{DomainFilter, DomainMatch};
pub use normalize::{is_eligible, normalize_url, NON_DOCUMENT_EXTENSIONS};
