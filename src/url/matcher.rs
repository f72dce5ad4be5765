use crate::url::extract_domain;
use serde::Deserialize;
use url::Url;

/// How the configured base domain is compared against a URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainMatch {
    /// The base domain appears anywhere in the URL string
    ///
    /// Approximate on purpose: `https://evil.com/?docs.example.com` passes.
    #[default]
    Substring,
    /// The URL host equals the base domain or is one of its subdomains
    Host,
}

/// Decides whether a URL belongs to the crawl's base domain
#[derive(Debug, Clone)]
pub struct DomainFilter {
    base_domain: String,
    mode: DomainMatch,
}

impl DomainFilter {
    pub fn new(base_domain: impl Into<String>, mode: DomainMatch) -> Self {
        Self {
            base_domain: base_domain.into(),
            mode,
        }
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn mode(&self) -> DomainMatch {
        self.mode
    }

    /// Checks whether `url` is internal to the base domain
    ///
    /// In [`DomainMatch::Host`] mode the base domain matches itself and any
    /// subdomain: `example.com` matches `example.com` and `api.v2.example.com`
    /// but not `myexample.com`. A port in the base domain is compared too.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_scribe::url::{DomainFilter, DomainMatch};
    ///
    /// let loose = DomainFilter::new("example.com", DomainMatch::Substring);
    /// assert!(loose.matches("https://myexample.com/"));
    ///
    /// let strict = DomainFilter::new("example.com", DomainMatch::Host);
    /// assert!(strict.matches("https://docs.example.com/"));
    /// assert!(!strict.matches("https://myexample.com/"));
    /// ```
    pub fn matches(&self, url: &str) -> bool {
        if self.base_domain.is_empty() {
            return false;
        }

        match self.mode {
            DomainMatch::Substring => url.contains(&self.base_domain),
            DomainMatch::Host => {
                let Ok(parsed) = Url::parse(url) else {
                    return false;
                };
                let Some(host) = extract_domain(&parsed) else {
                    return false;
                };
                let base = self.base_domain.to_lowercase();

                let candidate = match (base.contains(':'), parsed.port_or_known_default()) {
                    (true, Some(port)) => format!("{}:{}", host, port),
                    _ => host,
                };

                candidate == base || candidate.ends_with(&format!(".{}", base))
            }
        }
    }
}
