use crate::sitemap::SitemapError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// A page listed in a `<urlset>` sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedEntry {
    /// Page location exactly as written in `<loc>`
    pub url: String,
    /// Raw `<lastmod>` text
    pub last_modified: Option<String>,
    /// Raw `<priority>` text
    pub priority: Option<String>,
}

/// The two sitemap document kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A `<urlset>` listing pages
    UrlSet(Vec<SeedEntry>),
    /// A `<sitemapindex>` listing child sitemap locations
    Index(Vec<String>),
}

/// Parses sitemap XML into a [`SitemapDocument`]
///
/// The document kind is decided by the root element. Elements are matched by
/// local name, so both namespaced and namespace-less sitemaps are accepted.
/// `<url>` or `<sitemap>` entries without a `<loc>` are dropped.
///
/// # Errors
///
/// Returns [`SitemapError::Parse`] if the XML is malformed or the root element
/// is neither `urlset` nor `sitemapindex`.
///
/// # Examples
///
/// ```
/// use sitemap_scribe::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://docs.example.com/intro</loc><priority>0.5</priority></url>
/// </urlset>"#;
///
/// match parse_sitemap(xml).unwrap() {
///     SitemapDocument::UrlSet(entries) => assert_eq!(entries[0].priority.as_deref(), Some("0.5")),
///     SitemapDocument::Index(_) => unreachable!(),
/// }
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut root: Option<String> = None;
    // Elements opened and not yet closed, root included
    let mut depth: usize = 0;

    let mut entries = Vec::new();
    let mut children = Vec::new();

    // State for the <url> or <sitemap> entry being read
    let mut in_entry = false;
    let mut current_element: Option<String> = None;
    let mut pending = PendingEntry::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                depth += 1;

                if root.is_none() {
                    check_root(&name)?;
                    root = Some(name);
                    buf.clear();
                    continue;
                }

                match name.as_str() {
                    "url" | "sitemap" => {
                        in_entry = true;
                        pending = PendingEntry::default();
                    }
                    "loc" | "lastmod" | "priority" if in_entry => {
                        current_element = Some(name);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) if root.is_none() => {
                // Self-closing root: an empty sitemap
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                check_root(&name)?;
                root = Some(name);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                depth = depth.saturating_sub(1);

                if (name == "url" || name == "sitemap") && in_entry {
                    let entry = std::mem::take(&mut pending);
                    if let Some(loc) = entry.loc {
                        if name == "url" {
                            entries.push(SeedEntry {
                                url: loc,
                                last_modified: entry.lastmod,
                                priority: entry.priority,
                            });
                        } else {
                            children.push(loc);
                        }
                    }
                    in_entry = false;
                }
                current_element = None;
            }
            Ok(Event::Text(e)) => {
                if let Some(ref element) = current_element {
                    let text = e
                        .unescape()
                        .map_err(|e| SitemapError::Parse(e.to_string()))?;
                    pending.set(element, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref element) = current_element {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| SitemapError::Parse(format!("invalid CDATA: {}", e)))?;
                    pending.set(element, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(SitemapError::Parse(format!(
            "unexpected end of document: {} element(s) left open",
            depth
        )));
    }

    match root.as_deref() {
        Some("urlset") => Ok(SitemapDocument::UrlSet(entries)),
        Some(_) => Ok(SitemapDocument::Index(children)),
        None => Err(SitemapError::Parse("document has no root element".to_string())),
    }
}

fn check_root(name: &str) -> Result<(), SitemapError> {
    if name == "urlset" || name == "sitemapindex" {
        Ok(())
    } else {
        Err(SitemapError::Parse(format!(
            "unexpected root element <{}>",
            name
        )))
    }
}

/// Child values of the entry being read
#[derive(Debug, Default)]
struct PendingEntry {
    loc: Option<String>,
    lastmod: Option<String>,
    priority: Option<String>,
}

impl PendingEntry {
    fn set(&mut self, element: &str, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let slot = match element {
            "loc" => &mut self.loc,
            "lastmod" => &mut self.lastmod,
            "priority" => &mut self.priority,
            _ => return,
        };
        *slot = Some(text.to_string());
    }
}
