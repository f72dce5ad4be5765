//! Markdown page generation
//!
//! Every crawled page becomes one markdown file: a front-matter block, the
//! page content, and appended sections listing the document outline,
//! related links and a code-language histogram.

use crate::output::record::PageRecord;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Internal links listed per page
pub const MAX_INTERNAL_LINKS: usize = 20;

/// External links listed per page
pub const MAX_EXTERNAL_LINKS: usize = 10;

/// Converts a URL into the name of its markdown file
///
/// The path loses its surrounding slashes, inner slashes become dashes and
/// the characters `<>:"|?*` are dropped. An empty path becomes `index`.
/// Query strings are not part of the name, so URLs differing only by query
/// share a file.
///
/// # Examples
///
/// ```
/// use sitemap_scribe::output::url_to_filename;
///
/// assert_eq!(url_to_filename("https://docs.example.com/guide/install/"), "guide-install.md");
/// assert_eq!(url_to_filename("https://docs.example.com"), "index.md");
/// ```
pub fn url_to_filename(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    let mut filename: String = path
        .trim_matches('/')
        .replace('/', "-")
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*'))
        .collect();

    if filename.is_empty() {
        filename = "index".to_string();
    }
    if !filename.ends_with(".md") {
        filename.push_str(".md");
    }
    filename
}

/// Renders a page record as a markdown document
///
/// # Arguments
///
/// * `record` - The assembled page record
/// * `content_markdown` - The page's main content, already converted to markdown
///
/// # Returns
///
/// The complete markdown document
pub fn render_page(record: &PageRecord, content_markdown: &str) -> String {
    let mut md = String::new();

    // Front matter
    md.push_str("---\n");
    md.push_str(&format!("title: {}\n", record.title));
    md.push_str(&format!("url: {}\n", record.url));
    if !record.description.is_empty() {
        md.push_str(&format!("description: {}\n", record.description));
    }
    if let Some(lastmod) = record.last_modified.as_deref().filter(|s| !s.is_empty()) {
        md.push_str(&format!("lastmod: {}\n", lastmod));
    }
    if let Some(priority) = record.priority.as_deref().filter(|s| !s.is_empty()) {
        md.push_str(&format!("priority: {}\n", priority));
    }
    md.push_str("---\n\n");

    if !record.title.is_empty() {
        md.push_str(&format!("# {}\n\n", record.title));
    }

    md.push_str(content_markdown.trim_end());
    md.push_str("\n\n");

    if !record.sections.is_empty() {
        md.push_str("---\n\n## Document Sections\n\n");
        for section in &record.sections {
            let indent = "  ".repeat(usize::from(section.level.saturating_sub(1)));
            match &section.anchor_id {
                Some(id) => md.push_str(&format!("{}- {} (#{})\n", indent, section.title, id)),
                None => md.push_str(&format!("{}- {}\n", indent, section.title)),
            }
        }
        md.push('\n');
    }

    let internal = &record.links.internal;
    let external = &record.links.external;
    if !internal.is_empty() || !external.is_empty() {
        md.push_str("---\n\n## Related Links\n\n");

        for (heading, links, cap) in [
            ("Internal Links", internal, MAX_INTERNAL_LINKS),
            ("External Links", external, MAX_EXTERNAL_LINKS),
        ] {
            if links.is_empty() {
                continue;
            }
            md.push_str(&format!("### {}\n\n", heading));
            for link in links.iter().take(cap) {
                let text = if link.text.is_empty() {
                    &link.url
                } else {
                    &link.text
                };
                md.push_str(&format!("- [{}]({})\n", text, link.url));
            }
            md.push('\n');
        }
    }

    if !record.code_snippets.is_empty() {
        md.push_str("---\n\n## Code Snippets\n\n");
        md.push_str(&format!(
            "This page contains {} code snippet(s).\n\n",
            record.code_snippets.len()
        ));

        // Languages in first-seen order
        let mut histogram: Vec<(&str, usize)> = Vec::new();
        for snippet in &record.code_snippets {
            let language = snippet.language.as_deref().unwrap_or("unknown");
            match histogram.iter_mut().find(|(lang, _)| *lang == language) {
                Some((_, count)) => *count += 1,
                None => histogram.push((language, 1)),
            }
        }

        md.push_str("**Languages:**\n");
        for (language, count) in histogram {
            md.push_str(&format!("- {}: {}\n", language, count));
        }
        md.push('\n');
    }

    md
}

/// Writes a rendered page into `output_dir`
///
/// An existing file with the same name is overwritten.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Failed to write the file
pub fn write_page(output_dir: &Path, filename: &str, markdown: &str) -> OutputResult<PathBuf> {
    let path = output_dir.join(filename);
    let mut file = File::create(&path)?;
    file.write_all(markdown.as_bytes())?;
    Ok(path)
}
