//! Main-content detection and text chunking

use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches the reader
const NON_VISIBLE: &[&str] = &["script", "style", "noscript", "template"];

/// A named CSS selector tried when looking for the main content
#[derive(Debug, Clone, Copy)]
pub struct ContentCandidate {
    pub name: &'static str,
    pub selector: &'static str,
}

/// Main-content strategies in priority order
///
/// These are conventions observed on documentation sites, not a precise
/// rule; the first candidate that matches anything wins.
pub const CONTENT_CANDIDATES: &[ContentCandidate] = &[
    ContentCandidate { name: "main", selector: "main" },
    ContentCandidate { name: "article", selector: "article" },
    ContentCandidate { name: "role-main", selector: "[role=\"main\"]" },
    ContentCandidate { name: "main-content", selector: ".main-content" },
    ContentCandidate { name: "content-class", selector: ".content" },
    ContentCandidate { name: "content-id", selector: "#content" },
    ContentCandidate { name: "documentation-content", selector: ".documentation-content" },
    ContentCandidate { name: "doc-content", selector: ".doc-content" },
];

/// Which strategy produced the main content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// A named entry of [`CONTENT_CANDIDATES`]
    Candidate(&'static str),
    /// The `<div>` with the most visible text
    LargestContainer,
    /// Nothing better was found
    WholeDocument,
}

/// The subtree treated as the page's main content
#[derive(Debug, Clone, Copy)]
pub struct MainContent<'a> {
    pub element: ElementRef<'a>,
    pub source: ContentSource,
}

/// Locates the main content of a document
///
/// Tries each of [`CONTENT_CANDIDATES`] in order. When none matches, the
/// `<div>` with the longest visible text is used (the first one wins a tie),
/// and when the document has no text-bearing `<div>` at all, the whole
/// document.
pub fn find_main_content(document: &Html) -> MainContent<'_> {
    for candidate in CONTENT_CANDIDATES {
        if let Ok(selector) = Selector::parse(candidate.selector) {
            if let Some(element) = document.select(&selector).next() {
                return MainContent {
                    element,
                    source: ContentSource::Candidate(candidate.name),
                };
            }
        }
    }

    let mut largest: Option<(ElementRef<'_>, usize)> = None;
    if let Ok(div_selector) = Selector::parse("div") {
        for div in document.select(&div_selector) {
            let length = visible_text_len(div);
            if length > largest.map_or(0, |(_, best)| best) {
                largest = Some((div, length));
            }
        }
    }

    match largest {
        Some((element, _)) => MainContent {
            element,
            source: ContentSource::LargestContainer,
        },
        None => MainContent {
            element: document.root_element(),
            source: ContentSource::WholeDocument,
        },
    }
}

/// Collects the text nodes of `element` that a reader would see, in order
pub fn visible_text(element: ElementRef<'_>) -> Vec<&str> {
    let mut pieces = Vec::new();
    push_visible_text(element, &mut pieces);
    pieces
}

fn push_visible_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            pieces.push(&**text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !NON_VISIBLE.contains(&child_element.value().name()) {
                push_visible_text(child_element, pieces);
            }
        }
    }
}

fn visible_text_len(element: ElementRef<'_>) -> usize {
    visible_text(element).iter().map(|t| t.trim().len()).sum()
}

/// Whitespace-separated words of the visible text of `element`
pub fn visible_words(element: ElementRef<'_>) -> Vec<&str> {
    visible_text(element)
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect()
}

/// Groups words into windows of `chunk_size` words joined by single spaces
///
/// The last chunk may be shorter. No words means no chunks. A `chunk_size`
/// of zero is treated as one.
pub fn chunk_words(words: &[&str], chunk_size: usize) -> Vec<String> {
    words
        .chunks(chunk_size.max(1))
        .map(|window| window.join(" "))
        .collect()
}

/// Splits the visible text of `element` into word chunks
pub fn chunk_text(element: ElementRef<'_>, chunk_size: usize) -> Vec<String> {
    chunk_words(&visible_words(element), chunk_size)
}
