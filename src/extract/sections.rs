use crate::extract::{collapse_whitespace, content::visible_words, Section};
use scraper::{ElementRef, Selector};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    HEADINGS
        .iter()
        .position(|h| *h == element.value().name())
        .map(|idx| idx as u8 + 1)
}

/// Extracts one [`Section`] per heading in `content`, in document order
///
/// A section's body is the text of the heading's following siblings, up to
/// the next sibling heading of any level. Text nested deeper than the
/// heading's own parent does not belong to it.
pub fn extract_sections(content: ElementRef<'_>) -> Vec<Section> {
    let Ok(selector) = Selector::parse("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    content
        .select(&selector)
        .filter_map(|heading| {
            let level = heading_level(heading)?;
            let title = collapse_whitespace(&heading.text().collect::<String>());
            let anchor_id = heading
                .value()
                .attr("id")
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string);

            let mut parts: Vec<String> = Vec::new();
            for sibling in heading.next_siblings() {
                if let Some(element) = ElementRef::wrap(sibling) {
                    if heading_level(element).is_some() {
                        break;
                    }
                    let text = visible_words(element).join(" ");
                    if !text.is_empty() {
                        parts.push(text);
                    }
                } else if let Some(text) = sibling.value().as_text() {
                    let text = collapse_whitespace(text);
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
            }

            Some(Section {
                level,
                title,
                anchor_id,
                body_text: parts.join(" "),
            })
        })
        .collect()
}
