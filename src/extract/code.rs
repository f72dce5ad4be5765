use crate::extract::Snippet;
use scraper::{ElementRef, Selector};

/// Language named by a `language-*` or `lang-*` class token
fn language_from_classes(element: ElementRef<'_>) -> Option<String> {
    element.value().classes().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

fn is_element(element: Option<ElementRef<'_>>, name: &str) -> bool {
    element.is_some_and(|e| e.value().name() == name)
}

/// Extracts block code snippets from `content`
///
/// A `<code>` outside a `<pre>` is inline and skipped. A `<pre>` that wraps
/// a `<code>` element is represented by that `<code>`, so each block yields
/// exactly one snippet. The language comes from the element's own classes,
/// falling back to those of its `<pre>` parent.
pub fn extract_code_snippets(content: ElementRef<'_>) -> Vec<Snippet> {
    let Ok(selector) = Selector::parse("pre, code") else {
        return Vec::new();
    };

    let mut snippets = Vec::new();
    for block in content.select(&selector) {
        let parent = parent_element(block);

        let language = match block.value().name() {
            "code" => {
                if !is_element(parent, "pre") {
                    continue;
                }
                language_from_classes(block).or_else(|| parent.and_then(language_from_classes))
            }
            _ => {
                let wraps_code = block
                    .children()
                    .filter_map(ElementRef::wrap)
                    .any(|child| child.value().name() == "code");
                if wraps_code {
                    continue;
                }
                language_from_classes(block)
            }
        };

        snippets.push(Snippet {
            language,
            code: block.text().collect(),
        });
    }

    snippets
}
