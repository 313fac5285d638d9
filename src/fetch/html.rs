//! Reduce an HTML page to its visible text.

use scraper::Html;

/// Elements whose text content is never rendered.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Visible text of an HTML document.
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined with a
/// single space in document order.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut fragments: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let fragment = text.trim();
        if !fragment.is_empty() {
            fragments.push(fragment);
        }
    }

    fragments.join(" ")
}
