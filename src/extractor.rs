//! HTML to plain text.
//!
//! Walks the parsed document and keeps only text a reader would see:
//! `script`, `style`, `noscript` and `template` subtrees are skipped, as are
//! comments.

use scraper::{Html, Node};

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Extract the visible text of a page.
///
/// Text nodes are concatenated in document order, then each line is trimmed
/// and blank lines are dropped. The result may be empty.
pub fn extract_text(markup: &[u8]) -> String {
    let html = String::from_utf8_lossy(markup);
    let document = Html::parse_document(&html);

    let mut raw = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            raw.push_str(text);
        }
    }

    clean_text(&raw)
}

fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
