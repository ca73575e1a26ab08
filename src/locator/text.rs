//! Visible text extraction from parsed HTML.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never renders.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start and end their own line of rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "summary", "table", "tbody", "tfoot", "thead", "tr", "ul",
];

/// Table cells stay on their row's line, separated by a space.
const CELL_ELEMENTS: &[&str] = &["td", "th"];

/// Extract the rendered text of a document's body.
///
/// Inline runs (`<b>`, `<span>`, `<a>`, ...) stay on one line with whitespace
/// collapsed; block elements and `<br>` break lines. Blank lines are dropped.
/// Falls back to the whole document when there is no `<body>`.
pub fn visible_text(document: &Html) -> String {
    let body = Selector::parse("body").expect("static selector should parse");
    let root = document
        .select(&body)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut lines = LineBuilder::default();
    collect_text(root, &mut lines);
    lines.finish()
}

/// Text content of a single element (e.g. a link label), whitespace-collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<String>,
    current: String,
}

impl LineBuilder {
    /// Append inline text, collapsing whitespace runs to one space.
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.current.is_empty() && !self.current.ends_with(' ') {
                    self.current.push(' ');
                }
            } else {
                self.current.push(c);
            }
        }
    }

    fn break_line(&mut self) {
        let line = self.current.trim_end();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut LineBuilder) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_text(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.break_line();
                } else if CELL_ELEMENTS.contains(&name) {
                    out.push_text(" ");
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, out);
                }
                if block {
                    out.break_line();
                }
            }
            _ => {}
        }
    }
}
