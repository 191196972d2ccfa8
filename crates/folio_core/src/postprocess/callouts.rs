use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{ContentDoc, element, first_in, inner_html};

static CALLOUT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\[!(info|tip|warning|danger|memo)\]\s*(.*)").expect("callout regex")
});

pub fn callout_icon(kind: &str) -> &'static str {
    match kind {
        "info" => "ℹ️",
        "tip" => "💡",
        "warning" => "⚠️",
        "danger" => "🚫",
        "memo" => "📝",
        _ => "📌",
    }
}

/// Splits a paragraph's inner markup into the callout type and the rest.
pub fn parse_callout_marker(paragraph_html: &str) -> Option<(String, String)> {
    let captures = CALLOUT_MARKER.captures(paragraph_html)?;
    Some((
        captures[1].to_ascii_lowercase(),
        captures.get(2).map_or("", |m| m.as_str()).to_string(),
    ))
}

/// `> [!tip] text` blockquotes become callout boxes. Innermost quotes go
/// first so a nested callout is already converted when its parent is
/// rebuilt.
pub fn convert_callouts(doc: &ContentDoc) {
    for quote in doc.all("blockquote").into_iter().rev() {
        let Some(first_paragraph) = first_in(&quote, "p") else {
            continue;
        };
        let Some((kind, rest)) = parse_callout_marker(&inner_html(&first_paragraph)) else {
            continue;
        };
        let following = quote
            .children()
            .skip_while(|child| *child != first_paragraph)
            .skip(1)
            .map(|child| child.to_string())
            .collect::<String>();
        let html = format!(
            "<div class=\"callout callout-{kind}\"><span class=\"callout-icon\">{}</span>\
<div class=\"callout-body\">{rest}{}</div></div>",
            callout_icon(&kind),
            following.trim()
        );
        let Some(callout) = element(&html) else {
            continue;
        };
        quote.insert_before(callout);
        quote.detach();
    }
}
