use kuchikikiki::NodeRef;

use crate::dom::{ContentDoc, attr, element, escape_attr, escape_html_text, set_attr, tag_name};
use crate::lang::Strings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: String,
    pub level: u8,
    pub text: String,
}

/// Gives every `h2`/`h3` an id (`heading-<n>` in document order when it has
/// none) and returns the outline.
pub fn collect_headings(doc: &ContentDoc) -> Vec<TocEntry> {
    doc.all("h2, h3")
        .into_iter()
        .enumerate()
        .map(|(index, heading)| {
            let id = match attr(&heading, "id") {
                Some(id) if !id.trim().is_empty() => id,
                _ => {
                    let id = format!("heading-{index}");
                    set_attr(&heading, "id", &id);
                    id
                }
            };
            let level = match tag_name(&heading).as_deref() {
                Some("h3") => 3,
                _ => 2,
            };
            TocEntry {
                id,
                level,
                text: heading.text_contents().trim().to_string(),
            }
        })
        .collect()
}

/// Inserts a collapsed outline after the tags (or the `h1`) and returns the
/// heading ids for the section tracker. Nothing happens without subheadings.
pub fn generate_toc(doc: &ContentDoc, post_tags: Option<&NodeRef>, strings: &Strings) -> Vec<String> {
    let entries = collect_headings(doc);
    if entries.is_empty() {
        return Vec::new();
    }
    let items = entries
        .iter()
        .map(|entry| {
            format!(
                "<li class=\"toc-h{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                escape_attr(&entry.id),
                escape_html_text(&entry.text)
            )
        })
        .collect::<String>();
    let html = format!(
        "<div class=\"blog-toc\"><div class=\"blog-toc-header\">\
<div class=\"blog-toc-title\"><span class=\"blog-toc-icon\">📑</span>{}</div>\
<span class=\"blog-toc-toggle\">▶</span></div><ul id=\"blog-toc-list\" hidden>{items}</ul></div>",
        escape_html_text(strings.toc_title)
    );
    if let Some(node) = element(&html) {
        match post_tags {
            Some(tags) => tags.insert_after(node),
            None => doc.insert_after_first_of(&["h1"], node),
        }
    }
    entries.into_iter().map(|entry| entry.id).collect()
}
