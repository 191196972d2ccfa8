use kuchikikiki::NodeRef;

use crate::dom::{ContentDoc, element, escape_html_text};

/// Tag badges right after the first `h1`. Returns the inserted list so later
/// processors can position themselves against it.
pub fn insert_post_tags(doc: &ContentDoc, tags: &[String]) -> Option<NodeRef> {
    if tags.is_empty() {
        return None;
    }
    let badges = tags
        .iter()
        .map(|tag| format!("<span class=\"blog-post-tag\">{}</span>", escape_html_text(tag)))
        .collect::<String>();
    let node = element(&format!("<div class=\"blog-post-tags\">{badges}</div>"))?;
    doc.insert_after_first_of(&["h1"], node.clone());
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn inserts_after_heading() {
        let doc = ContentDoc::from_html("<h1>Title</h1><p>Body</p>");
        insert_post_tags(&doc, &tags(&["rust", "<b>"]));
        assert_eq!(
            doc.to_html(),
            "<h1>Title</h1><div class=\"blog-post-tags\"><span class=\"blog-post-tag\">rust</span>\
<span class=\"blog-post-tag\">&lt;b&gt;</span></div><p>Body</p>"
        );
    }

    #[test]
    fn inserts_at_start_without_heading() {
        let doc = ContentDoc::from_html("<p>Body</p>");
        insert_post_tags(&doc, &tags(&["intro"]));
        assert!(doc.to_html().starts_with("<div class=\"blog-post-tags\">"));
    }

    #[test]
    fn no_tags_is_a_no_op() {
        let doc = ContentDoc::from_html("<h1>Title</h1>");
        insert_post_tags(&doc, &[]);
        assert_eq!(doc.to_html(), "<h1>Title</h1>");
    }

    #[test]
    fn author_markup_with_the_same_class_does_not_suppress_badges() {
        let doc = ContentDoc::from_html("<h1>Title</h1><div class=\"blog-post-tags\">x</div>");
        let inserted = insert_post_tags(&doc, &tags(&["intro"])).expect("inserted");
        assert_eq!(doc.all(".blog-post-tags").len(), 2);
        assert!(doc.to_html().starts_with(
            "<h1>Title</h1><div class=\"blog-post-tags\"><span class=\"blog-post-tag\">intro</span>"
        ));
        assert_eq!(inserted.text_contents(), "intro");
    }
}
