use std::collections::BTreeSet;

use futures::future::join_all;

use crate::dom::{ContentDoc, element, escape_attr, escape_html_text};
use crate::fetch::fetch_post_title;
use crate::lang::Strings;
use crate::model::PostSummary;
use crate::source::ContentSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored<'a> {
    pub post: &'a PostSummary,
    pub shared_tags: usize,
}

/// Every other post ranked by shared tag count, then by date. Dates compare
/// as strings, so they must be zero-padded and fixed width.
pub fn rank<'a>(posts: &'a [PostSummary], current: &PostSummary, limit: usize) -> Vec<Scored<'a>> {
    let mut scored = posts
        .iter()
        .filter(|post| post.id != current.id)
        .map(|post| Scored {
            post,
            shared_tags: post
                .tags
                .iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|tag| current.tags.contains(tag))
                .count(),
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| {
        b.shared_tags
            .cmp(&a.shared_tags)
            .then_with(|| b.post.date.cmp(&a.post.date))
    });
    scored.truncate(limit);
    scored
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLink {
    pub id: String,
    pub date: String,
    pub emoji: String,
    pub title: String,
}

/// One title fetch per entry, all in flight together; a failed fetch only
/// costs that entry its title.
pub async fn resolve_related<S: ContentSource>(
    source: &S,
    posts_dir: &str,
    ranked: &[Scored<'_>],
    language_code: &str,
) -> Vec<RelatedLink> {
    join_all(ranked.iter().map(|entry| async move {
        RelatedLink {
            id: entry.post.id.clone(),
            date: entry.post.date.clone(),
            emoji: entry.post.emoji.clone(),
            title: fetch_post_title(source, posts_dir, entry.post, language_code).await,
        }
    }))
    .await
}

pub fn insert_related_posts(doc: &ContentDoc, related: &[RelatedLink], strings: &Strings) {
    if related.is_empty() {
        return;
    }
    let items = related
        .iter()
        .map(|link| {
            format!(
                "<li><a href=\"#post/{id}\" class=\"blog-related-link\" data-post-id=\"{id}\">\
<span class=\"blog-related-emoji\">{emoji}</span><span class=\"blog-related-title\">{title}</span>\
<span class=\"blog-related-date\">{date}</span></a></li>",
                id = escape_attr(&link.id),
                emoji = escape_html_text(&link.emoji),
                title = escape_html_text(&link.title),
                date = escape_html_text(&link.date),
            )
        })
        .collect::<String>();
    let html = format!(
        "<section class=\"blog-related\"><p class=\"blog-related-heading\">{}</p>\
<ul class=\"blog-related-list\">{items}</ul></section>",
        escape_html_text(strings.related_heading)
    );
    if let Some(node) = element(&html) {
        doc.append(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;

    fn post(id: &str, date: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            id: id.to_string(),
            date: date.to_string(),
            emoji: "📝".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            base_filename: id.to_string(),
        }
    }

    fn ranked_ids(ranked: &[Scored<'_>]) -> Vec<(String, usize)> {
        ranked
            .iter()
            .map(|entry| (entry.post.id.clone(), entry.shared_tags))
            .collect()
    }

    #[test]
    fn ranks_by_shared_tags_then_date() {
        let current = post("cur", "2026.03.01", &["rust", "cache"]);
        let posts = vec![
            current.clone(),
            post("X", "2026.01.01", &["rust"]),
            post("Y", "2025.12.01", &["rust", "cache"]),
            post("Z", "2026.02.01", &[]),
        ];
        assert_eq!(
            ranked_ids(&rank(&posts, &current, 3)),
            vec![
                ("Y".to_string(), 2),
                ("X".to_string(), 1),
                ("Z".to_string(), 0)
            ]
        );
    }

    #[test]
    fn equal_scores_prefer_newer_and_limit_applies() {
        let current = post("cur", "2026.03.01", &["rust"]);
        let posts = vec![
            post("old", "2024.01.01", &["rust"]),
            current.clone(),
            post("new", "2025.06.01", &["rust"]),
            post("mid", "2025.01.01", &["rust"]),
        ];
        let ranked = rank(&posts, &current, 2);
        assert_eq!(
            ranked_ids(&ranked),
            vec![("new".to_string(), 1), ("mid".to_string(), 1)]
        );
    }

    #[test]
    fn repeated_tags_count_once() {
        let current = post("cur", "2026.03.01", &["rust", "cache"]);
        let posts = vec![
            current.clone(),
            post("dup", "2026.02.01", &["rust", "rust", "rust"]),
            post("both", "2025.01.01", &["rust", "cache"]),
        ];
        assert_eq!(
            ranked_ids(&rank(&posts, &current, 3)),
            vec![("both".to_string(), 2), ("dup".to_string(), 1)]
        );
    }

    #[test]
    fn lone_post_has_nothing_related() {
        let current = post("cur", "2026.03.01", &["rust"]);
        let posts = vec![current.clone()];
        assert!(rank(&posts, &current, 3).is_empty());
        let doc = ContentDoc::from_html("<h1>T</h1>");
        insert_related_posts(&doc, &[], Lang::En.strings());
        assert!(doc.first(".blog-related").is_none());
    }

    #[test]
    fn appends_section() {
        let doc = ContentDoc::from_html("<h1>T</h1>");
        let links = vec![RelatedLink {
            id: "y".to_string(),
            date: "2025.12.01".to_string(),
            emoji: "🦀".to_string(),
            title: "Why".to_string(),
        }];
        insert_related_posts(&doc, &links, Lang::En.strings());
        let html = doc.to_html();
        assert!(html.starts_with("<h1>T</h1><section class=\"blog-related\">"));
        assert!(html.contains("Related posts"));
        assert!(html.contains("href=\"#post/y\""));
    }
}
