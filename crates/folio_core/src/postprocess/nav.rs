use crate::dom::{ContentDoc, element, escape_attr, escape_html_text};
use crate::fetch::fetch_post_title;
use crate::index::position_of;
use crate::lang::Strings;
use crate::model::PostSummary;
use crate::source::ContentSource;

/// Posts adjacent to the current one. The index is newest first, so the
/// previous post is the older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbours<'a> {
    pub previous: Option<&'a PostSummary>,
    pub next: Option<&'a PostSummary>,
}

/// `None` when `post_id` is not in the index.
pub fn neighbours<'a>(posts: &'a [PostSummary], post_id: &str) -> Option<Neighbours<'a>> {
    let index = position_of(posts, post_id)?;
    Some(Neighbours {
        previous: posts.get(index + 1),
        next: index.checked_sub(1).and_then(|newer| posts.get(newer)),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLinks {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl NavLinks {
    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}

async fn nav_link<S: ContentSource>(
    source: &S,
    posts_dir: &str,
    post: Option<&PostSummary>,
    language_code: &str,
) -> Option<NavLink> {
    let post = post?;
    Some(NavLink {
        id: post.id.clone(),
        title: fetch_post_title(source, posts_dir, post, language_code).await,
    })
}

/// Fetches both titles at once.
pub async fn resolve_nav_links<S: ContentSource>(
    source: &S,
    posts_dir: &str,
    around: Neighbours<'_>,
    language_code: &str,
) -> NavLinks {
    let (previous, next) = futures::join!(
        nav_link(source, posts_dir, around.previous, language_code),
        nav_link(source, posts_dir, around.next, language_code),
    );
    NavLinks { previous, next }
}

fn link_html(link: Option<&NavLink>, modifier: &str, label: &str) -> String {
    match link {
        Some(link) => format!(
            "<a href=\"#post/{id}\" class=\"blog-prev-next-link blog-prev-next-link--{modifier}\" \
data-post-id=\"{id}\"><span class=\"blog-prev-next-label\">{label}</span>\
<span class=\"blog-prev-next-title\">{title}</span></a>",
            id = escape_attr(&link.id),
            label = escape_html_text(label),
            title = escape_html_text(&link.title),
        ),
        None => "<span></span>".to_string(),
    }
}

/// Appends the previous/next bar. A single post has no neighbours and gets
/// no bar.
pub fn insert_prev_next_nav(doc: &ContentDoc, links: &NavLinks, strings: &Strings) {
    if links.is_empty() {
        return;
    }
    let html = format!(
        "<nav class=\"blog-prev-next\" aria-label=\"{}\">{}{}</nav>",
        escape_attr(strings.nav_label),
        link_html(links.previous.as_ref(), "prev", strings.prev_label),
        link_html(links.next.as_ref(), "next", strings.next_label),
    );
    if let Some(node) = element(&html) {
        doc.append(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;

    fn post(id: &str) -> PostSummary {
        PostSummary {
            id: id.to_string(),
            date: "2024-01-01".to_string(),
            emoji: "📝".to_string(),
            tags: Vec::new(),
            base_filename: id.to_string(),
        }
    }

    fn ids(around: Neighbours<'_>) -> (Option<&str>, Option<&str>) {
        (
            around.previous.map(|p| p.id.as_str()),
            around.next.map(|p| p.id.as_str()),
        )
    }

    #[test]
    fn newest_post_has_no_next() {
        let posts = vec![post("c"), post("b"), post("a")];
        let around = neighbours(&posts, "c").expect("in index");
        assert_eq!(ids(around), (Some("b"), None));
    }

    #[test]
    fn oldest_post_has_no_previous() {
        let posts = vec![post("c"), post("b"), post("a")];
        let around = neighbours(&posts, "a").expect("in index");
        assert_eq!(ids(around), (None, Some("b")));
        let middle = neighbours(&posts, "b").expect("in index");
        assert_eq!(ids(middle), (Some("a"), Some("c")));
    }

    #[test]
    fn unknown_post_has_no_neighbours() {
        let posts = vec![post("a")];
        assert!(neighbours(&posts, "zzz").is_none());
        let only = neighbours(&posts, "a").expect("in index");
        assert_eq!(ids(only), (None, None));
    }

    #[test]
    fn renders_placeholder_for_missing_side() {
        let doc = ContentDoc::from_html("<h1>T</h1>");
        let links = NavLinks {
            previous: None,
            next: Some(NavLink {
                id: "newer".to_string(),
                title: "Newer <post>".to_string(),
            }),
        };
        insert_prev_next_nav(&doc, &links, Lang::En.strings());
        let html = doc.to_html();
        assert!(html.contains("<nav class=\"blog-prev-next\" aria-label=\"Article navigation\"><span></span><a href=\"#post/newer\""));
        assert!(html.contains("blog-prev-next-link--next"));
        assert!(html.contains("Newer &lt;post&gt;"));
    }

    #[test]
    fn no_neighbours_no_bar() {
        let doc = ContentDoc::from_html("<h1>T</h1>");
        insert_prev_next_nav(&doc, &NavLinks::default(), Lang::Ja.strings());
        assert!(doc.first(".blog-prev-next").is_none());
    }
}
