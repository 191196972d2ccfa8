//! Transformations applied to a rendered post, in a fixed order.
//!
//! Everything that needs the network (neighbour and related titles) is
//! gathered up front by [`gather_auxiliary`]; [`apply`] is then a synchronous
//! pass over the content tree.

pub mod callouts;
pub mod code_labels;
pub mod nav;
pub mod reading_time;
pub mod related;
pub mod share;
pub mod tags;
pub mod toc;

use crate::dom::ContentDoc;
use crate::host::ShareData;
use crate::lang::Lang;
use crate::model::{PostSummary, SiteConfig};
use crate::source::ContentSource;

use self::nav::{NavLinks, neighbours, resolve_nav_links};
use self::related::{RelatedLink, rank, resolve_related};

/// What the processors know about the post being shown.
#[derive(Debug, Clone, Copy)]
pub struct PostContext<'a> {
    pub post: &'a PostSummary,
    pub posts: &'a [PostSummary],
    pub markdown: &'a str,
    pub title: &'a str,
    pub lang: Lang,
    pub config: &'a SiteConfig,
    pub native_share: bool,
}

impl PostContext<'_> {
    pub fn share_data(&self) -> ShareData {
        ShareData {
            title: self.title.to_string(),
            url: self.config.post_url(&self.post.id),
        }
    }
}

/// Titles of the neighbouring and related posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auxiliary {
    pub nav: NavLinks,
    pub related: Vec<RelatedLink>,
}

pub async fn gather_auxiliary<S: ContentSource>(source: &S, ctx: &PostContext<'_>) -> Auxiliary {
    let posts_dir = ctx.config.blog.posts_dir.as_str();
    let lang = ctx.lang.code();
    let ranked = rank(ctx.posts, ctx.post, ctx.config.blog.related_max);
    let nav = async {
        match neighbours(ctx.posts, &ctx.post.id) {
            Some(around) => resolve_nav_links(source, posts_dir, around, lang).await,
            None => NavLinks::default(),
        }
    };
    let (nav, related) = futures::join!(nav, resolve_related(source, posts_dir, &ranked, lang));
    Auxiliary { nav, related }
}

/// Runs every processor and returns the ids of the headings listed in the
/// table of contents.
pub fn apply(doc: &ContentDoc, ctx: &PostContext<'_>, aux: &Auxiliary) -> Vec<String> {
    let strings = ctx.lang.strings();
    let post_tags = tags::insert_post_tags(doc, &ctx.post.tags);
    reading_time::insert_reading_time(
        doc,
        post_tags.as_ref(),
        ctx.markdown,
        &ctx.config.reading,
        strings,
    );
    let heading_ids = toc::generate_toc(doc, post_tags.as_ref(), strings);
    code_labels::add_code_labels(doc);
    callouts::convert_callouts(doc);
    nav::insert_prev_next_nav(doc, &aux.nav, strings);
    related::insert_related_posts(doc, &aux.related, strings);
    share::insert_share_buttons(
        doc,
        &ctx.share_data(),
        &ctx.config.share.intent_url,
        ctx.native_share,
        strings,
    );
    heading_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_site_config;

    fn post(id: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            id: id.to_string(),
            date: "2024.01.01".to_string(),
            emoji: "📝".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            base_filename: id.to_string(),
        }
    }

    #[test]
    fn elements_land_in_reading_order() {
        let config = parse_site_config("site:\n  title: T\n  base_url: https://example.com\n")
            .expect("config");
        let posts = vec![post("p1", &["intro"])];
        let markdown = "# Hello\n\n## Part\n\ntext";
        let ctx = PostContext {
            post: &posts[0],
            posts: &posts,
            markdown,
            title: "Hello",
            lang: Lang::En,
            config: &config,
            native_share: false,
        };
        let doc = ContentDoc::from_html("<h1>Hello</h1><h2>Part</h2><p>text</p>");
        let ids = apply(&doc, &ctx, &Auxiliary::default());
        assert_eq!(ids, vec!["heading-0"]);
        let html = doc.to_html();
        let order = ["<h1>", "reading-time", "blog-post-tags", "blog-toc", "<h2", "blog-share"]
            .map(|needle| html.find(needle).unwrap_or(usize::MAX));
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{html}");
        assert!(html.contains("https%3A%2F%2Fexample.com%2Fblog.html%23post%2Fp1"));
    }
}
