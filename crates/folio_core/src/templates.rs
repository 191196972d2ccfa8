use anyhow::{Context, Result};
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use crate::lang::{Lang, Strings};
use crate::model::PostCard;
use crate::view::Page;

const GRID_TEMPLATE: &str = include_str!("../templates/grid.html");
const TAG_FILTER_TEMPLATE: &str = include_str!("../templates/tag_filter.html");
const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");

/// Card banner backgrounds, cycled by position in the grid.
pub const BANNER_GRADIENTS: [&str; 8] = [
    "linear-gradient(135deg, #6366f1 0%, #8b5cf6 50%, #a855f7 100%)",
    "linear-gradient(135deg, #3b82f6 0%, #6366f1 50%, #8b5cf6 100%)",
    "linear-gradient(135deg, #06b6d4 0%, #3b82f6 50%, #6366f1 100%)",
    "linear-gradient(135deg, #8b5cf6 0%, #ec4899 50%, #f43f5e 100%)",
    "linear-gradient(135deg, #10b981 0%, #06b6d4 50%, #3b82f6 100%)",
    "linear-gradient(135deg, #f59e0b 0%, #ef4444 50%, #ec4899 100%)",
    "linear-gradient(135deg, #6366f1 0%, #06b6d4 50%, #10b981 100%)",
    "linear-gradient(135deg, #ec4899 0%, #8b5cf6 50%, #6366f1 100%)",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CardView<'a> {
    pub id: &'a str,
    pub date: &'a str,
    pub emoji: &'a str,
    pub tags: &'a [String],
    pub title: &'a str,
    pub excerpt: &'a str,
    pub gradient: &'static str,
    pub hero: bool,
}

/// Cards carrying `active_tag` (all of them without a filter). The first card
/// is the hero only on the unfiltered grid.
pub fn card_views<'a>(cards: &'a [PostCard], active_tag: Option<&str>) -> Vec<CardView<'a>> {
    cards
        .iter()
        .filter(|card| active_tag.is_none_or(|tag| card.tags.iter().any(|t| t == tag)))
        .enumerate()
        .map(|(index, card)| CardView {
            id: &card.id,
            date: &card.date,
            emoji: &card.emoji,
            tags: &card.tags,
            title: &card.title,
            excerpt: &card.excerpt,
            gradient: BANNER_GRADIENTS[index % BANNER_GRADIENTS.len()],
            hero: index == 0 && active_tag.is_none(),
        })
        .collect()
}

fn template_env() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env.add_template("grid.html", GRID_TEMPLATE)?;
    env.add_template("tag_filter.html", TAG_FILTER_TEMPLATE)?;
    env.add_template("page.html", PAGE_TEMPLATE)?;
    Ok(env)
}

pub fn render_grid(cards: &[PostCard], active_tag: Option<&str>, strings: &Strings) -> Result<String> {
    let env = template_env()?;
    env.get_template("grid.html")?
        .render(context! {
            cards => card_views(cards, active_tag),
            read_more => strings.read_more,
            no_posts => strings.no_posts,
        })
        .context("failed to render post grid template")
}

pub fn render_tag_filter(tags: &[String], active_tag: Option<&str>, strings: &Strings) -> Result<String> {
    let env = template_env()?;
    env.get_template("tag_filter.html")?
        .render(context! {
            tags => tags,
            active_tag => active_tag,
            all_label => strings.all_tags,
        })
        .context("failed to render tag filter template")
}

#[derive(Debug, Clone, Copy)]
pub struct ShellOptions<'a> {
    pub lang: Lang,
    pub blog_href: &'a str,
    /// Turns `#post/<id>` fragment changes into `/post/<id>` page loads, for
    /// the preview server.
    pub follow_fragments: bool,
}

/// The whole page as a standalone document.
pub fn render_page(page: &Page, options: ShellOptions<'_>) -> Result<String> {
    let env = template_env()?;
    env.get_template("page.html")?
        .render(context! {
            page => page,
            lang => options.lang.code(),
            blog_href => options.blog_href,
            follow_fragments => options.follow_fragments,
        })
        .context("failed to render page template")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, tags: &[&str], title: &str) -> PostCard {
        PostCard {
            id: id.to_string(),
            date: "2024.01.01".to_string(),
            emoji: "📝".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            title: title.to_string(),
            excerpt: "excerpt".to_string(),
        }
    }

    #[test]
    fn first_card_is_hero_only_without_filter() {
        let cards = vec![card("a", &["rust"], "A"), card("b", &["web"], "B")];
        let views = card_views(&cards, None);
        assert!(views[0].hero);
        assert!(!views[1].hero);
        assert_eq!(views[1].gradient, BANNER_GRADIENTS[1]);

        let filtered = card_views(&cards, Some("web"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
        assert!(!filtered[0].hero);
        assert_eq!(filtered[0].gradient, BANNER_GRADIENTS[0]);
    }

    #[test]
    fn gradients_cycle() {
        let cards = (0..9).map(|i| card(&format!("p{i}"), &[], "T")).collect::<Vec<_>>();
        let views = card_views(&cards, None);
        assert_eq!(views[8].gradient, views[0].gradient);
    }

    #[test]
    fn grid_escapes_titles() {
        let cards = vec![card("a", &[], "<b>bold</b>")];
        let html = render_grid(&cards, None, Lang::En.strings()).expect("render grid");
        assert!(html.contains("&lt;b&gt;bold&lt;"));
        assert!(html.contains("blog-hero-card"));
        assert!(html.contains("Read more"));
    }

    #[test]
    fn empty_grid_says_so() {
        let html = render_grid(&[], None, Lang::Ja.strings()).expect("render grid");
        assert!(html.contains("No posts found."));
    }

    #[test]
    fn filter_marks_active_tag() {
        let tags = vec!["rust".to_string(), "web".to_string()];
        let html = render_tag_filter(&tags, Some("web"), Lang::En.strings()).expect("render filter");
        assert!(html.contains("<button type=\"button\" class=\"filter-tag\" data-tag=\"all\">All</button>"));
        assert!(html.contains("class=\"filter-tag active\" data-tag=\"web\""));
    }
}
