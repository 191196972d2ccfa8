//! Core post, view, and site models

use serde::Deserialize;

pub const DEFAULT_EMOJI: &str = "📝";
pub const UNTITLED: &str = "Untitled";

/// One entry of the post index manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub date: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "baseFilename")]
    pub base_filename: String,
}

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    /// Renderer output that went through the sanitizer.
    Html(String),
    /// The original markdown, to be inserted as text only.
    PlainText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub excerpt: String,
    pub raw_markdown: String,
    pub rendered: RenderedBody,
}

/// A card of the list grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: String,
    pub date: String,
    pub emoji: String,
    pub tags: Vec<String>,
    pub title: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Single(String),
}

impl View {
    pub fn active_post_id(&self) -> Option<&str> {
        match self {
            View::List => None,
            View::Single(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub blog: BlogConfig,
    pub reading: ReadingConfig,
    pub share: ShareConfig,
    pub render: RenderConfig,
    pub syntax: SyntaxConfig,
}

#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub title: String,
    pub base_url: String,
    pub blog_page: String,
    pub default_language: String,
}

#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub posts_dir: String,
    pub index_path: String,
    pub excerpt_max_chars: usize,
    pub related_max: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadingConfig {
    pub cjk_chars_per_minute: u32,
    pub words_per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct ShareConfig {
    pub intent_url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub heading_ids: bool,
}

#[derive(Debug, Clone)]
pub struct SyntaxConfig {
    pub highlight: bool,
    pub theme: String,
}

impl SiteConfig {
    /// Canonical, shareable URL of a post.
    pub fn post_url(&self, post_id: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let page = self.site.blog_page.trim_start_matches('/');
        format!("{base}/{page}#post/{post_id}")
    }
}
