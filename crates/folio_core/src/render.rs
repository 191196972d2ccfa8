use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use pulldown_cmark_toc::{GitHubSlugifier, Slugify};
use tracing::error;

use crate::dom::{escape_attr, escape_html_text};
use crate::extract::{extract_excerpt, extract_title};
use crate::model::{PostContent, RenderedBody};
use crate::sanitize::Sanitizer;

/// Markdown to HTML. Output is untrusted until sanitized.
pub trait MarkdownRenderer {
    fn render(&self, md: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkRenderer {
    pub heading_ids: bool,
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, md: &str) -> String {
        render_markdown_to_html(md, self.heading_ids)
    }
}

/// Renders and sanitizes. Without a sanitizer the original markdown comes back
/// as plain text; unsanitized renderer output is never returned.
pub fn render_markdown(
    md: &str,
    renderer: &dyn MarkdownRenderer,
    sanitizer: &dyn Sanitizer,
) -> RenderedBody {
    let raw_html = renderer.render(md);
    match sanitizer.clean(&raw_html) {
        Some(html) => RenderedBody::Html(html),
        None => {
            error!("sanitizer unavailable, rendering post as plain text");
            RenderedBody::PlainText(md.to_string())
        }
    }
}

/// Everything derived from one fetched markdown file.
pub fn build_post_content(
    markdown: String,
    excerpt_max_chars: usize,
    renderer: &dyn MarkdownRenderer,
    sanitizer: &dyn Sanitizer,
) -> PostContent {
    PostContent {
        title: extract_title(&markdown),
        excerpt: extract_excerpt(&markdown, excerpt_max_chars),
        rendered: render_markdown(&markdown, renderer, sanitizer),
        raw_markdown: markdown,
    }
}

pub fn render_markdown_to_html(md: &str, heading_ids: bool) -> String {
    let mut cmark_options = Options::empty();
    cmark_options.insert(Options::ENABLE_TABLES);
    cmark_options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(md, cmark_options);
    let mut events = Vec::new();
    let mut code_pending: Option<CodeBlockPending> = None;
    let mut heading_pending: Option<HeadingPending> = None;
    let mut slugger = GitHubSlugifier::default();

    for event in parser {
        if let Some(heading) = heading_pending.as_mut() {
            match event {
                Event::End(TagEnd::Heading(_)) => {
                    let level_num = heading_level_value(heading.level);
                    let slug = slugger.slugify(heading.text.trim()).into_owned();
                    let mut inner = String::new();
                    html::push_html(&mut inner, heading.events.drain(..));
                    let html = format!(
                        "<h{level_num} id=\"{}\">{inner}</h{level_num}>",
                        escape_attr(&slug)
                    );
                    events.push(Event::Html(html.into()));
                    heading_pending = None;
                }
                Event::Text(text) => {
                    heading.text.push_str(&text);
                    heading.events.push(Event::Text(text));
                }
                Event::Code(text) => {
                    heading.text.push_str(&text);
                    heading.events.push(Event::Code(text));
                }
                Event::SoftBreak | Event::HardBreak => {
                    if !heading.text.ends_with(' ') {
                        heading.text.push(' ');
                    }
                    heading.events.push(event);
                }
                _ => {
                    heading.events.push(event);
                }
            }
            continue;
        }

        if let Some(code) = code_pending.as_mut() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    events.push(Event::Html(render_code_block_html(code).into()));
                    code_pending = None;
                }
                Event::Text(text) | Event::Code(text) => {
                    code.code.push_str(&text);
                }
                Event::SoftBreak | Event::HardBreak => {
                    code.code.push('\n');
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) if heading_ids => {
                heading_pending = Some(HeadingPending {
                    level,
                    text: String::new(),
                    events: Vec::new(),
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => extract_language(info.as_ref()),
                    CodeBlockKind::Indented => String::new(),
                };
                code_pending = Some(CodeBlockPending {
                    language,
                    code: String::new(),
                });
            }
            _ => events.push(event),
        }
    }

    let mut html_out = String::new();
    html::push_html(&mut html_out, events.into_iter());
    html_out
}

struct CodeBlockPending {
    language: String,
    code: String,
}

struct HeadingPending<'a> {
    level: HeadingLevel,
    text: String,
    events: Vec<Event<'a>>,
}

fn extract_language(info: &str) -> String {
    info.split_whitespace().next().unwrap_or("").to_string()
}

fn heading_level_value(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn sanitize_language(language: &str) -> String {
    language
        .trim()
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+'))
        .collect()
}

fn render_code_block_html(pending: &CodeBlockPending) -> String {
    let language = sanitize_language(&pending.language);
    let escaped = escape_html_text(&pending.code);
    if language.is_empty() {
        format!("<pre><code>{escaped}</code></pre>\n")
    } else {
        format!("<pre><code class=\"language-{language}\">{escaped}</code></pre>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::{AmmoniaSanitizer, Unavailable};

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown_to_html("# Title\n\nHello **world**.\n", false);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Hello <strong>world</strong>.</p>"));
    }

    #[test]
    fn renders_tables_and_strikethrough() {
        let html = render_markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n", false);
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn headings_receive_slug_ids_when_enabled() {
        let html = render_markdown_to_html("# Title\n\n## Section Two\n", true);
        assert!(html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(html.contains("<h2 id=\"section-two\">Section Two</h2>"));
    }

    #[test]
    fn fenced_code_carries_language_class() {
        let html = render_markdown_to_html("```Rust extra\nfn main() { \"<&>\" }\n```\n", false);
        assert!(html.contains("<pre><code class=\"language-rust\">"));
        assert!(html.contains("&lt;&amp;&gt;"));
    }

    #[test]
    fn indented_code_has_no_language() {
        let html = render_markdown_to_html("    plain code\n", false);
        assert!(html.contains("<pre><code>plain code"));
    }

    #[test]
    fn missing_sanitizer_falls_back_to_plain_text() {
        let md = "# Title\n\n<script>alert(1)</script>\n";
        let body = render_markdown(md, &CmarkRenderer::default(), &Unavailable);
        assert_eq!(body, RenderedBody::PlainText(md.to_string()));
    }

    #[test]
    fn post_content_carries_title_and_excerpt() {
        let content = build_post_content(
            "# Hello\n\nFirst line.\n".to_string(),
            70,
            &CmarkRenderer::default(),
            &AmmoniaSanitizer::new(),
        );
        assert_eq!(content.title, "Hello");
        assert_eq!(content.excerpt, "First line.");
        assert!(content.raw_markdown.starts_with("# Hello"));
    }

    #[test]
    fn sanitized_output_is_html() {
        let body = render_markdown(
            "# Title\n",
            &CmarkRenderer::default(),
            &AmmoniaSanitizer::new(),
        );
        assert!(matches!(body, RenderedBody::Html(html) if html.contains("<h1>Title</h1>")));
    }
}
