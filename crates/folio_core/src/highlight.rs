//! Syntax highlighting of fenced code blocks, applied after post-processing.

use std::cell::RefCell;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use syntect_assets::assets::HighlightingAssets;
use tracing::debug;

use crate::dom::{ContentDoc, classes, fragment, set_attr};
use crate::postprocess::code_labels::code_language;

pub trait Highlighter {
    /// Classed HTML for `code`, or `None` when the language is unknown.
    fn highlight(&self, code: &str, language: &str) -> Option<String>;
}

/// Leaves code blocks as rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight(&self, _code: &str, _language: &str) -> Option<String> {
        None
    }
}

thread_local! {
    // Loaded on first use; most list renders never need it.
    static ASSETS: RefCell<Option<HighlightingAssets>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    theme: String,
}

impl SyntectHighlighter {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Option<String> {
        ASSETS.with(|cell| {
            let mut slot = cell.borrow_mut();
            let assets: &HighlightingAssets = slot.get_or_insert_with(HighlightingAssets::from_binary);
            let syntax_set = assets.get_syntax_set().ok()?;
            let syntax = find_syntax(syntax_set, language)?;
            if find_theme_name(&self.theme, assets.themes()).is_none() {
                debug!(theme = %self.theme, "unknown highlight theme");
                return None;
            }
            let mut generator =
                ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, ClassStyle::Spaced);
            for line in LinesWithEndings::from(code) {
                generator
                    .parse_html_for_line_which_includes_newline(line)
                    .ok()?;
            }
            Some(generator.finalize())
        })
    }
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, language: &str) -> Option<&'a SyntaxReference> {
    let token = language.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }
    let token = match token.as_str() {
        "c++" | "cpp" | "cxx" | "cc" => "cpp",
        "sh" | "shell" | "zsh" => "bash",
        "ts" | "typescript" => "js",
        other => other,
    };
    syntax_set.find_syntax_by_token(token).or_else(|| {
        token
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .and_then(|ext| syntax_set.find_syntax_by_extension(ext))
    })
}

fn find_theme_name<'a>(theme: &str, mut themes: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let wanted = theme.trim();
    if wanted.is_empty() {
        return None;
    }
    themes.find(|name| name.eq_ignore_ascii_case(wanted))
}

/// Replaces the text of every `pre > code` with a known language by
/// highlighted spans. Blocks the highlighter declines stay as they are.
pub fn highlight_code_blocks(doc: &ContentDoc, highlighter: &dyn Highlighter) -> usize {
    if !doc.has_code() {
        return 0;
    }
    let mut highlighted = 0;
    for code in doc.all("pre > code") {
        let code_classes = classes(&code);
        let Some(language) = code_language(&code_classes) else {
            continue;
        };
        let Some(html) = highlighter.highlight(&code.text_contents(), language) else {
            continue;
        };
        while let Some(child) = code.first_child() {
            child.detach();
        }
        for node in fragment(&html) {
            code.append(node);
        }
        let mut updated = code_classes.clone();
        updated.push("highlighted".to_string());
        set_attr(&code, "class", &updated.join(" "));
        highlighted += 1;
    }
    highlighted
}
