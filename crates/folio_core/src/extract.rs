//! Title and excerpt extraction from raw post markdown.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::UNTITLED;

const ELLIPSIS: char = '…';

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("title pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+?)`").expect("inline code pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?)\]\(.+?\)").expect("link pattern"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br\s*/?>").expect("line break pattern"));

/// Text of the first level-1 heading, or "Untitled".
pub fn extract_title(markdown: &str) -> String {
    TITLE
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|title| title.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Plain-text excerpt of the body prose, at most `max_chars` characters plus
/// a trailing ellipsis.
pub fn extract_excerpt(markdown: &str, max_chars: usize) -> String {
    let mut excerpt = String::new();
    let mut excerpt_len = 0usize;
    let mut in_code_block = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block || is_skipped_line(trimmed) {
            continue;
        }

        let clean = strip_inline_markup(trimmed);
        let clean = clean.trim();
        if clean.is_empty() {
            continue;
        }
        if !excerpt.is_empty() {
            excerpt.push(' ');
            excerpt_len += 1;
        }
        excerpt.push_str(clean);
        excerpt_len += clean.chars().count();
        if excerpt_len >= max_chars {
            break;
        }
    }

    if excerpt_len > max_chars {
        let mut truncated = excerpt
            .chars()
            .take(max_chars)
            .collect::<String>()
            .trim()
            .to_string();
        truncated.push(ELLIPSIS);
        return truncated;
    }
    excerpt
}

fn is_skipped_line(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with('|')
        || trimmed.starts_with("![")
        || trimmed.starts_with('<')
        || trimmed.starts_with("- **")
        || trimmed.starts_with("- `")
}

fn strip_inline_markup(line: &str) -> String {
    let text = BOLD.replace_all(line, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    LINE_BREAK.replace_all(&text, " ").into_owned()
}
