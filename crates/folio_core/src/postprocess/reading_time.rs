use kuchikikiki::NodeRef;

use crate::dom::{ContentDoc, element, escape_html_text};
use crate::lang::Strings;
use crate::model::ReadingConfig;

/// Common CJK ideographs, kana and punctuation, plus compatibility ideographs.
fn is_cjk(ch: char) -> bool {
    matches!(ch, '\u{3000}'..='\u{9fff}' | '\u{f900}'..='\u{faff}')
}

/// Logographic characters and Latin words are read at separate speeds; the
/// two times add up and round up to whole minutes.
pub fn estimate_minutes(markdown: &str, reading: &ReadingConfig) -> u32 {
    let cjk_chars = markdown.chars().filter(|ch| is_cjk(*ch)).count();
    let latin = markdown
        .chars()
        .filter(|ch| !is_cjk(*ch))
        .collect::<String>();
    let words = latin.split_whitespace().count();
    let minutes = cjk_chars as f64 / f64::from(reading.cjk_chars_per_minute)
        + words as f64 / f64::from(reading.words_per_minute);
    minutes.ceil() as u32
}

/// Goes before the tag list when there is one (`post_tags`), else right
/// after the `h1`.
pub fn insert_reading_time(
    doc: &ContentDoc,
    post_tags: Option<&NodeRef>,
    markdown: &str,
    reading: &ReadingConfig,
    strings: &Strings,
) {
    let label = strings.reading_time(estimate_minutes(markdown, reading));
    let Some(node) = element(&format!(
        "<div class=\"reading-time\"><span class=\"reading-time-icon\">⏱</span> {}</div>",
        escape_html_text(&label)
    )) else {
        return;
    };
    match post_tags {
        Some(tags) => tags.insert_before(node),
        None => doc.insert_after_first_of(&["h1"], node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;

    const READING: ReadingConfig = ReadingConfig {
        cjk_chars_per_minute: 500,
        words_per_minute: 200,
    };

    #[test]
    fn counts_words_and_cjk_separately() {
        let english = "word ".repeat(201);
        assert_eq!(estimate_minutes(&english, &READING), 2);
        let japanese = "日".repeat(500);
        assert_eq!(estimate_minutes(&japanese, &READING), 1);
        let mixed = format!("{}{}", "語".repeat(250), " word".repeat(100));
        assert_eq!(estimate_minutes(&mixed, &READING), 1);
        assert_eq!(estimate_minutes("", &READING), 0);
    }

    #[test]
    fn cjk_runs_do_not_count_as_words() {
        assert_eq!(estimate_minutes("日本語", &READING), 1);
        let words = "日本語abc 日本語".chars().filter(|ch| !is_cjk(*ch)).collect::<String>();
        assert_eq!(words.split_whitespace().count(), 1);
    }

    #[test]
    fn sits_between_heading_and_tags() {
        let doc = ContentDoc::from_html(
            "<h1>T</h1><div class=\"blog-post-tags\"></div><p>Body</p>",
        );
        let tags = doc.first(".blog-post-tags");
        insert_reading_time(&doc, tags.as_ref(), "Body", &READING, Lang::En.strings());
        assert_eq!(
            doc.to_html(),
            "<h1>T</h1><div class=\"reading-time\"><span class=\"reading-time-icon\">⏱</span> 1 min read</div>\
<div class=\"blog-post-tags\"></div><p>Body</p>"
        );
    }

    #[test]
    fn goes_first_without_heading() {
        let doc = ContentDoc::from_html("<p>Body</p>");
        insert_reading_time(&doc, None, "本文", &READING, Lang::Ja.strings());
        let html = doc.to_html();
        assert!(html.starts_with("<div class=\"reading-time\">"));
        assert!(html.contains("約1分で読めます"));
    }

    #[test]
    fn author_markup_does_not_move_or_suppress_it() {
        let doc = ContentDoc::from_html(
            "<h1>T</h1><p>Intro</p><div class=\"reading-time\">fake</div><div class=\"blog-post-tags\"></div>",
        );
        insert_reading_time(&doc, None, "Body", &READING, Lang::En.strings());
        assert!(doc.to_html().starts_with(
            "<h1>T</h1><div class=\"reading-time\"><span class=\"reading-time-icon\">⏱</span> 1 min read</div><p>Intro</p>"
        ));
    }
}
