use tracing::warn;

use crate::error::FetchError;
use crate::extract::extract_title;
use crate::lang::normalize_language_code;
use crate::model::PostSummary;
use crate::source::ContentSource;

/// `<posts_dir>/<base_filename>.<lang>.md`, with the language code cut to two
/// characters.
pub fn post_markdown_path(posts_dir: &str, base_filename: &str, language_code: &str) -> String {
    let lang = normalize_language_code(language_code);
    let dir = posts_dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("{base_filename}.{lang}.md")
    } else {
        format!("{dir}/{base_filename}.{lang}.md")
    }
}

pub async fn fetch_post_markdown<S: ContentSource>(
    source: &S,
    posts_dir: &str,
    base_filename: &str,
    language_code: &str,
) -> Result<String, FetchError> {
    let path = post_markdown_path(posts_dir, base_filename, language_code);
    source.fetch_text(&path).await
}

/// Title of another post for navigation links; any failure falls back to the
/// post id.
pub async fn fetch_post_title<S: ContentSource>(
    source: &S,
    posts_dir: &str,
    post: &PostSummary,
    language_code: &str,
) -> String {
    match fetch_post_markdown(source, posts_dir, &post.base_filename, language_code).await {
        Ok(markdown) => extract_title(&markdown),
        Err(err) => {
            warn!(post = %post.id, error = %err, "title lookup failed");
            post.id.clone()
        }
    }
}
