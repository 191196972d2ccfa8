use std::collections::BTreeSet;

use crate::error::IndexLoadError;
use crate::model::{PostSummary, SiteConfig};
use crate::source::ContentSource;

pub async fn load_index<S: ContentSource>(
    source: &S,
    config: &SiteConfig,
) -> Result<Vec<PostSummary>, IndexLoadError> {
    let raw = source.fetch_text(&config.blog.index_path).await?;
    parse_index(&raw)
}

pub fn parse_index(raw: &str) -> Result<Vec<PostSummary>, IndexLoadError> {
    Ok(serde_json::from_str(raw)?)
}

/// Deduplicated union of every post's tags, ascending.
pub fn all_tags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    tags.into_iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn position_of(posts: &[PostSummary], post_id: &str) -> Option<usize> {
    posts.iter().position(|post| post.id == post_id)
}
