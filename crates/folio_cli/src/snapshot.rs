//! Page snapshots rendered from a site directory.

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::error::LoadError;
use folio_core::host::NullHost;
use folio_core::index::{all_tags, load_index};
use folio_core::lang::Lang;
use folio_core::model::SiteConfig;
use folio_core::source::DirSource;
use folio_core::view::ViewController;

pub type SiteController = ViewController<DirSource, NullHost>;

pub fn controller(root: &Path, config: &SiteConfig, lang: Lang) -> SiteController {
    ViewController::new(DirSource::new(root), NullHost, config.clone(), lang)
}

/// Single-threaded runtime for driving one controller.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// How a snapshot request went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    NotFound,
    Failed,
}

impl Outcome {
    fn of(result: &Result<(), LoadError>) -> Self {
        match result {
            Ok(()) => Outcome::Rendered,
            Err(LoadError::PostNotFound(_)) => Outcome::NotFound,
            Err(_) => Outcome::Failed,
        }
    }
}

/// Loads the list and then resolves `fragment` against it. Only a failed
/// list load is an error; post failures show up in the page.
pub async fn render_route(ctl: &SiteController, fragment: &str, tag: Option<&str>) -> Result<Outcome> {
    ctl.load_list().await.context("failed to load post list")?;
    if tag.is_some() {
        ctl.select_tag(tag);
    }
    let routed = ctl.route(fragment).await;
    Ok(Outcome::of(&routed))
}

pub async fn site_tags(root: &Path, config: &SiteConfig) -> Result<Vec<String>> {
    let posts = load_index(&DirSource::new(root), config).await?;
    Ok(all_tags(posts.iter().map(|post| post.tags.as_slice())))
}
