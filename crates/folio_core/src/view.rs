//! Navigation between the post list and a single post.
//!
//! Loads never touch the page directly. Each one captures a [`Ticket`], does
//! its fetching and rendering into a plain model value, and hands that to an
//! `apply_*` step that checks the ticket before mutating [`Page`]. Whichever
//! load was requested last wins, however the fetches interleave.

use std::cell::{Cell, Ref, RefCell};

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::dom::{ContentDoc, escape_html_text};
use crate::error::{HostError, LoadError};
use crate::extract::{extract_excerpt, extract_title};
use crate::fetch::fetch_post_markdown;
use crate::guard::{RequestSeq, Ticket};
use crate::highlight::{Highlighter, NoHighlight, SyntectHighlighter, highlight_code_blocks};
use crate::host::{Disposer, Host};
use crate::index::{all_tags, load_index};
use crate::lang::Lang;
use crate::model::{PostCard, PostSummary, SiteConfig, View};
use crate::postprocess::share::{self, CopyAck};
use crate::postprocess::{self, PostContext};
use crate::render::{CmarkRenderer, MarkdownRenderer, build_post_content};
use crate::sanitize::{AmmoniaSanitizer, Sanitizer};
use crate::source::ContentSource;
use crate::templates::{ShellOptions, render_grid, render_page, render_tag_filter};

/// What a browser would be showing.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Page {
    pub list_visible: bool,
    pub single_visible: bool,
    pub document_title: String,
    pub breadcrumb: Option<String>,
    pub filter_html: String,
    pub grid_html: String,
    pub single_html: String,
}

/// A URL fragment resolved to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Post(String),
}

impl Route {
    /// `#post/<id>` selects that post; anything else is the list.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        match fragment.strip_prefix("post/") {
            Some(id) if !id.is_empty() => Route::Post(id.to_string()),
            _ => Route::List,
        }
    }

    pub fn fragment(&self) -> String {
        match self {
            Route::List => String::new(),
            Route::Post(id) => format!("#post/{id}"),
        }
    }
}

/// Result of a list load, ready to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListModel {
    pub cards: Vec<PostCard>,
    pub tags: Vec<String>,
}

/// Result of a single-post load, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleModel {
    pub post_id: String,
    pub title: String,
    pub html: String,
    pub heading_ids: Vec<String>,
}

pub fn list_title(site_title: &str) -> String {
    format!("Blog - {site_title}")
}

pub fn post_title(post_id: &str, site_title: &str) -> String {
    format!("{post_id} - Blog - {site_title}")
}

fn status_html(message: &str) -> String {
    format!("<p class=\"blog-status\">{}</p>", escape_html_text(message))
}

pub struct ViewController<S, H> {
    source: S,
    host: H,
    config: SiteConfig,
    renderer: Box<dyn MarkdownRenderer>,
    sanitizer: Box<dyn Sanitizer>,
    highlighter: Box<dyn Highlighter>,
    lang: Cell<Lang>,
    view: RefCell<View>,
    page: RefCell<Page>,
    cards: RefCell<Vec<PostCard>>,
    tags: RefCell<Vec<String>>,
    active_tag: RefCell<Option<String>>,
    list_seq: RequestSeq,
    single_seq: RequestSeq,
    teardown: RefCell<Vec<Disposer>>,
    copy_ack: CopyAck,
}

impl<S: ContentSource, H: Host> ViewController<S, H> {
    pub fn new(source: S, host: H, config: SiteConfig, lang: Lang) -> Self {
        let renderer = CmarkRenderer {
            heading_ids: config.render.heading_ids,
        };
        let highlighter: Box<dyn Highlighter> = if config.syntax.highlight {
            Box::new(SyntectHighlighter::new(config.syntax.theme.clone()))
        } else {
            Box::new(NoHighlight)
        };
        let page = Page {
            list_visible: true,
            single_visible: false,
            document_title: list_title(&config.site.title),
            ..Page::default()
        };
        Self {
            source,
            host,
            config,
            renderer: Box::new(renderer),
            sanitizer: Box::new(AmmoniaSanitizer::new()),
            highlighter,
            lang: Cell::new(lang),
            view: RefCell::new(View::List),
            page: RefCell::new(page),
            cards: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            active_tag: RefCell::new(None),
            list_seq: RequestSeq::new(),
            single_seq: RequestSeq::new(),
            teardown: RefCell::new(Vec::new()),
            copy_ack: CopyAck::default(),
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    pub fn with_renderer(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn lang(&self) -> Lang {
        self.lang.get()
    }

    pub fn view(&self) -> View {
        self.view.borrow().clone()
    }

    pub fn page(&self) -> Ref<'_, Page> {
        self.page.borrow()
    }

    pub fn cards(&self) -> Ref<'_, Vec<PostCard>> {
        self.cards.borrow()
    }

    pub fn tags(&self) -> Ref<'_, Vec<String>> {
        self.tags.borrow()
    }

    pub fn active_tag(&self) -> Option<String> {
        self.active_tag.borrow().clone()
    }

    pub fn copy_ack(&self) -> &CopyAck {
        &self.copy_ack
    }

    /// The page as a standalone HTML document. `blog_href` is where the
    /// breadcrumb and back links point; the configured blog page when `None`.
    pub fn render_document(
        &self,
        blog_href: Option<&str>,
        follow_fragments: bool,
    ) -> anyhow::Result<String> {
        render_page(
            &self.page.borrow(),
            ShellOptions {
                lang: self.lang(),
                blog_href: blog_href.unwrap_or(&self.config.site.blog_page),
                follow_fragments,
            },
        )
    }

    /// Shows whatever `fragment` names.
    pub async fn route(&self, fragment: &str) -> Result<(), LoadError> {
        match Route::parse(fragment) {
            Route::List => {
                self.show_list();
                Ok(())
            }
            Route::Post(id) => self.show_post(&id).await,
        }
    }

    /// Card, prev/next or related-post activation.
    pub async fn open_post(&self, post_id: &str) -> Result<(), LoadError> {
        self.host
            .push_fragment(&Route::Post(post_id.to_string()).fragment());
        self.show_post(post_id).await
    }

    pub fn show_list(&self) {
        self.single_seq.invalidate();
        self.dispose_teardown();
        *self.view.borrow_mut() = View::List;
        let mut page = self.page.borrow_mut();
        page.list_visible = true;
        page.single_visible = false;
        page.document_title = list_title(&self.config.site.title);
        page.breadcrumb = None;
    }

    pub async fn show_post(&self, post_id: &str) -> Result<(), LoadError> {
        let ticket = self.single_seq.begin();
        self.dispose_teardown();
        *self.view.borrow_mut() = View::Single(post_id.to_string());
        {
            let mut page = self.page.borrow_mut();
            page.list_visible = false;
            page.single_visible = true;
            page.single_html = status_html(self.lang().strings().loading);
        }
        self.host.scroll_to_top();

        let loaded = self.load_single(&ticket, post_id).await;
        let result = loaded.and_then(|model| self.apply_single(&ticket, model));
        match &result {
            Ok(()) => {}
            Err(LoadError::Stale) => debug!(post = post_id, "discarded superseded post load"),
            Err(err) => self.apply_single_failure(&ticket, post_id, err),
        }
        result
    }

    async fn load_single(&self, ticket: &Ticket, post_id: &str) -> Result<SingleModel, LoadError> {
        let lang = self.lang();
        let posts = load_index(&self.source, &self.config).await?;
        ensure_current(ticket)?;
        let post = posts
            .iter()
            .find(|post| post.id == post_id)
            .ok_or_else(|| LoadError::PostNotFound(post_id.to_string()))?;
        self.apply_found(ticket, post_id)?;

        let markdown = fetch_post_markdown(
            &self.source,
            &self.config.blog.posts_dir,
            &post.base_filename,
            lang.code(),
        )
        .await?;
        ensure_current(ticket)?;

        let content = build_post_content(
            markdown,
            self.config.blog.excerpt_max_chars,
            &*self.renderer,
            &*self.sanitizer,
        );
        let ctx = PostContext {
            post,
            posts: &posts,
            markdown: &content.raw_markdown,
            title: &content.title,
            lang,
            config: &self.config,
            native_share: self.host.native_share().is_some(),
        };
        let aux = postprocess::gather_auxiliary(&self.source, &ctx).await;
        ensure_current(ticket)?;

        let doc = ContentDoc::from_body(&content.rendered);
        let heading_ids = postprocess::apply(&doc, &ctx, &aux);
        if doc.has_code() {
            highlight_code_blocks(&doc, &*self.highlighter);
        }
        Ok(SingleModel {
            post_id: post.id.clone(),
            title: content.title.clone(),
            html: doc.to_html(),
            heading_ids,
        })
    }

    /// The post exists; title and breadcrumb show its id until the content
    /// arrives.
    fn apply_found(&self, ticket: &Ticket, post_id: &str) -> Result<(), LoadError> {
        ensure_current(ticket)?;
        let mut page = self.page.borrow_mut();
        page.document_title = post_title(post_id, &self.config.site.title);
        page.breadcrumb = Some(post_id.to_string());
        Ok(())
    }

    fn apply_single(&self, ticket: &Ticket, model: SingleModel) -> Result<(), LoadError> {
        ensure_current(ticket)?;
        {
            let mut page = self.page.borrow_mut();
            page.document_title = post_title(&model.post_id, &self.config.site.title);
            page.breadcrumb = Some(model.title);
            page.single_html = model.html;
        }
        let mut teardown = self.teardown.borrow_mut();
        if !model.heading_ids.is_empty() {
            teardown.push(self.host.observe_headings(&model.heading_ids));
        }
        teardown.push(self.host.track_reading_progress());
        Ok(())
    }

    fn apply_single_failure(&self, ticket: &Ticket, post_id: &str, err: &LoadError) {
        if !ticket.is_current() {
            return;
        }
        let strings = self.lang().strings();
        let mut page = self.page.borrow_mut();
        match err {
            LoadError::PostNotFound(_) => {
                warn!(post = post_id, "post not in index");
                page.single_html = status_html(strings.not_found);
            }
            LoadError::Content(fetch) => {
                error!(post = post_id, error = %fetch, "failed to load post");
                page.document_title = post_title(post_id, &self.config.site.title);
                page.breadcrumb = Some(post_id.to_string());
                page.single_html = status_html(strings.load_error);
            }
            other => {
                error!(post = post_id, error = %other, "failed to load post");
                page.single_html = status_html(strings.load_error);
            }
        }
    }

    /// Reloads the grid in the current language.
    pub async fn load_list(&self) -> Result<(), LoadError> {
        let ticket = self.list_seq.begin();
        let result = match self.fetch_list(&ticket).await {
            Ok(model) => self.apply_list(&ticket, model),
            Err(err) => Err(err),
        };
        match &result {
            Ok(()) => {}
            Err(LoadError::Stale) => debug!("discarded superseded list load"),
            Err(err) => error!(error = %err, "failed to load post list"),
        }
        result
    }

    async fn fetch_list(&self, ticket: &Ticket) -> Result<ListModel, LoadError> {
        let lang = self.lang();
        let posts = load_index(&self.source, &self.config).await?;
        ensure_current(ticket)?;
        let cards = join_all(posts.iter().map(|post| self.load_card(post, lang)))
            .await
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        ensure_current(ticket)?;
        let tags = all_tags(cards.iter().map(|card| card.tags.as_slice()));
        Ok(ListModel { cards, tags })
    }

    /// A post whose translation is missing is left out of the grid.
    async fn load_card(&self, post: &PostSummary, lang: Lang) -> Option<PostCard> {
        let markdown = match fetch_post_markdown(
            &self.source,
            &self.config.blog.posts_dir,
            &post.base_filename,
            lang.code(),
        )
        .await
        {
            Ok(markdown) => markdown,
            Err(err) => {
                warn!(post = %post.id, error = %err, "skipping post");
                return None;
            }
        };
        Some(PostCard {
            id: post.id.clone(),
            date: post.date.clone(),
            emoji: post.emoji.clone(),
            tags: post.tags.clone(),
            title: extract_title(&markdown),
            excerpt: extract_excerpt(&markdown, self.config.blog.excerpt_max_chars),
        })
    }

    fn apply_list(&self, ticket: &Ticket, model: ListModel) -> Result<(), LoadError> {
        ensure_current(ticket)?;
        *self.cards.borrow_mut() = model.cards;
        *self.tags.borrow_mut() = model.tags;
        *self.active_tag.borrow_mut() = None;
        self.render_list();
        Ok(())
    }

    /// Filters the loaded cards without fetching anything. `None` shows all.
    pub fn select_tag(&self, tag: Option<&str>) {
        *self.active_tag.borrow_mut() = tag.map(str::to_string);
        self.render_list();
    }

    fn render_list(&self) {
        let strings = self.lang().strings();
        let active_tag = self.active_tag.borrow();
        let cards = self.cards.borrow();
        let tags = self.tags.borrow();
        let grid = render_grid(&cards, active_tag.as_deref(), strings);
        let filter = render_tag_filter(&tags, active_tag.as_deref(), strings);
        let mut page = self.page.borrow_mut();
        match grid {
            Ok(html) => page.grid_html = html,
            Err(err) => error!(error = %err, "failed to render post grid"),
        }
        match filter {
            Ok(html) => page.filter_html = html,
            Err(err) => error!(error = %err, "failed to render tag filter"),
        }
    }

    /// Switches language: the list reloads, and so does the open post.
    pub async fn set_language(&self, lang: Lang) -> Result<(), LoadError> {
        self.lang.set(lang);
        let active = self.view.borrow().active_post_id().map(str::to_string);
        match active {
            Some(post_id) => {
                let (list, single) = futures::join!(self.load_list(), self.show_post(&post_id));
                list.and(single)
            }
            None => self.load_list().await,
        }
    }

    /// Copies the open post's canonical URL.
    pub async fn copy_link(&self) -> Result<(), HostError> {
        let Some(post_id) = self.view.borrow().active_post_id().map(str::to_string) else {
            return Ok(());
        };
        let url = self.config.post_url(&post_id);
        share::copy_link(&self.host, &url, &self.copy_ack).await
    }

    pub fn share_natively(&self) {
        let Some(post_id) = self.view.borrow().active_post_id().map(str::to_string) else {
            return;
        };
        let title = self
            .page
            .borrow()
            .breadcrumb
            .clone()
            .unwrap_or_else(|| post_id.clone());
        let data = crate::host::ShareData {
            title,
            url: self.config.post_url(&post_id),
        };
        share::share_natively(&self.host, &data);
    }

    fn dispose_teardown(&self) {
        let handles = std::mem::take(&mut *self.teardown.borrow_mut());
        for handle in handles {
            handle.dispose();
        }
    }
}

fn ensure_current(ticket: &Ticket) -> Result<(), LoadError> {
    if ticket.is_current() {
        Ok(())
    } else {
        Err(LoadError::Stale)
    }
}
