//! Side effects the pipeline asks of the page it runs in.

use crate::error::{HostError, ShareError};

/// Undoes one registration. Runs at most once: on `dispose` or on drop.
#[must_use = "dropping a Disposer tears the registration down immediately"]
pub struct Disposer(Option<Box<dyn FnOnce()>>);

impl Disposer {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(teardown)))
    }

    pub fn noop() -> Self {
        Self(None)
    }

    pub fn dispose(mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Disposer").field(&self.0.is_some()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub title: String,
    pub url: String,
}

/// The host's native share sheet.
pub trait NativeShare {
    fn share(&self, data: &ShareData) -> Result<(), ShareError>;
}

/// Every method has a no-op default, so `NullHost` is the whole null object.
pub trait Host {
    fn scroll_to_top(&self) {}

    fn push_fragment(&self, _fragment: &str) {}

    /// Highlights the TOC entry of the section in view while registered.
    fn observe_headings(&self, _heading_ids: &[String]) -> Disposer {
        Disposer::noop()
    }

    /// Drives the reading-progress bar while registered.
    fn track_reading_progress(&self) -> Disposer {
        Disposer::noop()
    }

    fn write_clipboard(&self, _text: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("clipboard"))
    }

    fn native_share(&self) -> Option<&dyn NativeShare> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl Host for NullHost {}
