/// Strips markup capable of running script. `None` means no sanitizer is
/// available and the caller must not insert the HTML.
pub trait Sanitizer {
    fn clean(&self, html: &str) -> Option<String>;
}

pub struct AmmoniaSanitizer {
    builder: ammonia::Builder<'static>,
}

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        builder.add_generic_attributes(["class"]);
        for tag in ["h1", "h2", "h3", "h4", "h5", "h6"] {
            builder.add_tag_attributes(tag, ["id"]);
        }
        Self { builder }
    }
}

impl Default for AmmoniaSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer for AmmoniaSanitizer {
    fn clean(&self, html: &str) -> Option<String> {
        Some(self.builder.clean(html).to_string())
    }
}

/// Stands in when no sanitizer could be set up.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Sanitizer for Unavailable {
    fn clean(&self, _html: &str) -> Option<String> {
        None
    }
}
