//! Parsed content tree that post-processors transform in place.

use kuchikikiki::NodeRef;
use kuchikikiki::traits::TendrilSink;

use crate::model::RenderedBody;

/// The children of `root` are the post content.
pub struct ContentDoc {
    root: NodeRef,
}

impl ContentDoc {
    pub fn from_html(html: &str) -> Self {
        Self {
            root: body_of(&kuchikikiki::parse_html().one(html)),
        }
    }

    /// Content made of a single text node. Serializing escapes it.
    pub fn from_text(text: &str) -> Self {
        let root = body_of(&kuchikikiki::parse_html().one(""));
        root.append(NodeRef::new_text(text));
        Self { root }
    }

    pub fn from_body(body: &RenderedBody) -> Self {
        match body {
            RenderedBody::Html(html) => Self::from_html(html),
            RenderedBody::PlainText(text) => Self::from_text(text),
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn first(&self, selector: &str) -> Option<NodeRef> {
        first_in(&self.root, selector)
    }

    pub fn all(&self, selector: &str) -> Vec<NodeRef> {
        all_in(&self.root, selector)
    }

    pub fn prepend(&self, node: NodeRef) {
        self.root.prepend(node);
    }

    pub fn append(&self, node: NodeRef) {
        self.root.append(node);
    }

    /// Inserts `node` right after the first match of `selectors`, trying them
    /// in order; at content start when none match.
    pub fn insert_after_first_of(&self, selectors: &[&str], node: NodeRef) {
        match selectors.iter().find_map(|selector| self.first(selector)) {
            Some(anchor) => anchor.insert_after(node),
            None => self.prepend(node),
        }
    }

    pub fn has_code(&self) -> bool {
        self.first("pre code").is_some()
    }

    pub fn to_html(&self) -> String {
        inner_html(&self.root)
    }
}

fn body_of(document: &NodeRef) -> NodeRef {
    match document.select_first("body") {
        Ok(body) => body.as_node().clone(),
        Err(()) => document.clone(),
    }
}

pub fn first_in(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    node.select_first(selector)
        .ok()
        .map(|found| found.as_node().clone())
}

pub fn all_in(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(found) => found.map(|item| item.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    }
}

/// Parses trusted markup built by the pipeline into detached nodes.
pub fn fragment(html: &str) -> Vec<NodeRef> {
    let body = body_of(&kuchikikiki::parse_html().one(html));
    let nodes = body.children().collect::<Vec<_>>();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// First element of a trusted fragment.
pub fn element(html: &str) -> Option<NodeRef> {
    fragment(html)
        .into_iter()
        .find(|node| node.as_element().is_some())
}

pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|el| el.name.local.to_string())
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let el = node.as_element()?;
    el.attributes.borrow().get(name).map(str::to_string)
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}

pub fn classes(node: &NodeRef) -> Vec<String> {
    attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_html_text(text: &str) -> String {
    escape_attr(text)
}
