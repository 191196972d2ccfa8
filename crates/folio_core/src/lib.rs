pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod guard;
pub mod highlight;
pub mod host;
pub mod index;
pub mod lang;
pub mod model;
pub mod postprocess;
pub mod progress;
pub mod render;
pub mod sanitize;
pub mod source;
pub mod templates;
pub mod view;
