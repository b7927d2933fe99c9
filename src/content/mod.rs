//! Content module - metadata records, lookup, retrieval, and rendering

mod entry;
mod markdown;
mod registry;
mod sanitize;
mod source;
mod typeset;

pub use entry::{BlogEntry, NavLink, ProjectEntry};
pub use markdown::{escape_html, MarkdownRenderer};
pub use registry::BlogRegistry;
pub use sanitize::sanitize;
pub use source::{ContentKind, ContentSource, FsContentSource, SourceError};
pub use typeset::Typesetter;
