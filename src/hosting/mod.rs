//! Hosting-aware base URL resolution
//!
//! The same content is served from different deployment roots: `/` when
//! developing locally, a project subpath on GitHub Pages. The hosting
//! context is derived once from the host name and used to anchor every
//! relative content and asset reference.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::HostingConfig;

/// The resolved base-URL prefix for the current deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingContext {
    /// Host name this context was resolved from
    pub host: String,
    /// Base-URL prefix, always with leading and trailing slash
    pub base_url: String,
}

impl HostingContext {
    /// Resolve a host name against the configured hosting map.
    ///
    /// Unrecognized hosts fall back to the configured default root; there
    /// is no error path.
    pub fn resolve(config: &HostingConfig, host: &str) -> Self {
        let root = config
            .roots
            .get(host)
            .cloned()
            .unwrap_or_else(|| config.default_root.clone());

        let base_url = normalize_root(&root);
        tracing::debug!("resolved host {} to base url {}", host, base_url);

        Self {
            host: host.to_string(),
            base_url,
        }
    }

    /// A context rooted at `/`, for callers with no host name at hand.
    pub fn local() -> Self {
        Self {
            host: "localhost".to_string(),
            base_url: "/".to_string(),
        }
    }

    /// Prefix a content location with the base URL.
    ///
    /// Absolute locations (`http://`, `https://`, protocol-relative `//`)
    /// and locations already carrying the prefix pass through unchanged.
    pub fn prefix(&self, location: &str) -> String {
        if is_absolute(location) || location.starts_with(&self.base_url) {
            return location.to_string();
        }
        format!("{}{}", self.base_url, location.trim_start_matches('/'))
    }

    /// Rewrite embedded `static/...` asset references to absolute
    /// references anchored at the base URL.
    ///
    /// Content files were authored assuming a deployment root that may not
    /// match where they are served; `src="static/x.png"` and
    /// `href="../static/x.css"` both become `{base_url}static/...`.
    pub fn rewrite_assets(&self, html: &str) -> String {
        lazy_static! {
            static ref STATIC_REF: Regex =
                Regex::new(r#"(?P<attr>src|href)=(?P<q>["'])(?:\.\./)?(?P<path>static/[^"']*)"#)
                    .unwrap();
        }

        STATIC_REF
            .replace_all(html, |caps: &Captures| {
                format!(
                    "{}={}{}{}",
                    &caps["attr"],
                    &caps["q"],
                    self.base_url,
                    &caps["path"]
                )
            })
            .into_owned()
    }
}

/// Normalize a configured root into `/`-wrapped form.
fn normalize_root(root: &str) -> String {
    let trimmed = root.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

fn is_absolute(location: &str) -> bool {
    location.starts_with("http://")
        || location.starts_with("https://")
        || location.starts_with("//")
}
