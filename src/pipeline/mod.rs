//! Content fetch-and-render pipeline
//!
//! Given a route, resolve it to a blog entry, fetch the entry's content
//! from the first reachable candidate location, and turn it into sanitized
//! markup for the content region. Every failure is absorbed here and
//! converted into a displayable error block; nothing propagates to the
//! view as an unhandled fault.

use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{
    escape_html, sanitize, BlogRegistry, ContentKind, ContentSource, MarkdownRenderer,
    NavLink, SourceError, Typesetter,
};
use crate::hosting::HostingContext;
use crate::router::Route;

/// The markup-plus-status value handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Sanitized markup for the content region
    pub content: String,
    /// Whether this is an error block rather than blog content
    pub error: bool,
}

/// Internal failure taxonomy; absorbed into `RenderResult` at the
/// pipeline boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no blog registered for route {0}")]
    LookupMiss(Route),

    #[error("no candidate location reachable for route {route}")]
    FetchExhausted { route: Route, attempted: Vec<String> },
}

/// Blog content resolver and renderer.
pub struct RenderPipeline {
    registry: BlogRegistry,
    nav: Vec<NavLink>,
    ctx: HostingContext,
    source: Box<dyn ContentSource>,
    renderer: MarkdownRenderer,
    typesetter: Typesetter,
}

impl RenderPipeline {
    pub fn new(config: &SiteConfig, ctx: HostingContext, source: Box<dyn ContentSource>) -> Self {
        Self {
            registry: BlogRegistry::new(&config.blogs),
            nav: config.nav.clone(),
            ctx,
            source,
            renderer: MarkdownRenderer::new(config.highlight.clone()),
            typesetter: Typesetter::new(&config.typeset),
        }
    }

    pub fn registry(&self) -> &BlogRegistry {
        &self.registry
    }

    pub fn hosting(&self) -> &HostingContext {
        &self.ctx
    }

    /// Render the content for a route.
    ///
    /// Never fails: lookup misses and exhausted fetches come back as an
    /// error block with fallback links, `error: true`.
    pub async fn render_route(&self, route: &Route) -> RenderResult {
        match self.try_render(route).await {
            Ok(content) => RenderResult {
                content,
                error: false,
            },
            Err(e) => {
                tracing::warn!("render failed for {}: {}", route, e);
                RenderResult {
                    content: self.error_markup(&e),
                    error: true,
                }
            }
        }
    }

    /// Candidate fetch locations for an entry: the primary path then each
    /// alternate, all anchored at the active base URL.
    pub fn candidate_locations(&self, entry: &crate::content::BlogEntry) -> Vec<String> {
        let mut locations = Vec::new();
        for path in entry.candidate_paths() {
            let location = self.ctx.prefix(path);
            if !locations.contains(&location) {
                locations.push(location);
            }
        }
        locations
    }

    /// First reachable candidate location for an entry, if any. Used by
    /// the reachability audit.
    pub async fn probe(&self, entry: &crate::content::BlogEntry) -> Option<String> {
        for location in self.candidate_locations(entry) {
            if self.source.fetch(&location).await.is_ok() {
                return Some(location);
            }
        }
        None
    }

    async fn try_render(&self, route: &Route) -> Result<String, RenderError> {
        let entry = self
            .registry
            .lookup(route)
            .ok_or_else(|| RenderError::LookupMiss(route.clone()))?;

        let locations = self.candidate_locations(entry);
        for location in &locations {
            match self.source.fetch(location).await {
                Ok(text) => {
                    tracing::debug!("fetched {} for {}", location, route);
                    return Ok(self.render_content(location, &text));
                }
                Err(SourceError::NotFound(_)) => {
                    tracing::debug!("{} not found, trying next candidate", location);
                }
                Err(e) => {
                    // Hard failures are absorbed the same way a miss is;
                    // a later candidate may still succeed.
                    tracing::warn!("fetch failed for {}: {}", location, e);
                }
            }
        }

        Err(RenderError::FetchExhausted {
            route: route.clone(),
            attempted: locations,
        })
    }

    /// Turn fetched text into sanitized markup for the content region.
    fn render_content(&self, location: &str, text: &str) -> String {
        let markup = match ContentKind::from_location(location) {
            ContentKind::Markdown => {
                let rendered = self.renderer.render(text);
                sanitize(&self.ctx.rewrite_assets(&rendered))
            }
            // HTML sources are authored content, displayed as-is after
            // asset anchoring.
            ContentKind::Html => self.ctx.rewrite_assets(text),
        };

        self.typesetter.typeset(&markup)
    }

    /// User-facing error block with manual fallback links.
    fn error_markup(&self, error: &RenderError) -> String {
        match error {
            RenderError::LookupMiss(route) => {
                let links: String = self
                    .nav
                    .iter()
                    .map(|NavLink { url, text }| {
                        format!(r##"<li><a href="#{}">{}</a></li>"##, url, escape_html(text))
                    })
                    .collect();
                format!(
                    r#"<div class="content-error"><h2>No such blog</h2><p>Nothing is published at <code>{}</code>.</p><ul class="fallback-links">{}</ul></div>"#,
                    escape_html(route.as_str()),
                    links
                )
            }
            RenderError::FetchExhausted { route, attempted } => {
                let links: String = attempted
                    .iter()
                    .map(|loc| {
                        format!(
                            r#"<li><a href="{}">{}</a></li>"#,
                            loc,
                            escape_html(loc)
                        )
                    })
                    .collect();
                format!(
                    r#"<div class="content-error"><h2>Error loading blog content</h2><p>The content for <code>{}</code> could not be loaded. Try it directly:</p><ul class="fallback-links">{}</ul></div>"#,
                    escape_html(route.as_str()),
                    links
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostingConfig;
    use crate::content::BlogEntry;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    /// In-memory content source keyed by exact location.
    struct StaticSource {
        files: HashMap<String, String>,
    }

    impl StaticSource {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl ContentSource for StaticSource {
        async fn fetch(&self, location: &str) -> Result<String, SourceError> {
            self.files
                .get(location)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(location.to_string()))
        }
    }

    fn entry(url: &str, path: &str, alternates: &[&str]) -> BlogEntry {
        BlogEntry {
            title: "Test".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 9, 11).unwrap(),
            url: url.to_string(),
            path: path.to_string(),
            alternates: alternates.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config_with(blogs: Vec<BlogEntry>) -> SiteConfig {
        SiteConfig {
            blogs,
            ..SiteConfig::default()
        }
    }

    fn github_pages_ctx() -> HostingContext {
        HostingContext::resolve(&HostingConfig::default(), "justinmeimar.github.io")
    }

    fn local_ctx() -> HostingContext {
        HostingContext::resolve(&HostingConfig::default(), "localhost")
    }

    #[tokio::test]
    async fn test_renders_markdown_from_primary_location() {
        let config = config_with(vec![entry("/blog/nginx", "blogs/nginx.md", &[])]);
        let source = StaticSource::new(&[("/blogs/nginx.md", "# Nginx\n\nHello.")]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/nginx")).await;
        assert!(!result.error);
        assert!(result.content.contains("<h1>Nginx</h1>"));
    }

    #[tokio::test]
    async fn test_normalized_route_variants_render_the_same() {
        let config = config_with(vec![entry("/blog/nginx", "blogs/nginx.md", &[])]);
        let source = StaticSource::new(&[("/blogs/nginx.md", "# Nginx")]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let a = pipeline.render_route(&Route::new("/blog/nginx")).await;
        let b = pipeline.render_route(&Route::new("blog/nginx")).await;
        assert_eq!(a, b);
        assert!(!a.error);
    }

    #[tokio::test]
    async fn test_unknown_route_is_error_with_fallback_links() {
        let config = config_with(vec![]);
        let source = StaticSource::new(&[]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/unknown")).await;
        assert!(result.error);
        assert!(result.content.contains("No such blog"));
        assert!(result.content.contains("fallback-links"));
        assert!(result.content.contains(r##"href="#/blog""##));
    }

    #[tokio::test]
    async fn test_primary_miss_falls_back_to_alternate() {
        let config = config_with(vec![entry(
            "/blog/nginx",
            "blogs/nginx.md",
            &["content/nginx.md"],
        )]);
        let source = StaticSource::new(&[("/content/nginx.md", "# From the alternate")]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/nginx")).await;
        assert!(!result.error);
        assert!(result.content.contains("From the alternate"));
    }

    #[tokio::test]
    async fn test_all_candidates_exhausted_lists_attempted_locations() {
        let config = config_with(vec![entry(
            "/blog/nginx",
            "blogs/nginx.md",
            &["content/nginx.md"],
        )]);
        let source = StaticSource::new(&[]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/nginx")).await;
        assert!(result.error);
        assert!(result.content.contains("Error loading blog content"));
        assert!(result.content.contains(r#"href="/blogs/nginx.md""#));
        assert!(result.content.contains(r#"href="/content/nginx.md""#));
    }

    #[tokio::test]
    async fn test_embedded_script_is_sanitized_out() {
        let config = config_with(vec![entry("/blog/evil", "blogs/evil.md", &[])]);
        let md = "# Post\n\n<script>alert('xss')</script>\n\nBody.";
        let source = StaticSource::new(&[("/blogs/evil.md", md)]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/evil")).await;
        assert!(!result.error);
        assert!(!result.content.contains("<script"));
        assert!(!result.content.contains("alert"));
        assert!(result.content.contains("Body."));
    }

    #[tokio::test]
    async fn test_static_assets_rewritten_under_subpath_hosting() {
        let config = config_with(vec![entry("/blog/trees", "blogs/trees.md", &[])]);
        let md = "![a tree](static/projects/tree.png)";
        let source = StaticSource::new(&[("/minima/blogs/trees.md", md)]);
        let pipeline = RenderPipeline::new(&config, github_pages_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/trees")).await;
        assert!(!result.error);
        assert!(result.content.contains(r#"src="/minima/static/projects/tree.png""#));
    }

    #[tokio::test]
    async fn test_html_content_passes_through() {
        let config = config_with(vec![entry("/blog/legacy", "blogs/legacy.html", &[])]);
        let html = r#"<div class="legacy"><p>old post</p></div>"#;
        let source = StaticSource::new(&[("/blogs/legacy.html", html)]);
        let pipeline = RenderPipeline::new(&config, local_ctx(), Box::new(source));

        let result = pipeline.render_route(&Route::new("/blog/legacy")).await;
        assert!(!result.error);
        assert_eq!(result.content, html);
    }

    #[tokio::test]
    async fn test_candidate_locations_are_prefixed_and_deduped() {
        let config = config_with(vec![entry(
            "/blog/nginx",
            "blogs/nginx.md",
            &["/minima/blogs/nginx.md"],
        )]);
        let pipeline = RenderPipeline::new(
            &config,
            github_pages_ctx(),
            Box::new(StaticSource::new(&[])),
        );

        let entry = pipeline.registry().lookup(&Route::new("/blog/nginx")).unwrap();
        let locations = pipeline.candidate_locations(entry);
        assert_eq!(locations, vec!["/minima/blogs/nginx.md".to_string()]);
    }
}
