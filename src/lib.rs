//! minima: content resolver and renderer for a personal portfolio/blog site
//!
//! This crate implements the content half of the minima site as a reusable
//! engine: hash-based routing, an immutable registry of blog and project
//! metadata, hosting-aware base-URL resolution, and an async
//! fetch-and-render pipeline that turns Markdown or HTML sources into
//! sanitized markup for the page's content region.

pub mod commands;
pub mod config;
pub mod content;
pub mod hosting;
pub mod pipeline;
pub mod router;
pub mod view;

use anyhow::Result;
use std::path::Path;

use content::FsContentSource;
use hosting::HostingContext;
use pipeline::RenderPipeline;

/// Configuration file name looked up in the base directory
const CONFIG_FILE: &str = "minima.yml";

/// The main minima application
#[derive(Clone)]
pub struct Minima {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory content sources are read from
    pub content_dir: std::path::PathBuf,
}

impl Minima {
    /// Create a new minima instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Resolve the hosting context for a host name; defaults to local
    /// hosting when none is given.
    pub fn hosting_context(&self, host: Option<&str>) -> HostingContext {
        let host = host.unwrap_or("localhost");
        HostingContext::resolve(&self.config.hosting, host)
    }

    /// Build a render pipeline over the content directory for a host.
    pub fn pipeline(&self, host: Option<&str>) -> RenderPipeline {
        let ctx = self.hosting_context(host);
        let source = FsContentSource::new(&self.content_dir).with_mount(&ctx.base_url);
        RenderPipeline::new(&self.config, ctx, Box::new(source))
    }
}
