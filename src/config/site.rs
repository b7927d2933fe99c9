//! Site configuration (minima.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::{BlogEntry, NavLink, ProjectEntry};

/// Main site configuration.
///
/// The blog/project tables are plain configuration data: loaded once at
/// startup, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub hosting: HostingConfig,

    // Directory the content sources are read from
    pub content_dir: String,

    // Content tables
    #[serde(default)]
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub blogs: Vec<BlogEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub typeset: TypesetConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "minima".to_string(),
            author: "Justin Meimar".to_string(),
            description: String::new(),
            language: "en".to_string(),

            url: "https://justinmeimar.github.io".to_string(),
            hosting: HostingConfig::default(),

            content_dir: ".".to_string(),

            nav: vec![
                NavLink {
                    url: "/".to_string(),
                    text: "Home".to_string(),
                },
                NavLink {
                    url: "/blog".to_string(),
                    text: "Blog".to_string(),
                },
                NavLink {
                    url: "/projects".to_string(),
                    text: "Projects".to_string(),
                },
            ],
            blogs: Vec::new(),
            projects: Vec::new(),

            highlight: HighlightConfig::default(),
            typeset: TypesetConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Hosting map: host name to deployment root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    /// Known hosts and the root each one serves the site under
    pub roots: HashMap<String, String>,
    /// Root used for any host not in the map
    pub default_root: String,
}

impl Default for HostingConfig {
    fn default() -> Self {
        let mut roots = HashMap::new();
        roots.insert(
            "justinmeimar.github.io".to_string(),
            "/minima/".to_string(),
        );
        Self {
            roots,
            default_root: "/".to_string(),
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Math typesetting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesetConfig {
    pub enable: bool,
    /// Path to a katex.js bundle; when absent math is wrapped for a
    /// client-side pass instead
    pub katex_path: Option<String>,
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            enable: true,
            katex_path: None,
        }
    }
}
