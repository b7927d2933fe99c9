//! Blog and project metadata records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Static metadata describing one blog post and where its content lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogEntry {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Logical route (e.g. `/blog/halting-problem`)
    pub url: String,

    /// Primary content source location, relative to the deployment root
    pub path: String,

    /// Alternate source locations for other hosting roots, tried in order
    /// when the primary location is missing
    #[serde(default)]
    pub alternates: Vec<String>,
}

impl BlogEntry {
    /// All candidate source locations, primary first.
    pub fn candidate_paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.path.as_str()).chain(self.alternates.iter().map(String::as_str))
    }
}

/// Static metadata describing one portfolio project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Project title
    pub title: String,

    /// Project date
    pub date: NaiveDate,

    /// Short description
    pub desc: String,

    /// External link to the project
    pub link: String,

    /// Thumbnail location, relative to the deployment root
    pub photo: String,
}

/// One top-level navigation link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    /// Logical route
    pub url: String,

    /// Link text
    pub text: String,
}
