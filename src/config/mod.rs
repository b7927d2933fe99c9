//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::HostingConfig;
pub use site::SiteConfig;
pub use site::TypesetConfig;
