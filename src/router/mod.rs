//! Hash-based routing
//!
//! The page's fragment identifier is the only navigation state. A `Route`
//! is the canonical form of one logical path; the `Router` holds the single
//! current route and notifies subscribers when it changes.

use percent_encoding::percent_decode_str;
use std::fmt;
use tokio::sync::watch;

/// A canonical logical path.
///
/// Route strings arrive in inconsistent shapes (`/blog/x`, `blog/x`,
/// `#/blog/x`, `/blog/x/`). Normalizing once at construction means lookup
/// everywhere else is a single exact match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(String);

impl Route {
    /// Normalize an arbitrary path string into a canonical route.
    ///
    /// Canonical form: percent-decoded, leading slash, duplicate separators
    /// collapsed, no trailing slash except for the root itself.
    pub fn new(path: &str) -> Self {
        let decoded = percent_decode_str(path.trim())
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.trim().to_string());

        let mut canonical = String::with_capacity(decoded.len() + 1);
        canonical.push('/');
        for segment in decoded.split('/').filter(|s| !s.is_empty()) {
            if !canonical.ends_with('/') {
                canonical.push('/');
            }
            canonical.push_str(segment);
        }

        Route(canonical)
    }

    /// Build a route from a fragment identifier, with or without the
    /// leading `#`. An empty fragment is the root route.
    pub fn from_fragment(fragment: &str) -> Self {
        let path = fragment.trim().trim_start_matches('#');
        if path.is_empty() {
            Route::root()
        } else {
            Route::new(path)
        }
    }

    /// The root route, `/`.
    pub fn root() -> Self {
        Route("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the current route and broadcasts changes.
///
/// There is exactly one piece of state: the current route string. Views
/// subscribe once and react to changes; nothing else observes navigation.
pub struct Router {
    current: watch::Sender<Route>,
}

impl Router {
    /// Create a router positioned at the root route.
    pub fn new() -> Self {
        let (current, _) = watch::channel(Route::root());
        Self { current }
    }

    /// Create a router positioned at the route named by a fragment,
    /// mirroring the initial-load path update.
    pub fn with_fragment(fragment: &str) -> Self {
        let (current, _) = watch::channel(Route::from_fragment(fragment));
        Self { current }
    }

    /// Navigate to a path. The path is normalized; subscribers are only
    /// woken when the canonical route actually changes.
    pub fn navigate(&self, path: &str) {
        let route = Route::new(path);
        self.current.send_if_modified(|current| {
            if *current == route {
                false
            } else {
                tracing::debug!("navigate: {} -> {}", current, route);
                *current = route;
                true
            }
        });
    }

    /// Handle a fragment-change event.
    pub fn on_fragment_change(&self, fragment: &str) {
        self.navigate(Route::from_fragment(fragment).as_str());
    }

    /// The current route.
    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    /// Subscribe to route changes.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_leading_slash() {
        assert_eq!(Route::new("blog/halting-problem").as_str(), "/blog/halting-problem");
        assert_eq!(Route::new("/blog/halting-problem").as_str(), "/blog/halting-problem");
    }

    #[test]
    fn test_normalizes_trailing_and_duplicate_slashes() {
        assert_eq!(Route::new("/blog/halting-problem/").as_str(), "/blog/halting-problem");
        assert_eq!(Route::new("//blog//halting-problem").as_str(), "/blog/halting-problem");
        assert_eq!(Route::new("/").as_str(), "/");
        assert_eq!(Route::new("").as_str(), "/");
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(Route::new("/blog/copy%20of%20a%20copy").as_str(), "/blog/copy of a copy");
    }

    #[test]
    fn test_from_fragment() {
        assert_eq!(Route::from_fragment("#/blog/nginx").as_str(), "/blog/nginx");
        assert_eq!(Route::from_fragment("/blog/nginx").as_str(), "/blog/nginx");
        assert_eq!(Route::from_fragment("").as_str(), "/");
        assert_eq!(Route::from_fragment("#").as_str(), "/");
    }

    #[test]
    fn test_router_navigate_updates_current() {
        let router = Router::new();
        assert!(router.current().is_root());
        router.navigate("blog/nginx");
        assert_eq!(router.current().as_str(), "/blog/nginx");
    }

    #[tokio::test]
    async fn test_router_notifies_subscriber() {
        let router = Router::new();
        let mut rx = router.subscribe();
        router.navigate("/projects");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_str(), "/projects");
    }

    #[tokio::test]
    async fn test_router_skips_redundant_navigation() {
        let router = Router::with_fragment("#/blog/nginx");
        let mut rx = router.subscribe();
        // Same canonical route in a different surface form: no wakeup.
        router.navigate("blog/nginx/");
        assert!(!rx.has_changed().unwrap());
    }
}
