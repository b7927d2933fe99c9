//! Page view - ties the router to the pipeline
//!
//! The view owns the single subscription to navigation events and the
//! content region state. Each navigation takes a fresh epoch; a render
//! that finishes after a newer navigation has started is discarded, so a
//! stale fetch can never overwrite newer content.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::pipeline::{RenderPipeline, RenderResult};
use crate::router::{Route, Router};

/// The page-view component: current route, current content region.
pub struct PageView {
    router: Router,
    pipeline: RenderPipeline,
    epoch: AtomicU64,
    region: RwLock<Option<RenderResult>>,
}

impl PageView {
    pub fn new(pipeline: RenderPipeline) -> Self {
        Self {
            router: Router::new(),
            pipeline,
            epoch: AtomicU64::new(0),
            region: RwLock::new(None),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The markup currently in the content region.
    pub async fn content(&self) -> Option<RenderResult> {
        self.region.read().await.clone()
    }

    /// Navigate to a path and render it into the content region.
    pub async fn navigate(&self, path: &str) {
        self.router.navigate(path);
        self.show(&self.router.current()).await;
    }

    /// Render a route and apply the result if no newer navigation has
    /// started in the meantime.
    pub async fn show(&self, route: &Route) {
        let epoch = self.begin_navigation();
        let result = self.pipeline.render_route(route).await;
        self.apply_if_current(epoch, result).await;
    }

    /// Drive the view from router changes. Runs until the router is gone.
    pub async fn run(&self) {
        let mut rx = self.router.subscribe();
        self.show(&self.router.current()).await;
        while rx.changed().await.is_ok() {
            let route = rx.borrow_and_update().clone();
            self.show(&route).await;
        }
    }

    fn begin_navigation(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn apply_if_current(&self, epoch: u64, result: RenderResult) -> bool {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("discarding stale render (epoch {})", epoch);
            return false;
        }
        *self.region.write().await = Some(result);
        true
    }
}
