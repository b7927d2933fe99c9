//! Render one route to stdout

use anyhow::Result;

use crate::pipeline::RenderResult;
use crate::router::Route;
use crate::Minima;

/// Resolve and render a single route.
pub async fn run(minima: &Minima, route: &str, host: Option<&str>) -> Result<RenderResult> {
    let pipeline = minima.pipeline(host);
    let route = Route::new(route);
    tracing::info!(
        "rendering {} under base url {}",
        route,
        pipeline.hosting().base_url
    );

    let result = pipeline.render_route(&route).await;
    println!("{}", result.content);
    Ok(result)
}
