//! Audit content reachability
//!
//! Every blog entry is supposed to have at least one candidate source
//! location reachable under the active hosting context. Nothing enforces
//! that at configuration time; this command surfaces violations before a
//! reader finds them as an error block.

use anyhow::Result;

use crate::Minima;

/// Check every blog entry's candidate locations; returns the number of
/// unreachable entries.
pub async fn run(minima: &Minima, host: Option<&str>) -> Result<usize> {
    let pipeline = minima.pipeline(host);
    let registry = pipeline.registry();

    println!(
        "Checking {} blog entries under base url {}",
        registry.len(),
        pipeline.hosting().base_url
    );

    let mut broken = 0;
    for entry in registry.entries() {
        match pipeline.probe(entry).await {
            Some(location) => {
                println!("  ok      {} -> {}", entry.url, location);
            }
            None => {
                broken += 1;
                println!("  MISSING {} (tried: {})", entry.url, pipeline.candidate_locations(entry).join(", "));
            }
        }
    }

    if broken == 0 {
        println!("All entries reachable.");
    } else {
        tracing::warn!("{} entries have no reachable content source", broken);
    }

    Ok(broken)
}
