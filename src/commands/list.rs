//! List registered site content

use anyhow::Result;

use crate::Minima;

/// List site content by type
pub fn run(minima: &Minima, content_type: &str, json: bool) -> Result<()> {
    match content_type {
        "blog" | "blogs" => {
            if json {
                println!("{}", serde_json::to_string_pretty(&minima.config.blogs)?);
                return Ok(());
            }
            println!("Blogs ({}):", minima.config.blogs.len());
            for blog in &minima.config.blogs {
                println!("  {} - {} [{}]", blog.date, blog.title, blog.url);
            }
        }
        "project" | "projects" => {
            if json {
                println!("{}", serde_json::to_string_pretty(&minima.config.projects)?);
                return Ok(());
            }
            println!("Projects ({}):", minima.config.projects.len());
            for project in &minima.config.projects {
                println!("  {} - {} [{}]", project.date, project.title, project.link);
            }
        }
        "route" | "routes" => {
            let routes: Vec<String> = minima
                .config
                .nav
                .iter()
                .map(|link| link.url.clone())
                .chain(minima.config.blogs.iter().map(|b| b.url.clone()))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
                return Ok(());
            }
            println!("Routes ({}):", routes.len());
            for route in routes {
                println!("  {}", route);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: blog, project, route",
                content_type
            );
        }
    }

    Ok(())
}
