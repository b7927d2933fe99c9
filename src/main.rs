//! CLI entry point for minima

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minima")]
#[command(author = "Justin Meimar")]
#[command(version)]
#[command(about = "Content resolver and renderer for the minima portfolio/blog site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a route and render its content to stdout
    #[command(alias = "r")]
    Render {
        /// Logical route (e.g. /blog/halting-problem)
        route: String,

        /// Host name to resolve the hosting context from
        #[arg(long)]
        host: Option<String>,
    },

    /// List registered content
    List {
        /// Type of content to list (blog, project, route)
        #[arg(default_value = "blog")]
        r#type: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check that every blog entry has a reachable content source
    Check {
        /// Host name to resolve the hosting context from
        #[arg(long)]
        host: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "minima=debug,info"
    } else {
        "minima=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Render { route, host } => {
            let minima = minima::Minima::new(&base_dir)?;
            let result = minima::commands::render::run(&minima, &route, host.as_deref()).await?;
            if result.error {
                std::process::exit(1);
            }
        }

        Commands::List { r#type, json } => {
            let minima = minima::Minima::new(&base_dir)?;
            minima::commands::list::run(&minima, &r#type, json)?;
        }

        Commands::Check { host } => {
            let minima = minima::Minima::new(&base_dir)?;
            let broken = minima::commands::check::run(&minima, host.as_deref()).await?;
            if broken > 0 {
                std::process::exit(1);
            }
        }

        Commands::Version => {
            println!("minima version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
