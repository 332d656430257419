//! NitePost CLI — Command-line interface for building social posts.
//!
//! Usage:
//!   nitepost init <FILE>                 Create a new post document
//!   nitepost info <FILE>                 Show post information
//!   nitepost validate <FILE>             Check a post document and its assets
//!   nitepost preview <FILE>              Render the interactive HTML preview
//!   nitepost export <FILE>               Rasterize a post to PNG
//!   nitepost move <FILE> <ELEMENT>       Drag, rotate, or restack an element
//!   nitepost save <FILE> --title <TITLE> Save a post with its thumbnail (--id to update)
//!   nitepost load <REFERENCE>            Load a saved post document

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nitepost_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "nitepost",
    about = "Layout and render event posts for social feeds",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this configuration file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post document
    Init {
        /// Output path of the post document
        path: PathBuf,

        /// Post format: square, portrait, story
        #[arg(short, long, default_value = "square")]
        format: String,

        /// Headline text
        #[arg(long)]
        headline: Option<String>,

        /// Background: dark-gradient, hero-style, neon-accent, custom-image
        #[arg(long, default_value = "dark-gradient")]
        background: String,

        /// Image reference for custom-image backgrounds
        #[arg(long)]
        image: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show post information
    Info {
        /// Path to the post document
        path: PathBuf,

        /// Print the composed scene as JSON
        #[arg(long)]
        scene: bool,
    },

    /// Check a post document and its assets
    Validate {
        /// Path to the post document
        path: PathBuf,
    },

    /// Render the HTML preview
    Preview {
        /// Path to the post document
        path: PathBuf,

        /// Output HTML file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hide drag handles
        #[arg(long)]
        read_only: bool,
    },

    /// Rasterize a post to PNG
    Export {
        /// Path to the post document
        path: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render a thumbnail at most this many pixels wide
        #[arg(long)]
        thumbnail: Option<u32>,

        /// Also write the SVG scene next to the PNG
        #[arg(long)]
        svg: bool,
    },

    /// Drag, rotate, or restack an element
    Move {
        /// Path to the post document
        path: PathBuf,

        /// Element id: headline, section-N
        element: String,

        /// Drag target as percentages, e.g. 15,15
        #[arg(long, value_parser = parse_point)]
        to: Vec<(f64, f64)>,

        /// JSON file with recorded pointer events
        #[arg(long, conflicts_with = "to")]
        script: Option<PathBuf>,

        /// Rotation in degrees
        #[arg(long, allow_hyphen_values = true)]
        rotate: Option<f64>,

        /// Stacking order override
        #[arg(long, allow_hyphen_values = true)]
        z: Option<i32>,
    },

    /// Save a post with its thumbnail
    Save {
        /// Path to the post document
        path: PathBuf,

        /// Post title
        #[arg(short, long)]
        title: String,

        /// Status: draft, published
        #[arg(long, default_value = "draft")]
        status: String,

        /// Update this saved post instead of creating a new one
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the standard config location
        #[arg(long)]
        write: bool,
    },

    /// Load a saved post document
    Load {
        /// Post id or content reference
        reference: String,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_point(input: &str) -> Result<(f64, f64), String> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y but got '{input}'"))?;
    let x = x.trim().parse().map_err(|e| format!("Invalid X '{x}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("Invalid Y '{y}': {e}"))?;
    Ok((x, y))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    nitepost_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Init {
            path,
            format,
            headline,
            background,
            image,
            force,
        } => commands::init::run(path, format, headline, background, image, force),
        Commands::Info { path, scene } => commands::info::run(path, scene, &config),
        Commands::Validate { path } => commands::validate::run(path, &config),
        Commands::Preview {
            path,
            output,
            read_only,
        } => commands::preview::run(path, output, read_only, &config),
        Commands::Export {
            path,
            output,
            thumbnail,
            svg,
        } => commands::export::run(path, output, thumbnail, svg, &config).await,
        Commands::Move {
            path,
            element,
            to,
            script,
            rotate,
            z,
        } => commands::drag::run(path, element, to, script, rotate, z),
        Commands::Save {
            path,
            title,
            status,
            id,
        } => commands::save::run(path, title, status, id, &config).await,
        Commands::Config { write } => commands::config::run(write, &config),
        Commands::Load { reference, output } => {
            commands::load::run(reference, output, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("15,15"), Ok((15.0, 15.0)));
        assert_eq!(parse_point(" 12.5 , 80 "), Ok((12.5, 80.0)));
        assert!(parse_point("15").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_move_accepts_repeated_targets() {
        let cli = Cli::try_parse_from([
            "nitepost", "move", "post.json", "headline", "--to", "40,30", "--to", "15,15",
            "--rotate", "-7.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Move { to, rotate, .. } => {
                assert_eq!(to, vec![(40.0, 30.0), (15.0, 15.0)]);
                assert_eq!(rotate, Some(-7.5));
            }
            _ => panic!("expected move"),
        }
    }

    #[test]
    fn test_save_takes_optional_post_id() {
        let cli = Cli::try_parse_from([
            "nitepost", "save", "post.json", "--title", "Friday", "--id", "abc-123",
        ])
        .unwrap();
        match cli.command {
            Commands::Save { id, status, .. } => {
                assert_eq!(id.as_deref(), Some("abc-123"));
                assert_eq!(status, "draft");
            }
            _ => panic!("expected save"),
        }
    }
}
