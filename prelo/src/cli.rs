//! Command-line interface definitions for prelo

use clap::Parser;
use std::path::PathBuf;

/// CLI structure for the prelo application
#[derive(Parser)]
#[command(name = "prelo")]
#[command(version)]
#[command(about = "Compile a markdown article into a paginated PDF", long_about = None)]
pub struct Cli {
    /// Markdown file with the article body
    pub input: PathBuf,

    /// Output PDF path (defaults to a slug of the title in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Article title (defaults to the input file stem)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Author name shown in the byline
    #[arg(short, long, default_value = "Redação")]
    pub author: String,

    /// Page geometry TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Logo image (PNG or JPEG) for the header band
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
