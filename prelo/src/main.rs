//! prelo - markdown article to paginated PDF

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use prelo::{generate, Article, Author, PageGeometry};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let content = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let title = cli.title.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Artigo".to_string())
    });

    let geometry = match &cli.config {
        Some(path) => PageGeometry::load(path)
            .with_context(|| format!("Failed to load geometry from {}", path.display()))?,
        None => PageGeometry::default(),
    };

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let article = Article {
        id: 0,
        title,
        content,
        tag: None,
        author_id: 0,
        created_at: Some(today),
        updated_at: None,
    };
    let author = Author {
        id: 0,
        name: cli.author.clone(),
    };

    let artifact = generate(&article, &author, &geometry, cli.logo.as_deref())
        .context("Failed to generate document")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| std::path::PathBuf::from(&artifact.filename));
    std::fs::write(&output, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {} ({} bytes)", output.display(), artifact.bytes.len());
    Ok(())
}
