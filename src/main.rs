use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use offer_tsv::generator::OfferGenerator;
use offer_tsv::pipeline::{generate_tsv, import_tsv, parse_count, ConsoleStyle};
use offer_tsv::sources::HttpOfferSource;
use offer_tsv::OfferError;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prepare rental offer data for the REST API server.
#[derive(Parser, Debug)]
#[command(name = "offer-tsv", version, about)]
struct Cli {
    /// Print the contents of a TSV file, header first
    #[arg(long, value_name = "PATH", conflicts_with = "generate")]
    import: Option<PathBuf>,

    /// Generate COUNT random offers into PATH from base offers served at URL
    #[arg(long, num_args = 3, value_names = ["COUNT", "PATH", "URL"])]
    generate: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for imported data
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Malformed invocations get the full help and the argument error exit code
            let _ = err.print();
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    match (cli.import, cli.generate) {
        (Some(path), _) => import(path).await,
        (None, Some(args)) => generate(args).await,
        (None, None) => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn import(path: PathBuf) -> anyhow::Result<()> {
    info!("📥 Importing {}", path.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    import_tsv(&path, &mut out, ConsoleStyle::detect())
        .await
        .with_context(|| format!("Failed to import {}", path.display()))?;

    Ok(())
}

async fn generate(args: Vec<String>) -> anyhow::Result<()> {
    let [count, path, url] = <[String; 3]>::try_from(args)
        .map_err(|_| OfferError::Argument("expected <count> <path> <url>".to_string()))?;

    let count = parse_count(&count)?;
    let source = HttpOfferSource::new(&url)?;
    let mut generator = OfferGenerator::new();

    let rows = generate_tsv(&source, &mut generator, count, &path)
        .await
        .with_context(|| format!("Failed to generate offers into {path}"))?;

    info!("✅ Generated {} offers into {}", rows, path);
    Ok(())
}
