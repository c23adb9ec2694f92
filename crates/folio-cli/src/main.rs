//! CLI entry point for folio.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use folio_core::{app_data_dir, load_config, probe, run, scan_books, Config, DocumentOutcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio: build a searchable chunk index from a directory of PDFs")]
struct Cli {
    /// Config file (default: folio.toml in the app data directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Extract, chunk, embed, and write the index (default).
    Build,
    /// Report encryption status and page count for every PDF in the source directory.
    Check,
    /// Print the effective configuration as TOML.
    Config,
    /// Show where folio looks for its config file.
    DataDir,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_core=info,folio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => with_config(cli.config, build),
        Commands::Check => with_config(cli.config, check),
        Commands::Config => with_config(cli.config, print_config),
        Commands::DataDir => match app_data_dir() {
            Some(p) => {
                println!("{}", p.display());
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Could not determine app data directory.");
                ExitCode::FAILURE
            }
        },
    }
}

fn with_config(path: Option<PathBuf>, f: impl FnOnce(&Config) -> ExitCode) -> ExitCode {
    match load_config(path.as_deref()) {
        Ok(config) => f(&config),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &Config) -> ExitCode {
    match config.to_toml() {
        Ok(s) => {
            print!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build(config: &Config) -> ExitCode {
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(run(config)) {
        Ok(outcome) => {
            for doc in &outcome.documents {
                match &doc.outcome {
                    DocumentOutcome::Indexed { pages, chunks } => {
                        println!("  {}  {} page(s), {} chunk(s)", doc.file_name, pages, chunks)
                    }
                    DocumentOutcome::Skipped(reason) => println!("  [skip] {}: {}", doc.file_name, reason),
                }
            }
            if outcome.index.is_some() {
                println!("Wrote {} chunks to {}", outcome.total_chunks(), config.out_path.display());
            } else {
                println!("No chunks produced from {}; nothing written.", config.source_dir.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(config: &Config) -> ExitCode {
    match scan_books(&config.source_dir) {
        Ok(books) => {
            for book in books {
                println!("{}: {}", book.file_name, probe(&book.path));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
