mod dump;
mod export;
mod input;
mod links;
mod profiles;
mod weekly;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use links::FilterConfig;

#[derive(Parser)]
#[command(name = "pnp_links", about = "Crowdfunding link extraction for weekly PnP roundups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract project links from a raw source_code.txt export
    Dump {
        /// Path to source_code.txt (default: newest */source_code.txt)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output JSON path (default: next to input)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Optional CSV output path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Extract creator-attributed links from weekly markdown notes
    Weekly {
        /// Path to extracted_text_and_urls.md (default: newest */extracted_text_and_urls.md)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output JSON path
        #[arg(long, default_value = "data/weekly_extracted.json")]
        output: PathBuf,
        /// Optional CSV output path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Fetch BGG profile URLs and write-ups for roster entries
    Profiles {
        /// Path to the roster JSON
        #[arg(long, default_value = "data/content.json")]
        path: PathBuf,
        /// Write changes back to the file
        #[arg(long)]
        write: bool,
        /// Preview without writing (default)
        #[arg(long)]
        dry_run: bool,
        /// Refetch even if bggUrl/bio already exist
        #[arg(long)]
        force: bool,
        /// Delay between requests, in milliseconds
        #[arg(long, default_value = "500")]
        delay_ms: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Dump { input, output, csv } => cmd_dump(input, output, csv),
        Commands::Weekly { input, output, csv } => cmd_weekly(input, output, csv),
        Commands::Profiles {
            path,
            write,
            dry_run,
            force,
            delay_ms,
        } => profiles::run(&path, write, dry_run, force, delay_ms),
    }
}

/// Explicit path, or the newest matching export folder under the cwd.
/// No usable input is a hard error before any processing starts.
fn resolve_input(explicit: Option<PathBuf>, default_name: &str) -> Result<PathBuf> {
    let Some(path) = explicit.or_else(|| input::find_latest(Path::new("."), default_name)) else {
        bail!("no {default_name} found. Pass --input path/to/{default_name}");
    };
    if !path.exists() {
        bail!("input not found: {}", path.display());
    }
    Ok(path)
}

fn cmd_dump(input: Option<PathBuf>, output: Option<PathBuf>, csv: Option<PathBuf>) -> Result<()> {
    let input_path = resolve_input(input, "source_code.txt")?;
    let output_path =
        output.unwrap_or_else(|| input_path.with_file_name("source_code_extracted.json"));

    let text = links::clean_source(&input::read_lossy(&input_path)?);
    let source_file = input_path.display().to_string();
    let records = dump::scan(&text, &source_file, &FilterConfig::default());
    let report = dump::build_report(&source_file, records);

    export::write_json(&output_path, &report)?;
    if let Some(csv_path) = &csv {
        let rows: Vec<Vec<String>> = report.unique_records.iter().map(dump::csv_row).collect();
        export::write_csv(csv_path, dump::CSV_HEADER, &rows)?;
    }

    println!("Wrote JSON: {}", output_path.display());
    if let Some(csv_path) = &csv {
        println!("Wrote CSV: {}", csv_path.display());
    }
    println!(
        "Counts: relevant_records={} unique_urls={}",
        report.counts.relevant_records, report.counts.unique_urls
    );
    Ok(())
}

fn cmd_weekly(input: Option<PathBuf>, output: PathBuf, csv: Option<PathBuf>) -> Result<()> {
    let input_path = resolve_input(input, "extracted_text_and_urls.md")?;

    let text = input::read_strict(&input_path)?;
    let report = weekly::parse(&text, &input_path.display().to_string());

    export::write_json(&output, &report)?;
    if let Some(csv_path) = &csv {
        let rows: Vec<Vec<String>> = report.source_records.iter().map(weekly::csv_row).collect();
        export::write_csv(csv_path, weekly::CSV_HEADER, &rows)?;
    }

    println!("Wrote JSON: {}", output.display());
    if let Some(csv_path) = &csv {
        println!("Wrote CSV: {}", csv_path.display());
    }
    println!(
        "Counts: source_records={} unique_source_urls={} unique_all_urls={}",
        report.counts.source_records,
        report.counts.unique_source_urls,
        report.counts.unique_all_urls
    );
    Ok(())
}
