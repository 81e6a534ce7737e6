//! Overlap CLI binary.
//!
//! Provides command-line interface for the overlap analyzer.

mod integration;

use clap::{Args, Parser, Subcommand};
use integration::progress::fetch_bar;
use integration::settings::{FetchOverrides, build_client, load_config};
use overlap::{AnalysisConfig, AnalysisRun, Analyzer, FundLookup};
use overlap_output::{ExportFormat, export_to_file, write_report};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "overlap")]
#[command(about = "Overlap: which securities your index funds hold in common", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the funds' index constituents and report the overlap
    Analyze {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the reference each fund resolves to, without fetching
    References {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Report the overlap of raw constituent file URLs
    Compare {
        /// Constituent file URLs
        #[arg(required = true)]
        references: Vec<String>,

        /// Configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the fund table and how each locator resolves
    Funds {
        /// Configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fund to analyze (repeatable); replaces the configured selection
    #[arg(long = "fund", value_name = "NAME")]
    funds: Vec<String>,
}

#[derive(Args)]
struct FetchArgs {
    /// Maximum number of requests in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// Pause after each request, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl From<FetchArgs> for FetchOverrides {
    fn from(args: FetchArgs) -> Self {
        Self {
            concurrency: args.concurrency,
            delay_ms: args.delay_ms,
            timeout_secs: args.timeout_secs,
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (text, json or csv)
    #[arg(long, default_value = "text")]
    format: String,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Also list symbols held by a single index
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            selection,
            fetch,
            output,
        } => {
            analyze_funds(selection, fetch.into(), output).await?;
        }
        Commands::References { selection } => {
            print_references(selection)?;
        }
        Commands::Compare {
            references,
            config,
            fetch,
            output,
        } => {
            compare_references(references, config, fetch.into(), output).await?;
        }
        Commands::Funds { config } => {
            list_funds(config)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_selection(selection: SelectionArgs) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(selection.config.as_deref())?;
    if !selection.funds.is_empty() {
        config.funds = selection.funds;
    }
    Ok(config)
}

async fn analyze_funds(
    selection: SelectionArgs,
    overrides: FetchOverrides,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: ExportFormat = output.format.parse()?;
    let mut config = load_selection(selection)?;
    overrides.apply(&mut config)?;

    let table = config.fund_table();
    let normalizer = config.normalizer();
    let resolved = table.resolve_references(&normalizer, config.funds.as_slice());

    let text = format == ExportFormat::Text;
    if text {
        for reference in &resolved.references {
            println!("{}", reference.index.reference);
        }
        println!();
    }

    let client = build_client(&config.fetch)?;
    let analyzer = Analyzer::new(client).with_concurrency(config.fetch.concurrency);

    let pb = fetch_bar(resolved.references.len(), text && !output.no_progress);
    let run = analyzer
        .analyze_resolved(resolved, |target| {
            pb.set_message(target.name.to_string());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    emit_report(&run, format, output)
}

fn print_references(selection: SelectionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_selection(selection)?;
    let resolved = config
        .fund_table()
        .resolve_references(&config.normalizer(), config.funds.as_slice());

    for reference in &resolved.references {
        println!("{} -> {}", reference.fund, reference.index.reference);
    }
    for notice in &resolved.notices {
        println!("note: {notice}");
    }

    Ok(())
}

async fn compare_references(
    references: Vec<String>,
    config: Option<PathBuf>,
    overrides: FetchOverrides,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: ExportFormat = output.format.parse()?;
    let mut config = load_config(config.as_deref())?;
    overrides.apply(&mut config)?;

    let client = build_client(&config.fetch)?;
    let analyzer = Analyzer::new(client).with_concurrency(config.fetch.concurrency);
    let normalizer = config.normalizer();

    let pb = fetch_bar(
        references.len(),
        format == ExportFormat::Text && !output.no_progress,
    );
    let run = analyzer
        .analyze_references_with(&normalizer, references.as_slice(), |target| {
            pb.set_message(target.name.to_string());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    emit_report(&run, format, output)
}

fn list_funds(config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref())?;
    let table = config.fund_table();
    let normalizer = config.normalizer();

    println!("Fund table ({} funds):", table.len());
    for (fund, _) in table.iter() {
        match table.lookup(fund) {
            FundLookup::Tracked(locator) => {
                let index = normalizer.resolve(locator);
                println!("  {fund}");
                println!(
                    "    {locator} -> {} ({}) {}",
                    index.name, index.resolution, index.reference
                );
            }
            FundLookup::Untracked | FundLookup::Unknown => {
                println!("  {fund}");
                println!("    no tracked index");
            }
        }
    }

    Ok(())
}

fn emit_report(
    run: &AnalysisRun,
    format: ExportFormat,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = run
        .report_builder()
        .every_symbol(output.all)
        .build(&run.overlap);

    match output.output {
        Some(path) => {
            export_to_file(&report, format, &path)?;
            info!(path = %path.display(), entries = report.entries.len(), "report written");
            println!("Report written to {}", path.display());
        }
        None => write_report(&report, format, io::stdout().lock())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_fund_flags() {
        let cli = Cli::try_parse_from([
            "overlap",
            "-v",
            "analyze",
            "--fund",
            "Tata Nifty Realty Index Fund Direct Growth",
            "--fund",
            "Quant Flexi Cap Fund Direct Growth",
            "--delay-ms",
            "0",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                selection, fetch, ..
            } => {
                assert_eq!(selection.funds.len(), 2);
                assert_eq!(fetch.delay_ms, Some(0));
                assert_eq!(fetch.concurrency, None);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_all_flag() {
        let cli = Cli::try_parse_from([
            "overlap",
            "compare",
            "https://www.niftyindices.com/IndexConstituent/ind_nifty50list.csv",
            "--format",
            "csv",
            "--all",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare { output, .. } => {
                assert!(output.all);
                assert_eq!(output.format, "csv");
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_compare_requires_references() {
        assert!(Cli::try_parse_from(["overlap", "compare"]).is_err());
    }
}
