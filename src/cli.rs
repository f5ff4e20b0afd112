//! Command-line interface components.
//!
//! Reads customs row files, enriches every record, optionally writes the
//! cleaned records and prints summaries.

use crate::config::{CompressionAlgorithm, ExportFormat, TradeConfig};
use crate::constants::LOG_TARGET;
use crate::enrichment::RecordEnricher;
use crate::error::TradeError;
use crate::reader::{read_records, resolve_inputs};
use crate::summary::TradeSummary;
use crate::writer::{write_lookup_table, write_records, write_summaries};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "trade-enrich")]
#[command(about = "Classify customs import rows by HS code and extract goods description attributes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Customs row files or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Output file for cleaned records (.parquet or .csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// HS code lookup CSV with columns: HS Code, HSN Description, Main Category
    #[arg(long, value_name = "CSV")]
    pub lookup: Option<PathBuf>,

    /// Field delimiter of the lookup CSV (a single character, or "tab")
    #[arg(long, value_name = "DELIM", default_value = ",")]
    pub lookup_delimiter: String,

    /// Field delimiter (a single character, or "tab")
    #[arg(short, long, default_value = ",")]
    pub delimiter: String,

    /// Input files have no header row
    #[arg(long)]
    pub no_header: bool,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Print year, HS code, model and importer summaries
    #[arg(short, long)]
    pub summary: bool,

    /// Directory to write the summaries and the lookup table to
    #[arg(long, value_name = "DIR")]
    pub summary_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors and hide progress
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Build processing configuration from the arguments
    pub fn to_config(&self) -> crate::Result<TradeConfig> {
        let mut config = TradeConfig::default()
            .with_delimiter(parse_delimiter(&self.delimiter)?)
            .with_lookup_delimiter(parse_delimiter(&self.lookup_delimiter)?)
            .with_compression(CompressionAlgorithm::parse(&self.compression)?);

        // Summary files follow the format of the cleaned output
        if let Some(format) = self.output.as_deref().and_then(ExportFormat::from_path) {
            config = config.with_export_format(format);
        }

        if self.no_header {
            config = config.without_header();
        }
        if let Some(lookup) = &self.lookup {
            config = config.with_lookup_table(lookup);
        }

        Ok(config)
    }
}

/// Parse a delimiter argument into a single byte
pub fn parse_delimiter(value: &str) -> crate::Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(TradeError::Configuration {
                    message: format!("Delimiter must be a single ASCII character, got '{}'", other),
                }),
            }
        }
    }
}

/// Statistics for one run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub records: usize,
    pub unmapped_hs_codes: usize,
    pub undated_records: usize,
    pub rows_written: Option<usize>,
    pub summary_files: Vec<PathBuf>,
    pub processing_time: Duration,
}

/// Main command runner
pub fn run(args: Args) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config()?;
    config.validate()?;

    let table = config
        .load_hsn_table()
        .context("Failed to prepare HS code lookup table")?;
    info!("Using HS code lookup table with {} codes", table.len());
    let enricher = RecordEnricher::new(table);

    let files = resolve_inputs(&args.inputs)?;
    info!("Processing {} input files", files.len());

    let progress_bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    let mut stats = RunStats::default();
    let mut records = Vec::new();

    for file in &files {
        progress_bar.set_message(format!("Reading {}", file.display()));

        match read_records(file, &config) {
            Ok(decoded) => {
                stats.files_processed += 1;
                records.extend(enricher.enrich_all(&decoded));
            }
            Err(e) => {
                warn!("Failed to read {}: {}", file.display(), e);
                stats.files_failed += 1;
            }
        }

        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    if stats.files_processed == 0 {
        anyhow::bail!("None of the {} input files could be read", files.len());
    }

    stats.records = records.len();
    stats.unmapped_hs_codes = records
        .iter()
        .filter(|r| !enricher.table().contains(&r.hs_code))
        .count();
    stats.undated_records = records.iter().filter(|r| r.year.is_none()).count();

    if let Some(output) = &args.output {
        let written = write_records(&records, output, &config)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        stats.rows_written = Some(written);
    }

    let summary = (args.summary || args.summary_dir.is_some()).then(|| TradeSummary::build(&records));

    if let (Some(dir), Some(summary)) = (&args.summary_dir, &summary) {
        let mut written = write_summaries(summary, dir, &config)
            .with_context(|| format!("Failed to write summaries to {}", dir.display()))?;

        let lookup_path = dir.join(format!("lookup_table.{}", config.export_format.extension()));
        write_lookup_table(enricher.table(), &lookup_path, &config)
            .with_context(|| format!("Failed to write {}", lookup_path.display()))?;
        written.push(lookup_path);

        stats.summary_files = written;
    }

    stats.processing_time = start_time.elapsed();

    if !args.quiet {
        print_report(&args, &stats);
        if let Some(summary) = summary.as_ref().filter(|_| args.summary) {
            print_summary(summary);
        }
    }

    Ok(stats)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let initialised = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    if initialised.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

fn print_report(args: &Args, stats: &RunStats) {
    println!();
    println!("{}", "Trade enrichment complete".bright_green().bold());
    println!("  {} {}", "Files processed:".bold(), stats.files_processed);
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bold(),
            stats.files_failed.to_string().red()
        );
    }
    println!("  {} {}", "Records:".bold(), stats.records);
    println!(
        "  {} {}",
        "Unmapped HS codes:".bold(),
        if stats.unmapped_hs_codes > 0 {
            stats.unmapped_hs_codes.to_string().yellow()
        } else {
            stats.unmapped_hs_codes.to_string().normal()
        }
    );
    println!("  {} {}", "Records without year:".bold(), stats.undated_records);

    if let (Some(output), Some(rows)) = (&args.output, stats.rows_written) {
        println!(
            "  {} {} ({} rows)",
            "Output:".bold(),
            output.display().to_string().cyan(),
            rows
        );
    }

    if !stats.summary_files.is_empty() {
        println!("  {}", "Summary files:".bold());
        for path in &stats.summary_files {
            println!("    {}", path.display().to_string().cyan());
        }
    }

    println!(
        "  {} {}",
        "Processing time:".bold(),
        HumanDuration(stats.processing_time)
    );
}

fn print_summary(summary: &TradeSummary) {
    println!();
    println!("{}", "Year Summary".bright_blue().bold());
    println!(
        "  {:<6} {:>16} {:>16} {:>16} {:>10}",
        "Year", "Total Value INR", "Duty Paid INR", "Grand Total INR", "YoY %"
    );
    for year in &summary.years {
        let growth = year
            .yoy_growth
            .map(|g| format!("{:.1}", g * 100.0))
            .unwrap_or_default();
        println!(
            "  {:<6} {:>16.2} {:>16.2} {:>16.2} {:>10}",
            year.year, year.total_value_inr, year.duty_paid_inr, year.grand_total_inr, growth
        );
    }

    println!();
    println!("{}", "HSN Summary".bright_blue().bold());
    for hsn in &summary.hs_codes {
        println!(
            "  {:<10} {:<40} {:>16.2} {:>7.1}%",
            hsn.hs_code,
            hsn.hsn_description,
            hsn.grand_total_inr,
            hsn.contribution * 100.0
        );
    }

    println!();
    println!("{}", "Model Summary".bright_blue().bold());
    for model in &summary.models {
        println!(
            "  {:<20} qty {:>8} {:>16.2} avg USD {:>10.2} avg INR {:>10.2} {:>7.1}%",
            model.model_name,
            model.total_quantity,
            model.total_value_inr,
            model.avg_unit_price_usd,
            model.avg_unit_price_inr,
            model.share * 100.0
        );
    }

    println!();
    println!("{}", "Supplier Summary".bright_blue().bold());
    for supplier in &summary.suppliers {
        println!(
            "  {:<14} {:>16.2} qty {:>8} {:>7.1}%",
            supplier.iec,
            supplier.total_value_inr,
            supplier.total_quantity,
            supplier.share * 100.0
        );
    }

    println!();
    println!(
        "  {} {:.2} across {} records",
        "Grand total INR:".bold(),
        summary.grand_total_inr,
        summary.record_count
    );
}
