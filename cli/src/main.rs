//! docsift CLI - PDF outline extraction and section ranking

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use docsift::batch::{self, BatchItem};
use docsift::{
    ErrorMode, JsonFormat, OutlineExtractor, OutlineOptions, ParseOptions, PdfLayoutSource, Ranker,
    RankingOptions, SummaryStrategy,
};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    /// JSON config file with `outline`, `ranking` and `parse` sections
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Process documents one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Write compact JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Skip pages that fail to decode instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of every PDF in a directory
    Outline {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", env = "DOCSIFT_INPUT_DIR")]
        input: PathBuf,

        /// Directory for the JSON outlines
        #[arg(value_name = "OUTPUT_DIR", env = "DOCSIFT_OUTPUT_DIR")]
        output: PathBuf,
    },

    /// Rank document sections for a persona and task
    Rank {
        /// Ranking request file
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Directory the request's documents live in (default: next to the request)
        #[arg(long, value_name = "DIR")]
        docs_dir: Option<PathBuf>,

        /// Sections kept per document
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum section score kept per document
        #[arg(long)]
        min_score: Option<f64>,

        /// Skip contextual keyword mining
        #[arg(long)]
        single_pass: bool,

        /// How summaries are chosen
        #[arg(long, value_enum)]
        summary: Option<SummaryMode>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SummaryMode {
    /// Most keyword-dense passage (default)
    Density,
    /// Longest passage
    Longest,
}

impl From<SummaryMode> for SummaryStrategy {
    fn from(mode: SummaryMode) -> Self {
        match mode {
            SummaryMode::Density => SummaryStrategy::KeywordDensity,
            SummaryMode::Longest => SummaryStrategy::Longest,
        }
    }
}

/// Contents of the `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    outline: OutlineOptions,
    ranking: RankingOptions,
    parse: ParseOptions,
}

impl Config {
    fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
                Ok(serde_json::from_str(&text)
                    .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?)
            }
            None => Ok(Self::default()),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let result = Config::load(cli.config.as_deref()).and_then(|mut config| {
        if cli.sequential {
            config.parse.parallel = false;
        }
        if cli.lenient {
            config.parse = config.parse.with_error_mode(ErrorMode::Lenient);
        }
        log::debug!("parse options: {:?}", config.parse);
        match cli.command {
            Commands::Outline { input, output } => cmd_outline(&input, &output, config, format),
            Commands::Rank {
                request,
                output,
                docs_dir,
                top_k,
                min_score,
                single_pass,
                summary,
            } => {
                let mut ranking = config.ranking.clone();
                if let Some(k) = top_k {
                    ranking = ranking.with_top_k(k);
                }
                if let Some(score) = min_score {
                    ranking = ranking.with_min_score(score);
                }
                if single_pass {
                    ranking = ranking.single_pass();
                }
                if let Some(mode) = summary {
                    ranking = ranking.with_summary(mode.into());
                }
                cmd_rank(
                    &request,
                    output.as_deref(),
                    docs_dir.as_deref(),
                    ranking,
                    config.parse,
                    format,
                )
            }
            Commands::Version => {
                cmd_version();
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    config: Config,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = OutlineExtractor::with_options(config.outline)?;
    let parallel = config.parse.parallel;
    let source = PdfLayoutSource::with_options(config.parse);

    let total = batch::list_pdfs(input)?.len() as u64;
    if total == 0 {
        println!("{} {}", "No PDF files in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let items = batch::outline_directory(
        input,
        output,
        &extractor,
        &source,
        parallel,
        format,
        |item: &BatchItem| {
            pb.set_message(item.title.clone());
            pb.inc(1);
        },
    )?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Outlines:".green().bold());
    for (i, item) in items.iter().enumerate() {
        let branch = if i + 1 == items.len() { "└─" } else { "├─" };
        println!(
            "  {} {} ({} headings)",
            branch.dimmed(),
            item.output.display(),
            item.headings
        );
    }

    Ok(())
}

fn cmd_rank(
    request: &Path,
    output: Option<&Path>,
    docs_dir: Option<&Path>,
    ranking: RankingOptions,
    parse: ParseOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let parallel = parse.parallel;
    let ranker = Ranker::with_options(ranking).with_parallel(parallel);
    let source = PdfLayoutSource::with_options(parse);

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message("Ranking sections...");
    let result = batch::rank_request(request, docs_dir, &ranker, &source, parallel)?;
    pb.finish_and_clear();

    match output {
        Some(path) => {
            docsift::render::write_json(path, &result, format)?;
            println!(
                "{} {} ({} sections)",
                "Saved to".green(),
                path.display(),
                result.extracted_sections.len()
            );
        }
        None => println!("{}", docsift::render::to_json(&result, format)?),
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and section ranking tool");
    println!();
    println!("License: MIT");
}
