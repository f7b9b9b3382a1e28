// Carnivalito poetry analyzer: CLI entry point.
//
// Reads one or more poems (files, or stdin when none are given), runs the
// full analysis pipeline on each, and prints the results as JSON or as a
// plain-text report. Several files are analyzed in parallel by the
// library's batch entry point.
//
// Usage:
//   cargo run -p carnivalito_cli -- [FILES...] [--config FILE]
//     [--vocabulary FILE] [--style STYLE] [--format json|text] [-v]
//
// Styles: dramatic, cheerful, romantic, satirical
//
// Exit status is non-zero if any input failed to analyze.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use carnivalito_poetry::{
    AnalysisConfig, PoemAnalysis, PoemRequest, PoemStyle, Vocabulary, analyze_many,
    default_vocabulary,
};
use clap::{Parser, ValueEnum};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "carnivalito-analyze", about = "Analyze the meter, rhyme and carnival style of Spanish verse")]
struct CliArgs {
    /// Poem files to analyze. Reads stdin when none are given.
    pub inputs: Vec<PathBuf>,

    /// JSON file overriding engine settings (length cap, style weights).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// JSON file replacing the embedded carnival vocabulary.
    #[clap(long)]
    pub vocabulary: Option<PathBuf>,

    /// Requested poem style (dramatic, cheerful, romantic, satirical).
    #[clap(long)]
    pub style: Option<String>,

    /// Output format.
    #[clap(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Log pipeline stages (debug level).
    #[clap(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => {
            let json = read_file(path)?;
            AnalysisConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    let custom_vocabulary = match &args.vocabulary {
        Some(path) => {
            let json = read_file(path)?;
            let vocabulary = Vocabulary::from_json(&json)
                .with_context(|| format!("Failed to parse vocabulary {}", path.display()))?;
            info!(
                theme_words = vocabulary.theme_words().len(),
                expressions = vocabulary.colloquial_expressions().len(),
                "Loaded vocabulary from {}",
                path.display()
            );
            Some(vocabulary)
        }
        None => None,
    };
    let vocabulary: &Vocabulary = match &custom_vocabulary {
        Some(vocabulary) => vocabulary,
        None => default_vocabulary(),
    };

    let style = args
        .style
        .as_deref()
        .map(str::parse::<PoemStyle>)
        .transpose()?;

    let (labels, requests) = read_requests(&args.inputs, style)?;
    info!("Analyzing {} poem(s)", requests.len());

    let results = analyze_many(&requests, &config, vocabulary);

    let mut failures = 0;
    let mut analyses: Vec<(&str, PoemAnalysis)> = Vec::with_capacity(results.len());
    for (label, result) in labels.iter().zip(results) {
        match result {
            Ok(analysis) => analyses.push((label.as_str(), analysis)),
            Err(e) => {
                warn!("{}: {}", label, e);
                failures += 1;
            }
        }
    }

    print_analyses(&analyses, args.format)?;

    if failures > 0 {
        bail!("{failures} of {} input(s) could not be analyzed", labels.len());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    // Logs go to stderr so JSON on stdout stays machine-readable.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .try_init();
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// One request per input file, or a single request from stdin. Returns the
/// display label of each request alongside it.
fn read_requests(
    inputs: &[PathBuf],
    style: Option<PoemStyle>,
) -> Result<(Vec<String>, Vec<PoemRequest>)> {
    let mut labels = Vec::new();
    let mut requests = Vec::new();

    if inputs.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        labels.push("<stdin>".to_string());
        requests.push(PoemRequest { text, style });
    } else {
        for path in inputs {
            labels.push(path.display().to_string());
            requests.push(PoemRequest {
                text: read_file(path)?,
                style,
            });
        }
    }
    Ok((labels, requests))
}

fn print_analyses(analyses: &[(&str, PoemAnalysis)], format: OutputFormat) -> Result<()> {
    if analyses.is_empty() {
        return Ok(());
    }
    match format {
        OutputFormat::Json => {
            // A single poem prints bare; several print as an array keyed by input.
            let json = if let [(_, analysis)] = analyses {
                serde_json::to_string_pretty(analysis)?
            } else {
                let entries: Vec<serde_json::Value> = analyses
                    .iter()
                    .map(|(label, analysis)| {
                        Ok(serde_json::json!({
                            "input": label,
                            "analysis": serde_json::to_value(analysis)?,
                        }))
                    })
                    .collect::<Result<_, serde_json::Error>>()?;
                serde_json::to_string_pretty(&entries)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            for (i, (label, analysis)) in analyses.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                if analyses.len() > 1 {
                    println!("=== {label} ===");
                }
                print!("{analysis}");
            }
        }
    }
    Ok(())
}
