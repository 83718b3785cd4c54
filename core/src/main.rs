use clap::Parser;
use labcat_core::cli::{Cli, OutputFormat};
use labcat_core::{
    HeaderMode, Pipeline, PipelineConfig, PipelineStats, Report, ReportEnvelope, TextReport,
    Vocabulary,
};
use log::{error, info};
use serde::Serialize;
use std::io::Read;
use std::process;
use std::sync::Arc;

/// JSON output: the report envelope, optionally followed by counters
#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    envelope: ReportEnvelope<'a>,

    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a PipelineStats>,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let text = match read_input(&cli) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read input: {}", e);
            eprintln!("Error: Failed to read {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    let vocabulary = match &cli.vocabulary {
        Some(dir) => {
            info!("Loading vocabulary from {}", dir.display());
            Vocabulary::from_dir(dir)
        }
        None => Vocabulary::builtin(),
    };
    let vocabulary = match vocabulary {
        Ok(vocabulary) => Arc::new(vocabulary),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let header_mode = if cli.detect_header {
        HeaderMode::Detect
    } else {
        HeaderMode::Fixed
    };
    let config = PipelineConfig::default()
        .fuzzy_threshold(cli.threshold)
        .header_mode(header_mode)
        .parallel(!cli.sequential);

    let pipeline = match Pipeline::new(config, vocabulary) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!("Pipeline configuration: {:?}", pipeline.config());
    let (report, stats) = pipeline.process_with_stats(&text);
    let stats = cli.stats.then_some(&stats);

    output_report(&report, stats, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn read_input(cli: &Cli) -> std::io::Result<String> {
    if cli.reads_stdin() {
        info!("Reading report from stdin");
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        info!("Processing file: {}", cli.file.display());
        std::fs::read_to_string(&cli.file)
    }
}

fn output_report(report: &Report, stats: Option<&PipelineStats>, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let mut text = TextReport::new(report);
            if let Some(stats) = stats {
                text = text.with_stats(stats);
            }
            print!("{}", text);
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                envelope: report.envelope(),
                stats,
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: Failed to serialize JSON: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
