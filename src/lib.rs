pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod http_client;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod reporter;
pub mod synthesizer;

use anyhow::Result;
use cli::Cli;
use colored::*;
use config::{Config, Credentials};
use fetchers::SeoDataClient;
use http_client::build_http_client;
use indicatif::{ProgressBar, ProgressStyle};
use pipeline::{PipelineOptions, ReportPipeline};
use reporter::Reporter;
use std::path::Path;
use synthesizer::GeminiClient;

pub async fn run(args: Cli) -> Result<()> {
    println!(
        "{}",
        "Seoscribe - AI-assisted SEO Report Generator"
            .bright_cyan()
            .bold()
    );
    println!("{}", "=".repeat(50).bright_blue());
    println!();

    // Validate URL
    let parsed = url::Url::parse(&args.url)
        .map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", args.url, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("URL must start with http:// or https://");
    }

    // Load configuration: explicit path first, then default locations
    let config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_default_paths()?.unwrap_or_default(),
    };
    let args = args.merged_with(&config);

    // Credentials are checked before any network activity
    let credentials = Credentials::resolve(&config)?;

    println!("{} {}", "Analyzing:".bright_white().bold(), args.url);
    println!(
        "{} {}",
        "Audit target:".bright_white().bold(),
        if args.mobile { "mobile" } else { "desktop" }
    );
    println!();

    let client = build_http_client(args.timeout)?;
    let pipeline = ReportPipeline::new(
        SeoDataClient::new(client.clone(), provider::DATAFORSEO_BASE_URL),
        GeminiClient::new(client, synthesizer::GEMINI_BASE_URL),
        PipelineOptions {
            audit_mobile: args.mobile,
        },
    );

    let verbose = args.verbose;
    let spinner = if verbose {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("[{elapsed_precise}] {spinner:.cyan} {msg}")
                .expect("Progress bar template should be valid"),
        );
        Some(pb)
    };

    let progress = |message: &str| {
        if let Some(pb) = &spinner {
            pb.set_message(message.to_string());
        } else {
            println!("{}", message.bright_yellow());
        }
    };

    let report = pipeline
        .generate_report(&args.url, &credentials, &progress)
        .await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let report = report?;

    println!(
        "{} report generated for {}",
        "Success:".bright_green().bold(),
        report.analyzed_url
    );

    // Output report
    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report);
        }
    }

    // Save to file if requested
    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}
