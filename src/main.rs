use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use http_hammer::report::{render_json, write_human};
use http_hammer::runner::enter_phase;
use http_hammer::{dispatch, RequestExecutor, RunConfig, RunPhase};

// =============================================================================
// Configuration
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "http-hammer")]
#[command(about = "Fixed-budget HTTP GET load generator", long_about = None)]
struct Cli {
    /// Target URL
    #[arg(long)]
    url: String,

    /// Total number of requests across all workers
    #[arg(long)]
    requests: u64,

    /// Number of concurrent workers
    #[arg(long)]
    concurrency: usize,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout only carries the summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    enter_phase(RunPhase::Configuring);
    let config = RunConfig::new(cli.url, cli.requests, cli.concurrency)
        .context("Invalid configuration")?;

    info!("════════════════════════════════════════════════════════════");
    info!("                    HTTP LOAD TEST");
    info!("════════════════════════════════════════════════════════════");
    info!("URL: {}", config.url());
    info!("Requests: {}", config.total_requests());
    info!("Concurrency: {}", config.concurrency());
    info!("════════════════════════════════════════════════════════════");

    let executor = RequestExecutor::new(config.url()).context("Failed to build HTTP client")?;
    let summary = dispatch(&config, move || {
        let executor = executor.clone();
        async move { executor.execute().await }
    })
    .await
    .context("Load test failed")?;

    enter_phase(RunPhase::Reporting);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Human => write_human(&mut out, &summary)?,
        OutputFormat::Json => {
            let json = render_json(&summary).context("Failed to serialize summary")?;
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;

    enter_phase(RunPhase::Done);
    info!("Load test complete");

    Ok(())
}
