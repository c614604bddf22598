use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use cost_core::cost::{price_concurrently, FilePriceSource, PriceSource, PricingEngine};
use cost_core::observability::{setup_logging, EstimateMetrics, LogFormat};
use cost_core::{EstimateConfig, EstimateReport, PortfolioAggregator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

/// Project cloud costs for the line items in an estimate file.
#[derive(Debug, Parser)]
#[command(name = "cost-estimate", version)]
struct Cli {
    /// Estimate file (TOML)
    config: PathBuf,

    /// Price table (TOML) layered over the built-in prices; the estimate
    /// file's own overrides still win
    #[arg(long)]
    prices: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print Prometheus metrics after the estimate
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_format = if cli.json_logs { LogFormat::Json } else { LogFormat::Text };
    setup_logging(log_format, cli.verbose);

    let config = EstimateConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let settings = config.timeline_settings()?;

    let mut prices = config.price_table();
    if let Some(path) = &cli.prices {
        let external = FilePriceSource::new(path).load().await?;
        prices = external.with_overrides(&config.prices);
    }

    tracing::info!(
        items = config.items.len(),
        months = settings.total_months,
        "Starting estimate"
    );

    let metrics = EstimateMetrics::new()?;
    let engine = Arc::new(PricingEngine::new(Arc::new(prices)));
    let results = price_concurrently(engine, config.items.clone(), settings, Some(metrics.clone())).await?;
    let summary = PortfolioAggregator::new(settings.total_months).aggregate(&results)?;
    metrics.set_portfolio_total(summary.total_timeline_cost);

    tracing::info!(total = summary.total_timeline_cost, "Estimate complete");

    let report = EstimateReport::new(settings, results, summary);
    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print!("{}", report.render_table()),
    }

    if cli.metrics {
        print!("{}", metrics.export()?);
    }

    Ok(())
}
