use analytics::{AnalyticsEngine, AnalyticsSummary, Overrides};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Settings;
use core_types::{Period, RawTransaction};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// The main entry point for the Fintrack analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_settings(cli.config.as_deref())?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Analyze(args) => handle_analyze(args, settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Income and expense analytics: statistics, trends, risk and forecasts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./fintrack.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analytics HTTP service.
    Serve(ServeArgs),
    /// Analyse a JSON file of transactions and print every report.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on (e.g., "127.0.0.1:5001"). Overrides the configured host and port.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// A JSON array of transactions, or an object with a "transactions" array.
    #[arg(long, short)]
    input: PathBuf,

    /// Moving-average window, in aggregate entries.
    #[arg(long)]
    window: Option<usize>,

    /// Forecast horizon in days.
    #[arg(long)]
    forecast_days: Option<usize>,

    /// Forecast period unit ("day" or "month").
    #[arg(long)]
    period: Option<Period>,

    /// Fail instead of producing a flat forecast when there is too little history.
    #[arg(long)]
    strict: bool,

    /// Print the reports as one JSON document instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(addr) = args.addr {
        settings.server.host = addr.ip().to_string();
        settings.server.port = addr.port();
    }
    web_server::run_server(settings).await
}

async fn handle_analyze(args: AnalyzeArgs, settings: Settings) -> anyhow::Result<()> {
    let transactions = read_transactions(&args.input)?;
    tracing::info!(
        transactions = transactions.len(),
        input = %args.input.display(),
        "Analysing transactions."
    );

    let overrides = Overrides {
        window_size: args.window,
        forecast_days: args.forecast_days,
        period: args.period,
        strict: args.strict.then_some(true),
        risk_free_rate: None,
    };

    let engine = AnalyticsEngine::new(settings.analytics);
    let summary = engine.compute_summary(&transactions, &overrides).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionFile {
    List(Vec<RawTransaction>),
    Wrapped { transactions: Vec<RawTransaction> },
}

fn parse_transactions(contents: &str) -> anyhow::Result<Vec<RawTransaction>> {
    let file: TransactionFile = serde_json::from_str(contents)
        .context("expected a JSON array of transactions or an object with a \"transactions\" array")?;
    Ok(match file {
        TransactionFile::List(list) => list,
        TransactionFile::Wrapped { transactions } => transactions,
    })
}

fn read_transactions(path: &Path) -> anyhow::Result<Vec<RawTransaction>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_transactions(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

// ==============================================================================
// Report Rendering
// ==============================================================================

fn print_summary(summary: &AnalyticsSummary) {
    let stats = &summary.statistics;
    let mut table = Table::new();
    table.set_header(vec!["Statistic", "Value"]);
    table.add_row(vec!["Count".to_string(), stats.count.to_string()]);
    for (name, value) in [
        ("Total", stats.total),
        ("Mean", stats.mean),
        ("Median", stats.median),
        ("Std deviation", stats.std_deviation),
        ("Variance", stats.variance),
        ("Min", stats.min),
        ("Max", stats.max),
        ("25th percentile", stats.percentiles.p25),
        ("75th percentile", stats.percentiles.p75),
        ("90th percentile", stats.percentiles.p90),
    ] {
        table.add_row(vec![name.to_string(), format!("{:.2}", value)]);
    }
    println!("{table}");

    let trends = &summary.trends;
    println!(
        "\nTrend ({}-entry moving average): average growth {:.2}%, volatility {:.2}%",
        trends.window_size, trends.average_growth_rate, trends.volatility
    );
    if trends.moving_average.is_empty() {
        println!("Not enough daily data for a moving average.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Window end", "Moving average"]);
        for (date, value) in trends.dates.iter().zip(&trends.moving_average) {
            table.add_row(vec![date.to_string(), format!("{:.2}", value)]);
        }
        println!("{table}");
    }

    let risk = &summary.risk_metrics;
    let mut table = Table::new();
    table.set_header(vec!["Risk metric", "Value"]);
    table.add_row(vec!["Days".to_string(), risk.total_days.to_string()]);
    for (name, value) in [
        ("Mean return", risk.mean_return),
        ("Variance", risk.variance),
        ("Volatility", risk.volatility),
        ("Sharpe ratio", risk.sharpe_ratio),
        ("Value at risk (95%)", risk.value_at_risk_95),
        ("Max drawdown", risk.max_drawdown),
    ] {
        table.add_row(vec![name.to_string(), format!("{:.4}", value)]);
    }
    println!("\n{table}");

    let forecast = &summary.forecast;
    println!(
        "\nForecast per {}: slope {:.2}, intercept {:.2}",
        forecast.period, forecast.trend_slope, forecast.trend_intercept
    );
    let mut table = Table::new();
    table.set_header(vec!["Period", "Forecast"]);
    for (i, value) in forecast.forecast_values.iter().enumerate() {
        let label = forecast
            .forecast_periods
            .get(i)
            .map(|date| date.to_string())
            .unwrap_or_else(|| format!("+{}", i + 1));
        table.add_row(vec![label, format!("{:.2}", value)]);
    }
    println!("{table}");
}
