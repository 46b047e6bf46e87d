use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use slippage_collector::collector::BatchCollector;
use slippage_collector::config::CollectorConfig;
use slippage_collector::market_data::adapters::binance::BinanceRestAdapter;
use slippage_collector::market_data::client::OrderBookClient;
use slippage_collector::persist::CsvSink;
use slippage_collector::{stats, telemetry};

#[derive(Parser, Debug)]
#[command(name = "slippage-collector", version, about = "Sample exchange order books and record slippage estimates")]
struct Cli {
    /// Config file (toml/yaml/json); SLIPPAGE_* env vars override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_filter: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the order book and append slippage records to CSV
    Collect(CollectArgs),
    /// Print summary statistics for a collected CSV file
    Stats {
        /// Defaults to the configured output path
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct CollectArgs {
    #[arg(long)]
    symbol: Option<String>,
    #[arg(long)]
    order_size: Option<f64>,
    #[arg(long)]
    batch_size: Option<usize>,
    #[arg(long)]
    delay_secs: Option<f64>,
    /// Stop after this many samples (unbounded by default)
    #[arg(long)]
    total_points: Option<u64>,
    #[arg(long)]
    depth_limit: Option<usize>,
    #[arg(long)]
    max_retries: Option<u32>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
}

impl CollectArgs {
    fn apply(self, config: &mut CollectorConfig) {
        if let Some(v) = self.symbol { config.symbol = v; }
        if let Some(v) = self.order_size { config.order_size = v; }
        if let Some(v) = self.batch_size { config.batch_size = v; }
        if let Some(v) = self.delay_secs { config.delay_seconds = v; }
        if let Some(v) = self.total_points { config.total_points = Some(v); }
        if let Some(v) = self.depth_limit { config.depth_limit = v; }
        if let Some(v) = self.max_retries { config.max_retries = v; }
        if let Some(v) = self.output { config.output_path = v; }
        if let Some(v) = self.base_url { config.base_url = v; }
    }
}

/// Forward the first interrupt to the collector, then wait for a second one.
async fn relay_interrupts<F, Fut>(mut next_signal: F, tx: &broadcast::Sender<()>) -> std::io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    next_signal().await?;
    info!("Interrupt received, finishing current tick (interrupt again to exit now)");
    let _ = tx.send(());
    next_signal().await
}

// The sender stays alive for the whole run so a listener failure never reads as a shutdown
fn spawn_shutdown_listener() -> broadcast::Receiver<()> {
    let (tx, rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match relay_interrupts(tokio::signal::ctrl_c, &tx).await {
            Ok(()) => {
                warn!("Second interrupt, exiting without flushing");
                std::process::exit(130);
            }
            Err(e) => {
                error!(error = %e, "Unable to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}

async fn collect(config: CollectorConfig) -> anyhow::Result<()> {
    let adapter = BinanceRestAdapter::new(&config.base_url, config.request_timeout())
        .context("building HTTP client")?;
    let client = OrderBookClient::new(adapter);
    let sink = CsvSink::new(&config.output_path);

    let shutdown = spawn_shutdown_listener();
    let mut collector = BatchCollector::new(client, sink, config);
    let summary = collector.run(shutdown).await?;

    info!(
        total_processed = summary.total_processed,
        batches = summary.batches_flushed,
        reason = ?summary.stop_reason,
        rows = collector.sink().rows_written(),
        output = %collector.sink().path().display(),
        "Collection finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    telemetry::init_tracing(&cli.log_filter);

    let mut config = CollectorConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Collect(args) => {
            args.apply(&mut config);
            config.validate().context("invalid configuration")?;
            telemetry::init_metrics(config.metrics_port)?;
            collect(config).await
        }
        Command::Stats { input } => {
            let path = input.unwrap_or(config.output_path);
            let summaries = stats::summarize(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            print!("{}", stats::render_table(&summaries));
            Ok(())
        }
    }
}
