mod config;
mod data;
mod error;
mod gbm;
mod stats;
mod summary;
mod util;
mod worker;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "mcstock: Monte Carlo GBM terminal-price distributions for equities",
    after_help = "EXAMPLES:
    # Simulate one trading year of AAPL from its last year of daily closes
    cargo run --release -- AAPL

    # Reproducible run with more paths, plus company info
    cargo run --release -- MSFT --paths 50000 --seed 42 --info"
)]
struct Args {
    /// Stock ticker symbol (e.g., AAPL)
    symbol: String,

    /// Historical range to estimate drift/volatility from (e.g., 1y, 2y)
    #[arg(long, default_value = config::DATA_RANGE)]
    range: String,

    /// Number of simulated price paths
    #[arg(long, default_value_t = config::PATH_COUNT)]
    paths: usize,

    /// Time steps per path (trading days in the horizon)
    #[arg(long, default_value_t = config::HORIZON_STEPS)]
    steps: usize,

    /// Histogram bin count for the distribution summary
    #[arg(long, default_value_t = config::BIN_COUNT)]
    bins: usize,

    /// Seed for reproducible ensembles
    #[arg(long)]
    seed: Option<u64>,

    /// Also fetch and print company metadata
    #[arg(long)]
    info: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init_cpu_parallelism();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mcstock=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let symbol = args.symbol.trim().to_uppercase();

    let mut currency = None;
    if args.info {
        match data::fetch_ticker_info(&symbol).await {
            Ok(info) => {
                print_ticker_info(&info);
                currency = info.currency;
            }
            Err(e) => error!("Ticker info fetch failed: {}", e),
        }
    }
    let currency = currency.unwrap_or_else(|| "USD".to_string());

    let cfg = worker::SimulationConfig {
        horizon_steps: args.steps,
        total_time: args.steps as f64, // dt = 1 trading day
        path_count: args.paths,
        seed: args.seed,
    };

    let mut rx = worker::spawn_simulation(symbol.clone(), args.range.clone(), cfg);
    let ensemble = match rx.recv().await {
        Some(Ok(ensemble)) => ensemble,
        Some(Err(msg)) => {
            error!("Simulation failed: {}", msg);
            std::process::exit(1);
        }
        None => {
            error!("Simulation worker exited without a result");
            std::process::exit(1);
        }
    };

    let summary = summary::summarize(&ensemble, args.bins, config::SMOOTHING_WINDOW)?;
    print_summary(&symbol, &summary, util::currency_symbol(&currency));
    Ok(())
}

fn print_ticker_info(info: &data::TickerInfo) {
    let symbol = util::currency_symbol(info.currency.as_deref().unwrap_or("USD"));
    println!("{} - {}", info.symbol, info.name.as_deref().unwrap_or("n/a"));
    if let Some(sector) = &info.sector {
        println!("  Sector:     {}", sector);
    }
    if let Some(industry) = &info.industry {
        println!("  Industry:   {}", industry);
    }
    if let Some(cap) = info.market_cap {
        println!("  Market cap: {}", util::format_number(cap, symbol));
    }
    println!();
}

fn print_summary(symbol: &str, summary: &summary::DistributionSummary, currency: &str) {
    println!("{} - simulated terminal-price distribution", symbol);
    for (label, q) in [
        ("P5", 0.05),
        ("P25", 0.25),
        ("Median", 0.50),
        ("P75", 0.75),
        ("P95", 0.95),
    ] {
        if let Some(price) = summary.quantile(q) {
            println!("  {:<7} {}", label, util::format_number(price, currency));
        }
    }

    println!();
    println!("{:>12}  {:>10}  {:>10}", "price", "density", "cumulative");
    let midpoints = summary.midpoints();
    for ((mid, d), c) in midpoints
        .iter()
        .zip(&summary.density)
        .zip(&summary.cumulative)
    {
        println!("{:>12.2}  {:>10.4}  {:>10.4}", mid, d, c);
    }
}
