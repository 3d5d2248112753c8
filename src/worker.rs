use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config;
use crate::data::{self, StockData};
use crate::error::SimError;
use crate::gbm::{self, SimulationParameters};
use crate::stats;

/// Per-run overrides folded onto the estimated statistics when building the
/// final `SimulationParameters`.
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    pub horizon_steps: usize,
    pub total_time: f64,
    pub path_count: usize,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_steps: config::HORIZON_STEPS,
            total_time: config::TOTAL_TIME,
            path_count: config::PATH_COUNT,
            seed: None,
        }
    }
}

/// Runs estimate → simulate against an already-fetched history. Synchronous
/// and CPU-bound; callers on the async runtime should go through
/// `spawn_simulation` instead.
pub fn run_from_history(
    data: &StockData,
    cfg: &SimulationConfig,
) -> Result<Vec<f64>, SimError> {
    let stats = stats::estimate(data)?;
    let s0 = data
        .latest_close()
        .ok_or_else(|| SimError::DataUnavailable(data.symbol.clone()))?;

    let params = SimulationParameters {
        horizon_steps: cfg.horizon_steps,
        total_time: cfg.total_time,
        path_count: cfg.path_count,
        seed: cfg.seed,
        ..SimulationParameters::from_stats(s0, stats)
    };
    info!(
        symbol = %data.symbol,
        s0,
        mu = stats.mu,
        sigma = stats.sigma,
        paths = cfg.path_count,
        "starting GBM simulation"
    );

    Ok(gbm::simulate(&params))
}

async fn execute(symbol: String, range: String, cfg: SimulationConfig) -> anyhow::Result<Vec<f64>> {
    let data = Arc::new(data::fetch_range(&symbol, &range).await?);
    let ensemble = tokio::task::spawn_blocking(move || run_from_history(&data, &cfg)).await??;
    Ok(ensemble)
}

/// Fetches history for `symbol` and runs the simulation off the async
/// runtime, on the blocking pool. The receiver sees exactly one message: the
/// terminal-price ensemble on success or the error text on failure. There is
/// no cancellation and no retry; a run either completes or fails.
pub fn spawn_simulation(
    symbol: String,
    range: String,
    cfg: SimulationConfig,
) -> mpsc::Receiver<Result<Vec<f64>, String>> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let result = execute(symbol, range, cfg).await.map_err(|e| e.to_string());
        let _ = tx.send(result).await;
    });
    rx
}

/// Same single-fire channel contract as `spawn_simulation`, starting from an
/// in-hand history instead of a fetch.
#[allow(dead_code)]
pub fn spawn_simulation_from_history(
    data: Arc<StockData>,
    cfg: SimulationConfig,
) -> mpsc::Receiver<Result<Vec<f64>, String>> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || run_from_history(&data, &cfg))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));
        let _ = tx.send(result).await;
    });
    rx
}
