use rayon::ThreadPoolBuilder;
use std::sync::OnceLock;
use tracing::{info, warn};

static RAYON_INIT: OnceLock<()> = OnceLock::new();

pub fn init_cpu_parallelism() {
    RAYON_INIT.get_or_init(|| {
        let num_threads = num_cpus::get().max(1);
        match ThreadPoolBuilder::new().num_threads(num_threads).build_global() {
            Ok(_) => info!(
                "Initialized Rayon thread pool with {} threads (all logical CPU cores)",
                num_threads
            ),
            Err(e) => warn!(
                "Rayon thread pool already initialized or unavailable ({}). Using existing configuration.",
                e
            ),
        }
    });
}

/// Time steps per simulated path (trading days in one year).
pub const HORIZON_STEPS: usize = 252;
/// Simulation horizon in the same per-step units as the estimated drift and
/// volatility, so `dt = TOTAL_TIME / HORIZON_STEPS` is one trading day.
pub const TOTAL_TIME: f64 = 252.0;
/// Number of independent price paths per run.
pub const PATH_COUNT: usize = 10_000;
/// Histogram bins for the terminal-price distribution.
pub const BIN_COUNT: usize = 50;
/// Centered moving-average window applied to the displayed density.
pub const SMOOTHING_WINDOW: usize = 5;
/// Range of daily closes fetched for drift/volatility estimation.
pub const DATA_RANGE: &str = "1y";
