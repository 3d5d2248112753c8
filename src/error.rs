use thiserror::Error;

/// Domain errors raised by the simulation pipeline. Transport-level fetch
/// failures stay `anyhow::Error` at the data layer; everything is flattened
/// to a message string at the worker boundary.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no historical data found for {0}")]
    DataUnavailable(String),

    #[error("insufficient history to compute returns ({0} usable closing prices)")]
    InsufficientData(usize),

    #[error("terminal prices have zero spread; histogram binning is degenerate")]
    NumericDegeneracy,
}
