//! vthresh - voltage-threshold detector error model
//!
//! Estimates the probability that a binary threshold detector misreads a
//! signal when the reading carries zero-mean Gaussian noise and the decision
//! threshold is shifted by a fixed systematic offset (for example the
//! base-emitter drop of a transistor stage in front of a comparator).

pub mod config;
pub mod domain;
pub mod gaussian;
pub mod model;
pub mod params;
pub mod render;

use thiserror::Error;

// Re-export main types
pub use config::SweepConfig;
pub use domain::VoltageDomain;
pub use model::{
    compute_error_rate, compute_error_rate_par, error_rate_at, error_rates, p_high,
    ErrorRatePoint, ErrorRateSeries,
};
pub use params::ThresholdModel;
pub use render::{CsvRenderer, PlotStyle, Renderer, SvgRenderer};

#[derive(Debug, Error)]
pub enum VthreshError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    #[error("invalid voltage domain: {0}")]
    InvalidDomain(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("render error: {0}")]
    Render(String),
}
