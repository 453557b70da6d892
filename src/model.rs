//! Error-rate model
//!
//! Maps swept voltages to the probability that a noisy threshold detector
//! reports the wrong logic state for that voltage.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::domain::VoltageDomain;
use crate::gaussian::{normal_cdf, normal_sf};
use crate::params::ThresholdModel;
use crate::VthreshError;

/// One evaluated sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorRatePoint {
    /// True signal voltage [V]
    pub voltage: f64,
    /// Probability of misclassification, in [0, 1]
    pub error_rate: f64,
}

/// Error rate per voltage, in domain order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRateSeries {
    points: Vec<ErrorRatePoint>,
}

impl ErrorRateSeries {
    pub fn points(&self) -> &[ErrorRatePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorRatePoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn voltages(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.voltage).collect()
    }

    pub fn error_rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.error_rate).collect()
    }

    /// Sample with the highest error rate (first one on ties)
    pub fn peak(&self) -> Option<&ErrorRatePoint> {
        self.points.iter().fold(None, |best, p| match best {
            Some(b) if b.error_rate >= p.error_rate => Some(b),
            _ => Some(p),
        })
    }

    /// First point evaluated at exactly `voltage`, if any
    pub fn at_voltage(&self, voltage: f64) -> Option<&ErrorRatePoint> {
        self.points.iter().find(|p| p.voltage == voltage)
    }

    /// Smallest and largest voltage, whatever order the samples came in
    pub fn voltage_span(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.voltage;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.voltage), hi.max(p.voltage))
        }))
    }
}

impl<'a> IntoIterator for &'a ErrorRateSeries {
    type Item = &'a ErrorRatePoint;
    type IntoIter = std::slice::Iter<'a, ErrorRatePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Probability that noise pushes a reading at `voltage` above the effective
/// threshold
pub fn p_high(voltage: f64, model: &ThresholdModel) -> f64 {
    normal_cdf(standardized(voltage, model))
}

/// Misclassification probability at a single voltage
///
/// Below the effective threshold the intended state is LOW and the error is a
/// false HIGH, `p_high`. At or above it the intended state is HIGH and the
/// error is a false LOW, `1 - p_high`. Does not validate `model`.
pub fn error_rate_at(voltage: f64, model: &ThresholdModel) -> f64 {
    let z = standardized(voltage, model);
    if voltage < model.effective_threshold() {
        normal_cdf(z)
    } else {
        // 1 - Phi(z), evaluated as the upper tail to keep precision for large z.
        normal_sf(z)
    }
}

fn standardized(voltage: f64, model: &ThresholdModel) -> f64 {
    (voltage - model.effective_threshold()) / model.noise_std_dev
}

fn check_inputs(voltages: &[f64], model: &ThresholdModel) -> Result<(), VthreshError> {
    model.validate()?;
    if voltages.is_empty() {
        return Err(VthreshError::EmptyInput("voltage domain has no samples"));
    }
    if let Some(idx) = voltages.iter().position(|v| !v.is_finite()) {
        return Err(VthreshError::InvalidDomain(format!(
            "sample {idx} is not finite ({})",
            voltages[idx]
        )));
    }
    Ok(())
}

fn into_series(voltages: &[f64], rates: Vec<f64>) -> ErrorRateSeries {
    let points = voltages
        .iter()
        .zip(rates)
        .map(|(&voltage, error_rate)| ErrorRatePoint {
            voltage,
            error_rate,
        })
        .collect();
    ErrorRateSeries { points }
}

/// Evaluate the model over arbitrary finite voltages, keeping input order
pub fn error_rates(
    voltages: &[f64],
    model: &ThresholdModel,
) -> Result<ErrorRateSeries, VthreshError> {
    check_inputs(voltages, model)?;

    let rates = voltages.iter().map(|&v| error_rate_at(v, model)).collect();
    let series = into_series(voltages, rates);

    debug!(
        samples = series.len(),
        effective_threshold = model.effective_threshold(),
        noise_std_dev = model.noise_std_dev,
        "computed error-rate series"
    );
    Ok(series)
}

/// Evaluate the model over a voltage domain
pub fn compute_error_rate(
    domain: &VoltageDomain,
    model: &ThresholdModel,
) -> Result<ErrorRateSeries, VthreshError> {
    error_rates(domain.samples(), model)
}

/// Same as [`compute_error_rate`], with samples evaluated on the rayon pool
pub fn compute_error_rate_par(
    domain: &VoltageDomain,
    model: &ThresholdModel,
) -> Result<ErrorRateSeries, VthreshError> {
    let voltages = domain.samples();
    check_inputs(voltages, model)?;

    let rates: Vec<f64> = voltages
        .par_iter()
        .map(|&v| error_rate_at(v, model))
        .collect();
    let series = into_series(voltages, rates);

    debug!(
        samples = series.len(),
        effective_threshold = model.effective_threshold(),
        "computed error-rate series in parallel"
    );
    Ok(series)
}
