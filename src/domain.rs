//! Swept voltage domain
//!
//! Ordered sample points the error model is evaluated at

use serde::Serialize;

use crate::VthreshError;

/// Strictly increasing, finite, non-empty sequence of voltages [V]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoltageDomain {
    samples: Vec<f64>,
}

impl VoltageDomain {
    /// Build a domain from explicit sample points
    pub fn new(samples: Vec<f64>) -> Result<Self, VthreshError> {
        if samples.is_empty() {
            return Err(VthreshError::EmptyInput("voltage domain has no samples"));
        }

        if let Some(idx) = samples.iter().position(|v| !v.is_finite()) {
            return Err(VthreshError::InvalidDomain(format!(
                "sample {idx} is not finite ({})",
                samples[idx]
            )));
        }

        if let Some(idx) = samples.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(VthreshError::InvalidDomain(format!(
                "samples must be strictly increasing: sample {} ({}) follows {}",
                idx + 1,
                samples[idx + 1],
                samples[idx]
            )));
        }

        Ok(Self { samples })
    }

    /// Uniform sweep over `[min, max]` with both endpoints included
    pub fn linspace(min: f64, max: f64, num_samples: usize) -> Result<Self, VthreshError> {
        if num_samples == 0 {
            return Err(VthreshError::EmptyInput("sweep requests zero samples"));
        }

        if !min.is_finite() || !max.is_finite() {
            return Err(VthreshError::InvalidDomain(
                "sweep bounds must be finite".to_string(),
            ));
        }

        if num_samples == 1 {
            return Self::new(vec![min]);
        }

        if max <= min {
            return Err(VthreshError::InvalidDomain(format!(
                "sweep upper bound {max} must exceed lower bound {min}"
            )));
        }

        let span = max - min;
        let denom = (num_samples - 1) as f64;
        let samples = (0..num_samples)
            .map(|idx| {
                if idx == num_samples - 1 {
                    max
                } else {
                    min + span * idx as f64 / denom
                }
            })
            .collect();

        // Rounding can collapse neighbours when the span is tiny.
        Self::new(samples)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed domain
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.samples[0]
    }

    pub fn last(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }
}
