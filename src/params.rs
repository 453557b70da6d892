//! Threshold model parameters
//!
//! Nominal threshold, systematic offset and noise spread of the detector

use serde::{Deserialize, Serialize};

use crate::VthreshError;

/// Parameters of the noisy threshold detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdModel {
    /// Ideal decision threshold [V]
    pub nominal_threshold: f64,
    /// Fixed shift added by the upstream stage [V]
    pub systematic_offset: f64,
    /// Standard deviation of the Gaussian reading noise [V], must be > 0
    pub noise_std_dev: f64,
}

impl ThresholdModel {
    /// Create new model parameters
    pub fn new(nominal_threshold: f64, systematic_offset: f64, noise_std_dev: f64) -> Self {
        Self {
            nominal_threshold,
            systematic_offset,
            noise_std_dev,
        }
    }

    /// Reference logic-level scenario: 2.5 V threshold behind a 0.7 V
    /// junction drop with 0.1 V of noise
    pub fn default_params() -> Self {
        Self {
            nominal_threshold: 2.5,
            systematic_offset: 0.7,
            noise_std_dev: 0.1,
        }
    }

    /// Threshold the detector actually switches at
    pub fn effective_threshold(&self) -> f64 {
        self.nominal_threshold + self.systematic_offset
    }

    pub fn validate(&self) -> Result<(), VthreshError> {
        if !self.nominal_threshold.is_finite() {
            return Err(VthreshError::InvalidParameter(format!(
                "nominal_threshold must be finite, got {}",
                self.nominal_threshold
            )));
        }

        if !self.systematic_offset.is_finite() {
            return Err(VthreshError::InvalidParameter(format!(
                "systematic_offset must be finite, got {}",
                self.systematic_offset
            )));
        }

        if !self.effective_threshold().is_finite() {
            return Err(VthreshError::InvalidParameter(format!(
                "effective threshold {} + {} overflows",
                self.nominal_threshold, self.systematic_offset
            )));
        }

        if !self.noise_std_dev.is_finite() || self.noise_std_dev <= 0.0 {
            return Err(VthreshError::InvalidParameter(format!(
                "noise_std_dev must be a finite value greater than zero, got {}",
                self.noise_std_dev
            )));
        }

        Ok(())
    }
}

impl Default for ThresholdModel {
    fn default() -> Self {
        Self::default_params()
    }
}
