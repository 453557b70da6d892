use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::domain::VoltageDomain;
use crate::params::ThresholdModel;
use crate::render::PlotStyle;
use crate::VthreshError;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    #[serde_as(as = "DefaultOnNull")]
    pub nominal_threshold: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub systematic_offset: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub noise_std_dev: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub voltage_min: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub voltage_max: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub num_samples: usize,
    #[serde_as(as = "DefaultOnNull")]
    pub parallel: bool,
    #[serde(default)]
    pub plot: PlotStyle,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let model = ThresholdModel::default();
        Self {
            nominal_threshold: model.nominal_threshold,
            systematic_offset: model.systematic_offset,
            noise_std_dev: model.noise_std_dev,
            voltage_min: 2.3,
            voltage_max: 4.0,
            num_samples: 400,
            parallel: false,
            plot: PlotStyle::default(),
        }
    }
}

impl SweepConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, VthreshError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, VthreshError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), VthreshError> {
        self.model().validate()?;

        if self.num_samples == 0 {
            return Err(VthreshError::InvalidConfig(
                "num_samples must be greater than zero".to_string(),
            ));
        }

        if !self.voltage_min.is_finite() || !self.voltage_max.is_finite() {
            return Err(VthreshError::InvalidConfig(
                "voltage_min and voltage_max must be finite".to_string(),
            ));
        }

        if self.num_samples > 1 && self.voltage_max <= self.voltage_min {
            return Err(VthreshError::InvalidConfig(
                "voltage_max must be greater than voltage_min".to_string(),
            ));
        }

        self.plot.validate()
    }

    pub fn model(&self) -> ThresholdModel {
        ThresholdModel::new(
            self.nominal_threshold,
            self.systematic_offset,
            self.noise_std_dev,
        )
    }

    pub fn domain(&self) -> Result<VoltageDomain, VthreshError> {
        VoltageDomain::linspace(self.voltage_min, self.voltage_max, self.num_samples)
    }
}
