use crate::error::{HrvError, HrvResult};
use crate::metrics::spectral::WindowFunction;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Frequency limits of one physiological band, in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl Band {
    pub const fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    fn validate(&self, name: &str) -> HrvResult<()> {
        if !self.low_hz.is_finite() || !self.high_hz.is_finite() {
            return Err(HrvError::InvalidConfiguration(format!(
                "{name} band bounds must be finite"
            )));
        }
        if self.low_hz < 0.0 || self.low_hz >= self.high_hz {
            return Err(HrvError::InvalidConfiguration(format!(
                "{name} band must satisfy 0 <= low < high, got [{}, {}]",
                self.low_hz, self.high_hz
            )));
        }
        Ok(())
    }
}

/// LF is closed on both ends; HF is open below and closed above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyBands {
    pub lf: Band,
    pub hf: Band,
}

impl Default for FrequencyBands {
    fn default() -> Self {
        Self {
            lf: Band::new(0.04, 0.15),
            hf: Band::new(0.15, 0.4),
        }
    }
}

/// Parameters of the resample → PSD → band pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Uniform resampling rate (Hz).
    pub sampling_rate_hz: f64,
    /// FFT length; shorter signals are zero-padded, longer ones truncated.
    pub transform_length: usize,
    pub window: WindowFunction,
    pub bands: FrequencyBands,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: 4.0,
            transform_length: 4096,
            window: WindowFunction::Hamming,
            bands: FrequencyBands::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> HrvResult<()> {
        if !self.sampling_rate_hz.is_finite() || self.sampling_rate_hz <= 0.0 {
            return Err(HrvError::InvalidConfiguration(format!(
                "sampling rate must be positive, got {}",
                self.sampling_rate_hz
            )));
        }
        if self.transform_length == 0 {
            return Err(HrvError::InvalidConfiguration(
                "transform length must be positive".into(),
            ));
        }
        self.bands.lf.validate("LF")?;
        self.bands.hf.validate("HF")?;
        let nyquist = self.sampling_rate_hz / 2.0;
        if self.bands.hf.high_hz > nyquist {
            log::warn!(
                "HF band upper bound {} Hz exceeds Nyquist frequency {} Hz",
                self.bands.hf.high_hz,
                nyquist
            );
        }
        Ok(())
    }
}

/// Roster filtering options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Rows younger than this are skipped.
    pub min_age_years: f64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            min_age_years: 18.0,
        }
    }
}

/// Contents of a TOML settings file. Every key is optional.
///
/// ```toml
/// [engine]
/// sampling_rate_hz = 4.0
/// transform_length = 4096
/// window = "hamming"
///
/// [engine.bands]
/// lf = { low_hz = 0.04, high_hz = 0.15 }
/// hf = { low_hz = 0.15, high_hz = 0.4 }
///
/// [roster]
/// min_age_years = 18.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: AnalysisConfig,
    pub roster: RosterConfig,
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("parsing settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("parsing settings {}", path.display()))
    }
}
