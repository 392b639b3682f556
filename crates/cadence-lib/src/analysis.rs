use crate::{
    config::AnalysisConfig,
    error::{HrvError, HrvResult},
    metrics::{
        bands::partition,
        hrv::{lf_hf_ratio, respiration_rate, rmssd, RespirationEstimate},
        resample::resample,
        spectral::welch_psd,
    },
    signal::{IntervalSeries, Spectrum},
};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl Gender {
    /// Roster code to gender; anything but exactly `M`/`F` is unknown.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "M" => Gender::Male,
            "F" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "",
        }
    }
}

/// One subject's identity plus its interval recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub subject_id: String,
    pub age: f64,
    pub gender: Gender,
    pub intervals: IntervalSeries,
}

/// Flat per-subject output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "File")]
    pub subject_id: String,
    #[serde(rename = "Age (years)")]
    pub age: f64,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "RMSSD (ms)")]
    pub rmssd: f64,
    #[serde(rename = "Resp Rate (bpm)")]
    pub respiration_rate_bpm: f64,
    #[serde(rename = "LF/HF Ratio")]
    pub lf_hf_ratio: f64,
    #[serde(skip)]
    pub respiration_low_confidence: bool,
}

/// Frequency-domain view of one interval series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralSummary {
    pub lf_power: f64,
    pub hf_power: f64,
    pub lf_hf_ratio: f64,
    pub respiration: RespirationEstimate,
    pub lf_bins: usize,
    pub hf_bins: usize,
    pub resolution: f64,
    pub points: Vec<[f64; 2]>,
}

/// Result of one subject in a batch.
#[derive(Debug, Clone)]
pub struct SubjectOutcome {
    pub subject_id: String,
    pub outcome: HrvResult<AnalysisResult>,
}

/// Validated pipeline: resample → PSD → bands → metrics.
#[derive(Debug, Clone)]
pub struct HrvEngine {
    config: AnalysisConfig,
}

impl HrvEngine {
    pub fn new(config: AnalysisConfig) -> HrvResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Resample and transform; fails when the series spans no grid points or
    /// produces non-finite power.
    pub fn spectrum(&self, series: &IntervalSeries) -> HrvResult<Spectrum> {
        let fs = self.config.sampling_rate_hz;
        // the transform never reads past transform_length samples
        let signal = resample(series, fs, self.config.transform_length)?;
        if signal.is_empty() {
            return Err(HrvError::InsufficientData { len: series.len() });
        }
        debug!(
            "resampled {} intervals to {} samples at {} Hz",
            series.len(),
            signal.len(),
            fs
        );
        let spectrum = welch_psd(
            &signal.values,
            fs,
            self.config.transform_length,
            self.config.window,
        )?;
        if spectrum.powers.iter().any(|p| !p.is_finite()) {
            return Err(HrvError::NonFinite { stage: "spectrum" });
        }
        Ok(spectrum)
    }

    pub fn spectral_summary(&self, series: &IntervalSeries) -> HrvResult<SpectralSummary> {
        let spectrum = self.spectrum(series)?;
        let profile = partition(&spectrum, &self.config.bands);
        let lf_power = profile.lf.integrate();
        let hf_power = profile.hf.integrate();
        Ok(SpectralSummary {
            lf_power,
            hf_power,
            lf_hf_ratio: lf_hf_ratio(lf_power, hf_power),
            respiration: respiration_rate(&profile.hf),
            lf_bins: profile.lf.len(),
            hf_bins: profile.hf.len(),
            resolution: spectrum.resolution,
            points: spectrum.points(),
        })
    }

    pub fn analyze(&self, subject: &Subject) -> HrvResult<AnalysisResult> {
        let rmssd = rmssd(&subject.intervals)?;
        let summary = self.spectral_summary(&subject.intervals)?;
        if summary.respiration.low_confidence {
            warn!(
                "{}: no spectral content in the HF band, respiration rate defaults to 0",
                subject.subject_id
            );
        }
        Ok(AnalysisResult {
            subject_id: subject.subject_id.clone(),
            age: subject.age,
            gender: subject.gender,
            rmssd,
            respiration_rate_bpm: summary.respiration.rate_bpm,
            lf_hf_ratio: summary.lf_hf_ratio,
            respiration_low_confidence: summary.respiration.low_confidence,
        })
    }

    /// Analyze subjects in parallel; outcomes keep input order.
    pub fn analyze_batch(&self, subjects: &[Subject]) -> Vec<SubjectOutcome> {
        subjects
            .par_iter()
            .map(|subject| SubjectOutcome {
                subject_id: subject.subject_id.clone(),
                outcome: self.analyze(subject),
            })
            .collect()
    }
}
