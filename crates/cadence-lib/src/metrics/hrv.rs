use crate::error::{HrvError, HrvResult};
use crate::metrics::bands::BandSamples;
use crate::signal::IntervalSeries;
use serde::{Deserialize, Serialize};

/// Root mean square of successive differences, in the series' unit (ms).
pub fn rmssd(series: &IntervalSeries) -> HrvResult<f64> {
    let n = series.len();
    if n < 2 {
        return Err(HrvError::InsufficientData { len: n });
    }
    let sum_sq: f64 = series
        .intervals_ms
        .windows(2)
        .map(|w| (w[1] - w[0]).powi(2))
        .sum();
    Ok((sum_sq / (n as f64 - 1.0)).sqrt())
}

/// LF/HF power ratio.
///
/// Zero HF power yields `+inf` when LF is positive and `NaN` when LF is also zero.
pub fn lf_hf_ratio(lf_power: f64, hf_power: f64) -> f64 {
    if hf_power == 0.0 {
        if lf_power == 0.0 {
            f64::NAN
        } else {
            f64::INFINITY
        }
    } else {
        lf_power / hf_power
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespirationEstimate {
    /// Breaths per minute.
    pub rate_bpm: f64,
    pub peak_frequency_hz: f64,
    /// Set when the HF band had no samples and the rate fell back to 0.
    pub low_confidence: bool,
}

/// Respiration rate from the HF sample with the highest power.
pub fn respiration_rate(hf: &BandSamples) -> RespirationEstimate {
    let mut peak_frequency_hz = 0.0;
    let mut max_power = f64::NEG_INFINITY;
    for (&f, &p) in hf.frequencies.iter().zip(hf.powers.iter()) {
        if p > max_power {
            max_power = p;
            peak_frequency_hz = f;
        }
    }
    RespirationEstimate {
        rate_bpm: peak_frequency_hz * 60.0,
        peak_frequency_hz,
        low_confidence: hf.is_empty(),
    }
}
