use crate::config::{Band, FrequencyBands};
use crate::signal::Spectrum;
use serde::{Deserialize, Serialize};

/// Spectrum samples that fell inside one band, in ascending frequency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandSamples {
    pub frequencies: Vec<f64>,
    pub powers: Vec<f64>,
}

impl BandSamples {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    fn push(&mut self, frequency: f64, power: f64) {
        self.frequencies.push(frequency);
        self.powers.push(power);
    }

    /// Trapezoidal area under the band's power curve.
    pub fn integrate(&self) -> f64 {
        trapezoid(&self.frequencies, &self.powers)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowerProfile {
    pub lf: BandSamples,
    pub hf: BandSamples,
}

fn in_lf(f: f64, band: &Band) -> bool {
    f >= band.low_hz && f <= band.high_hz
}

fn in_hf(f: f64, band: &Band) -> bool {
    f > band.low_hz && f <= band.high_hz
}

/// Split a spectrum into LF and HF samples.
///
/// LF is tested first, so a bin on the shared 0.15 Hz edge lands in LF only.
pub fn partition(spectrum: &Spectrum, bands: &FrequencyBands) -> BandPowerProfile {
    let mut profile = BandPowerProfile::default();
    for (&f, &p) in spectrum.frequencies.iter().zip(spectrum.powers.iter()) {
        if in_lf(f, &bands.lf) {
            profile.lf.push(f, p);
        } else if in_hf(f, &bands.hf) {
            profile.hf.push(f, p);
        }
    }
    profile
}

/// Trapezoidal rule over paired samples. Fewer than two points integrate to 0.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}
