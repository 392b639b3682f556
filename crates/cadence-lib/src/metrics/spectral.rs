use crate::error::{HrvError, HrvResult};
use crate::signal::Spectrum;
use realfft::{num_complex::Complex, RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Taper applied to the transform frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    #[default]
    Hamming,
    Hann,
    Rectangular,
}

impl WindowFunction {
    /// Symmetric window weight for sample `k` of a window of `len` samples.
    pub fn coefficient(self, k: usize, len: usize) -> f64 {
        if len <= 1 {
            return 1.0;
        }
        let phase = 2.0 * PI * k as f64 / (len - 1) as f64;
        match self {
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
            WindowFunction::Rectangular => 1.0,
        }
    }

    pub fn coefficients(self, len: usize) -> Vec<f64> {
        (0..len).map(|k| self.coefficient(k, len)).collect()
    }
}

/// Sum of squared window weights over the whole frame.
pub fn window_power(window: WindowFunction, len: usize) -> f64 {
    (0..len)
        .map(|k| {
            let w = window.coefficient(k, len);
            w * w
        })
        .sum()
}

/// Single-segment Welch PSD of a uniformly sampled signal.
///
/// The signal is zero-padded or truncated to `transform_length` samples,
/// windowed, and transformed once. Bin `i < transform_length / 2` gets
/// frequency `i * fs / transform_length` and density
/// `2 |X_i|^2 / (fs * Σ w^2)`.
pub fn welch_psd(
    signal: &[f64],
    fs: f64,
    transform_length: usize,
    window: WindowFunction,
) -> HrvResult<Spectrum> {
    let normalizer = fs * window_power(window, transform_length);
    if normalizer == 0.0 {
        return Err(HrvError::DegenerateWindow);
    }

    let coefficients = window.coefficients(transform_length);
    let mut frame: Vec<f64> = coefficients
        .iter()
        .enumerate()
        .map(|(k, w)| signal.get(k).copied().unwrap_or(0.0) * w)
        .collect();

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(transform_length);
    let mut bins = r2c.make_output_vec();
    forward(r2c.as_ref(), &mut frame, &mut bins)?;

    let half = transform_length / 2;
    let resolution = fs / transform_length as f64;
    let mut frequencies = Vec::with_capacity(half);
    let mut powers = Vec::with_capacity(half);
    for (i, bin) in bins.iter().take(half).enumerate() {
        frequencies.push(i as f64 * fs / transform_length as f64);
        powers.push(2.0 * bin.norm_sqr() / normalizer);
    }

    Ok(Spectrum {
        frequencies,
        powers,
        resolution,
    })
}

fn forward(
    r2c: &dyn RealToComplex<f64>,
    frame: &mut [f64],
    bins: &mut [Complex<f64>],
) -> HrvResult<()> {
    r2c.process(frame, bins)
        .map_err(|e| HrvError::Transform(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "expected {expected}, got {actual} (diff {diff} > tol {tol})"
        );
    }

    #[test]
    fn hamming_endpoints_and_center() {
        let w = WindowFunction::Hamming.coefficients(5);
        assert_close(w[0], 0.08, 1e-12);
        assert_close(w[2], 1.0, 1e-12);
        assert_close(w[4], 0.08, 1e-12);
        assert_eq!(WindowFunction::Hamming.coefficients(1), vec![1.0]);
    }

    #[test]
    fn hann_reaches_zero_at_edges() {
        let w = WindowFunction::Hann.coefficients(9);
        assert_close(w[0], 0.0, 1e-12);
        assert_close(w[4], 1.0, 1e-12);
        assert_close(w[8], 0.0, 1e-12);
    }

    #[test]
    fn bins_cover_lower_half() {
        let spectrum = welch_psd(&[1.0; 100], 4.0, 4096, WindowFunction::Hamming).unwrap();
        assert_eq!(spectrum.len(), 2048);
        assert_eq!(spectrum.powers.len(), 2048);
        assert_eq!(spectrum.resolution, 4.0 / 4096.0);
        assert_eq!(spectrum.frequencies[0], 0.0);
        assert_eq!(spectrum.frequencies[1024], 1.0);
        assert!(spectrum.frequencies.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn constant_frame_puts_all_power_at_dc() {
        let spectrum = welch_psd(&[1.0; 8], 4.0, 8, WindowFunction::Rectangular).unwrap();
        // X_0 = 8, density = 2 * 64 / (4 * 8)
        assert_close(spectrum.powers[0], 4.0, 1e-12);
        for p in &spectrum.powers[1..] {
            assert_close(*p, 0.0, 1e-12);
        }
    }

    #[test]
    fn normalizer_uses_padded_length() {
        let spectrum = welch_psd(&[1.0; 4], 4.0, 8, WindowFunction::Rectangular).unwrap();
        // X_0 = 4, density = 2 * 16 / (4 * 8); the 4-sample length would give 2.0
        assert_close(spectrum.powers[0], 1.0, 1e-12);
    }

    #[test]
    fn longer_signal_is_truncated() {
        let long: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
        let full = welch_psd(&long, 4.0, 32, WindowFunction::Hamming).unwrap();
        let head = welch_psd(&long[..32], 4.0, 32, WindowFunction::Hamming).unwrap();
        assert_eq!(full.powers, head.powers);
    }

    #[test]
    fn sinusoid_peaks_at_its_bin() {
        let fs = 4.0;
        let n = 256;
        let k0 = 20;
        let f0 = k0 as f64 * fs / n as f64;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * f0 * i as f64 / fs).sin())
            .collect();
        let spectrum = welch_psd(&signal, fs, n, WindowFunction::Hamming).unwrap();
        let peak = spectrum
            .powers
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, k0);
    }

    #[test]
    fn zero_signal_has_zero_power() {
        let spectrum = welch_psd(&[], 4.0, 64, WindowFunction::Hamming).unwrap();
        assert!(spectrum.powers.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn zero_length_transform_is_degenerate() {
        assert_eq!(
            welch_psd(&[1.0, 2.0], 4.0, 0, WindowFunction::Hamming).unwrap_err(),
            HrvError::DegenerateWindow
        );
    }

    #[test]
    fn window_power_matches_coefficients() {
        let direct: f64 = WindowFunction::Hamming
            .coefficients(4096)
            .iter()
            .map(|w| w * w)
            .sum();
        assert_close(window_power(WindowFunction::Hamming, 4096), direct, 1e-9);
        assert_eq!(window_power(WindowFunction::Hamming, 0), 0.0);
    }

    #[test]
    fn mismatched_buffers_map_to_transform_error() {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(16);
        let mut frame = vec![0.0; 16];
        let mut bins = vec![Complex::new(0.0, 0.0); 3];
        let err = forward(r2c.as_ref(), &mut frame, &mut bins).unwrap_err();
        assert!(matches!(err, HrvError::Transform(_)), "{err}");

        let mut bins = r2c.make_output_vec();
        assert!(forward(r2c.as_ref(), &mut frame, &mut bins).is_ok());
    }
}
