use serde::{Deserialize, Serialize};

/// Beat-to-beat intervals in milliseconds, in recording order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSeries {
    pub intervals_ms: Vec<f64>,
}

impl IntervalSeries {
    pub fn new(intervals_ms: Vec<f64>) -> Self {
        Self { intervals_ms }
    }

    pub fn len(&self) -> usize {
        self.intervals_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals_ms.is_empty()
    }

    /// Beat timestamps relative to the first beat.
    ///
    /// The running sum starts at the first interval and is then shifted by it,
    /// so `t[0] == 0` and `t[1] == intervals[1]`.
    pub fn beat_times_ms(&self) -> Vec<f64> {
        let mut acc = 0.0;
        let mut times: Vec<f64> = self
            .intervals_ms
            .iter()
            .map(|interval| {
                acc += interval;
                acc
            })
            .collect();
        if let Some(&t0) = times.first() {
            for t in times.iter_mut() {
                *t -= t0;
            }
        }
        times
    }
}

impl From<Vec<f64>> for IntervalSeries {
    fn from(intervals_ms: Vec<f64>) -> Self {
        Self::new(intervals_ms)
    }
}

/// Uniformly resampled interval signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformSignal {
    /// Sampling frequency in Hz
    pub fs: f64,
    pub timestamps_ms: Vec<f64>,
    pub values: Vec<f64>,
}

impl UniformSignal {
    pub fn empty(fs: f64) -> Self {
        Self {
            fs,
            timestamps_ms: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spacing between samples in milliseconds.
    pub fn step_ms(&self) -> f64 {
        1000.0 / self.fs
    }
}

/// One-sided power spectral density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub powers: Vec<f64>,
    /// Bin spacing in Hz (`fs / transform_length`)
    pub resolution: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.frequencies
            .iter()
            .zip(self.powers.iter())
            .map(|(&f, &p)| [f, p])
            .collect()
    }
}
