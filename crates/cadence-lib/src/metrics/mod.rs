pub mod bands;
pub mod hrv;
pub mod resample;
pub mod spectral;

pub use bands::{partition, trapezoid, BandPowerProfile, BandSamples};
pub use hrv::{lf_hf_ratio, respiration_rate, rmssd, RespirationEstimate};
pub use resample::{interpolate_at, resample};
pub use spectral::{welch_psd, window_power, WindowFunction};
