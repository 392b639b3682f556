//! Heart-rate-variability spectral analysis: interval resampling, single-segment
//! Welch PSD, LF/HF band integration, RMSSD and respiration-rate estimates.

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod metrics;
pub mod signal;

pub use analysis::*;
pub use config::*;
pub use error::*;
pub use metrics::*;
pub use signal::*;
