//! Analog-modelled building blocks: nonlinear one-pole integrators, a VCA core,
//! a Van der Pol oscillator and the pitch "slop" generators built on them.
//!
//! Every stateful block follows the same contract. Call `set_sampling_rate`
//! before the first sample, and again whenever the host rate changes. Processing
//! an unconfigured block panics.

pub mod detune;
pub mod discrete_gradient;
pub mod integrator;
pub mod noise;
pub mod slop;
pub mod van_der_pol;
pub mod vca;
pub mod vca_core;
pub mod vdpo;


/// Errors returned while configuring a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The sampling rate was not a finite, strictly positive number.
    InvalidSamplingRate(f64),
}

/// Checks a host sampling rate, returning it unchanged if usable.
///
/// # Errors
///
/// [`ConfigError::InvalidSamplingRate`] if `rate` is not finite or not positive.
pub fn check_sampling_rate(rate: f64) -> Result<f64, ConfigError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidSamplingRate(rate))
    }
}
