//! Analog style pitch imperfections for 1V/octave signals: mains hum and slow
//! temperature drift.
//!
//! Drift is an Ornstein-Uhlenbeck process discretised with an Euler step, which
//! makes it an AR(1) process at the sampling rate.

use std::f64::consts::TAU;

use itertools::izip;
use tracing::debug;

use crate::{check_sampling_rate, detune, noise::WhiteNoise, ConfigError};

#[cfg(test)]
mod tests;

/// Hum amplitude at full level, in volts.
const MAX_HUM: f64 = 1e-2;
const HUM_FREQUENCY: f64 = 60.0;

/// Mean decay time of the drift, in seconds.
const DRIFT_TIME_CONSTANT: f64 = 60.0;

#[derive(Debug, Clone, Default)]
struct Hum {
    phase: f64,
    increment: f64,
}

impl Hum {
    fn set_sampling_rate(&mut self, rate: f64) {
        self.increment = HUM_FREQUENCY / rate;
    }

    fn process(&mut self, level: f64) -> f64 {
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        MAX_HUM * level * (TAU * self.phase).sin()
    }
}

#[derive(Debug, Clone, Default)]
struct Drift {
    value: f64,
    phi: f64,

    /// Standard deviation of the driving noise per unit `sigma`, `sqrt(T)`.
    noise_scale: f64,
}

impl Drift {
    fn set_sampling_rate(&mut self, rate: f64) {
        let period = 1.0 / rate;
        self.phi = 1.0 - period / DRIFT_TIME_CONSTANT;
        self.noise_scale = period.sqrt();
    }

    fn process(&mut self, sigma: f64, gaussian: f64) -> f64 {
        self.value = self.phi * self.value + sigma * self.noise_scale * gaussian;
        self.value
    }
}

/// How [`Slop`] applies drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetuneMode {
    /// Drift by a number of Hz, so low notes are detuned more in relative terms.
    Hz,

    /// Drift by a fraction of an octave.
    #[default]
    Cents,
}

impl DetuneMode {
    fn sigma(self) -> f64 {
        match self {
            DetuneMode::Hz => 2.0,
            DetuneMode::Cents => 0.2 / 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub hum_level: f64,
    pub drift_level: f64,

    /// Scale applied to the incoming pitch, nominally `1.0`.
    pub track_scaling: f64,
    pub mode: DetuneMode,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            hum_level: 0.0,
            drift_level: 0.0,
            track_scaling: 1.0,
            mode: DetuneMode::default(),
        }
    }
}

/// Adds hum and drift to one pitch signal.
#[derive(Debug, Clone)]
pub struct Slop {
    noise: WhiteNoise,
    hum: Hum,
    drift: Drift,
    mode: DetuneMode,
    configured: bool,
}

impl Default for Slop {
    fn default() -> Self {
        Self::with_noise(WhiteNoise::new())
    }
}

impl Slop {
    /// A reproducible generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_noise(WhiteNoise::with_seed(seed))
    }

    fn with_noise(noise: WhiteNoise) -> Self {
        Self {
            noise,
            hum: Hum::default(),
            drift: Drift::default(),
            mode: DetuneMode::default(),
            configured: false,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSamplingRate` if `rate` is not a positive number.
    pub fn set_sampling_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        let rate = check_sampling_rate(rate)?;
        self.hum.set_sampling_rate(rate);
        self.drift.set_sampling_rate(rate);
        self.configured = true;
        debug!(sampling_rate = rate, "configured slop");
        Ok(())
    }

    /// Process one sample of a 1V/octave pitch.
    ///
    /// Switching [`Params::mode`] restarts the drift from zero.
    ///
    /// # Panics
    ///
    /// If called before a successful [`Slop::set_sampling_rate`].
    pub fn process(&mut self, params: &Params, voct: f64) -> f64 {
        assert!(self.configured, "slop used before its sampling rate was set");
        if params.mode != self.mode {
            self.drift.value = 0.0;
            self.mode = params.mode;
        }

        let voct = voct * params.track_scaling + self.hum.process(params.hum_level);
        let drift =
            params.drift_level * self.drift.process(params.mode.sigma(), self.noise.process());
        match params.mode {
            DetuneMode::Hz => detune::linear(voct, drift),
            DetuneMode::Cents => voct + drift,
        }
    }
}

/// Common drift, in octaves.
const COMMON_SIGMA: f64 = 0.1 / 12.0;

/// Per channel drift, in Hz.
const INDIVIDUAL_SIGMA: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params4 {
    pub track_scaling: [f64; 4],
    pub hum_level: f64,
    pub common_drift_level: f64,
    pub individual_drift_level: f64,
}

impl Default for Params4 {
    fn default() -> Self {
        Self {
            track_scaling: [1.0; 4],
            hum_level: 0.0,
            common_drift_level: 0.0,
            individual_drift_level: 0.0,
        }
    }
}

/// Four channel slop: one shared drift in cents plus a drift in Hz per channel.
#[derive(Debug, Clone)]
pub struct Slop4 {
    noise: WhiteNoise,
    hum: Hum,
    common: Drift,
    individual: [Drift; 4],
    configured: bool,
}

impl Default for Slop4 {
    fn default() -> Self {
        Self::with_noise(WhiteNoise::new())
    }
}

impl Slop4 {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_noise(WhiteNoise::with_seed(seed))
    }

    fn with_noise(noise: WhiteNoise) -> Self {
        Self {
            noise,
            hum: Hum::default(),
            common: Drift::default(),
            individual: Default::default(),
            configured: false,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSamplingRate` if `rate` is not a positive number.
    pub fn set_sampling_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        let rate = check_sampling_rate(rate)?;
        self.hum.set_sampling_rate(rate);
        self.common.set_sampling_rate(rate);
        for drift in &mut self.individual {
            drift.set_sampling_rate(rate);
        }
        self.configured = true;
        debug!(sampling_rate = rate, "configured four channel slop");
        Ok(())
    }

    /// Process one sample of four 1V/octave pitches.
    ///
    /// # Panics
    ///
    /// If called before a successful [`Slop4::set_sampling_rate`].
    pub fn process(&mut self, params: &Params4, voct: [f64; 4]) -> [f64; 4] {
        assert!(self.configured, "slop used before its sampling rate was set");
        let hum = self.hum.process(params.hum_level);
        let common =
            params.common_drift_level * self.common.process(COMMON_SIGMA, self.noise.process());

        let mut out = [0.0; 4];
        for (y, voct, scaling, drift) in izip!(
            &mut out,
            voct,
            params.track_scaling,
            &mut self.individual
        ) {
            let offset = params.individual_drift_level
                * drift.process(INDIVIDUAL_SIGMA, self.noise.process());
            *y = detune::linear(voct * scaling + hum + common, offset);
        }
        out
    }
}
