//! The Van der Pol oscillator module: pitch and damping controls around a 4x
//! oversampled oscillator.

use std::f64::consts::TAU;

use util::pitch::{voct_to_frequency, MIDDLE_C};

use crate::{van_der_pol::VdpOscillatorX4, ConfigError};


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Pitch offset, in octaves from middle C.
    pub frequency: f64,
    pub damping: f64,
    pub input_gain: f64,
    pub level: f64,
    pub voct_scaling: f64,
    pub damping_attenuverter: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            frequency: 0.0,
            damping: 0.5,
            input_gain: 1.0,
            level: 1.0,
            voct_scaling: 1.0,
            damping_attenuverter: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Vdpo {
    oscillator: VdpOscillatorX4,
}

impl Vdpo {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSamplingRate` if `rate` is not a positive number.
    pub fn set_sampling_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        self.oscillator.set_sampling_rate(rate)
    }

    pub fn reset(&mut self) {
        self.oscillator.reset();
    }

    /// Process one sample given a 1V/octave pitch, an audio input to force the
    /// oscillator with, and a damping control voltage.
    ///
    /// # Panics
    ///
    /// If called before a successful [`Vdpo::set_sampling_rate`].
    pub fn process(&mut self, params: &Params, voct: f64, audio: f64, damping_cv: f64) -> f64 {
        let x = audio * params.input_gain;
        let voct = voct * params.voct_scaling + params.frequency;
        let mu = params.damping + params.damping_attenuverter * damping_cv;
        let w = TAU * voct_to_frequency(voct, MIDDLE_C);
        self.oscillator.process(x, mu, w) * params.level
    }
}
