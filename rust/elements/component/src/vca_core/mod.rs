//! Oversampled analog VCA core.
//!
//! The audio signal and the control voltage each run through a nonlinear one-pole
//! integrator, and the two results are multiplied. The product then goes through
//! an output stage that saturates softly at the supply voltage.

use iir::{
    one_pole::calc_g,
    resampler::{Chebyshev7, Resampler},
};
use tracing::debug;

use crate::{
    check_sampling_rate,
    discrete_gradient::TanhBlock,
    integrator::{Integrator, Ota, Transistor},
    noise::PinkNoise,
    ConfigError,
};

#[cfg(test)]
mod tests;

/// Extra gain on the control path, pushing it further into saturation.
const CV_SCALING: f64 = 3.0;

const POWER_SUPPLY_VOLTAGE: f64 = 12.0;

/// Noise floor power spectral density, in V^2/Hz.
pub const DEFAULT_NOISE_LEVEL: f64 = 1e-10;

/// Integrator cutoffs are held below Nyquist, where the prewarp blows up.
const MAX_NORMALISED_CUTOFF: f64 = 0.95;

/// A VCA core using integrator model `I`, oversampled `FACTOR` times by `R`.
#[derive(Debug, Clone)]
pub struct VcaCore<I, R, const FACTOR: usize> {
    audio_resampler: R,
    cv_resampler: R,

    /// Audio path, then control path.
    models: [I; 2],
    g: [f64; 2],

    noise: PinkNoise,
    noise_level: f64,
    noise_std: f64,

    output_stage: TanhBlock,

    /// Zero until configured.
    oversampled_rate: f64,
}

pub type OtaCore<R, const FACTOR: usize> = VcaCore<Ota, R, FACTOR>;
pub type TransistorCore<R, const FACTOR: usize> = VcaCore<Transistor, R, FACTOR>;

/// The core used by the VCA module: transistor model at 2x.
pub type TransistorCoreX2 = TransistorCore<Chebyshev7, 2>;

impl<I: Integrator, R: Resampler<FACTOR>, const FACTOR: usize> VcaCore<I, R, FACTOR> {
    /// Create an unconfigured core, making one resampler for each path.
    pub fn new(mut make_resampler: impl FnMut() -> R) -> Self {
        Self {
            audio_resampler: make_resampler(),
            cv_resampler: make_resampler(),
            models: Default::default(),
            g: [0.0; 2],
            noise: PinkNoise::new(),
            noise_level: DEFAULT_NOISE_LEVEL,
            noise_std: 0.0,
            output_stage: TanhBlock::default(),
            oversampled_rate: 0.0,
        }
    }

    /// Replace the noise floor generator with a reproducible one.
    #[must_use]
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise = PinkNoise::with_seed(seed);
        self
    }

    /// Configure for a host sampling rate `f0`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSamplingRate` if `f0` is not a positive number,
    /// leaving the core as it was.
    pub fn set_sampling_rate(&mut self, f0: f64) -> Result<(), ConfigError> {
        #[allow(clippy::cast_precision_loss)]
        let oversampled_rate = check_sampling_rate(f0)? * FACTOR as f64;
        let fc = (I::DEFAULT_ROLLOFF / (0.5 * oversampled_rate)).min(MAX_NORMALISED_CUTOFF);
        self.g = [2.0 * calc_g(fc); 2];
        self.oversampled_rate = oversampled_rate;
        self.update_noise_std();
        debug!(
            sampling_rate = f0,
            oversampled_rate,
            g = self.g[0],
            "configured VCA core"
        );
        Ok(())
    }

    /// Set the noise floor's power spectral density, in V^2/Hz.
    pub fn set_noise_level(&mut self, noise_level: f64) {
        debug_assert!(noise_level >= 0.0);
        self.noise_level = noise_level;
        self.update_noise_std();
    }

    /// Keeps the noise density independent of the oversampling factor.
    fn update_noise_std(&mut self) {
        self.noise_std = (self.noise_level * self.oversampled_rate / 2.0).sqrt();
    }

    pub fn reset(&mut self) {
        self.audio_resampler.reset();
        self.cv_resampler.reset();
        for model in &mut self.models {
            model.reset();
        }
        self.output_stage.reset();
    }

    /// Process one sample of `audio` under control voltage `cv`, both in volts.
    ///
    /// `final_gain` is applied before the output stage saturation.
    ///
    /// # Panics
    ///
    /// If called before a successful [`VcaCore::set_sampling_rate`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn process(&mut self, audio: f32, cv: f32, final_gain: f32) -> f32 {
        assert!(
            self.oversampled_rate > 0.0,
            "VCA core used before its sampling rate was set"
        );
        let input = f64::from(audio) + self.noise_std * self.noise.process();
        let mut audio = self.audio_resampler.upsample(input);
        let cv = self.cv_resampler.upsample(CV_SCALING * f64::from(cv));

        for (a, c) in audio.iter_mut().zip(cv) {
            let [a_out, c_out] = I::step_dual(&mut self.models, [*a, c], self.g);
            *a = a_out * c_out / CV_SCALING;
        }

        let final_gain = f64::from(final_gain);
        for a in &mut audio {
            *a = POWER_SUPPLY_VOLTAGE
                * self
                    .output_stage
                    .process(final_gain * *a / POWER_SUPPLY_VOLTAGE);
        }

        let out = self.audio_resampler.downsample(audio);
        debug_assert!(out.is_finite());
        out as f32
    }
}
