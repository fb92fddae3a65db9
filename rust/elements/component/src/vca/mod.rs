//! The VCA module: input gain staging, linear and exponential control inputs,
//! control voltage bleed and DC blocking around a 2x oversampled transistor core.

use iir::{one_pole::HighpassZdf, resampler::chebyshev7};

use crate::{
    check_sampling_rate,
    vca_core::{TransistorCoreX2, VcaCore},
    ConfigError,
};


/// Audio is scaled down by this before the core, so that unity input gain keeps
/// a 5V signal out of heavy saturation.
const AUDIO_RENORM: f32 = 5.0;

/// Most of the control voltage that can leak into the output, about -17dB.
const MAX_CV_BLEED: f64 = 1.41 * 0.1;

const CV_BLEED_HIGHPASS: f64 = 10.0;
const AUDIO_HIGHPASS: f64 = 5.0;

/// Ceiling on the make up gain applied when the input gain is low.
const MAX_MAKEUP_GAIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Drive into the core, `0..=2`.
    pub input_gain: f32,
    pub lin_cv_level: f32,
    pub exp_cv_level: f32,

    /// Curvature of the exponential control input, above `1`.
    pub exp_cv_base: f32,
    pub cv_bleed: f32,
    pub output_level: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            input_gain: 0.5,
            lin_cv_level: 1.0,
            exp_cv_level: 0.0,
            exp_cv_base: 50.0,
            cv_bleed: 0.5,
            output_level: 1.0,
        }
    }
}

/// Maps a unipolar `0..=1` control through `(base^x - 1) / (base - 1)`.
fn exp_response(x: f32, base: f32) -> f32 {
    let base = base.max(1.0 + 1e-3);
    (base.powf(x) - 1.0) / (base - 1.0)
}

#[derive(Debug, Clone)]
pub struct Vca {
    core: TransistorCoreX2,
    cv_highpass: HighpassZdf,
    audio_highpass: HighpassZdf,
}

impl Default for Vca {
    fn default() -> Self {
        Self::new(VcaCore::new(chebyshev7))
    }
}

impl Vca {
    /// Wrap an existing core, for example one with a seeded noise floor.
    #[must_use]
    pub fn new(core: TransistorCoreX2) -> Self {
        Self {
            core,
            cv_highpass: HighpassZdf::default(),
            audio_highpass: HighpassZdf::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSamplingRate` if `rate` is not a positive number.
    pub fn set_sampling_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        let rate = check_sampling_rate(rate)?;
        self.core.set_sampling_rate(rate)?;
        self.cv_highpass.set_cutoff(CV_BLEED_HIGHPASS / (0.5 * rate));
        self.audio_highpass.set_cutoff(AUDIO_HIGHPASS / (0.5 * rate));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.core.reset();
        self.cv_highpass.reset();
        self.audio_highpass.reset();
    }

    /// The control level reaching the core for the given inputs, `0..=1` for
    /// unipolar `0..=10V` control voltages.
    #[must_use]
    pub fn control(params: &Params, lin_cv: f32, exp_cv: f32) -> f32 {
        let lin = lin_cv / 10.0 * params.lin_cv_level;
        let exp = exp_response(exp_cv / 10.0 * params.exp_cv_level, params.exp_cv_base);
        lin + exp
    }

    /// Process one sample. All inputs are in volts.
    ///
    /// # Panics
    ///
    /// If called before a successful [`Vca::set_sampling_rate`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn process(&mut self, params: &Params, audio: f32, lin_cv: f32, exp_cv: f32) -> f32 {
        let input_gain = params.input_gain / AUDIO_RENORM;
        let audio = audio * input_gain;
        let cv = Self::control(params, lin_cv, exp_cv);

        let bleed = self.cv_highpass.process(f64::from(cv))
            * f64::from(params.cv_bleed)
            * MAX_CV_BLEED;

        // Keeps output level and input gain roughly independent, leaving the input
        // gain to set the amount of distortion.
        let final_gain = ((1.0 + input_gain) / (1e-5 + input_gain)).min(MAX_MAKEUP_GAIN)
            * params.output_level;

        let out = self.core.process(audio, cv, final_gain);
        (bleed + self.audio_highpass.process(f64::from(out))) as f32
    }
}
