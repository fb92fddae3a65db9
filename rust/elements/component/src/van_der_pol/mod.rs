//! Forced Van der Pol oscillator, integrated with an oversampled BDF method.
//!
//! The state is position and velocity. With damping `mu`, angular frequency `w`
//! and forcing input `x`:
//!
//! ```text
//! y0' = y1
//! y1' = mu * (1 - y0^2) * y1 * w + w^2 * (x - y0)
//! ```

use std::f64::consts::TAU;

use iir::resampler::{chebyshev7_x4, Chebyshev7X4, Resampler};
use nalgebra::{Matrix2, Vector2};
use ode::bdf::{Bdf, Model};
use tracing::debug;

use crate::{check_sampling_rate, ConfigError};


/// The Van der Pol vector field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanDerPol {
    pub mu: f64,

    /// Angular frequency, in radians per second.
    pub w: f64,
}

impl Default for VanDerPol {
    fn default() -> Self {
        Self {
            mu: 0.1,
            w: 200.0 * TAU,
        }
    }
}

impl Model<f64, 2> for VanDerPol {
    fn dy_dt(&self, y: &Vector2<f64>, x: f64) -> Vector2<f64> {
        let Self { mu, w } = *self;
        Vector2::new(y[1], mu * (1.0 - y[0] * y[0]) * y[1] * w + w * w * (x - y[0]))
    }

    fn jacobian(&self, y: &Vector2<f64>, _: f64) -> Matrix2<f64> {
        let Self { mu, w } = *self;
        Matrix2::new(
            0.0,
            1.0,
            -2.0 * mu * y[0] * y[1] * w - w * w,
            mu * (1.0 - y[0] * y[0]) * w,
        )
    }
}

const MIN_MU: f64 = 1e-8;
const MIN_W: f64 = 1e-4;

/// About the top note of a piano. Higher than this the integration blows up.
const MAX_W: f64 = TAU * 4200.0;

/// Position limit, in volts.
const MAX_OUTPUT: f64 = 12.0;

const INITIAL_STATE: [f64; 2] = [0.0, 1.0];

/// A Van der Pol oscillator oversampled `FACTOR` times by `R`, integrated with
/// an `ORDER` BDF method.
#[derive(Debug, Clone)]
pub struct VdpOscillator<R, const FACTOR: usize, const ORDER: usize> {
    model: VanDerPol,
    integrator: Bdf<f64, 2, ORDER>,
    x_resampler: R,
    mu_resampler: R,
    w_resampler: R,

    /// Zero until configured.
    oversampled_rate: f64,
}

/// Order 3 at 4x is a compromise between stability and harmonic tuning; higher
/// orders tend to make the partials less harmonic.
pub type VdpOscillatorX4 = VdpOscillator<Chebyshev7X4, 4, 3>;

impl Default for VdpOscillatorX4 {
    fn default() -> Self {
        Self::new(chebyshev7_x4)
    }
}

impl<R: Resampler<FACTOR>, const FACTOR: usize, const ORDER: usize>
    VdpOscillator<R, FACTOR, ORDER>
{
    /// Create an unconfigured oscillator, making one resampler per input.
    pub fn new(mut make_resampler: impl FnMut() -> R) -> Self {
        Self {
            model: VanDerPol::default(),
            integrator: Bdf::new(Vector2::from(INITIAL_STATE)),
            x_resampler: make_resampler(),
            mu_resampler: make_resampler(),
            w_resampler: make_resampler(),
            oversampled_rate: 0.0,
        }
    }

    /// Configure for a host sampling rate `f0`.
    ///
    /// The integration restarts from the current state, so the waveform carries
    /// on across rate changes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSamplingRate` if `f0` is not a positive number,
    /// leaving the oscillator as it was.
    pub fn set_sampling_rate(&mut self, f0: f64) -> Result<(), ConfigError> {
        #[allow(clippy::cast_precision_loss)]
        let oversampled_rate = check_sampling_rate(f0)? * FACTOR as f64;
        self.oversampled_rate = oversampled_rate;
        let current = *self.integrator.current_state();
        self.integrator.set_init_conditions(current);
        self.integrator.set_sampling_rate(oversampled_rate);
        debug!(
            sampling_rate = f0,
            oversampled_rate, "configured Van der Pol oscillator"
        );
        Ok(())
    }

    /// Position and velocity.
    #[must_use]
    pub fn state(&self) -> [f64; 2] {
        let state = self.integrator.current_state();
        [state[0], state[1]]
    }

    /// Restart from the initial state and clear the resamplers.
    pub fn reset(&mut self) {
        self.integrator.set_init_conditions(Vector2::from(INITIAL_STATE));
        self.x_resampler.reset();
        self.mu_resampler.reset();
        self.w_resampler.reset();
    }

    /// Process one sample with forcing input `x` (volts), damping `mu` and angular
    /// frequency `w` (radians per second). Returns the position.
    ///
    /// Out of range `mu` and `w` are clamped.
    ///
    /// # Panics
    ///
    /// If called before a successful [`VdpOscillator::set_sampling_rate`].
    pub fn process(&mut self, x: f64, mu: f64, w: f64) -> f64 {
        assert!(
            self.oversampled_rate > 0.0,
            "oscillator used before its sampling rate was set"
        );
        let x = self.x_resampler.upsample(x);
        let mu = self.mu_resampler.upsample(mu);
        let w = self.w_resampler.upsample(w);

        let mut position = [0.0; FACTOR];
        for (out, ((x, mu), w)) in position.iter_mut().zip(x.into_iter().zip(mu).zip(w)) {
            *out = self.tick(x, mu, w);
        }
        let out = self
            .x_resampler
            .downsample(position)
            .clamp(-MAX_OUTPUT, MAX_OUTPUT);
        debug_assert!(out.is_finite());
        out
    }

    fn tick(&mut self, x: f64, mu: f64, w: f64) -> f64 {
        self.model.mu = mu.max(MIN_MU);
        self.model.w = w.clamp(MIN_W, MAX_W);
        self.integrator.step(&self.model, x);

        // The implicit solve can go unstable when both mu and w are high, so keep
        // the state within what the circuit could reach.
        let max_velocity = 2.0 * MAX_OUTPUT * self.oversampled_rate;
        let state = self.integrator.current_state_mut();
        state[0] = state[0].clamp(-MAX_OUTPUT, MAX_OUTPUT);
        state[1] = state[1].clamp(-max_velocity, max_velocity);
        state[0]
    }
}
