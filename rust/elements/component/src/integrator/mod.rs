//! Nonlinear one-pole integrators, discretising `dy/dt = w_c * tanh(drive)` with
//! the discrete gradient of `tanh`.
//!
//! Each sample needs the root of a scalar implicit equation. That is found with
//! the secant method, which is cheaper here than Newton's method. Two integrators
//! can be solved together with [`Integrator::step_dual`], which gives the same
//! results as two calls to [`Integrator::step`].
//!
//! The gain `g` passed to every step is the prewarped, doubled cutoff
//! `2 * tan(pi / 2 * fc)`, with `fc` normalised to Nyquist.

use tracing::trace;

mod ota;
mod transistor;


pub use ota::{Ota, OtaEquation};
pub use transistor::{Transistor, TransistorEquation};

/// Stop once the residual is this small. Inputs are volt scaled, so this is
/// about 120dB below full scale.
const TOLERANCE: f64 = 1e-6;

/// Stop if two consecutive residuals are this close, as the secant slope is lost.
const STALL: f64 = 1e-12;

/// Guesses closer than this are pulled apart before the first secant update.
const MIN_GUESS_SPREAD: f64 = 1e-8;

/// Upper bound on secant updates per solve.
const MAX_ITERATIONS: usize = 64;

/// The implicit scalar equation an integrator solves for one sample.
pub trait Equation {
    fn residual(&self, u: f64) -> f64;

    /// A guess from linearising the equation around zero drive.
    fn linear_guess(&self) -> f64;

    /// The solution from the previous sample.
    fn previous(&self) -> f64;
}

/// Two most recent secant points, current first.
#[derive(Debug, Clone, Copy)]
struct Secant {
    u: [f64; 2],
    f: [f64; 2],
}

impl Secant {
    fn new(equation: &impl Equation) -> Self {
        let guess = equation.linear_guess();
        let mut previous = equation.previous();
        if (previous - guess).abs() < MIN_GUESS_SPREAD {
            previous += MIN_GUESS_SPREAD;
        }
        Self {
            u: [guess, previous],
            f: [equation.residual(guess), equation.residual(previous)],
        }
    }

    fn iterate(&mut self, equation: &impl Equation) {
        let denominator = self.f[0] - self.f[1];
        if denominator.abs() < f64::MIN_POSITIVE {
            return;
        }
        let current = self.u[0];
        let next = current - self.f[0] * (current - self.u[1]) / denominator;
        self.u = [next, current];
        self.f = [equation.residual(next), self.f[0]];
    }

    fn done(&self) -> bool {
        self.f[0].abs() < TOLERANCE || (self.f[0] - self.f[1]).abs() < STALL
    }

    fn finish(mut self, equation: &impl Equation) -> f64 {
        let mut iterations = 0;
        while !self.done() {
            if iterations == MAX_ITERATIONS {
                trace!(residual = self.f[0], "secant solve stopped at the iteration cap");
                break;
            }
            self.iterate(equation);
            iterations += 1;
        }
        self.u[0]
    }
}

/// Solves `N` independent equations.
///
/// The guesses and first update are done for all equations in lockstep, since
/// that part always runs; the remaining updates continue per equation.
fn solve<E: Equation, const N: usize>(equations: &[E; N]) -> [f64; N] {
    let mut secants = equations.each_ref().map(Secant::new);
    for (secant, equation) in secants.iter_mut().zip(equations) {
        secant.iterate(equation);
    }
    let mut solutions = [0.0; N];
    for ((solution, secant), equation) in solutions.iter_mut().zip(secants).zip(equations) {
        *solution = secant.finish(equation);
    }
    solutions
}

/// A one-pole integrator model.
pub trait Integrator: Default {
    /// Cutoff in Hz used when the model is part of a VCA core.
    const DEFAULT_ROLLOFF: f64;

    type Equation: Equation;

    /// The equation for the next sample, given input `x` and gain `g`.
    fn equation(&self, x: f64, g: f64) -> Self::Equation;

    /// Store the solved state and return the output for input `x`.
    fn commit(&mut self, x: f64, solution: f64) -> f64;

    /// Process one sample.
    fn step(&mut self, x: f64, g: f64) -> f64 {
        let [solution] = solve(&[self.equation(x, g)]);
        self.commit(x, solution)
    }

    /// Process one sample for each of two models, such as the audio and control
    /// paths of a VCA.
    fn step_dual(models: &mut [Self; 2], x: [f64; 2], g: [f64; 2]) -> [f64; 2] {
        let solutions = solve(&[models[0].equation(x[0], g[0]), models[1].equation(x[1], g[1])]);
        [
            models[0].commit(x[0], solutions[0]),
            models[1].commit(x[1], solutions[1]),
        ]
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
