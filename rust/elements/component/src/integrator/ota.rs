use super::{Equation, Integrator};
use crate::discrete_gradient::tanh_dg;

/// An OTA based one-pole low-pass, `dy/dt = w_c * tanh(x - y)`.
///
/// The solved state is `u = x - y`, the OTA's differential input.
#[derive(Debug, Clone, Default)]
pub struct Ota {
    u1: f64,
    x1: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OtaEquation {
    x: f64,
    x1: f64,
    u1: f64,
    g: f64,
}

impl Equation for OtaEquation {
    fn residual(&self, u: f64) -> f64 {
        self.g * tanh_dg(u, self.u1) + u - self.u1 - self.x + self.x1
    }

    fn linear_guess(&self) -> f64 {
        (self.x - self.x1 + self.u1 * (1.0 - 0.5 * self.g)) / (1.0 + 0.5 * self.g)
    }

    fn previous(&self) -> f64 {
        self.u1
    }
}

impl Integrator for Ota {
    const DEFAULT_ROLLOFF: f64 = 10_000.0;

    type Equation = OtaEquation;

    fn equation(&self, x: f64, g: f64) -> OtaEquation {
        OtaEquation {
            x,
            x1: self.x1,
            u1: self.u1,
            g,
        }
    }

    fn commit(&mut self, x: f64, u: f64) -> f64 {
        self.u1 = u;
        self.x1 = x;
        x - u
    }
}
