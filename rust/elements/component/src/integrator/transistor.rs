use super::{Equation, Integrator};
use crate::discrete_gradient::tanh_dg;

/// A transistor pair one-pole low-pass, `dy/dt = w_c * (tanh(x) - tanh(y))`.
#[derive(Debug, Clone, Default)]
pub struct Transistor {
    y1: f64,
    x1: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TransistorEquation {
    /// Discrete gradient of the input, fixed for the whole solve.
    phi_x: f64,
    y1: f64,
    g: f64,
}

impl Equation for TransistorEquation {
    fn residual(&self, y: f64) -> f64 {
        self.g * tanh_dg(y, self.y1) - self.g * self.phi_x + y - self.y1
    }

    fn linear_guess(&self) -> f64 {
        (self.g * self.phi_x + (1.0 - 0.5 * self.g) * self.y1) / (1.0 + 0.5 * self.g)
    }

    fn previous(&self) -> f64 {
        self.y1
    }
}

impl Integrator for Transistor {
    const DEFAULT_ROLLOFF: f64 = 20_000.0;

    type Equation = TransistorEquation;

    fn equation(&self, x: f64, g: f64) -> TransistorEquation {
        TransistorEquation {
            phi_x: tanh_dg(x, self.x1),
            y1: self.y1,
            g,
        }
    }

    fn commit(&mut self, x: f64, y: f64) -> f64 {
        self.y1 = y;
        self.x1 = x;
        y
    }
}
