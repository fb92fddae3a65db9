//! First-order zero-delay-feedback filters, following "The Art of VA Filter Design"
//! (Zavalishin, rev 2.0).
//!
//! Cutoffs are given normalised to Nyquist, so `1.0` is half the sampling rate.


/// Prewarped integrator gain for a cutoff normalised to Nyquist.
#[must_use]
pub fn calc_g(fc: f64) -> f64 {
    (std::f64::consts::FRAC_PI_2 * fc).tan()
}

#[derive(Debug, Clone, Default)]
pub struct LowpassZdf {
    s: f64,
    g: f64,
}

impl LowpassZdf {
    #[must_use]
    pub fn new(fc: f64) -> Self {
        Self { s: 0.0, g: calc_g(fc) }
    }

    pub fn set_cutoff(&mut self, fc: f64) {
        self.g = calc_g(fc);
    }

    pub fn process(&mut self, x: f64) -> f64 {
        let v = (x - self.s) * self.g / (1.0 + self.g);
        let y = v + self.s;
        self.s = y + v;
        y
    }

    pub fn reset(&mut self) {
        self.s = 0.0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct HighpassZdf {
    s: f64,
    g: f64,
}

impl HighpassZdf {
    #[must_use]
    pub fn new(fc: f64) -> Self {
        Self { s: 0.0, g: calc_g(fc) }
    }

    pub fn set_cutoff(&mut self, fc: f64) {
        self.g = calc_g(fc);
    }

    pub fn process(&mut self, x: f64) -> f64 {
        let y = (x - self.s) / (1.0 + self.g);
        self.s += 2.0 * self.g * y;
        y
    }

    pub fn reset(&mut self) {
        self.s = 0.0;
    }
}
