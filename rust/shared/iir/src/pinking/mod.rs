//! Fixed filter approximating a -3dB/octave slope, turning white noise pink.
//!
//! Coefficients from <https://ccrma.stanford.edu/~jos/sasp/Example_Synthesis_1_F_Noise.html>.


const B: [f64; 4] = [0.049_922_035, -0.095_993_537, 0.050_612_699, -0.004_408_786];
const A: [f64; 4] = [1.0, -2.494_956_002, 2.017_265_875, -0.522_189_400];

#[derive(Debug, Clone, Default)]
pub struct Pinking {
    x: [f64; 4],
    y: [f64; 4],
}

impl Pinking {
    pub fn process(&mut self, input: f64) -> f64 {
        self.x[0] = input;
        let out = B[0] * self.x[0]
            + (1..4)
                .map(|i| B[i] * self.x[i] - A[i] * self.y[i])
                .sum::<f64>();
        self.y[0] = out;
        self.x.rotate_right(1);
        self.y.rotate_right(1);
        out
    }

    pub fn reset(&mut self) {
        *self = Default::default();
    }
}
