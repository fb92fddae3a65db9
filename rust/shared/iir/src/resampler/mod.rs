//! Polyphase IIR half-band resamplers, used to oversample nonlinear processing.
//!
//! Each half-band stage is a pair of all-pass cascades running at the base rate,
//! following "Digital signal processing schemes for efficient interpolation and
//! decimation" (Valenzuela & Constantinides, 1983). Stages can be cascaded for
//! higher factors.
//!
//! Upsampling and downsampling keep separate state, so a resampler may be used in
//! one direction only, for example to oversample a control signal that is never
//! brought back down.


/// A resampler between a base rate and `FACTOR` times the base rate.
pub trait Resampler<const FACTOR: usize> {
    /// Turn one base-rate sample into `FACTOR` oversampled samples.
    fn upsample(&mut self, x: f64) -> [f64; FACTOR];

    /// Turn `FACTOR` oversampled samples back into one base-rate sample.
    fn downsample(&mut self, frame: [f64; FACTOR]) -> f64;

    fn reset(&mut self);
}

/// A resampler that doesn't resample.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bypass;

impl Resampler<1> for Bypass {
    fn upsample(&mut self, x: f64) -> [f64; 1] {
        [x]
    }

    fn downsample(&mut self, frame: [f64; 1]) -> f64 {
        frame[0]
    }

    fn reset(&mut self) {}
}

#[derive(Debug, Clone, Copy)]
struct AllpassCascade<const N: usize> {
    coeffs: [f64; N],
    state: [f64; N],
}

impl<const N: usize> AllpassCascade<N> {
    fn new(coeffs: [f64; N]) -> Self {
        Self {
            coeffs,
            state: [0.0; N],
        }
    }

    fn process(&mut self, x: f64) -> f64 {
        self.coeffs
            .iter()
            .zip(self.state.iter_mut())
            .fold(x, |v, (a, s)| {
                let y = a * v + *s;
                *s = v - a * y;
                y
            })
    }

    fn reset(&mut self) {
        self.state = [0.0; N];
    }
}

/// A 2x half-band resampler made of `N` "direct" and `M` "delayed" first-order
/// all-pass sections.
///
/// Coefficients set the filter family; see [`butterworth5`], [`chebyshev7`] and
/// [`chebyshev9`].
#[derive(Debug, Clone)]
pub struct HalfBand<const N: usize, const M: usize> {
    up_direct: AllpassCascade<N>,
    up_delayed: AllpassCascade<M>,
    down_direct: AllpassCascade<N>,
    down_delayed: AllpassCascade<M>,
    delay: f64,
}

impl<const N: usize, const M: usize> HalfBand<N, M> {
    #[must_use]
    pub fn new(direct: [f64; N], delayed: [f64; M]) -> Self {
        Self {
            up_direct: AllpassCascade::new(direct),
            up_delayed: AllpassCascade::new(delayed),
            down_direct: AllpassCascade::new(direct),
            down_delayed: AllpassCascade::new(delayed),
            delay: 0.0,
        }
    }
}

impl<const N: usize, const M: usize> Resampler<2> for HalfBand<N, M> {
    fn upsample(&mut self, x: f64) -> [f64; 2] {
        [self.up_direct.process(x), self.up_delayed.process(x)]
    }

    fn downsample(&mut self, [direct, delayed]: [f64; 2]) -> f64 {
        let out = 0.5 * (self.down_direct.process(direct) + self.delay);
        self.delay = self.down_delayed.process(delayed);
        out
    }

    fn reset(&mut self) {
        self.up_direct.reset();
        self.up_delayed.reset();
        self.down_direct.reset();
        self.down_delayed.reset();
        self.delay = 0.0;
    }
}

/// Two 2x stages in series, for 4x oversampling.
///
/// The second stage runs at twice the base rate, so it sees both outputs of the
/// first stage in order.
#[derive(Debug, Clone)]
pub struct Cascade<S> {
    outer: S,
    inner: S,
}

impl<S: Resampler<2>> Cascade<S> {
    pub fn new(mut make_stage: impl FnMut() -> S) -> Self {
        Self {
            outer: make_stage(),
            inner: make_stage(),
        }
    }
}

impl<S: Resampler<2>> Resampler<4> for Cascade<S> {
    fn upsample(&mut self, x: f64) -> [f64; 4] {
        let [a, b] = self.outer.upsample(x);
        let [a0, a1] = self.inner.upsample(a);
        let [b0, b1] = self.inner.upsample(b);
        [a0, a1, b0, b1]
    }

    fn downsample(&mut self, [a0, a1, b0, b1]: [f64; 4]) -> f64 {
        let a = self.inner.downsample([a0, a1]);
        let b = self.inner.downsample([b0, b1]);
        self.outer.downsample([a, b])
    }

    fn reset(&mut self) {
        self.outer.reset();
        self.inner.reset();
    }
}

pub type Butterworth5 = HalfBand<1, 1>;
pub type Chebyshev7 = HalfBand<2, 1>;
pub type Chebyshev9 = HalfBand<2, 2>;
pub type Chebyshev7X4 = Cascade<Chebyshev7>;

/// 5th order Butterworth half-band.
#[must_use]
pub fn butterworth5() -> Butterworth5 {
    let sqrt5 = 5f64.sqrt();
    HalfBand::new([1.0 / (5.0 + 2.0 * sqrt5)], [5.0 - 2.0 * sqrt5])
}

/// 7th order Chebyshev half-band, a good default for audio-rate nonlinearities.
#[must_use]
pub fn chebyshev7() -> Chebyshev7 {
    HalfBand::new([0.081_430_023_176_616_115, 0.709_770_800_102_485_06], [0.315_659_840_216_660_94])
}

/// 9th order Chebyshev half-band.
#[must_use]
pub fn chebyshev9() -> Chebyshev9 {
    HalfBand::new(
        [0.079_866_426_236_357_438, 0.545_323_651_071_131_68],
        [0.283_829_344_874_109_66, 0.834_411_891_480_736_58],
    )
}

#[must_use]
pub fn chebyshev7_x4() -> Chebyshev7X4 {
    Cascade::new(chebyshev7)
}
