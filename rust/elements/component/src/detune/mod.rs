//! Pitch offsets expressed in Hz rather than in octaves.


/// Reference frequency of 0V used by [`linear`].
pub const DEFAULT_F0: f64 = 261.63;

/// Lowest ratio to `f0` that [`linear_from`] will produce, keeping the result finite.
const MIN_RATIO: f64 = 1e-8;

/// Detune a 1V/octave pitch by `det` Hz, so that `f(linear(v, det)) == f(v) + det`
/// for `f(v) = DEFAULT_F0 * 2^v`.
#[must_use]
pub fn linear(voct: f64, det: f64) -> f64 {
    linear_from(voct, det, DEFAULT_F0)
}

/// Like [`linear`], with `f0` as the frequency at 0V.
#[must_use]
pub fn linear_from(voct: f64, det: f64, f0: f64) -> f64 {
    (det / f0 + voct.exp2()).max(MIN_RATIO).log2()
}
