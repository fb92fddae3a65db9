//! Conversions between volts, pitch and gain as used by modular gear.


/// Frequency of a 0V pitch input, middle C.
pub const MIDDLE_C: f64 = 261.626;

/// Converts a 1V/octave pitch to a frequency, given the frequency at 0V.
#[must_use]
pub fn voct_to_frequency(voct: f64, f0: f64) -> f64 {
    f0 * voct.exp2()
}

/// Inverse of [`voct_to_frequency`].
///
/// Non-positive frequencies have no pitch and return negative infinity.
#[must_use]
pub fn frequency_to_voct(frequency: f64, f0: f64) -> f64 {
    if frequency <= 0.0 {
        return f64::NEG_INFINITY;
    }
    (frequency / f0).log2()
}

#[must_use]
pub fn decibels_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}
