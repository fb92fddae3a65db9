#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use num::Complex;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use realfft::RealFftPlanner;

use crate::window::blackman_harris;

/// Uniform white noise in `[-1, 1)`, always generated from the same seed.
#[must_use]
pub fn white_noise(len: usize) -> Vec<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(420);
    std::iter::repeat_with(|| rng.gen_range(-1.0..1.0))
        .take(len)
        .collect()
}

/// A sine with a frequency of `increment` cycles per sample.
#[must_use]
pub fn sine(len: usize, increment: f64, amplitude: f64) -> Vec<f64> {
    (0..len)
        .map(|i| amplitude * (i as f64 * increment * std::f64::consts::TAU).sin())
        .collect()
}

/// Note that this will thrash `data`.
///
/// # Panics
/// If `data` is empty.
pub fn windowed_rfft(data: &mut [f64]) -> Vec<Complex<f64>> {
    blackman_harris(data);
    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(data.len());
    let mut spectrum = r2c.make_output_vec();
    r2c.process(data, &mut spectrum).unwrap();
    spectrum
}

/// Ratio of the power of `processed` to the power of `reference` at `bin`, in decibels.
#[must_use]
pub fn gain_at_bin_db(reference: &[Complex<f64>], processed: &[Complex<f64>], bin: usize) -> f64 {
    10.0 * (processed[bin].norm_sqr() / reference[bin].norm_sqr()).log10()
}

/// Estimates the frequency of the strongest partial of `data`, in cycles per sample.
///
/// # Panics
///
/// If `data` is too short to hold a few bins of spectrum.
pub fn estimate_tuning(data: &mut [f64]) -> f64 {
    let len = data.len();
    let spectrum = windowed_rfft(data);
    // Skip the lowest bins as a crude DC blocker.
    let peak = spectrum[10..spectrum.len() - 1]
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        .unwrap()
        .0
        + 10;

    // Parabolic interpolation on the log magnitude around the peak.
    let y1 = spectrum[peak - 1].norm().ln();
    let y2 = spectrum[peak].norm().ln();
    let y3 = spectrum[peak + 1].norm().ln();
    let delta = 0.5 * (y1 - y3) / (y1 - 2.0 * y2 + y3);
    let refined = if delta.is_finite() && delta.abs() <= 0.5 {
        peak as f64 + delta
    } else {
        peak as f64
    };
    refined / len as f64
}

#[must_use]
pub fn rms(data: &[f64]) -> f64 {
    (data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64).sqrt()
}
