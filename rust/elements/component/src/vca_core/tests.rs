use assert_approx_eq::assert_approx_eq;
use more_asserts::{assert_gt, assert_lt};
use util::test_utils::{rms, sine};

use super::*;
use iir::resampler::chebyshev7;

fn configured<I: Integrator>() -> VcaCore<I, Chebyshev7, 2> {
    let mut core = VcaCore::new(chebyshev7).with_noise_seed(1);
    core.set_sampling_rate(48000.0).unwrap();
    core
}

#[allow(clippy::cast_possible_truncation)]
fn run<I: Integrator>(
    core: &mut VcaCore<I, Chebyshev7, 2>,
    input: &[f64],
    cv: f32,
    final_gain: f32,
) -> Vec<f64> {
    input
        .iter()
        .map(|x| f64::from(core.process(*x as f32, cv, final_gain)))
        .collect()
}

#[test]
fn zero_cv_silences_the_output() {
    let input = sine(4800, 1000.0 / 48000.0, 5.0);
    let mut core = configured::<Transistor>();
    for out in run(&mut core, &input, 0.0, 1.0) {
        assert_lt!(out.abs(), 1e-9);
    }
    let mut core = configured::<Ota>();
    for out in run(&mut core, &input, 0.0, 1.0) {
        assert_lt!(out.abs(), 1e-9);
    }
}

fn check_gain_follows_cv<I: Integrator>() {
    let input = sine(4800, 1000.0 / 48000.0, 1.0);
    for cv in [0.5, 1.0] {
        let mut core = configured::<I>();
        let out = run(&mut core, &input, cv, 1.0);
        let gain = rms(&out[800..]) / rms(&input[800..]);
        assert_approx_eq!(gain, f64::from(cv), 0.02);
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn gain_follows_cv() {
    check_gain_follows_cv::<Transistor>();
    check_gain_follows_cv::<Ota>();
}

#[test]
#[cfg_attr(miri, ignore)]
fn output_stage_saturates_at_the_supply() {
    let input = sine(4800, 1000.0 / 48000.0, 10.0);
    let mut core = configured::<Transistor>();
    let out = run(&mut core, &input, 1.0, 100.0);
    let level = rms(&out[800..]);
    assert_gt!(level, 10.0);
    assert_lt!(level, 12.5);
}

#[test]
fn noise_floor_is_quiet() {
    let silence = vec![0.0; 9600];
    let mut core = configured::<Transistor>();
    let out = run(&mut core, &silence, 1.0, 1.0);
    let floor = rms(&out[2000..]);
    assert_gt!(floor, 1e-5);
    assert_lt!(floor, 1e-3);

    let mut core = configured::<Transistor>();
    core.set_noise_level(0.0);
    for out in run(&mut core, &silence, 1.0, 1.0) {
        assert_approx_eq!(out, 0.0, 1e-12);
    }
}

#[test]
fn reset() {
    let input = sine(200, 0.02, 2.0);
    let mut core = configured::<Transistor>();
    core.set_noise_level(0.0);
    let first = run(&mut core, &input, 0.7, 1.0);
    core.reset();
    let second = run(&mut core, &input, 0.7, 1.0);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_approx_eq!(a, b);
    }
}

#[test]
fn rejects_invalid_rates() {
    let mut core = TransistorCoreX2::new(chebyshev7);
    assert_eq!(
        core.set_sampling_rate(0.0),
        Err(ConfigError::InvalidSamplingRate(0.0))
    );
    assert!(core.set_sampling_rate(f64::NAN).is_err());
}

#[test]
#[should_panic(expected = "sampling rate")]
fn processing_unconfigured_panics() {
    let mut core = TransistorCoreX2::new(chebyshev7);
    core.process(0.0, 0.0, 1.0);
}

#[test]
#[should_panic(expected = "sampling rate")]
fn failed_configuration_leaves_core_unconfigured() {
    let mut core = TransistorCoreX2::new(chebyshev7);
    let _ = core.set_sampling_rate(-1.0);
    core.process(0.0, 0.0, 1.0);
}

#[test]
fn runs_at_low_rates() {
    // The transistor rolloff is above Nyquist here, so the cutoff gets clamped.
    let mut core = TransistorCore::<iir::resampler::Bypass, 1>::new(|| iir::resampler::Bypass);
    core.set_sampling_rate(22050.0).unwrap();
    for x in sine(1000, 0.01, 1.0) {
        #[allow(clippy::cast_possible_truncation)]
        let out = core.process(x as f32, 1.0, 1.0);
        assert!(out.is_finite());
    }
}
