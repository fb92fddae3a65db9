use assert_approx_eq::assert_approx_eq;
use more_asserts::{assert_gt, assert_lt};

use super::*;

fn configured() -> Slop {
    let mut slop = Slop::with_seed(5);
    slop.set_sampling_rate(48000.0).unwrap();
    slop
}

fn configured4() -> Slop4 {
    let mut slop = Slop4::with_seed(5);
    slop.set_sampling_rate(48000.0).unwrap();
    slop
}

#[test]
fn clean_settings_pass_pitch_through() {
    let mut slop = configured();
    for mode in [DetuneMode::Cents, DetuneMode::Hz] {
        let params = Params {
            track_scaling: 0.5,
            mode,
            ..Params::default()
        };
        for voct in [-2.0, 0.0, 1.3] {
            assert_approx_eq!(slop.process(&params, voct), 0.5 * voct, 1e-12);
        }
    }
}

#[test]
fn hum_is_a_small_sine() {
    let mut slop = configured();
    let params = Params {
        hum_level: 1.0,
        ..Params::default()
    };
    let out: Vec<_> = (0..48000).map(|_| slop.process(&params, 1.0) - 1.0).collect();
    let peak = out.iter().fold(0.0, |m: f64, x| m.max(x.abs()));
    assert_approx_eq!(peak, MAX_HUM, 1e-5);

    // 60 rising zero crossings in one second.
    let crossings = out.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
    assert!((59..=61).contains(&crossings));
}

#[test]
fn drift_wanders_slowly() {
    let mut slop = configured();
    let params = Params {
        drift_level: 1.0,
        ..Params::default()
    };
    let out: Vec<_> = (0..48000).map(|_| slop.process(&params, 0.0)).collect();
    let largest_jump = out
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f64::max);
    let range = out.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - out.iter().copied().fold(f64::INFINITY, f64::min);
    // Per sample steps are about sigma * sqrt(T), while a second of drift
    // accumulates about sigma.
    assert_lt!(largest_jump, 0.2 / 12.0 * 6.0 / 48000f64.sqrt());
    assert_gt!(range, 10.0 * largest_jump);
}

#[test]
fn changing_mode_restarts_drift() {
    let mut slop = configured();
    let mut params = Params {
        drift_level: 1.0,
        mode: DetuneMode::Hz,
        ..Params::default()
    };
    for _ in 0..48000 {
        slop.process(&params, 0.0);
    }
    params.mode = DetuneMode::Cents;
    let after_switch = slop.process(&params, 0.0);
    assert_lt!(after_switch.abs(), 0.2 / 12.0 * 6.0 / 48000f64.sqrt());
}

#[test]
fn seeded_generators_repeat() {
    let params = Params {
        hum_level: 0.5,
        drift_level: 1.0,
        ..Params::default()
    };
    let mut a = configured();
    let mut b = configured();
    for _ in 0..1000 {
        assert_approx_eq!(a.process(&params, 0.3), b.process(&params, 0.3), 1e-15);
    }
}

#[test]
#[should_panic(expected = "sampling rate")]
fn unconfigured_slop_panics() {
    Slop::default().process(&Params::default(), 0.0);
}

#[test]
fn rejects_invalid_rates() {
    assert_eq!(
        Slop::default().set_sampling_rate(0.0),
        Err(ConfigError::InvalidSamplingRate(0.0))
    );
    assert!(Slop4::default().set_sampling_rate(f64::NAN).is_err());
}

#[test]
fn four_channels_track_independently() {
    let mut slop = configured4();
    let params = Params4 {
        track_scaling: [1.0, 0.5, 2.0, 0.0],
        ..Params4::default()
    };
    let out = slop.process(&params, [1.0, 1.0, -1.0, 3.0]);
    for (y, expected) in out.iter().zip([1.0, 0.5, -2.0, 0.0]) {
        assert_approx_eq!(y, expected, 1e-12);
    }
}

#[test]
fn common_drift_moves_all_channels_together() {
    let mut slop = configured4();
    let params = Params4 {
        common_drift_level: 1.0,
        ..Params4::default()
    };
    let mut moved = false;
    for _ in 0..4800 {
        let out = slop.process(&params, [0.0; 4]);
        for y in &out[1..] {
            assert_approx_eq!(*y, out[0], 1e-12);
        }
        moved |= out[0].abs() > 1e-6;
    }
    assert!(moved);
}

#[test]
fn individual_drift_separates_channels() {
    let mut slop = configured4();
    let params = Params4 {
        individual_drift_level: 1.0,
        ..Params4::default()
    };
    let mut out = [0.0; 4];
    for _ in 0..4800 {
        out = slop.process(&params, [0.0; 4]);
    }
    assert_gt!((out[0] - out[1]).abs(), 1e-9);
    assert_gt!((out[2] - out[3]).abs(), 1e-9);
}
