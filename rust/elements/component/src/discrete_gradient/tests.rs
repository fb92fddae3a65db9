use assert_approx_eq::assert_approx_eq;
use more_asserts::assert_le;
use proptest::prelude::*;
use util::test_utils::sine;

use super::*;

#[test]
fn coincident_points_give_tanh() {
    for x in [-3.0, -0.5, 0.0, 0.25, 4.0] {
        assert_approx_eq!(tanh_dg(x, x), f64::tanh(x), 1e-15);
    }
}

#[test]
fn matches_the_mean_of_tanh() {
    // Midpoint rule over a fine grid.
    let (a, b) = (-0.7, 1.9);
    let n = 10_000;
    let mean = (0..n)
        .map(|i| {
            let t = (f64::from(i) + 0.5) / f64::from(n);
            (a + t * (b - a)).tanh()
        })
        .sum::<f64>()
        / f64::from(n);
    assert_approx_eq!(tanh_dg(b, a), mean, 1e-8);
}

#[test]
fn is_symmetric() {
    assert_approx_eq!(tanh_dg(0.3, 2.0), tanh_dg(2.0, 0.3), 1e-15);
}

#[test]
fn does_not_overflow() {
    assert_approx_eq!(tanh_dg(800.0, 700.0), 1.0, 1e-12);
    assert_approx_eq!(tanh_dg(-800.0, 700.0), -1.0 / 15.0, 1e-12);
    assert_approx_eq!(tanh_dg(-800.0, -900.0), -1.0, 1e-12);
}

#[test]
fn derivative_matches_finite_difference() {
    for (x, x_prev) in [(0.4, -1.0), (2.0, 1.5), (-0.3, 0.6)] {
        let h = 1e-6;
        let numeric = (tanh_dg(x + h, x_prev) - tanh_dg(x - h, x_prev)) / (2.0 * h);
        assert_approx_eq!(tanh_dg_derivative(x, x_prev), numeric, 1e-6);
    }
    assert_approx_eq!(tanh_dg_derivative(0.0, 0.0), 0.5, 1e-15);
}

#[test]
fn block_saturates() {
    let mut block = TanhBlock::default();
    for x in sine(1000, 0.01, 100.0) {
        assert_le!(block.process(x).abs(), 1.0);
    }
}

#[test]
fn block_reset() {
    let input = sine(100, 0.03, 2.0);
    let mut block = TanhBlock::default();
    let first: Vec<_> = input.iter().map(|x| block.process(*x)).collect();
    block.reset();
    let second: Vec<_> = input.iter().map(|x| block.process(*x)).collect();
    for (a, b) in first.iter().zip(second.iter()) {
        assert_approx_eq!(a, b);
    }
}

proptest! {
    #[test]
    fn lies_between_the_endpoint_tanhs(x in -20.0..20.0f64, x_prev in -20.0..20.0f64) {
        let y = tanh_dg(x, x_prev);
        let (lo, hi) = (x.min(x_prev).tanh(), x.max(x_prev).tanh());
        prop_assert!(y >= lo - 1e-9 && y <= hi + 1e-9);
    }

    #[test]
    fn is_increasing_in_x(x in -5.0..5.0f64, x_prev in -5.0..5.0f64) {
        let slope = tanh_dg_derivative(x, x_prev);
        prop_assert!(slope > 0.0 && slope < 1.0);
    }
}
