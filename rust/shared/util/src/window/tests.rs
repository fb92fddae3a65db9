use assert_approx_eq::assert_approx_eq;

use super::blackman_harris;

#[test]
fn tapers_to_zero_at_the_edges() {
    let mut data = vec![1.0f64; 64];
    blackman_harris(&mut data);
    assert_approx_eq!(data[0], 6e-5, 1e-6);
    assert_approx_eq!(data[32], 1.0, 1e-9);
    assert_approx_eq!(data[16], data[48], 1e-12);
}

#[test]
fn works_on_single_precision() {
    let mut data = vec![2.0f32; 64];
    blackman_harris(&mut data);
    assert_approx_eq!(data[32], 2.0f32, 1e-5);
}
