use num_traits::{cast, Float, FloatConst};

#[cfg(test)]
mod tests;

/// Applies a Blackman-Harris window to the data.
///
/// # Panics
/// If the length of `data` can't be represented by `T`.
pub fn blackman_harris<T: Float + FloatConst>(data: &mut [T]) {
    let c = |v: f64| cast::<f64, T>(v).unwrap();
    let increment = T::TAU() / cast::<usize, T>(data.len()).unwrap();
    for (index, sample) in data.iter_mut().enumerate() {
        let x = cast::<usize, T>(index).unwrap() * increment;
        *sample = *sample
            * (c(0.35875) - c(0.48829) * x.cos() + c(0.14128) * (c(2.0) * x).cos()
                - c(0.01168) * (c(3.0) * x).cos());
    }
}
