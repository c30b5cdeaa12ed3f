//! Outlier rejection for a pair of positionally aligned series.

use itertools::izip;
use num_traits::Float;

use crate::error::BridgeError;
use crate::Result;

/// Keep the positions where two aligned series agree.
///
/// A position survives when both values are present (non-NaN) and the
/// absolute difference does not exceed `threshold`. Surviving elements keep
/// their original order, so filtering an already-filtered pair at the same
/// threshold is a no-op.
///
/// If every pair disagrees the result is two empty vectors; whether that is
/// an error is the caller's decision.
///
/// # Errors
/// [`BridgeError::Alignment`] if the series lengths differ.
///
/// # Examples
///
/// ```
/// use sensor_bridge::filter::filter_outliers;
///
/// let a = vec![0.10, 0.80, f64::NAN, 0.30];
/// let b = vec![0.12, 0.20, 0.50, 0.31];
/// let (fa, fb) = filter_outliers(&a, &b, 0.1).unwrap();
///
/// assert_eq!(fa, vec![0.10, 0.30]);
/// assert_eq!(fb, vec![0.12, 0.31]);
/// ```
pub fn filter_outliers<E: Float>(a: &[E], b: &[E], threshold: E) -> Result<(Vec<E>, Vec<E>)> {
    if a.len() != b.len() {
        return Err(BridgeError::Alignment {
            left: a.len(),
            right: b.len(),
        });
    }

    let (filtered_a, filtered_b) = izip!(a, b)
        .filter(|(ai, bi)| both_present(**ai, **bi) && (**ai - **bi).abs() <= threshold)
        .map(|(ai, bi)| (*ai, *bi))
        .unzip();

    Ok((filtered_a, filtered_b))
}

/// Count the positions where both series hold a present (non-NaN) value.
///
/// This is the cheap existence check the chain propagator runs for every
/// adjacency before any fitting is attempted; it is deliberately independent
/// of the outlier threshold.
///
/// # Errors
/// [`BridgeError::Alignment`] if the series lengths differ.
pub fn overlap_count<E: Float>(a: &[E], b: &[E]) -> Result<usize> {
    if a.len() != b.len() {
        return Err(BridgeError::Alignment {
            left: a.len(),
            right: b.len(),
        });
    }

    Ok(izip!(a, b)
        .filter(|(ai, bi)| both_present(**ai, **bi))
        .count())
}

fn both_present<E: Float>(a: E, b: E) -> bool {
    !a.is_nan() && !b.is_nan()
}
