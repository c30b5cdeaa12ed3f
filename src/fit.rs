//! Ordinary least-squares fit of a line through paired observations.

use num_traits::Float;

use crate::error::BridgeError;
use crate::Result;

/// The fitted line `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFit<E> {
    pub slope: E,
    pub intercept: E,
}

/// Fit `y = slope * x + intercept` minimising the sum of squared residuals.
///
/// Uses the closed-form centred solution: with `x̄`, `ȳ` the means,
/// `slope = Σ(x−x̄)(y−ȳ) / Σ(x−x̄)²` and `intercept = ȳ − slope·x̄`.
///
/// When every x is identical the design is degenerate and any slope fits
/// equally well; the convention here is slope 0 and intercept `ȳ`, the value
/// a centred solver produces. Callers that care must treat such data as
/// suspect themselves.
///
/// # Errors
/// [`BridgeError::InsufficientData`] if fewer than two points are supplied or
/// the lengths differ (a line is underdetermined by one point).
///
/// # Examples
///
/// ```
/// use sensor_bridge::fit::fit_line;
///
/// let x: Vec<f64> = vec![1.0, 2.0, 3.0];
/// let y = vec![3.0, 5.0, 7.0];
/// let fit = fit_line(&x, &y).unwrap();
///
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn fit_line<E: Float>(x: &[E], y: &[E]) -> Result<LineFit<E>> {
    if x.len() != y.len() {
        return Err(BridgeError::Alignment {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(BridgeError::InsufficientData { points: x.len() });
    }

    let n = E::from(x.len()).expect("sample count representable in the scalar type");
    let x_mean = x.iter().fold(E::zero(), |acc, xi| acc + *xi) / n;
    let y_mean = y.iter().fold(E::zero(), |acc, yi| acc + *yi) / n;

    let mut sxx = E::zero();
    let mut sxy = E::zero();
    for (xi, yi) in x.iter().zip(y) {
        let dx = *xi - x_mean;
        sxx = sxx + dx * dx;
        sxy = sxy + dx * (*yi - y_mean);
    }

    if sxx == E::zero() {
        // Degenerate design: all x identical.
        return Ok(LineFit {
            slope: E::zero(),
            intercept: y_mean,
        });
    }

    let slope = sxy / sxx;
    Ok(LineFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
