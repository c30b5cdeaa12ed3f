//! Seasonal components supplied by an external decomposition.
//!
//! The decomposition itself (STL, classical additive, whatever the caller
//! prefers) is out of scope; this module only carries its output, a seasonal
//! value per time coordinate, so that bridging and transform application can
//! subtract it before fitting and add it back afterwards.

use std::collections::HashMap;

use log::debug;
use num_traits::Float;

/// Additive seasonal components for one series, keyed by an integer time
/// coordinate (e.g. an index into a shared monthly axis).
///
/// A coordinate with no entry contributes a zero seasonal component. That is
/// a defined fallback, not an error: series routinely extend past the window
/// the decomposition was run on. It is logged at debug level because a high
/// miss rate usually means the caller's time axes are misaligned.
#[derive(Clone, Debug, Default)]
pub struct SeasonalComponents<E> {
    components: HashMap<i64, E>,
}

impl<E: Float> SeasonalComponents<E> {
    /// Build from parallel time/value slices, as produced by a seasonal
    /// decomposition over a shared time axis. Later duplicates of a time
    /// coordinate overwrite earlier ones.
    #[must_use]
    pub fn from_parts(times: &[i64], values: &[E]) -> Self {
        let components = times.iter().copied().zip(values.iter().copied()).collect();
        Self { components }
    }

    /// The seasonal component at `time`, zero if none is known.
    #[must_use]
    pub fn component_at(&self, time: i64) -> E {
        self.components.get(&time).copied().unwrap_or_else(|| {
            debug!("no seasonal component at time {time}; treating as zero");
            E::zero()
        })
    }

    /// Subtract the seasonal component from each sample, position `i` keyed
    /// by `times[i]`. NaN samples stay NaN.
    #[must_use]
    pub fn deseasonalize(&self, values: &[E], times: &[i64]) -> Vec<E> {
        values
            .iter()
            .zip(times)
            .map(|(v, t)| *v - self.component_at(*t))
            .collect()
    }

    /// Add the seasonal component back onto each sample.
    #[must_use]
    pub fn reseasonalize(&self, values: &[E], times: &[i64]) -> Vec<E> {
        values
            .iter()
            .zip(times)
            .map(|(v, t)| *v + self.component_at(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::SeasonalComponents;

    #[test]
    fn missing_time_coordinates_contribute_zero() {
        let seasonal = SeasonalComponents::from_parts(&[0, 1], &[0.5, -0.5]);

        assert_relative_eq!(seasonal.component_at(0), 0.5);
        assert_relative_eq!(seasonal.component_at(7), 0.0);
    }

    #[test]
    fn deseasonalize_then_reseasonalize_round_trips() {
        let seasonal = SeasonalComponents::from_parts(&[0, 1, 2], &[0.1, -0.2, 0.3]);
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let times = vec![0, 1, 2, 3]; // time 3 falls back to zero

        let flat = seasonal.deseasonalize(&values, &times);
        assert_relative_eq!(flat[0], 0.9);
        assert_relative_eq!(flat[3], 4.0);

        let back = seasonal.reseasonalize(&flat, &times);
        for (orig, restored) in values.iter().zip(&back) {
            assert_relative_eq!(*orig, *restored);
        }
    }

    #[test]
    fn nan_samples_stay_nan() {
        let seasonal = SeasonalComponents::from_parts(&[0], &[0.5]);
        let out = seasonal.deseasonalize(&[f64::NAN], &[0]);
        assert!(out[0].is_nan());
    }
}
