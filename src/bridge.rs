//! Pairwise bridging: one sensor calibrated onto one other sensor.

use log::debug;
use num_traits::Float;

use crate::error::BridgeError;
use crate::filter::filter_outliers;
use crate::fit::fit_line;
use crate::seasonal::SeasonalComponents;
use crate::transform::Transform;
use crate::Result;

/// How the retained pairs are fitted.
///
/// This is a closed set on purpose: the chain propagator only ever fits
/// linearly, so a seasonal strategy cannot leak into multi-sensor chaining.
/// Seasonal bridging is defined for exactly one sensor pair.
#[derive(Clone, Copy, Debug)]
pub enum FitStrategy<'a, E> {
    /// Plain ordinary least squares on the retained pairs.
    Linear,
    /// Subtract each series' externally supplied seasonal component before
    /// filtering and fitting. The fitted line then maps deseasonalized
    /// source values onto deseasonalized destination values.
    SeasonalLinear {
        source: &'a SeasonalComponents<E>,
        dest: &'a SeasonalComponents<E>,
        /// Time coordinate per position, shared by both series.
        times: &'a [i64],
    },
}

/// The outcome of bridging one ordered sensor pair (source onto destination).
///
/// Immutable once produced. The retained arrays are carried for diagnostics
/// and tests; nothing downstream recomputes from them.
#[derive(Clone, Debug)]
pub struct BridgeResult<E> {
    pub slope: E,
    pub intercept: E,
    /// Pairs handed to the outlier filter.
    pub input_pairs: usize,
    /// Pairs that survived the outlier filter and fed the fit.
    pub retained_pairs: usize,
    pub filtered_source: Vec<E>,
    pub filtered_dest: Vec<E>,
}

impl<E: Float> BridgeResult<E> {
    /// The fitted calibration as a composable [`Transform`].
    #[must_use]
    pub fn transform(&self) -> Transform<E> {
        Transform {
            slope: self.slope,
            intercept: self.intercept,
        }
    }
}

/// Bridge `source` onto `dest`: filter disagreeing pairs at `threshold`,
/// then least-squares fit `dest = slope * source + intercept`.
///
/// The call is atomic: it either returns a complete [`BridgeResult`] or an
/// error, with no partial state observable either way.
///
/// # Errors
/// - [`BridgeError::Alignment`] if the series lengths differ.
/// - [`BridgeError::NoOverlap`] if filtering removed every pair; carries the
///   pre-filter pair count.
/// - [`BridgeError::InsufficientData`] if exactly one pair survived.
pub fn bridge<E: Float>(source: &[E], dest: &[E], threshold: E) -> Result<BridgeResult<E>> {
    bridge_with(source, dest, threshold, FitStrategy::Linear)
}

/// [`bridge`] with an explicit [`FitStrategy`].
///
/// # Errors
/// As [`bridge`]; additionally [`BridgeError::Alignment`] if a seasonal
/// strategy's time axis does not match the series length.
pub fn bridge_with<E: Float>(
    source: &[E],
    dest: &[E],
    threshold: E,
    strategy: FitStrategy<'_, E>,
) -> Result<BridgeResult<E>> {
    if source.len() != dest.len() {
        return Err(BridgeError::Alignment {
            left: source.len(),
            right: dest.len(),
        });
    }

    let (source, dest) = match strategy {
        FitStrategy::Linear => (source.to_vec(), dest.to_vec()),
        FitStrategy::SeasonalLinear {
            source: source_seasonal,
            dest: dest_seasonal,
            times,
        } => {
            if times.len() != source.len() {
                return Err(BridgeError::Alignment {
                    left: source.len(),
                    right: times.len(),
                });
            }
            (
                source_seasonal.deseasonalize(source, times),
                dest_seasonal.deseasonalize(dest, times),
            )
        }
    };

    let input_pairs = source.len();
    let (filtered_source, filtered_dest) = filter_outliers(&source, &dest, threshold)?;
    let retained_pairs = filtered_source.len();

    if retained_pairs == 0 {
        return Err(BridgeError::NoOverlap { input_pairs });
    }

    let fit = fit_line(&filtered_source, &filtered_dest)?;
    debug!("bridged {retained_pairs}/{input_pairs} pairs");

    Ok(BridgeResult {
        slope: fit.slope,
        intercept: fit.intercept,
        input_pairs,
        retained_pairs,
        filtered_source,
        filtered_dest,
    })
}
