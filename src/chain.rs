//! Chain propagation: every sensor mapped onto one target sensor's scale.
//!
//! Pairwise bridges only exist between adjacent sensors, so non-adjacent
//! sensors inherit their calibration by composing bridges transitively. The
//! propagation radiates outward from the target in two passes rather than
//! sweeping sensor 0 to sensor N, because the target may sit anywhere in the
//! ordering (a contemporaneous reference with both older and newer sensors
//! around it). Each pass only ever composes with an already-resolved
//! neighbour, so a single sweep per direction suffices and no fixed-point
//! iteration is needed.

use log::debug;
use num_traits::Float;

use crate::bridge::{bridge, BridgeResult};
use crate::error::BridgeError;
use crate::filter::overlap_count;
use crate::transform::Transform;
use crate::Result;

/// Which propagation pass produced a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Walking from the target down towards sensor 0.
    Left,
    /// Walking from the target up towards sensor N-1.
    Right,
}

/// A pairwise bridge annotated with the adjacency it came from.
///
/// `left_index`/`right_index` name the adjacency `(i, i + 1)` regardless of
/// pass; the fit itself always runs from the sensor farther from the target
/// onto the nearer one, so that composing with the nearer sensor's resolved
/// transform yields a map onto the target scale.
#[derive(Clone, Debug)]
pub struct TaggedBridge<E> {
    pub left_index: usize,
    pub right_index: usize,
    pub pass: Pass,
    pub result: BridgeResult<E>,
}

/// The complete outcome of one propagation call.
///
/// Recomputed in full on every call; nothing is cached across calls.
#[derive(Clone, Debug)]
pub struct ChainResult<E> {
    /// Index of the target sensor all transforms map onto.
    pub target: usize,
    /// One transform per input series; `transforms[target]` is the identity.
    pub transforms: Vec<Transform<E>>,
    /// Bridges from the left pass, in descending adjacency order.
    pub left_bridges: Vec<TaggedBridge<E>>,
    /// Bridges from the right pass, in ascending adjacency order.
    pub right_bridges: Vec<TaggedBridge<E>>,
}

/// Map every series onto `series[target]`'s scale.
///
/// `thresholds[i]` governs outlier rejection for the adjacency between
/// `series[i]` and `series[i + 1]`. Adjacent series must be positionally
/// aligned pairwise; series lengths may differ across non-adjacent sensors.
///
/// Every adjacency is checked for shared present values before any fitting
/// is attempted, so a hopeless chain fails fast and cheaply. Propagation is
/// all-or-nothing: a single failing bridge fails the whole call.
///
/// # Errors
/// - [`BridgeError::Configuration`] for fewer than two series, a target
///   index out of range, or a threshold list whose length is not `N - 1`.
/// - [`BridgeError::Alignment`] if adjacent series differ in length.
/// - [`BridgeError::NoAdjacencyOverlap`] if an adjacency shares no position
///   where both values are present.
/// - [`BridgeError::Propagation`] wrapping the first bridge failure inside
///   either pass, naming the adjacency and the pass.
pub fn propagate<E: Float + std::fmt::Debug>(
    series: &[Vec<E>],
    target: usize,
    thresholds: &[E],
) -> Result<ChainResult<E>> {
    let n = series.len();
    validate_request(n, target, thresholds.len())?;

    // Existence check for every adjacency, strictly before any fitting.
    for i in 0..n - 1 {
        if overlap_count(&series[i], &series[i + 1])? == 0 {
            return Err(BridgeError::NoAdjacencyOverlap {
                left_index: i,
                right_index: i + 1,
            });
        }
    }

    propagate_with(n, target, |adjacency, pass| {
        let threshold = thresholds[adjacency];
        match pass {
            Pass::Left => bridge(&series[adjacency], &series[adjacency + 1], threshold),
            Pass::Right => bridge(&series[adjacency + 1], &series[adjacency], threshold),
        }
    })
}

/// Reject malformed propagation requests before touching any data.
pub(crate) fn validate_request(n: usize, target: usize, thresholds: usize) -> Result<()> {
    if n < 2 {
        return Err(BridgeError::Configuration(format!(
            "need at least two series to chain, got {n}"
        )));
    }
    if target >= n {
        return Err(BridgeError::Configuration(format!(
            "target index {target} out of range for {n} series"
        )));
    }
    if thresholds != n - 1 {
        return Err(BridgeError::Configuration(format!(
            "expected {} thresholds (one per adjacency), got {thresholds}",
            n - 1
        )));
    }
    Ok(())
}

/// The two-pass engine shared by [`propagate`] and scene-wide chaining.
///
/// `bridge_at(adjacency, pass)` must fit the sensor farther from the target
/// onto the nearer one: for the left pass that is `adjacency -> adjacency+1`,
/// for the right pass `adjacency+1 -> adjacency`.
pub(crate) fn propagate_with<E, F>(n: usize, target: usize, mut bridge_at: F) -> Result<ChainResult<E>>
where
    E: Float + std::fmt::Debug,
    F: FnMut(usize, Pass) -> Result<BridgeResult<E>>,
{
    let mut transforms = vec![Transform::identity(); n];
    let mut left_bridges = Vec::with_capacity(target);
    let mut right_bridges = Vec::with_capacity(n - 1 - target);

    // Left pass: resolve target-1 down to 0, composing each bridge with the
    // already-resolved right-hand neighbour.
    for i in (1..=target).rev() {
        let result = bridge_at(i - 1, Pass::Left).map_err(|source| BridgeError::Propagation {
            left_index: i - 1,
            right_index: i,
            pass: Pass::Left,
            source: Box::new(source),
        })?;
        transforms[i - 1] = transforms[i].compose(&result.transform());
        debug!(
            "left pass resolved series {} -> target {target}: {:?}",
            i - 1,
            transforms[i - 1]
        );
        left_bridges.push(TaggedBridge {
            left_index: i - 1,
            right_index: i,
            pass: Pass::Left,
            result,
        });
    }

    // Right pass: resolve target+1 up to n-1.
    for i in target..n - 1 {
        let result = bridge_at(i, Pass::Right).map_err(|source| BridgeError::Propagation {
            left_index: i,
            right_index: i + 1,
            pass: Pass::Right,
            source: Box::new(source),
        })?;
        transforms[i + 1] = transforms[i].compose(&result.transform());
        debug!(
            "right pass resolved series {} -> target {target}: {:?}",
            i + 1,
            transforms[i + 1]
        );
        right_bridges.push(TaggedBridge {
            left_index: i,
            right_index: i + 1,
            pass: Pass::Right,
            result,
        });
    }

    Ok(ChainResult {
        target,
        transforms,
        left_bridges,
        right_bridges,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{propagate, Pass};
    use crate::error::BridgeError;

    fn three_exact_series() -> Vec<Vec<f64>> {
        // series1 = 2 * series0, series2 = 3 * series1 + 1.
        vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 4.0, 6.0, 8.0],
            vec![7.0, 13.0, 19.0, 25.0],
        ]
    }

    #[test]
    fn the_worked_three_sensor_scenario_is_reproduced() {
        let series = three_exact_series();
        let result = propagate(&series, 2, &[f64::INFINITY, f64::INFINITY]).unwrap();

        assert_relative_eq!(result.transforms[0].slope, 6.0, max_relative = 1e-9);
        assert_relative_eq!(result.transforms[0].intercept, 1.0, max_relative = 1e-9);
        assert_relative_eq!(result.transforms[1].slope, 3.0, max_relative = 1e-9);
        assert_relative_eq!(result.transforms[1].intercept, 1.0, max_relative = 1e-9);
        assert_relative_eq!(result.transforms[2].slope, 1.0);
        assert_relative_eq!(result.transforms[2].intercept, 0.0);

        // Both adjacencies were resolved by the left pass, descending.
        assert!(result.right_bridges.is_empty());
        let tags: Vec<_> = result
            .left_bridges
            .iter()
            .map(|b| (b.left_index, b.right_index))
            .collect();
        assert_eq!(tags, vec![(1, 2), (0, 1)]);

        // The underlying pairwise fits.
        assert_relative_eq!(result.left_bridges[1].result.slope, 2.0, max_relative = 1e-9);
        assert_relative_eq!(result.left_bridges[0].result.slope, 3.0, max_relative = 1e-9);
        assert_relative_eq!(result.left_bridges[0].result.intercept, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn the_target_transform_is_exactly_the_identity() {
        let series = three_exact_series();
        for target in 0..3 {
            let result = propagate(&series, target, &[f64::INFINITY, f64::INFINITY]).unwrap();
            assert_eq!(result.transforms[target].slope, 1.0);
            assert_eq!(result.transforms[target].intercept, 0.0);
        }
    }

    #[test]
    fn an_interior_target_is_reached_from_both_sides() {
        let series = three_exact_series();
        let result = propagate(&series, 1, &[f64::INFINITY, f64::INFINITY]).unwrap();

        // series0 -> series1 directly: slope 2, intercept 0.
        assert_relative_eq!(result.transforms[0].slope, 2.0, max_relative = 1e-9);
        assert_relative_eq!(result.transforms[0].intercept, 0.0, epsilon = 1e-9);
        // series2 -> series1 is the inverse of series1 -> series2.
        assert_relative_eq!(result.transforms[2].slope, 1.0 / 3.0, max_relative = 1e-9);
        assert_relative_eq!(result.transforms[2].intercept, -1.0 / 3.0, max_relative = 1e-9);

        assert_eq!(result.left_bridges.len(), 1);
        assert_eq!(result.right_bridges.len(), 1);
        assert_eq!(result.right_bridges[0].pass, Pass::Right);
        assert_eq!(
            (result.right_bridges[0].left_index, result.right_bridges[0].right_index),
            (1, 2)
        );
    }

    #[test]
    fn opposite_end_targets_produce_mutually_inverse_transforms() {
        let series = three_exact_series();
        let to_last = propagate(&series, 2, &[f64::INFINITY, f64::INFINITY]).unwrap();
        let to_first = propagate(&series, 0, &[f64::INFINITY, f64::INFINITY]).unwrap();

        for i in 0..3 {
            let there = to_last.transforms[i];
            let back = to_first.transforms[2].compose(&there);
            let direct = to_first.transforms[i];
            assert_relative_eq!(back.slope, direct.slope, max_relative = 1e-9);
            assert_relative_eq!(back.intercept, direct.intercept, max_relative = 1e-9, epsilon = 1e-9);
        }
    }

    #[test]
    fn transforms_round_trip_through_their_inverse() {
        let series = three_exact_series();
        let result = propagate(&series, 2, &[f64::INFINITY, f64::INFINITY]).unwrap();

        for (i, transform) in result.transforms.iter().enumerate() {
            let inverse = transform.inverse().unwrap();
            for value in &series[i] {
                let restored = inverse.apply(transform.apply(*value));
                assert_relative_eq!(restored, *value, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn too_few_series_is_a_configuration_error() {
        let err = propagate::<f64>(&[vec![1.0, 2.0]], 0, &[]).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }

    #[test]
    fn an_out_of_range_target_is_a_configuration_error() {
        let series = three_exact_series();
        let err = propagate(&series, 3, &[f64::INFINITY, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }

    #[test]
    fn a_threshold_count_mismatch_is_a_configuration_error() {
        let series = three_exact_series();
        let err = propagate(&series, 0, &[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }

    #[test]
    fn disjoint_presence_fails_before_any_fitting() {
        // Both series are fully populated somewhere, but never at the same
        // position. A zero threshold would also reject everything; the
        // pre-fit existence check must win and name the adjacency.
        let series = vec![
            vec![1.0, f64::NAN, 3.0, f64::NAN],
            vec![f64::NAN, 2.0, f64::NAN, 4.0],
        ];
        let err = propagate(&series, 1, &[0.0]).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::NoAdjacencyOverlap { left_index: 0, right_index: 1 }
        ));
    }

    #[test]
    fn misaligned_adjacent_series_fail_before_any_fitting() {
        let series = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        let err = propagate(&series, 0, &[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, BridgeError::Alignment { left: 3, right: 2 }));
    }

    #[test]
    fn a_failing_bridge_names_its_adjacency_and_pass() {
        // Adjacency (1, 2) overlaps but disagrees everywhere, so a tight
        // threshold filters every pair during the right pass from target 0.
        let series = vec![
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0],
            vec![11.0, 12.0, 13.0],
        ];
        let err = propagate(&series, 0, &[0.5, 0.5]).unwrap_err();
        match err {
            BridgeError::Propagation {
                left_index,
                right_index,
                pass,
                source,
            } => {
                assert_eq!((left_index, right_index), (1, 2));
                assert_eq!(pass, Pass::Right);
                assert!(matches!(*source, BridgeError::NoOverlap { input_pairs: 3 }));
            }
            other => panic!("expected a propagation failure, got {other:?}"),
        }
    }

    #[test]
    fn noisy_chains_still_resolve_every_sensor() {
        use ndarray_rand::rand::{Rng, SeedableRng};
        use rand_isaac::Isaac64Rng;

        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let base: Vec<f64> = (0..100).map(|_| rng.gen_range(0.0..1.0)).collect();

        let slopes = [1.1, 0.9, 1.2];
        let intercepts = [0.02, -0.01, 0.05];
        let mut series = vec![base];
        for (slope, intercept) in slopes.iter().zip(intercepts) {
            let prev = series.last().unwrap();
            let next = prev
                .iter()
                .map(|x| slope * x + intercept + rng.gen_range(-1e-3..1e-3))
                .collect();
            series.push(next);
        }

        let thresholds = vec![f64::INFINITY; 3];
        let result = propagate(&series, 3, &thresholds).unwrap();

        // Sensor 0 mapped through three noisy bridges still lands close to
        // the exact composition.
        let exact_slope: f64 = slopes.iter().product();
        assert_relative_eq!(result.transforms[0].slope, exact_slope, max_relative = 1e-2);
        for bridge in result.left_bridges {
            assert_eq!(bridge.result.retained_pairs, 100);
        }
    }
}
