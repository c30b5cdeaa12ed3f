//! Scene-wide bridging across whole sensor frames.
//!
//! Where [`crate::chain::propagate`] works on series the caller has already
//! aligned, this module starts one step earlier: it intersects two frames'
//! period labels, flattens all pixel/period pairs over that intersection and
//! bridges the flattened data. Chaining then runs the same target-centred
//! two-pass propagation, with each adjacency's pair data coming from frame
//! overlap instead of pre-aligned series.

use num_traits::Float;

use crate::bridge::{bridge, BridgeResult};
use crate::chain::{propagate_with, validate_request, ChainResult, Pass};
use crate::error::BridgeError;
use crate::frame::SensorFrame;
use crate::Result;

/// Bridge sensor frame `a` onto sensor frame `b` over their shared periods.
///
/// # Errors
/// - [`BridgeError::Alignment`] if the frames hold different pixel counts.
/// - [`BridgeError::NoAdjacencyOverlap`] (with indices 0 and 1) if the
///   frames share no period with a doubly present value.
/// - As [`bridge`] for the flattened pair.
pub fn global_bridging<E: Float>(
    a: &SensorFrame<E>,
    b: &SensorFrame<E>,
    threshold: E,
) -> Result<BridgeResult<E>> {
    let (flat_a, flat_b) = a.overlap(b)?;
    if flat_a.is_empty() {
        return Err(BridgeError::NoAdjacencyOverlap {
            left_index: 0,
            right_index: 1,
        });
    }
    bridge(&flat_a, &flat_b, threshold)
}

/// Map every frame onto `frames[target]`'s scale, adjacency by adjacency.
///
/// The propagation semantics are identical to [`crate::chain::propagate`]:
/// overlap existence is checked for every adjacency before any fitting, each
/// pairwise fit runs toward the target, and one failing bridge fails the
/// whole call.
///
/// # Errors
/// As [`crate::chain::propagate`], with adjacency overlap meaning shared
/// period labels carrying doubly present values.
pub fn chain_global<E: Float + std::fmt::Debug>(
    frames: &[SensorFrame<E>],
    target: usize,
    thresholds: &[E],
) -> Result<ChainResult<E>> {
    let n = frames.len();
    validate_request(n, target, thresholds.len())?;

    let mut overlaps = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let pair = frames[i].overlap(&frames[i + 1])?;
        if pair.0.is_empty() {
            return Err(BridgeError::NoAdjacencyOverlap {
                left_index: i,
                right_index: i + 1,
            });
        }
        overlaps.push(pair);
    }

    propagate_with(n, target, |adjacency, pass| {
        let (lower, upper) = &overlaps[adjacency];
        let threshold = thresholds[adjacency];
        match pass {
            Pass::Left => bridge(lower, upper, threshold),
            Pass::Right => bridge(upper, lower, threshold),
        }
    })
}
