//! The unified error type for bridging and chain propagation.
//!
//! Every fallible operation in the crate surfaces one of these kinds to its
//! immediate caller; nothing is swallowed and no partial result is ever
//! returned alongside an error.

use thiserror::Error;

use crate::chain::Pass;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// Two series handed to a pairwise operation have different lengths.
    /// Alignment is the caller's contract, so this is not recoverable by
    /// retrying with a different threshold.
    #[error("aligned series have mismatched lengths: {left} vs {right}")]
    Alignment { left: usize, right: usize },

    /// An adjacency has no position at which both series hold a present
    /// (non-NaN) value. Detected before any filtering or fitting is
    /// attempted.
    #[error("series {left_index} and {right_index} share no positions where both values are present")]
    NoAdjacencyOverlap { left_index: usize, right_index: usize },

    /// Outlier filtering eliminated every pair at the given threshold.
    /// Carries the pre-filter pair count for diagnostics.
    #[error("outlier filtering removed all {input_pairs} pairs at the requested threshold")]
    NoOverlap { input_pairs: usize },

    /// Fewer than two points were available to fit a line.
    #[error("cannot fit a line through {points} point(s); at least 2 are required")]
    InsufficientData { points: usize },

    /// A pairwise bridge inside a chain propagation failed. Propagation is
    /// all-or-nothing, so the whole call fails naming the first offending
    /// adjacency and the pass that reached it.
    #[error("chain propagation failed at adjacency ({left_index}, {right_index}) during the {pass:?} pass: {source}")]
    Propagation {
        left_index: usize,
        right_index: usize,
        pass: Pass,
        source: Box<BridgeError>,
    },

    /// The propagation request itself is malformed: fewer than two series,
    /// a target index out of range, or a threshold list whose length is not
    /// one less than the number of series.
    #[error("invalid chain configuration: {0}")]
    Configuration(String),

    /// An error originating from the I/O subsystem while reading frame or
    /// configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed CSV record in a sensor frame file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A malformed TOML chain-configuration file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
