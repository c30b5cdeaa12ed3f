//! Bridge and chain multi-sensor time-series onto a common scale.
//!
//! Several sensors measure the same physical quantity (a vegetation index,
//! say) on overlapping but non-identical value ranges. This crate fits a
//! linear calibration between each adjacent pair of sensors and composes
//! those pairwise fits outward from a chosen reference sensor, so that every
//! sensor ends up with a single closed-form `y = slope * x + intercept` map
//! onto the reference scale, including sensors that never overlap the
//! reference directly.
//!
//! Missing samples are `NaN`. Series handed to a pairwise operation must be
//! positionally aligned by the caller; producing that alignment from tabular
//! sources is out of scope, although [`frame::SensorFrame`] covers the common
//! scene-wide case of period-labelled columns.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod bridge;
pub mod chain;
pub mod config;
pub mod error;
pub mod filter;
pub mod fit;
pub mod frame;
pub mod global;
pub mod seasonal;
pub mod transform;

pub use bridge::{bridge, bridge_with, BridgeResult, FitStrategy};
pub use chain::{propagate, ChainResult, Pass, TaggedBridge};
pub use error::BridgeError;
pub use transform::Transform;

pub type Result<T> = ::std::result::Result<T, BridgeError>;
