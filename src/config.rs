//! Chain configuration read from a TOML file.

use std::fs;
use std::path::Path;

use num_traits::Float;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::chain::{propagate, ChainResult};
use crate::Result;

/// The outlier threshold used for every adjacency that does not specify one.
/// Matches the conventional tolerance for vegetation-index disagreement.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Parameters of one chain-propagation run.
///
/// ```toml
/// target = 2
/// thresholds = [0.2, 0.15]
/// ```
///
/// `thresholds` may be omitted, in which case `default_threshold` (or
/// [`DEFAULT_THRESHOLD`]) applies to every adjacency. Validation of the
/// target index and threshold count happens inside the propagation call, not
/// at parse time, because both depend on the number of series supplied.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChainConfig<E> {
    pub target: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Vec<E>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_threshold: Option<E>,
}

impl<E: Float + DeserializeOwned + std::fmt::Debug> ChainConfig<E> {
    /// Read a configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The per-adjacency thresholds for a chain of `n` series.
    #[must_use]
    pub fn thresholds_for(&self, n: usize) -> Vec<E> {
        self.thresholds.clone().unwrap_or_else(|| {
            let fallback = self.default_threshold.unwrap_or_else(|| {
                E::from(DEFAULT_THRESHOLD).expect("default threshold representable")
            });
            vec![fallback; n.saturating_sub(1)]
        })
    }

    /// Run chain propagation with this configuration.
    ///
    /// # Errors
    /// As [`propagate`].
    pub fn propagate(&self, series: &[Vec<E>]) -> Result<ChainResult<E>> {
        propagate(series, self.target, &self.thresholds_for(series.len()))
    }
}
