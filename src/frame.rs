//! Scene-wide data for one sensor: pixels by labelled observation periods.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use num_traits::Float;
use serde::de::DeserializeOwned;

use crate::error::BridgeError;
use crate::Result;

/// One sensor's scene as a matrix of rows (pixels) by period columns, each
/// column labelled with its observation period (`"2001-04"` and the like).
///
/// Frames from different sensors rarely share every period; bridging works
/// on the intersection of their labels via [`SensorFrame::overlap`].
#[derive(Clone, Debug)]
pub struct SensorFrame<E> {
    labels: Vec<String>,
    values: Array2<E>,
}

impl<E: Float> SensorFrame<E> {
    /// Build a frame from period labels and a (pixels x periods) matrix.
    ///
    /// # Errors
    /// [`BridgeError::Alignment`] if the label count does not match the
    /// number of columns.
    pub fn new(labels: Vec<String>, values: Array2<E>) -> Result<Self> {
        if labels.len() != values.ncols() {
            return Err(BridgeError::Alignment {
                left: labels.len(),
                right: values.ncols(),
            });
        }
        Ok(Self { labels, values })
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn n_pixels(&self) -> usize {
        self.values.nrows()
    }

    /// Flatten the two frames over their shared period labels into one
    /// positionally aligned pair of series.
    ///
    /// Shared labels are visited in sorted order, pixels row by row within
    /// each frame; a pair is dropped when either value is missing. The
    /// result may be empty when no label is shared or every shared value is
    /// missing; the caller decides whether that is an error.
    ///
    /// # Errors
    /// [`BridgeError::Alignment`] if the two frames hold different numbers
    /// of pixel rows.
    pub fn overlap(&self, other: &Self) -> Result<(Vec<E>, Vec<E>)> {
        if self.n_pixels() != other.n_pixels() {
            return Err(BridgeError::Alignment {
                left: self.n_pixels(),
                right: other.n_pixels(),
            });
        }

        let mut shared: Vec<(usize, usize)> = self
            .labels
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                other
                    .labels
                    .iter()
                    .position(|l| l == label)
                    .map(|j| (i, j))
            })
            .collect();
        shared.sort_by(|(a, _), (b, _)| self.labels[*a].cmp(&self.labels[*b]));

        let mut flat_self = Vec::new();
        let mut flat_other = Vec::new();
        for row in 0..self.n_pixels() {
            for (i, j) in &shared {
                let a = self.values[[row, *i]];
                let b = other.values[[row, *j]];
                if !a.is_nan() && !b.is_nan() {
                    flat_self.push(a);
                    flat_other.push(b);
                }
            }
        }

        Ok((flat_self, flat_other))
    }
}

impl<E: Float + DeserializeOwned> SensorFrame<E> {
    /// Read a frame from a headed CSV file: the header row carries the
    /// period labels and every record is one pixel's values. An empty field
    /// is a missing sample and becomes NaN.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a record cannot be
    /// parsed, or a record's width differs from the header's.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = fs::read(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(&file[..]);

        let labels: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

        let mut data = Vec::new();
        let mut rows = 0;
        for result in rdr.deserialize() {
            let record: Vec<Option<E>> = result?;
            if record.len() != labels.len() {
                return Err(BridgeError::Alignment {
                    left: labels.len(),
                    right: record.len(),
                });
            }
            data.extend(record.into_iter().map(|v| v.unwrap_or_else(E::nan)));
            rows += 1;
        }

        let values = Array2::from_shape_vec((rows, labels.len()), data)
            .expect("row-major data matches the validated shape");
        Self::new(labels, values)
    }
}
