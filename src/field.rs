//! Dense array types shared by the whole analysis.
//!
//! Fields are indexed by (time-step, depth-level) and stored row major, so a row holds every
//! depth level for one time-step. Once built a field is never modified, every stage of the
//! analysis produces a new one.

use crate::error::{AnalysisError, Result};
use itertools::izip;

/// A vector indexed by depth level, e.g. the integration length of the domain at each depth.
pub type Profile1D = Vec<f64>;

/// A vector indexed by time-step.
pub type TimeSeries1D = Vec<f64>;

/// A dense (time x depth) field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field2D {
    n_time: usize,
    n_depth: usize,
    values: Vec<f64>,
}

impl Field2D {
    /// Create a field from row major values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::Field2D;
    ///
    /// let fld = Field2D::new(2, 3, vec![1.0, 1.0, 2.0, 0.0, 2.0, 2.0]).unwrap();
    /// assert_eq!(fld.shape(), (2, 3));
    /// assert_eq!(fld.row(1), &[0.0, 2.0, 2.0]);
    ///
    /// assert!(Field2D::new(2, 3, vec![1.0, 2.0]).is_err());
    /// ```
    pub fn new(n_time: usize, n_depth: usize, values: Vec<f64>) -> Result<Self> {
        let expected = n_time
            .checked_mul(n_depth)
            .ok_or(AnalysisError::LengthMismatch {
                expected: std::usize::MAX,
                found: values.len(),
            })?;
        if values.len() != expected {
            return Err(AnalysisError::LengthMismatch {
                expected,
                found: values.len(),
            });
        }

        Ok(Field2D {
            n_time,
            n_depth,
            values,
        })
    }

    /// Create a field from a list of rows, one per time-step. Every row must have the same length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::Field2D;
    ///
    /// let fld = Field2D::from_rows(&[[2.0, 2.0, 2.0], [4.0, 4.0, 4.0]]).unwrap();
    /// assert_eq!(fld.shape(), (2, 3));
    ///
    /// let ragged = Field2D::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    /// assert!(ragged.is_err());
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n_time = rows.len();
        let n_depth = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);

        let mut values = Vec::with_capacity(n_time * n_depth);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_depth {
                return Err(AnalysisError::ShapeMismatch {
                    expected: (n_time, n_depth),
                    found: (n_time, row.len()),
                });
            }
            values.extend_from_slice(row);
        }

        Ok(Field2D {
            n_time,
            n_depth,
            values,
        })
    }

    /// Number of time-steps.
    #[inline]
    pub fn n_time(&self) -> usize {
        self.n_time
    }

    /// Number of depth levels.
    #[inline]
    pub fn n_depth(&self) -> usize {
        self.n_depth
    }

    /// The (time, depth) shape.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_time, self.n_depth)
    }

    /// Get a single value, `None` if out of bounds.
    #[inline]
    pub fn get(&self, t: usize, z: usize) -> Option<f64> {
        if t < self.n_time && z < self.n_depth {
            Some(self.values[t * self.n_depth + z])
        } else {
            None
        }
    }

    /// All depth levels at time-step `t`.
    ///
    /// # Panics
    ///
    /// If `t` is out of bounds.
    #[inline]
    pub fn row(&self, t: usize) -> &[f64] {
        assert!(t < self.n_time, "time index out of bounds");
        &self.values[t * self.n_depth..(t + 1) * self.n_depth]
    }

    /// Iterate over the rows in time order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        let n_depth = self.n_depth;
        (0..self.n_time).map(move |t| &self.values[t * n_depth..(t + 1) * n_depth])
    }

    /// The raw row major values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Error if `other` does not have the same shape as `self`.
    pub fn check_same_shape(&self, other: &Field2D) -> Result<()> {
        if self.shape() != other.shape() {
            Err(AnalysisError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            })
        } else {
            Ok(())
        }
    }

    /// Build a new field of the same shape, filling each output row from the matching input row.
    pub(crate) fn map_rows<F>(&self, mut row_fn: F) -> Field2D
    where
        F: FnMut(usize, &[f64], &mut [f64]),
    {
        let mut values = vec![0.0; self.values.len()];

        if self.n_depth > 0 {
            for (t, src, dst) in izip!(
                0usize..,
                self.values.chunks(self.n_depth),
                values.chunks_mut(self.n_depth)
            ) {
                row_fn(t, src, dst);
            }
        }

        Field2D {
            n_time: self.n_time,
            n_depth: self.n_depth,
            values,
        }
    }

    /// Apply a function to every value, keeping the shape.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Field2D {
        Field2D {
            n_time: self.n_time,
            n_depth: self.n_depth,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// The largest finite value in the field, `None` if there are none.
    pub fn max_finite(&self) -> Option<f64> {
        self.values
            .iter()
            .cloned()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}
