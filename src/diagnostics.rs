//! Derive the mixing efficiency and cumulative flux fraction fields from the raw flux integrand
//! and stratification of one side of a keel.
//!
//! Every time-step is handled independently of every other time-step. A time-step with a zero
//! depth-mean stratification, or a zero depth-integrated flux, does not cause an error. The
//! affected row of the output is filled with whatever IEEE division produces, `NaN` or an
//! infinity, and every other row is unaffected.

use crate::{
    error::{AnalysisError, Result},
    field::{Field2D, TimeSeries1D},
};

/// The fields derived from one side's integrand and stratification.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostics {
    depth_mean_n2: TimeSeries1D,
    cumulative_sum: Field2D,
    normalized_efficiency: Field2D,
    cumulative_fraction: Field2D,
}

impl Diagnostics {
    /// The depth-mean of the stratification gradient at each time-step.
    #[inline]
    pub fn depth_mean_n2(&self) -> &[f64] {
        &self.depth_mean_n2
    }

    /// Running sum of the integrand along the depth axis.
    #[inline]
    pub fn cumulative_sum(&self) -> &Field2D {
        &self.cumulative_sum
    }

    /// The integrand divided by the depth-mean stratification of its time-step.
    #[inline]
    pub fn normalized_efficiency(&self) -> &Field2D {
        &self.normalized_efficiency
    }

    /// Fraction of the full-depth sum of the integrand reached at each depth level.
    #[inline]
    pub fn cumulative_fraction(&self) -> &Field2D {
        &self.cumulative_fraction
    }
}

/// Derive the normalized efficiency and cumulative fraction fields.
///
/// `integrand` and `strat_grad` must have the same shape with at least one depth level. The depth
/// ordering is taken as stored, index 0 is where the cumulative sum starts.
///
/// # Examples
///
/// ```rust
/// use keel_mixing::{diagnostics::derive, Field2D};
///
/// let phi = Field2D::from_rows(&[[1.0, 1.0, 2.0], [0.0, 2.0, 2.0]]).unwrap();
/// let n2 = Field2D::from_rows(&[[2.0, 2.0, 2.0], [4.0, 4.0, 4.0]]).unwrap();
///
/// let diag = derive(&phi, &n2).unwrap();
/// assert_eq!(diag.depth_mean_n2(), &[2.0, 4.0]);
/// assert_eq!(diag.normalized_efficiency().row(0), &[0.5, 0.5, 1.0]);
/// assert_eq!(diag.cumulative_fraction().row(1), &[0.0, 0.5, 1.0]);
/// ```
pub fn derive(integrand: &Field2D, strat_grad: &Field2D) -> Result<Diagnostics> {
    integrand.check_same_shape(strat_grad)?;
    if integrand.n_depth() == 0 {
        return Err(AnalysisError::NotEnoughData);
    }

    let depth_mean_n2 = depth_mean(strat_grad);
    let normalized_efficiency = divide_rows(integrand, &depth_mean_n2);

    let cumulative_sum = cumulative_sum(integrand);
    let totals: Vec<f64> = cumulative_sum
        .rows()
        .map(|row| row[row.len() - 1])
        .collect();
    let cumulative_fraction = divide_rows(&cumulative_sum, &totals);

    Ok(Diagnostics {
        depth_mean_n2,
        cumulative_sum,
        normalized_efficiency,
        cumulative_fraction,
    })
}

/// Arithmetic mean over depth for each time-step.
///
/// A field with no depth levels gives `NaN` at every time-step.
pub fn depth_mean(fld: &Field2D) -> TimeSeries1D {
    let n_depth = fld.n_depth() as f64;
    fld.rows()
        .map(|row| row.iter().sum::<f64>() / n_depth)
        .collect()
}

/// Running sum along the depth axis, starting from depth index 0.
///
/// # Examples
///
/// ```rust
/// use keel_mixing::{diagnostics::cumulative_sum, Field2D};
///
/// let phi = Field2D::from_rows(&[[1.0, 1.0, 2.0], [0.0, 2.0, 2.0]]).unwrap();
/// let cum = cumulative_sum(&phi);
///
/// assert_eq!(cum.row(0), &[1.0, 2.0, 4.0]);
/// assert_eq!(cum.row(1), &[0.0, 2.0, 4.0]);
/// ```
pub fn cumulative_sum(fld: &Field2D) -> Field2D {
    fld.map_rows(|_, src, dst| {
        let mut acc = 0.0;
        for (d, s) in dst.iter_mut().zip(src) {
            acc += s;
            *d = acc;
        }
    })
}

// Divide every value in row t by divisors[t], without building the replicated divisor field.
fn divide_rows(fld: &Field2D, divisors: &[f64]) -> Field2D {
    debug_assert_eq!(fld.n_time(), divisors.len());

    fld.map_rows(|t, src, dst| {
        let divisor = divisors[t];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s / divisor;
        }
    })
}
