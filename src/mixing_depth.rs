//! Locate the depth band responsible for most of the mixing, and summarize time series over the
//! analysis window.
use crate::{
    error::{AnalysisError, Result},
    field::Field2D,
    interpolation::first_reaching,
};
use itertools::izip;
use metfor::Meters;
use optional::Optioned;

/// For each time-step, the depth at which the cumulative flux fraction first reaches `fraction`.
///
/// The depth is linearly interpolated between the level that reaches the fraction and the level
/// before it. If the first level already reaches the fraction its depth is used. Time-steps where
/// the fraction is never reached, e.g. a row of `NaN` from a zero total flux, are missing.
///
/// # Examples
///
/// ```rust
/// use keel_mixing::{mixing_depth::mixing_depth, Field2D};
/// use metfor::Meters;
///
/// let frac = Field2D::from_rows(&[[0.25, 0.5, 1.0], [std::f64::NAN; 3]]).unwrap();
/// let zmix = mixing_depth(&frac, &[0.0, 1.0, 2.0], 0.5).unwrap();
///
/// assert_eq!(zmix[0].into_option(), Some(Meters(1.0)));
/// assert!(zmix[1].is_none());
/// ```
pub fn mixing_depth(
    cumulative_fraction: &Field2D,
    depth: &[f64],
    fraction: f64,
) -> Result<Vec<Optioned<Meters>>> {
    if depth.len() != cumulative_fraction.n_depth() {
        return Err(AnalysisError::LengthMismatch {
            expected: cumulative_fraction.n_depth(),
            found: depth.len(),
        });
    }

    Ok(cumulative_fraction
        .rows()
        .map(|row| Optioned::from(first_reaching(depth, row, fraction).map(Meters)))
        .collect())
}

/// Mean of a time series over the time-steps at or after `start`, or the whole series if `start`
/// is `None`.
///
/// `time` and `start` must be in the same units. Non-finite values are not skipped, so a `NaN`
/// anywhere in the window gives a `NaN` mean.
///
/// # Examples
///
/// ```rust
/// use keel_mixing::mixing_depth::time_mean;
///
/// let series = [4.0, 1.0, 2.0, 3.0];
/// let time = [0.0, 1.0, 2.0, 3.0];
///
/// assert_eq!(time_mean(&series, &time, None).unwrap(), 2.5);
/// assert_eq!(time_mean(&series, &time, Some(2.0)).unwrap(), 2.5);
/// assert_eq!(time_mean(&series, &time, Some(1.0)).unwrap(), 2.0);
/// assert!(time_mean(&series, &time, Some(5.0)).is_err());
/// ```
pub fn time_mean(series: &[f64], time: &[f64], start: Option<f64>) -> Result<f64> {
    if series.len() != time.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: time.len(),
            found: series.len(),
        });
    }

    let (sum, count) = izip!(series, time)
        .filter(|&(_, &t)| start.map(|s| t >= s).unwrap_or(true))
        .fold((0.0f64, 0usize), |(sum, count), (v, _)| (sum + *v, count + 1));

    if count == 0 {
        Err(AnalysisError::NotEnoughData)
    } else {
        Ok(sum / count as f64)
    }
}
