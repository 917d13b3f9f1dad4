//! Reduce (time x depth) fields to time series, weighting each depth by the width of the domain.
//!
//! All integrals use the trapezoid rule over the depth coordinate exactly as supplied, with signed
//! spacing. Nothing is sorted, so the depth coordinate must be ordered the same way as the rows of
//! the field.

use crate::{
    error::{AnalysisError, Result},
    field::{Field2D, TimeSeries1D},
};
use itertools::{izip, Itertools};

/// The depth-averaged flux and diffusivity time series for one side.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthAverages {
    /// Cross sectional area used to normalize the averages.
    pub area: f64,
    /// Depth-averaged flux integrand.
    pub flux: TimeSeries1D,
    /// Depth-averaged diffusivity.
    pub diffusivity: TimeSeries1D,
}

impl DepthAverages {
    /// Average a flux and a diffusivity field over the same cross section.
    pub fn new(
        length: &[f64],
        depth: &[f64],
        flux: &Field2D,
        diffusivity: &Field2D,
    ) -> Result<Self> {
        flux.check_same_shape(diffusivity)?;

        let area = cross_section_area(length, depth)?;

        Ok(DepthAverages {
            area,
            flux: average_with_area(length, depth, flux, area)?,
            diffusivity: average_with_area(length, depth, diffusivity, area)?,
        })
    }
}

/// Integrate the length profile over depth with the trapezoid rule.
///
/// # Examples
///
/// ```rust
/// use keel_mixing::averaging::cross_section_area;
///
/// let area = cross_section_area(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap();
/// assert_eq!(area, 2.0);
///
/// // Uneven spacing
/// let area = cross_section_area(&[2.0, 4.0, 4.0], &[0.0, 0.5, 2.0]).unwrap();
/// assert_eq!(area, 7.5);
/// ```
pub fn cross_section_area(length: &[f64], depth: &[f64]) -> Result<f64> {
    check_length(depth, length.len())?;

    Ok(trapz(length.iter().cloned(), depth))
}

/// Depth average of `fld` weighted by the length profile and normalized by the cross sectional
/// area, one value per time-step.
///
/// A zero area gives `NaN` or infinite values at every time-step, it is not an error.
///
/// # Examples
///
/// ```rust
/// use keel_mixing::{averaging::depth_average, Field2D};
///
/// let phi = Field2D::from_rows(&[[1.0, 1.0, 2.0], [0.0, 2.0, 2.0]]).unwrap();
/// let avg = depth_average(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0], &phi).unwrap();
///
/// assert_eq!(avg, vec![1.25, 1.5]);
/// ```
pub fn depth_average(length: &[f64], depth: &[f64], fld: &Field2D) -> Result<TimeSeries1D> {
    let area = cross_section_area(length, depth)?;
    average_with_area(length, depth, fld, area)
}

fn average_with_area(
    length: &[f64],
    depth: &[f64],
    fld: &Field2D,
    area: f64,
) -> Result<TimeSeries1D> {
    check_length(length, fld.n_depth())?;
    check_length(depth, fld.n_depth())?;

    Ok(fld
        .rows()
        .map(|row| {
            let weighted = izip!(length, row).map(|(l, v)| l * v);
            trapz(weighted, depth) / area
        })
        .collect())
}

// Trapezoid rule integration of ys over xs, with fewer than two points the integral is zero.
fn trapz<I>(ys: I, xs: &[f64]) -> f64
where
    I: Iterator<Item = f64>,
{
    izip!(xs.iter().cloned(), ys)
        // View them as pairs for integration with the trapezoid method
        .tuple_windows::<(_, _)>()
        .fold(0.0, |acc, ((x0, y0), (x1, y1))| acc + (x1 - x0) * (y0 + y1))
        / 2.0
}

fn check_length(vals: &[f64], expected: usize) -> Result<()> {
    if vals.len() != expected {
        Err(AnalysisError::LengthMismatch {
            expected,
            found: vals.len(),
        })
    } else {
        Ok(())
    }
}
