//! Data type and methods to store the raw fields of one ice keel simulation.

use crate::{
    error::{AnalysisError, Result},
    field::{Field2D, Profile1D},
};
use itertools::Itertools;
use strum_macros::EnumIter;

/// One of the two symmetric flow directions on either side of the keel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Side {
    /// Upstream of the keel.
    Upstream,
    /// Downstream of the keel.
    Downstream,
}

impl Side {
    /// The suffix used for this side's arrays in the archive, `U` or `D`.
    #[inline]
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Upstream => "U",
            Side::Downstream => "D",
        }
    }

    /// Archive name of the integration length profile.
    #[inline]
    pub fn length_key(self) -> &'static str {
        match self {
            Side::Upstream => "LU",
            Side::Downstream => "LD",
        }
    }

    /// Archive name of the flux integrand.
    #[inline]
    pub fn integrand_key(self) -> &'static str {
        match self {
            Side::Upstream => "phiU",
            Side::Downstream => "phiD",
        }
    }

    /// Archive name of the sorted buoyancy frequency squared gradient.
    #[inline]
    pub fn strat_key(self) -> &'static str {
        match self {
            Side::Upstream => "N2U",
            Side::Downstream => "N2D",
        }
    }
}

/// The raw inputs for one side of the keel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SideData {
    // Integration length at each depth (m)
    length: Profile1D,
    // Flux integrand, dimensionless
    integrand: Field2D,
    // Sorted N^2 gradient (s^-2)
    strat_grad: Field2D,
}

impl SideData {
    /// Bundle the inputs for one side, checking they are mutually consistent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::{Field2D, SideData};
    ///
    /// let phi = Field2D::from_rows(&[[1.0, 1.0, 2.0], [0.0, 2.0, 2.0]]).unwrap();
    /// let n2 = Field2D::from_rows(&[[2.0, 2.0, 2.0], [4.0, 4.0, 4.0]]).unwrap();
    ///
    /// assert!(SideData::new(vec![1.0, 1.0, 1.0], phi.clone(), n2.clone()).is_ok());
    /// assert!(SideData::new(vec![1.0, 1.0], phi, n2).is_err());
    /// ```
    pub fn new(length: Profile1D, integrand: Field2D, strat_grad: Field2D) -> Result<Self> {
        integrand.check_same_shape(&strat_grad)?;

        if length.len() != integrand.n_depth() {
            return Err(AnalysisError::LengthMismatch {
                expected: integrand.n_depth(),
                found: length.len(),
            });
        }

        Ok(SideData {
            length,
            integrand,
            strat_grad,
        })
    }

    /// Integration length profile (m).
    #[inline]
    pub fn length(&self) -> &[f64] {
        &self.length
    }

    /// Raw flux integrand.
    #[inline]
    pub fn integrand(&self) -> &Field2D {
        &self.integrand
    }

    /// Sorted buoyancy frequency squared gradient.
    #[inline]
    pub fn strat_grad(&self) -> &Field2D {
        &self.strat_grad
    }
}

/// All the raw fields of a single simulation.
///
/// Either side may be unavailable, e.g. when an archive group lacks some of its arrays or they do
/// not fit together. Analysis of that side fails with the reason, but the other side is
/// unaffected.
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    // Identifier such as F05H09
    name: String,

    // Coordinates
    time: Vec<f64>,
    depth: Vec<f64>,

    // Err holds why the side could not be loaded
    upstream: Result<SideData>,
    downstream: Result<SideData>,
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation {
            name: String::new(),
            time: vec![],
            depth: vec![],
            upstream: Err(AnalysisError::MissingArray(Side::Upstream.integrand_key())),
            downstream: Err(AnalysisError::MissingArray(Side::Downstream.integrand_key())),
        }
    }
}

impl Simulation {
    /// Create a new, empty simulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::Simulation;
    ///
    /// let sim = Simulation::new("F05H09");
    /// assert_eq!(sim.name(), "F05H09");
    /// assert!(sim.time().is_empty());
    /// ```
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Simulation {
            name: name.into(),
            ..Simulation::default()
        }
    }

    /// Builder method for the time coordinate (s).
    #[inline]
    pub fn with_time(self, time: Vec<f64>) -> Self {
        Simulation { time, ..self }
    }

    /// Builder method for the depth coordinate (m).
    #[inline]
    pub fn with_depth(self, depth: Vec<f64>) -> Self {
        Simulation { depth, ..self }
    }

    /// Builder method for the data on one side. `None` leaves the side missing.
    #[inline]
    pub fn with_side<T>(self, side: Side, data: T) -> Self
    where
        Option<SideData>: From<T>,
    {
        let data: Option<SideData> = Option::from(data);
        self.with_side_result(side, data.ok_or(AnalysisError::MissingArray(side.integrand_key())))
    }

    /// Builder method for a side that may have failed to load. The error is kept and reported
    /// whenever the side is requested.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::{AnalysisError, Side, Simulation};
    ///
    /// let err = AnalysisError::ShapeMismatch { expected: (2, 3), found: (2, 2) };
    /// let sim = Simulation::new("F05H09").with_side_result(Side::Upstream, Err(err));
    ///
    /// assert_eq!(sim.side(Side::Upstream).err(), Some(err));
    /// ```
    #[inline]
    pub fn with_side_result(self, side: Side, data: Result<SideData>) -> Self {
        match side {
            Side::Upstream => Simulation {
                upstream: data,
                ..self
            },
            Side::Downstream => Simulation {
                downstream: data,
                ..self
            },
        }
    }

    /// The simulation identifier.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time coordinate (s).
    #[inline]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Depth coordinate (m).
    #[inline]
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Get the data for one side. Fails with the name of a missing array if the side is absent,
    /// or with the reason it could not be loaded.
    pub fn side(&self, side: Side) -> Result<&SideData> {
        let data = match side {
            Side::Upstream => &self.upstream,
            Side::Downstream => &self.downstream,
        };

        data.as_ref().map_err(|err| *err)
    }

    /// Check the coordinates and one side against each other.
    ///
    /// The time and depth coordinates must match the field shape and the depth must be monotonic.
    pub fn validate_side(&self, side: Side) -> Result<&SideData> {
        let data = self.side(side)?;

        if self.depth.is_empty() {
            return Err(AnalysisError::MissingArray("z"));
        }
        check_monotonic(&self.depth)?;

        let expected = (self.time.len(), self.depth.len());
        if data.integrand().shape() != expected {
            return Err(AnalysisError::ShapeMismatch {
                expected,
                found: data.integrand().shape(),
            });
        }

        Ok(data)
    }
}

/// Error if the values change direction. Repeated values are allowed.
pub(crate) fn check_monotonic(vals: &[f64]) -> Result<()> {
    let (rising, falling) = vals
        .iter()
        .tuple_windows::<(_, _)>()
        .fold((false, false), |(up, down), (v0, v1)| {
            (up || v1 > v0, down || v1 < v0)
        });

    if rising && falling {
        Err(AnalysisError::NonMonotonicDepth)
    } else {
        Ok(())
    }
}
