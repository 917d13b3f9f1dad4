#![warn(missing_docs)]
//! Functions and data types for analyzing turbulent mixing in simulations of stratified flow past
//! ice keels.
//!
//! The raw output of each simulation is a flux integrand and a sorted buoyancy frequency squared
//! gradient on a (time x depth) grid, for each side of the keel, along with the width of the
//! domain at each depth. From these this crate derives:
//!
//!  - a mixing efficiency field, the integrand normalized by the depth-mean stratification,
//!  - a cumulative flux fraction field, used to find the depth band doing most of the mixing,
//!  - time series of the flux and diffusivity averaged over the cross section of the domain.
//!
//! # Examples
//!
//! ```rust
//! use keel_mixing::{analyze_simulation, Field2D, KeelConfig, Side, SideData, Simulation};
//!
//! let phi = Field2D::from_rows(&[[1.0, 1.0, 2.0], [0.0, 2.0, 2.0]]).unwrap();
//! let n2 = Field2D::from_rows(&[[2.0, 2.0, 2.0], [4.0, 4.0, 4.0]]).unwrap();
//! let side = SideData::new(vec![1.0, 1.0, 1.0], phi, n2).unwrap();
//!
//! let sim = Simulation::new("F05H09")
//!     .with_time(vec![0.0, 60.0])
//!     .with_depth(vec![0.0, 1.0, 2.0])
//!     .with_side(Side::Upstream, side.clone())
//!     .with_side(Side::Downstream, side);
//!
//! let anal = analyze_simulation(&sim, &KeelConfig::default()).unwrap();
//! assert_eq!(anal.side(Side::Upstream).averages().flux, vec![1.25, 1.5]);
//! ```

//
// API
//
pub use crate::{
    analysis::{analyze_batch, analyze_side, analyze_simulation, KeelAnalysis, SideAnalysis},
    archive::{Archive, ArchiveError},
    averaging::{cross_section_area, depth_average, DepthAverages},
    config::KeelConfig,
    diagnostics::{derive, Diagnostics},
    error::{AnalysisError, Result},
    field::{Field2D, Profile1D, TimeSeries1D},
    mixing_depth::{mixing_depth, time_mean},
    simulation::{Side, SideData, Simulation},
};

pub mod averaging;
pub mod diagnostics;
pub mod mixing_depth;

mod analysis;
mod archive;
mod config;
mod error;
mod field;
mod interpolation;
#[cfg(any(feature = "netcdf", test))]
mod layout;
mod simulation;

#[cfg(test)]
mod test_data;
