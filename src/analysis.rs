//! Data type and functions for building a complete analysis of one or more simulations.
//!
//! The analysis of each side only depends on that side's data, and each simulation only depends
//! on its own data, so a failure in one never affects the others.

use crate::{
    averaging::DepthAverages,
    config::KeelConfig,
    diagnostics::{derive, Diagnostics},
    error::Result,
    field::Field2D,
    mixing_depth::{mixing_depth, time_mean},
    simulation::{Side, Simulation},
};
use metfor::Meters;
use optional::Optioned;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Analysis of one side of a keel.
#[derive(Debug, Clone)]
pub struct SideAnalysis {
    side: Side,

    diagnostics: Diagnostics,
    // Normalized efficiency over the molecular diffusivity
    diffusivity: Field2D,

    averages: DepthAverages,

    mixing_depth: Vec<Optioned<Meters>>,
}

impl SideAnalysis {
    /// Which side this is.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// The derived efficiency and cumulative fraction fields.
    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The diffusivity field, in units of the molecular diffusivity.
    #[inline]
    pub fn diffusivity(&self) -> &Field2D {
        &self.diffusivity
    }

    /// The depth-averaged flux and diffusivity series.
    #[inline]
    pub fn averages(&self) -> &DepthAverages {
        &self.averages
    }

    /// Depth at which the cumulative flux fraction reaches the configured fraction, per time-step.
    #[inline]
    pub fn mixing_depth(&self) -> &[Optioned<Meters>] {
        &self.mixing_depth
    }
}

/// Analyze a single side of a simulation.
pub fn analyze_side(sim: &Simulation, side: Side, config: &KeelConfig) -> Result<SideAnalysis> {
    config.validate()?;
    let data = sim.validate_side(side)?;

    let diagnostics = derive(data.integrand(), data.strat_grad())?;

    let mu = config.molecular_diffusivity();
    let diffusivity = diagnostics.normalized_efficiency().map(|k| k / mu);

    let averages = DepthAverages::new(data.length(), sim.depth(), data.integrand(), &diffusivity)?;

    let mixing_depth = mixing_depth(
        diagnostics.cumulative_fraction(),
        sim.depth(),
        config.mixing_fraction(),
    )?;

    Ok(SideAnalysis {
        side,
        diagnostics,
        diffusivity,
        averages,
        mixing_depth,
    })
}

/// Convenient package for the analysis of both sides of a simulation.
#[derive(Debug, Clone)]
pub struct KeelAnalysis {
    name: String,
    config: KeelConfig,

    // Coordinates, in units of the time scale and mixed layer depth
    scaled_time: Vec<f64>,
    scaled_depth: Vec<f64>,

    upstream: SideAnalysis,
    downstream: SideAnalysis,
}

impl KeelAnalysis {
    /// The simulation identifier.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration used to build this analysis.
    #[inline]
    pub fn config(&self) -> &KeelConfig {
        &self.config
    }

    /// Time in units of the time scale.
    #[inline]
    pub fn scaled_time(&self) -> &[f64] {
        &self.scaled_time
    }

    /// Depth in units of the mixed layer depth.
    #[inline]
    pub fn scaled_depth(&self) -> &[f64] {
        &self.scaled_depth
    }

    /// Get the analysis for one side.
    #[inline]
    pub fn side(&self, side: Side) -> &SideAnalysis {
        match side {
            Side::Upstream => &self.upstream,
            Side::Downstream => &self.downstream,
        }
    }

    /// Time mean of a side's depth-averaged diffusivity.
    ///
    /// If `from_start` is true only time-steps after the configured analysis start are used.
    pub fn mean_diffusivity(&self, side: Side, from_start: bool) -> Result<f64> {
        let start = if from_start {
            Some(self.config.analysis_start())
        } else {
            None
        };

        time_mean(
            &self.side(side).averages().diffusivity,
            &self.scaled_time,
            start,
        )
    }

    /// The largest finite diffusivity on either side, useful for setting a common color scale.
    pub fn max_diffusivity(&self) -> Option<f64> {
        Side::iter()
            .filter_map(|side| self.side(side).diffusivity().max_finite())
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}

/// Analyze both sides of a simulation.
pub fn analyze_simulation(sim: &Simulation, config: &KeelConfig) -> Result<KeelAnalysis> {
    let upstream = analyze_side(sim, Side::Upstream, config)?;
    let downstream = analyze_side(sim, Side::Downstream, config)?;

    Ok(KeelAnalysis {
        name: sim.name().to_owned(),
        config: *config,
        scaled_time: config.scaled_time(sim.time()),
        scaled_depth: config.scaled_depth(sim.depth()),
        upstream,
        downstream,
    })
}

/// Analyze many simulations, one result per simulation in the same order.
///
/// A simulation that cannot be analyzed is reported in its own slot and the rest carry on.
pub fn analyze_batch<'a, I>(sims: I, config: &KeelConfig) -> Vec<(String, Result<KeelAnalysis>)>
where
    I: IntoIterator<Item = &'a Simulation>,
{
    sims.into_iter()
        .map(|sim| {
            let result = analyze_simulation(sim, config);
            match result {
                Ok(_) => debug!(simulation = sim.name(), "analyzed"),
                Err(ref err) => warn!(simulation = sim.name(), error = %err, "skipping simulation"),
            }
            (sim.name().to_owned(), result)
        })
        .collect()
}
