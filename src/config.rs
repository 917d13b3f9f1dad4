//! Scales and constants used to non-dimensionalize and summarize an analysis.

use crate::error::{AnalysisError, Result};
use metfor::{Length, Meters, Quantity};

/// Configuration shared by every simulation in an analysis run.
///
/// The defaults are those of the ice keel experiments: an 8 m mixed layer and a total buoyancy
/// difference of 0.015 m s<sup>-2</sup> across it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeelConfig {
    mixed_layer_depth: Meters,
    // Total buoyancy difference in m s^-2
    buoyancy_jump: f64,
    molecular_diffusivity: f64,
    // In units of the time scale
    analysis_start: f64,
    mixing_fraction: f64,
}

impl Default for KeelConfig {
    fn default() -> Self {
        KeelConfig {
            mixed_layer_depth: Meters(8.0),
            buoyancy_jump: 0.015,
            molecular_diffusivity: 2.0e-3,
            analysis_start: 79.0,
            mixing_fraction: 0.9,
        }
    }
}

impl KeelConfig {
    /// Create a configuration with the default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for the mixed layer depth, the length scale.
    #[inline]
    pub fn with_mixed_layer_depth<L>(self, depth: L) -> Self
    where
        L: Length,
        Meters: From<L>,
    {
        KeelConfig {
            mixed_layer_depth: Meters::from(depth),
            ..self
        }
    }

    /// Builder method for the total buoyancy difference (m s<sup>-2</sup>).
    #[inline]
    pub fn with_buoyancy_jump(self, buoyancy_jump: f64) -> Self {
        KeelConfig {
            buoyancy_jump,
            ..self
        }
    }

    /// Builder method for the molecular diffusivity diffusivities are scaled by.
    #[inline]
    pub fn with_molecular_diffusivity(self, molecular_diffusivity: f64) -> Self {
        KeelConfig {
            molecular_diffusivity,
            ..self
        }
    }

    /// Builder method for the start of the analysis window, in units of the time scale.
    #[inline]
    pub fn with_analysis_start(self, analysis_start: f64) -> Self {
        KeelConfig {
            analysis_start,
            ..self
        }
    }

    /// Builder method for the cumulative flux fraction that defines the mixing depth.
    #[inline]
    pub fn with_mixing_fraction(self, mixing_fraction: f64) -> Self {
        KeelConfig {
            mixing_fraction,
            ..self
        }
    }

    /// The length scale z<sub>0</sub>.
    #[inline]
    pub fn mixed_layer_depth(&self) -> Meters {
        self.mixed_layer_depth
    }

    /// Total buoyancy difference (m s<sup>-2</sup>).
    #[inline]
    pub fn buoyancy_jump(&self) -> f64 {
        self.buoyancy_jump
    }

    /// Molecular diffusivity.
    #[inline]
    pub fn molecular_diffusivity(&self) -> f64 {
        self.molecular_diffusivity
    }

    /// Start of the analysis window in units of the time scale.
    #[inline]
    pub fn analysis_start(&self) -> f64 {
        self.analysis_start
    }

    /// Cumulative flux fraction that defines the mixing depth.
    #[inline]
    pub fn mixing_fraction(&self) -> f64 {
        self.mixing_fraction
    }

    /// The time scale t<sub>0</sub> = (z<sub>0</sub> / &Delta;B)<sup>1/2</sup> in seconds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::KeelConfig;
    /// use metfor::Meters;
    ///
    /// let cfg = KeelConfig::new().with_mixed_layer_depth(Meters(4.0)).with_buoyancy_jump(1.0);
    /// assert_eq!(cfg.time_scale(), 2.0);
    /// ```
    #[inline]
    pub fn time_scale(&self) -> f64 {
        (self.mixed_layer_depth.unpack() / self.buoyancy_jump).sqrt()
    }

    /// Time in units of the time scale.
    pub fn scaled_time(&self, time: &[f64]) -> Vec<f64> {
        let t0 = self.time_scale();
        time.iter().map(|t| t / t0).collect()
    }

    /// Depth in units of the mixed layer depth.
    pub fn scaled_depth(&self, depth: &[f64]) -> Vec<f64> {
        let z0 = self.mixed_layer_depth.unpack();
        depth.iter().map(|z| z / z0).collect()
    }

    /// Check the values are usable.
    ///
    /// The scales must be positive and finite and the mixing fraction must be in (0, 1].
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.mixed_layer_depth.unpack())
            || !positive(self.buoyancy_jump)
            || !positive(self.molecular_diffusivity)
            || !self.analysis_start.is_finite()
            || !positive(self.mixing_fraction)
            || self.mixing_fraction > 1.0
        {
            Err(AnalysisError::InvalidInput)
        } else {
            Ok(())
        }
    }
}
