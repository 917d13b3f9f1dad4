//! Error types for the keel-mixing crate.
use std::{error::Error, fmt::Display};

/// Error type for the crate.
///
/// Degenerate normalizers (a zero depth-mean stratification, a zero cumulative total, or a zero
/// cross-sectional area) are not errors. They show up as `NaN` or infinite values in the affected
/// time-steps.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnalysisError {
    /// Two fields that must share a (time, depth) shape do not.
    ShapeMismatch {
        /// The (time, depth) shape required.
        expected: (usize, usize),
        /// The (time, depth) shape supplied.
        found: (usize, usize),
    },
    /// A profile or coordinate vector has the wrong length.
    LengthMismatch {
        /// The length required.
        expected: usize,
        /// The length supplied.
        found: usize,
    },
    /// Not enough data available for analysis.
    NotEnoughData,
    /// The depth coordinate changes direction.
    NonMonotonicDepth,
    /// A named array required for the analysis is missing.
    MissingArray(&'static str),
    /// Bad or invalid input.
    InvalidInput,
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use self::AnalysisError::*;

        match self {
            ShapeMismatch { expected, found } => write!(
                f,
                "shape mismatch: expected {} x {}, found {} x {}",
                expected.0, expected.1, found.0, found.1
            ),
            LengthMismatch { expected, found } => write!(
                f,
                "length mismatch: expected {}, found {}",
                expected, found
            ),
            NotEnoughData => write!(f, "not enough data available for analysis"),
            NonMonotonicDepth => write!(f, "depth coordinate is not monotonic"),
            MissingArray(name) => write!(f, "missing array required for analysis: {}", name),
            InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl Error for AnalysisError {}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, AnalysisError>;
