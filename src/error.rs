//! Error types and error reporting macros.

use crate::geometry::{Dim3, In3D};
use thiserror::Error;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, InterpError>;

/// Ways in which a coordinate axis can be unusable for a uniform grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisDefect {
    /// Fewer than two coordinates were given.
    TooFewPoints { len: usize },
    /// The coordinate at `index` is not larger than its predecessor (or is NaN).
    NotStrictlyIncreasing { index: usize },
    /// The first and last coordinate coincide.
    ZeroSpan,
}

impl std::fmt::Display for AxisDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints { len } => {
                write!(f, "has {} coordinates but at least 2 are required", len)
            }
            Self::NotStrictlyIncreasing { index } => {
                write!(f, "is not strictly increasing at index {}", index)
            }
            Self::ZeroSpan => write!(f, "has zero span"),
        }
    }
}

/// Errors produced when constructing grids and interpolators, or when
/// evaluating in strict domain mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    #[error("Invalid grid: {dim}-axis {defect}")]
    InvalidGrid { dim: Dim3, defect: AxisDefect },

    #[error("Shape mismatch: component {component} has shape {found} but the grid has shape {expected}")]
    ShapeMismatch {
        component: usize,
        expected: In3D<usize>,
        found: In3D<usize>,
    },

    #[error("Empty field: at least one component is required")]
    EmptyField,

    #[error("Out of domain: {dim}-coordinate {coord} is outside [{lower}, {upper}]")]
    OutOfDomain {
        dim: Dim3,
        coord: f64,
        lower: f64,
        upper: f64,
    },

    #[error("Invalid tolerance: {tolerance} is not a finite non-negative cell fraction")]
    InvalidTolerance { tolerance: f64 },
}

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1)
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*)
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}
