//! The `gridterp` crate provides fast trilinear interpolation of
//! multi-component fields sampled on uniform 3D grids.

pub mod error;
pub mod field;
pub mod geometry;
pub mod grid;
pub mod interpolation;
pub mod num;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{AxisDefect, InterpError, Result};
pub use field::{FieldSource, PackedField};
pub use geometry::{Dim3, Idx3, In3D, Point3, Vec3};
pub use grid::GridAxes;
pub use interpolation::{trilinear::FieldInterpolator, CellLocation, DomainPolicy, Interpolator3};
