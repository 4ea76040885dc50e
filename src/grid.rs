//! Uniform rectilinear grids.

use crate::{
    error::{AxisDefect, InterpError, Result},
    geometry::{
        Coords3,
        Dim3::{self, X, Y, Z},
        Idx3, In3D, Point3, Vec3,
    },
    num::{self, BFloat},
};
use tracing::debug;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// The three coordinate axes of a uniform 3D grid.
///
/// Each axis holds at least two strictly increasing node coordinates.
/// The inverse node spacing along each axis is computed once from the
/// first and last coordinate, so the nodes are assumed to be evenly
/// spaced. This is not verified: axes with uneven spacing are accepted
/// and will make interpolation silently wrong.
///
/// The axes never change after construction and are typically shared
/// between interpolators through an `Arc`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct GridAxes<F: BFloat> {
    coords: Coords3<F>,
    shape: In3D<usize>,
    lower_bounds: Vec3<F>,
    upper_bounds: Vec3<F>,
    inverse_spacings: Vec3<F>,
}

impl<F: BFloat> GridAxes<F> {
    /// Creates new grid axes from the node coordinates along x, y and z.
    ///
    /// # Errors
    ///
    /// Returns `InterpError::InvalidGrid` for the first axis (in x, y, z order)
    /// that has fewer than two coordinates, has coinciding end points or is
    /// not strictly increasing.
    pub fn new(x: Vec<F>, y: Vec<F>, z: Vec<F>) -> Result<Self> {
        Self::from_coords(In3D::new(x, y, z))
    }

    /// Creates new grid axes from a set of node coordinates.
    pub fn from_coords(coords: Coords3<F>) -> Result<Self> {
        for dim in Dim3::slice() {
            verify_axis(&coords[dim]).map_err(|defect| InterpError::InvalidGrid { dim, defect })?;
        }

        let shape = In3D::with_each_component(|dim| coords[dim].len());
        let lower_bounds = Vec3::with_each_component(|dim| coords[dim][0]);
        let upper_bounds = Vec3::with_each_component(|dim| coords[dim][shape[dim] - 1]);
        let inverse_spacings = Vec3::with_each_component(|dim| {
            num::from_usize::<F>(shape[dim] - 1) / (upper_bounds[dim] - lower_bounds[dim])
        });

        debug!(
            "Created grid axes with shape {} spanning {} to {}",
            shape, lower_bounds, upper_bounds
        );

        Ok(Self {
            coords,
            shape,
            lower_bounds,
            upper_bounds,
            inverse_spacings,
        })
    }

    /// Creates new evenly spaced grid axes with the given number of nodes
    /// between the given lower and upper bounds (both inclusive).
    pub fn from_bounds(
        shape: In3D<usize>,
        lower_bounds: Vec3<F>,
        upper_bounds: Vec3<F>,
    ) -> Result<Self> {
        Self::from_coords(In3D::with_each_component(|dim| {
            uniform_coords(shape[dim], lower_bounds[dim], upper_bounds[dim])
        }))
    }

    /// Returns the number of nodes along each axis.
    pub fn shape(&self) -> &In3D<usize> {
        &self.shape
    }

    /// Returns a reference to the node coordinates of all three axes.
    pub fn coords(&self) -> &Coords3<F> {
        &self.coords
    }

    /// Returns the node coordinates along the given dimension.
    pub fn axis(&self, dim: Dim3) -> &[F] {
        &self.coords[dim]
    }

    /// Returns the first node coordinate along each axis.
    pub fn lower_bounds(&self) -> &Vec3<F> {
        &self.lower_bounds
    }

    /// Returns the last node coordinate along each axis.
    pub fn upper_bounds(&self) -> &Vec3<F> {
        &self.upper_bounds
    }

    /// Returns the distance between the first and last node along each axis.
    pub fn extents(&self) -> Vec3<F> {
        Vec3::with_each_component(|dim| self.upper_bounds[dim] - self.lower_bounds[dim])
    }

    /// Returns `(n - 1)/(last - first)` for each axis.
    pub fn inverse_spacings(&self) -> &Vec3<F> {
        &self.inverse_spacings
    }

    /// Returns the node spacing along each axis.
    pub fn spacings(&self) -> Vec3<F> {
        Vec3::with_each_component(|dim| self.inverse_spacings[dim].recip())
    }

    /// Returns the total number of grid nodes.
    pub fn n_nodes(&self) -> usize {
        self.shape[X] * self.shape[Y] * self.shape[Z]
    }

    /// Returns the position of the node with the given indices.
    ///
    /// # Panics
    ///
    /// If any of the indices is out of bounds.
    pub fn node(&self, indices: &Idx3<usize>) -> Point3<F> {
        Point3::with_each_component(|dim| self.coords[dim][indices[dim]])
    }

    /// Whether the given point lies inside the closed box spanned by the axes.
    pub fn contains(&self, point: &Point3<F>) -> bool {
        Dim3::slice().iter().all(|&dim| {
            point[dim] >= self.lower_bounds[dim] && point[dim] <= self.upper_bounds[dim]
        })
    }
}

fn verify_axis<F: BFloat>(coords: &[F]) -> std::result::Result<(), AxisDefect> {
    let len = coords.len();
    if len < 2 {
        return Err(AxisDefect::TooFewPoints { len });
    }
    if coords[0] == coords[len - 1] {
        return Err(AxisDefect::ZeroSpan);
    }
    // Written so that NaN fails the comparison
    match coords
        .windows(2)
        .position(|pair| !(pair[0] < pair[1]))
    {
        Some(position) => Err(AxisDefect::NotStrictlyIncreasing {
            index: position + 1,
        }),
        None => Ok(()),
    }
}

/// Computes `size` evenly spaced coordinates from `lower` to `upper`,
/// with the end points reproduced exactly.
pub fn uniform_coords<F: BFloat>(size: usize, lower: F, upper: F) -> Vec<F> {
    if size < 2 {
        return vec![lower; size];
    }
    let step = (upper - lower) / num::from_usize(size - 1);
    let mut coords: Vec<F> = (0..size)
        .map(|idx| lower + num::from_usize::<F>(idx) * step)
        .collect();
    coords[size - 1] = upper;
    coords
}
