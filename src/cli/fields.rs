//! Analytic fields and an independent reference interpolator used for
//! validating the interpolation engine.

use crate::{
    geometry::{
        Dim3::{self, X, Y, Z},
        Point3,
    },
    grid::GridAxes,
};
use ndarray::prelude::*;

/// A scalar field with a closed-form expression.
#[derive(Clone, Copy, Debug)]
pub struct AnalyticField {
    pub name: &'static str,
    pub evaluate: fn(&Point3<f64>) -> f64,
}

fn exp_minus_r(point: &Point3<f64>) -> f64 {
    f64::exp(-point.to_vec3().length())
}

fn exp_minus_r_squared(point: &Point3<f64>) -> f64 {
    f64::exp(-point.to_vec3().squared_length())
}

/// The fields `exp(-r)` and `exp(-r^2)`, with `r` the distance from the origin.
pub const ANALYTIC_FIELDS: [AnalyticField; 2] = [
    AnalyticField {
        name: "exp(-r)",
        evaluate: exp_minus_r,
    },
    AnalyticField {
        name: "exp(-r^2)",
        evaluate: exp_minus_r_squared,
    },
];

/// Samples the given fields at every node of the grid, producing an array
/// indexed as `[component, i, j, k]` in column-major layout.
pub fn sample_fields(axes: &GridAxes<f64>, fields: &[AnalyticField]) -> Array4<f64> {
    let (nx, ny, nz) = axes.shape().to_tuple();
    let coords = axes.coords();
    Array4::from_shape_fn((fields.len(), nx, ny, nz).f(), |(c, i, j, k)| {
        (fields[c].evaluate)(&Point3::new(coords[X][i], coords[Y][j], coords[Z][k]))
    })
}

/// Interpolator for a single scalar field on a rectilinear grid, locating
/// cells by bisection instead of from a uniform spacing.
#[derive(Clone, Debug)]
pub struct ReferenceInterpolator<'a> {
    axes: &'a GridAxes<f64>,
    values: ArrayView3<'a, f64>,
}

impl<'a> ReferenceInterpolator<'a> {
    /// Creates a reference interpolator for the given values indexed as `[i, j, k]`.
    ///
    /// # Panics
    ///
    /// If the shape of the values does not match the axes.
    pub fn new(axes: &'a GridAxes<f64>, values: ArrayView3<'a, f64>) -> Self {
        let (nx, ny, nz) = values.dim();
        assert_eq!(
            axes.shape().to_tuple(),
            (nx, ny, nz),
            "Shape of grid does not match shape of array of values."
        );
        Self { axes, values }
    }

    fn bracket(&self, dim: Dim3, coord: f64) -> (usize, f64) {
        let coords = self.axes.axis(dim);
        let upper = coords.partition_point(|&node| node <= coord);
        let lower = upper.saturating_sub(1).min(coords.len() - 2);
        let weight = (coord - coords[lower]) / (coords[lower + 1] - coords[lower]);
        (lower, weight)
    }

    /// Interpolates the field at the given point by successive linear
    /// interpolation along x, y and z.
    pub fn interp(&self, point: &Point3<f64>) -> f64 {
        let (i, wx) = self.bracket(X, point[X]);
        let (j, wy) = self.bracket(Y, point[Y]);
        let (k, wz) = self.bracket(Z, point[Z]);

        let lerp = |a: f64, b: f64, weight: f64| a + weight * (b - a);
        let v = &self.values;
        let along_x = |j: usize, k: usize| lerp(v[[i, j, k]], v[[i + 1, j, k]], wx);
        let along_y = |k: usize| lerp(along_x(j, k), along_x(j + 1, k), wy);
        lerp(along_y(k), along_y(k + 1), wz)
    }
}
