#![allow(dead_code)]

use gridterp::{Dim3, FieldInterpolator, GridAxes, Point3};
use ndarray::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ffi::OsString;

pub const SEED: u64 = 1_234_567;

pub type ScalarFunction = fn(f64, f64, f64) -> f64;

pub fn exp_minus_r(x: f64, y: f64, z: f64) -> f64 {
    f64::exp(-f64::sqrt(x * x + y * y + z * z))
}

pub fn exp_minus_r_squared(x: f64, y: f64, z: f64) -> f64 {
    f64::exp(-(x * x + y * y + z * z))
}

pub fn wave(x: f64, y: f64, z: f64) -> f64 {
    f64::sin(3.0 * x) * f64::cos(2.0 * y) + z
}

/// Evenly spaced values from `start` to `end`, with `end` reproduced exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|idx| start + idx as f64 * step).collect();
    values[n - 1] = end;
    values
}

pub fn unit_cube_axes(n: usize) -> GridAxes<f64> {
    GridAxes::new(linspace(0.0, 1.0, n), linspace(0.0, 1.0, n), linspace(0.0, 1.0, n)).unwrap()
}

pub fn sample(axes: &GridAxes<f64>, function: ScalarFunction) -> Array3<f64> {
    let coords = axes.coords();
    let (nx, ny, nz) = axes.shape().to_tuple();
    Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| {
        function(coords[Dim3::X][i], coords[Dim3::Y][j], coords[Dim3::Z][k])
    })
}

pub fn interpolator_for(axes: &GridAxes<f64>, functions: &[ScalarFunction]) -> FieldInterpolator<f64> {
    let components = functions
        .iter()
        .map(|&function| sample(axes, function))
        .collect();
    FieldInterpolator::from_components(axes.clone(), components).unwrap()
}

pub fn random_points(axes: &GridAxes<f64>, n_points: usize) -> Vec<Point3<f64>> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let lower = axes.lower_bounds();
    let upper = axes.upper_bounds();
    (0..n_points)
        .map(|_| {
            Point3::new(
                rng.gen_range(lower[Dim3::X]..upper[Dim3::X]),
                rng.gen_range(lower[Dim3::Y]..upper[Dim3::Y]),
                rng.gen_range(lower[Dim3::Z]..upper[Dim3::Z]),
            )
        })
        .collect()
}

/// Trilinear interpolation of a single scalar field, with the enclosing cell
/// found by searching the coordinate arrays.
pub fn reference_interp(axes: &GridAxes<f64>, values: &ArrayView3<f64>, point: &Point3<f64>) -> f64 {
    let bracket = |dim: Dim3| {
        let coords = axes.axis(dim);
        let mut lower = 0;
        while lower + 2 < coords.len() && coords[lower + 1] <= point[dim] {
            lower += 1;
        }
        let t = (point[dim] - coords[lower]) / (coords[lower + 1] - coords[lower]);
        (lower, t)
    };
    let (i, tx) = bracket(Dim3::X);
    let (j, ty) = bracket(Dim3::Y);
    let (k, tz) = bracket(Dim3::Z);

    let mut value = 0.0;
    for (di, wx) in [(0, 1.0 - tx), (1, tx)] {
        for (dj, wy) in [(0, 1.0 - ty), (1, ty)] {
            for (dk, wz) in [(0, 1.0 - tz), (1, tz)] {
                value += wx * wy * wz * values[[i + di, j + dj, k + dk]];
            }
        }
    }
    value
}

/// Runs the `gridterp` command line program with the given arguments.
#[cfg(feature = "cli")]
pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    gridterp::cli::run::run_with_args(
        gridterp::cli::build::build()
            .no_binary_name(true)
            .get_matches_from(args),
    );
}
