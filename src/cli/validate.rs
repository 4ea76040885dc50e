//! Command line interface for cross-validating the interpolation engine
//! against the reference interpolator.

use super::{
    fields::{self, ReferenceInterpolator, ANALYTIC_FIELDS},
    utils,
};
use crate::{
    error::Result,
    exit_with_error,
    geometry::{In3D, Point3, Vec3},
    grid::GridAxes,
    interpolation::trilinear::FieldInterpolator,
};
use clap::{Arg, ArgMatches, Command};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Largest acceptable difference between the engine and the reference interpolator.
pub const MAX_REFERENCE_DIFFERENCE: f64 = 1e-12;

/// Default number of random query points.
pub const DEFAULT_POINT_COUNT: usize = 10_000;

/// Outcome of comparing the engine with the reference interpolator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct ValidationReport {
    pub shape: In3D<usize>,
    pub n_points: usize,
    pub seed: u64,
    pub field_names: Vec<&'static str>,
    /// Largest absolute difference from the reference interpolator, per component.
    pub max_reference_differences: Vec<f64>,
    /// Largest absolute difference from the analytic field, per component.
    pub max_analytic_errors: Vec<f64>,
}

impl ValidationReport {
    /// Whether every component agrees with the reference within the given tolerance.
    pub fn passes(&self, tolerance: f64) -> bool {
        self.max_reference_differences
            .iter()
            .all(|&difference| difference <= tolerance)
    }
}

/// Samples the analytic fields on a unit cube grid of the given shape and
/// compares the engine with the reference interpolator at uniformly
/// distributed random points inside the grid.
pub fn validate(shape: In3D<usize>, n_points: usize, seed: u64) -> Result<ValidationReport> {
    let axes = GridAxes::from_bounds(shape.clone(), Vec3::zero(), Vec3::new(1.0, 1.0, 1.0))?;
    let packed_values = fields::sample_fields(&axes, &ANALYTIC_FIELDS);
    let interpolator = FieldInterpolator::from_packed(axes, packed_values)?;

    let references: Vec<_> = (0..interpolator.n_components())
        .map(|component| {
            ReferenceInterpolator::new(
                interpolator.axes(),
                interpolator.component_values(component),
            )
        })
        .collect();

    let n_components = interpolator.n_components();
    let mut max_reference_differences = vec![0.0; n_components];
    let mut max_analytic_errors = vec![0.0; n_components];
    let mut values = vec![0.0; n_components];

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..n_points {
        let point = Point3::new(
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        );
        interpolator.evaluate_into(&point, &mut values);

        for (component, &value) in values.iter().enumerate() {
            let reference_difference = (value - references[component].interp(&point)).abs();
            let analytic_error = (value - (ANALYTIC_FIELDS[component].evaluate)(&point)).abs();
            max_reference_differences[component] =
                f64::max(max_reference_differences[component], reference_difference);
            max_analytic_errors[component] =
                f64::max(max_analytic_errors[component], analytic_error);
        }
    }

    info!(
        "Compared {} components at {} random points on grid with shape {}",
        n_components, n_points, shape
    );

    Ok(ValidationReport {
        shape,
        n_points,
        seed,
        field_names: ANALYTIC_FIELDS.iter().map(|field| field.name).collect(),
        max_reference_differences,
        max_analytic_errors,
    })
}

/// Builds a representation of the `validate` command line subcommand.
pub fn create_validate_subcommand() -> Command {
    Command::new("validate")
        .about("Compare the interpolator with an independent reference implementation")
        .arg(utils::create_shape_argument())
        .arg(
            Arg::new("points")
                .short('n')
                .long("points")
                .require_equals(true)
                .value_name("N")
                .help("Number of random query points [default: 10000]"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("SEED")
                .help("Seed for the random query points [default: random]"),
        )
        .arg(utils::create_flag_argument(
            "json",
            'j',
            "Print the report as JSON",
        ))
}

/// Runs the actions for the `validate` subcommand using the given arguments.
pub fn run_validate_subcommand(arguments: &ArgMatches) {
    let shape = utils::get_grid_shape(arguments);
    let n_points = utils::get_value_from_parseable_argument(arguments, "points")
        .unwrap_or(DEFAULT_POINT_COUNT);
    let seed = utils::get_value_from_parseable_argument(arguments, "seed")
        .unwrap_or_else(|| rand::thread_rng().gen());

    let report = crate::exit_on_error!(
        validate(shape, n_points, seed),
        "Error: Could not set up interpolator: {}"
    );

    if utils::get_flag(arguments, "json") {
        print_json_report(&report);
    } else {
        print_report(&report);
    }

    if !report.passes(MAX_REFERENCE_DIFFERENCE) {
        exit_with_error!(
            "Error: Interpolated values differ from reference by more than {:e}",
            MAX_REFERENCE_DIFFERENCE
        );
    }
}

fn print_report(report: &ValidationReport) {
    println!(
        "Grid shape: {}, random points: {}, seed: {}",
        report.shape, report.n_points, report.seed
    );
    for ((name, difference), error) in report
        .field_names
        .iter()
        .zip(&report.max_reference_differences)
        .zip(&report.max_analytic_errors)
    {
        println!(
            "{:>10}: max difference from reference {:.3e}, max error {:.3e}",
            name, difference, error
        );
    }
}

#[cfg(feature = "json")]
fn print_json_report(report: &ValidationReport) {
    println!(
        "{}",
        crate::exit_on_error!(
            serde_json::to_string_pretty(report),
            "Error: Could not serialize report: {}"
        )
    );
}

#[cfg(not(feature = "json"))]
fn print_json_report(_report: &ValidationReport) {
    exit_with_error!("Error: JSON output requires the `json` feature");
}
