//! Command line interface for interpolating the analytic fields at a single point.

use super::{
    fields::{self, ANALYTIC_FIELDS},
    utils,
};
use crate::{
    exit_on_error,
    geometry::{
        Dim3::{X, Y, Z},
        Point3, Vec3,
    },
    grid::GridAxes,
    interpolation::{trilinear::FieldInterpolator, DomainPolicy},
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `evaluate` command line subcommand.
pub fn create_evaluate_subcommand() -> Command {
    Command::new("evaluate")
        .about("Interpolate the analytic test fields at a single point")
        .arg(
            Arg::new("point")
                .short('p')
                .long("point")
                .require_equals(true)
                .value_delimiter(',')
                .allow_hyphen_values(true)
                .value_name("X,Y,Z")
                .required(true)
                .help("Coordinates of the query point"),
        )
        .arg(utils::create_shape_argument())
        .arg(
            Arg::new("strict")
                .long("strict")
                .require_equals(true)
                .num_args(0..=1)
                .default_missing_value("0")
                .value_name("TOLERANCE")
                .help(
                    "Fail if the point is outside the unit cube by more than\n\
                     the given fraction of a grid cell",
                ),
        )
}

/// Runs the actions for the `evaluate` subcommand using the given arguments.
pub fn run_evaluate_subcommand(arguments: &ArgMatches) {
    let shape = utils::get_grid_shape(arguments);
    let coords =
        utils::get_finite_float_values_from_required_parseable_argument::<f64>(arguments, "point");
    crate::exit_on_false!(
        coords.len() == 3,
        "Error: point must have 3 values, got {}",
        coords.len()
    );
    let point = Point3::new(coords[0], coords[1], coords[2]);
    let strict_policy = utils::get_finite_float_value_from_parseable_argument::<f64>(
        arguments, "strict",
    )
    .map(|tolerance| {
        exit_on_error!(
            DomainPolicy::with_tolerance(tolerance),
            "Error: Could not use strict mode: {}"
        )
    });

    let axes = exit_on_error!(
        GridAxes::from_bounds(shape, Vec3::zero(), Vec3::new(1.0, 1.0, 1.0)),
        "Error: Could not create grid: {}"
    );
    let packed_values = fields::sample_fields(&axes, &ANALYTIC_FIELDS);
    let interpolator = exit_on_error!(
        FieldInterpolator::from_packed(axes, packed_values),
        "Error: Could not create interpolator: {}"
    );

    let values = match strict_policy {
        Some(policy) => exit_on_error!(
            interpolator.evaluate_strict(point[X], point[Y], point[Z], &policy),
            "Error: Could not interpolate: {}"
        ),
        None => {
            let mut values = vec![0.0; interpolator.n_components()];
            interpolator.evaluate_into(&point, &mut values);
            values
        }
    };

    let location = interpolator.locate_cell(&point);
    println!(
        "Point {} in cell {} with fractions {}",
        point, location.lower_indices, location.fractions
    );
    for (field, value) in ANALYTIC_FIELDS.iter().zip(values) {
        let exact = (field.evaluate)(&point);
        println!(
            "{:>10}: interpolated {:.15e}, exact {:.15e}, error {:.3e}",
            field.name,
            value,
            exact,
            (value - exact).abs()
        );
    }
}
