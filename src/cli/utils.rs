//! Utilities for creating the command line interface.

use crate::{exit_on_error, exit_on_false, geometry::In3D, num::BFloat};
use clap::{Arg, ArgAction, ArgMatches};
use std::str::FromStr;

/// Default number of grid nodes along each axis.
pub const DEFAULT_SHAPE: [&str; 3] = ["100", "100", "100"];

/// Creates the argument specifying the shape of the grid.
pub fn create_shape_argument() -> Arg {
    Arg::new("shape")
        .short('s')
        .long("shape")
        .require_equals(true)
        .value_delimiter(',')
        .value_name("NX,NY,NZ")
        .default_values(DEFAULT_SHAPE)
        .help("Number of grid nodes along each axis of the unit cube")
}

/// Creates a boolean flag argument.
pub fn create_flag_argument(name: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(name)
        .short(short)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help)
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.trim().parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn parse_value_strings<'a, T, I>(argument_name: &str, value_strings: I) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
    I: Iterator<Item = &'a String>,
{
    value_strings
        .filter(|value_string| !value_string.is_empty())
        .map(|value_string| parse_value_string(argument_name, value_string))
        .collect()
}

fn verify_finite_float_value<F: BFloat>(argument_name: &str, value: F) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_parseable_argument<T>(arguments: &ArgMatches, argument_name: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .get_one::<String>(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

pub fn get_values_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_strings(
        argument_name,
        arguments
            .get_many::<String>(argument_name)
            .expect("No values for required argument"),
    )
}

pub fn get_finite_float_values_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Vec<F>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let values = get_values_from_required_parseable_argument(arguments, argument_name);
    values
        .iter()
        .for_each(|&value| verify_finite_float_value(argument_name, value));
    values
}

pub fn get_finite_float_value_from_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<F>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let value = get_value_from_parseable_argument(arguments, argument_name);
    if let Some(value) = value {
        verify_finite_float_value(argument_name, value);
    }
    value
}

/// Reads exactly three values from the given argument.
pub fn get_in3d_values_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> In3D<T>
where
    T: FromStr + Copy,
    <T as FromStr>::Err: std::fmt::Display,
{
    let values = get_values_from_required_parseable_argument(arguments, argument_name);
    verify_argument_value_count(argument_name, &values, 3);
    In3D::new(values[0], values[1], values[2])
}

/// Reads the grid shape, requiring at least two nodes along each axis.
pub fn get_grid_shape(arguments: &ArgMatches) -> In3D<usize> {
    let shape = get_in3d_values_from_required_parseable_argument(arguments, "shape");
    exit_on_false!(
        shape.into_iter().all(|&size| size >= 2),
        "Error: Grid must have at least 2 nodes along each axis"
    );
    shape
}

pub fn get_flag(arguments: &ArgMatches, argument_name: &str) -> bool {
    arguments.get_flag(argument_name)
}
