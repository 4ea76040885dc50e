//! Function for building the command line hierarchy.

use super::{
    evaluate::create_evaluate_subcommand, utils::create_flag_argument,
    validate::create_validate_subcommand,
};
use clap::{self, Command};

/// Build the `gridterp` command line hierarchy.
pub fn build() -> Command {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .arg(create_flag_argument("timing", 't', "Display elapsed time when done").global(true))
        .arg(
            create_flag_argument("verbose", 'v', "Print status messages while running")
                .global(true),
        )
        .subcommand(create_validate_subcommand())
        .subcommand(create_evaluate_subcommand())
}
