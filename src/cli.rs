//! Command line interface.

pub mod build;
pub mod evaluate;
pub mod fields;
pub mod run;
pub mod utils;
pub mod validate;
