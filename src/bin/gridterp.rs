//! Command line runner for the `gridterp` library.

#[cfg(not(feature = "for-testing"))]
#[quit::main]
fn main() {
    gridterp::cli::run::run();
}

#[cfg(feature = "for-testing")]
fn main() {
    eprintln!(
        "Warning: The `for-testing` feature is enabled, so errors are reported as panics"
    );
    gridterp::cli::run::run();
}
