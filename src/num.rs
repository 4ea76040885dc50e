//! Utilities related to numbers.

use ieee754;
use num;
use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    Sync
    + Send
    + num::Float
    + num::cast::FromPrimitive
    + ieee754::Ieee754
    + fmt::Debug
    + fmt::Display
    + 'static
{
}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Converts the given count or index to the floating point type.
pub fn from_usize<F: BFloat>(value: usize) -> F {
    F::from_usize(value).unwrap_or_else(F::infinity)
}

/// Whether `b` can be reached from `a` by stepping through at most
/// `max_ulps` adjacent representable values.
pub fn within_ulps<F: BFloat>(a: F, b: F, max_ulps: usize) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let mut stepped = a;
    for _ in 0..max_ulps {
        if stepped == b {
            return true;
        }
        stepped = if stepped < b {
            stepped.next()
        } else {
            stepped.prev()
        };
    }
    stepped == b
}
