//! Interpolation of multi-component fields.

pub mod trilinear;

use crate::{
    error::{InterpError, Result},
    geometry::{Idx3, Point3, Vec3},
    num::BFloat,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Defines the properties of a 3D interpolator of a multi-component field.
pub trait Interpolator3<F: BFloat>: Sync + Send {
    /// Returns the number of values produced per interpolation point.
    fn n_components(&self) -> usize;

    /// Computes the interpolated value of every field component at the given
    /// point and writes them into `values`.
    ///
    /// Points outside the grid are extrapolated linearly from the nearest
    /// boundary cell.
    ///
    /// # Panics
    ///
    /// If the length of `values` differs from `n_components()`.
    fn interp_into(&self, interp_point: &Point3<F>, values: &mut [F]);

    /// Computes the interpolated value of every field component at the given
    /// point, in component order.
    fn interp(&self, interp_point: &Point3<F>) -> Vec<F> {
        let mut values = vec![F::zero(); self.n_components()];
        self.interp_into(interp_point, &mut values);
        values
    }

    /// Like `interp_into`, but fails if the point lies outside the grid by
    /// more than the tolerance of the given domain policy.
    fn interp_strict_into(
        &self,
        interp_point: &Point3<F>,
        policy: &DomainPolicy,
        values: &mut [F],
    ) -> Result<()>;

    /// Like `interp`, but fails if the point lies outside the grid by more
    /// than the tolerance of the given domain policy.
    fn interp_strict(&self, interp_point: &Point3<F>, policy: &DomainPolicy) -> Result<Vec<F>> {
        let mut values = vec![F::zero(); self.n_components()];
        self.interp_strict_into(interp_point, policy, &mut values)?;
        Ok(values)
    }
}

/// Decides which query points are accepted by strict evaluation.
///
/// The tolerance is measured in units of the local cell extent: a point is
/// accepted when its fractional offset within the boundary cell along every
/// dimension lies in `[-tolerance, 1 + tolerance]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct DomainPolicy {
    tolerance: f64,
}

impl DomainPolicy {
    /// Creates a policy allowing points the given fraction of a cell outside the grid.
    ///
    /// # Errors
    ///
    /// Returns `InterpError::InvalidTolerance` if the tolerance is negative or not finite.
    pub fn with_tolerance(tolerance: f64) -> Result<Self> {
        if tolerance.is_finite() && tolerance >= 0.0 {
            Ok(Self { tolerance })
        } else {
            Err(InterpError::InvalidTolerance { tolerance })
        }
    }

    /// Returns the allowed distance outside the grid, in cell fractions.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether the given fractional cell offset is acceptable.
    pub fn accepts<F: BFloat>(&self, fraction: F) -> bool {
        let tolerance = F::from_f64(self.tolerance).unwrap_or_else(F::zero);
        fraction >= -tolerance && fraction <= F::one() + tolerance
    }
}

impl Default for DomainPolicy {
    fn default() -> Self {
        Self { tolerance: 0.0 }
    }
}

/// The grid cell used for interpolating at a point, along with the
/// position of the point relative to the lower corner of the cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellLocation<F: BFloat> {
    /// Indices of the lower corner node of the cell.
    pub lower_indices: Idx3<usize>,
    /// Fractional offset of the point within the cell along each
    /// dimension; outside `[0, 1]` when the point is outside the grid.
    pub fractions: Vec3<F>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_accepts_closed_unit_interval() {
        let policy = DomainPolicy::default();
        assert!(policy.accepts(0.0));
        assert!(policy.accepts(1.0));
        assert!(policy.accepts(0.5_f32));
        assert!(!policy.accepts(-1e-15));
        assert!(!policy.accepts(1.0 + 1e-15));
        assert!(!policy.accepts(f64::NAN));
    }

    #[test]
    fn tolerance_widens_accepted_interval() {
        let policy = DomainPolicy::with_tolerance(0.25).unwrap();
        assert_eq!(policy.tolerance(), 0.25);
        assert!(policy.accepts(-0.25));
        assert!(policy.accepts(1.2));
        assert!(!policy.accepts(-0.3));
        assert!(!policy.accepts(1.3));
    }

    #[test]
    fn negative_or_non_finite_tolerance_is_rejected() {
        for tolerance in [-0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                DomainPolicy::with_tolerance(tolerance),
                Err(InterpError::InvalidTolerance { .. })
            ));
        }
        assert_eq!(DomainPolicy::with_tolerance(0.0), Ok(DomainPolicy::default()));
    }
}
