//! Trilinear interpolation of all components of a packed field in one pass.

use super::{CellLocation, DomainPolicy, Interpolator3};
use crate::{
    error::{InterpError, Result},
    field::{FieldSource, PackedField},
    geometry::{
        Dim3::{self, X, Y, Z},
        Idx3, In3D, Point3, Vec3,
    },
    grid::GridAxes,
    num::{self, BFloat},
};
use ndarray::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Constants needed to map a coordinate to a cell along one axis.
#[derive(Clone, Copy, Debug)]
struct AxisLookup<F> {
    first: F,
    inverse_spacing: F,
    max_lower_index: usize,
    max_lower_index_float: F,
}

impl<F: BFloat> AxisLookup<F> {
    fn new(axes: &GridAxes<F>, dim: Dim3) -> Self {
        let max_lower_index = axes.shape()[dim] - 2;
        Self {
            first: axes.lower_bounds()[dim],
            inverse_spacing: axes.inverse_spacings()[dim],
            max_lower_index,
            max_lower_index_float: num::from_usize(max_lower_index),
        }
    }

    /// Finds the lower node index of the cell to use for the given
    /// coordinate, together with the fractional offset of the coordinate
    /// from that node.
    ///
    /// The index is clamped to the valid cells while the fraction is not,
    /// so coordinates outside the axis give fractions outside `[0, 1]`.
    #[inline]
    fn locate(&self, coord: F) -> (usize, F) {
        let continuous_index = (coord - self.first) * self.inverse_spacing;
        let floored = continuous_index.floor();

        // NaN ends up in the first cell
        let (lower_index, lower_index_float) = if floored >= self.max_lower_index_float {
            (self.max_lower_index, self.max_lower_index_float)
        } else if floored > F::zero() {
            (floored.to_usize().unwrap_or(0), floored)
        } else {
            (0, F::zero())
        };
        (lower_index, continuous_index - lower_index_float)
    }
}

/// Interpolator for a set of scalar fields sharing a uniform 3D grid.
///
/// All field components are packed into a single array (see `PackedField`)
/// so that each evaluation locates the enclosing cell once and blends the
/// eight corner values of every component in the same pass.
///
/// Evaluation is a total function of the query point: points outside the
/// grid are linearly extrapolated from the nearest boundary cell, and a
/// point exactly on the upper boundary uses the last cell. Use the strict
/// variants to reject points outside the grid.
#[derive(Clone, Debug)]
pub struct FieldInterpolator<F: BFloat> {
    axes: Arc<GridAxes<F>>,
    field: PackedField<F>,
    lookups: In3D<AxisLookup<F>>,
}

impl<F: BFloat> FieldInterpolator<F> {
    /// Creates a new interpolator for the given field data on the given axes.
    ///
    /// # Errors
    ///
    /// - `InterpError::EmptyField` if the field has no components.
    /// - `InterpError::ShapeMismatch` if the spatial shape of a component
    ///   differs from the shape of the axes.
    pub fn new<A, S>(axes: A, source: S) -> Result<Self>
    where
        A: Into<Arc<GridAxes<F>>>,
        S: Into<FieldSource<F>>,
    {
        let axes = axes.into();
        let field = PackedField::pack(source.into(), axes.shape())?;
        let lookups = In3D::with_each_component(|dim| AxisLookup::new(&axes, dim));

        debug!(
            "Created interpolator for {} component(s) on grid with shape {}",
            field.n_components(),
            axes.shape()
        );

        Ok(Self {
            axes,
            field,
            lookups,
        })
    }

    /// Creates a new interpolator from a 4D array indexed as `[component, i, j, k]`.
    pub fn from_packed<A>(axes: A, values: Array4<F>) -> Result<Self>
    where
        A: Into<Arc<GridAxes<F>>>,
    {
        Self::new(axes, FieldSource::Packed(values))
    }

    /// Creates a new interpolator from separate 3D arrays indexed as `[i, j, k]`,
    /// one for each component.
    pub fn from_components<A>(axes: A, components: Vec<Array3<F>>) -> Result<Self>
    where
        A: Into<Arc<GridAxes<F>>>,
    {
        Self::new(axes, FieldSource::Components(components))
    }

    /// Returns a reference to the grid axes.
    pub fn axes(&self) -> &GridAxes<F> {
        self.axes.as_ref()
    }

    /// Returns a new atomic reference counted pointer to the grid axes.
    pub fn arc_with_axes(&self) -> Arc<GridAxes<F>> {
        Arc::clone(&self.axes)
    }

    /// Returns the number of field components.
    pub fn n_components(&self) -> usize {
        self.field.n_components()
    }

    /// Returns the 3D shape of the grid.
    pub fn shape(&self) -> &In3D<usize> {
        self.axes.shape()
    }

    /// Returns a reference to the packed field.
    pub fn packed_field(&self) -> &PackedField<F> {
        &self.field
    }

    /// Returns a view of the packed field values indexed as `[component, i, j, k]`.
    pub fn packed_values(&self) -> ArrayView4<'_, F> {
        self.field.values()
    }

    /// Returns a view of the values of one component indexed as `[i, j, k]`.
    pub fn component_values(&self, component: usize) -> ArrayView3<'_, F> {
        self.field.component(component)
    }

    /// Finds the cell used for interpolating at the given point.
    pub fn locate_cell(&self, point: &Point3<F>) -> CellLocation<F> {
        let (i, tx) = self.lookups[X].locate(point[X]);
        let (j, ty) = self.lookups[Y].locate(point[Y]);
        let (k, tz) = self.lookups[Z].locate(point[Z]);
        CellLocation {
            lower_indices: Idx3::new(i, j, k),
            fractions: Vec3::new(tx, ty, tz),
        }
    }

    /// Computes the interpolated values of all components at `(x, y, z)`.
    pub fn evaluate(&self, x: F, y: F, z: F) -> Vec<F> {
        let mut values = vec![F::zero(); self.n_components()];
        self.evaluate_into(&Point3::new(x, y, z), &mut values);
        values
    }

    /// Computes the interpolated values of all components at the given point
    /// and writes them into `values`, without allocating.
    ///
    /// # Panics
    ///
    /// If the length of `values` differs from the number of components.
    pub fn evaluate_into(&self, point: &Point3<F>, values: &mut [F]) {
        let location = self.locate_cell(point);
        self.blend_corners(&location, values);
    }

    /// Computes the interpolated values of all components at `(x, y, z)`,
    /// failing if the point lies outside the grid by more than allowed by
    /// the given policy.
    ///
    /// # Errors
    ///
    /// Returns `InterpError::OutOfDomain` for the first offending dimension.
    pub fn evaluate_strict(&self, x: F, y: F, z: F, policy: &DomainPolicy) -> Result<Vec<F>> {
        let mut values = vec![F::zero(); self.n_components()];
        self.evaluate_strict_into(&Point3::new(x, y, z), policy, &mut values)?;
        Ok(values)
    }

    /// Like `evaluate_into`, but fails if the point lies outside the grid by
    /// more than allowed by the given policy. `values` is left untouched on failure.
    pub fn evaluate_strict_into(
        &self,
        point: &Point3<F>,
        policy: &DomainPolicy,
        values: &mut [F],
    ) -> Result<()> {
        let location = self.locate_cell(point);
        for dim in Dim3::slice() {
            if !policy.accepts(location.fractions[dim]) {
                return Err(InterpError::OutOfDomain {
                    dim,
                    coord: point[dim].to_f64().unwrap_or(f64::NAN),
                    lower: self.axes.lower_bounds()[dim].to_f64().unwrap_or(f64::NAN),
                    upper: self.axes.upper_bounds()[dim].to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        self.blend_corners(&location, values);
        Ok(())
    }

    #[inline]
    fn blend_corners(&self, location: &CellLocation<F>, values: &mut [F]) {
        let n_components = self.n_components();
        assert_eq!(
            values.len(),
            n_components,
            "Output length must equal the number of field components"
        );

        let one = F::one();
        let fractions = &location.fractions;
        let weights_x = [one - fractions[X], fractions[X]];
        let weights_y = [one - fractions[Y], fractions[Y]];
        let weights_z = [one - fractions[Z], fractions[Z]];

        let strides = self.field.node_strides();
        let (stride_x, stride_y, stride_z) = strides.to_tuple();
        let base_offset = self.field.node_offset(&location.lower_indices);
        let data = self.field.as_slice();

        values.fill(F::zero());

        for (dk, &weight_z) in weights_z.iter().enumerate() {
            for (dj, &weight_y) in weights_y.iter().enumerate() {
                let weight_yz = weight_y * weight_z;
                for (di, &weight_x) in weights_x.iter().enumerate() {
                    let weight = weight_x * weight_yz;
                    let offset = base_offset + di * stride_x + dj * stride_y + dk * stride_z;
                    let corner_values = &data[offset..offset + n_components];
                    for (value, &corner_value) in values.iter_mut().zip(corner_values) {
                        *value = *value + weight * corner_value;
                    }
                }
            }
        }
    }
}

impl<F: BFloat> Interpolator3<F> for FieldInterpolator<F> {
    fn n_components(&self) -> usize {
        FieldInterpolator::n_components(self)
    }

    fn interp_into(&self, interp_point: &Point3<F>, values: &mut [F]) {
        self.evaluate_into(interp_point, values)
    }

    fn interp_strict_into(
        &self,
        interp_point: &Point3<F>,
        policy: &DomainPolicy,
        values: &mut [F],
    ) -> Result<()> {
        self.evaluate_strict_into(interp_point, policy, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ieee754::Ieee754;

    /// Axes with spacings that are powers of two, so node coordinates and
    /// continuous indices are exact.
    fn exact_axes() -> GridAxes<f64> {
        GridAxes::new(
            vec![0.0, 0.5, 1.0, 1.5, 2.0],
            vec![-1.0, 0.0, 1.0, 2.0],
            vec![2.0, 2.25, 2.5],
        )
        .unwrap()
    }

    fn affine(point: &Point3<f64>) -> f64 {
        1.0 + 2.0 * point[X] - 3.0 * point[Y] + 0.5 * point[Z]
    }

    fn bilinear_product(point: &Point3<f64>) -> f64 {
        point[X] * point[Y] * point[Z] - point[Y]
    }

    fn sampled(axes: &GridAxes<f64>, function: fn(&Point3<f64>) -> f64) -> Array3<f64> {
        let (nx, ny, nz) = axes.shape().to_tuple();
        Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| {
            function(&axes.node(&Idx3::new(i, j, k)))
        })
    }

    fn exact_interpolator() -> FieldInterpolator<f64> {
        let axes = exact_axes();
        let components = vec![sampled(&axes, affine), sampled(&axes, bilinear_product)];
        FieldInterpolator::from_components(axes, components).unwrap()
    }

    #[test]
    fn nodes_are_reproduced_exactly() {
        let interpolator = exact_interpolator();
        let (nx, ny, nz) = interpolator.shape().to_tuple();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    let indices = Idx3::new(i, j, k);
                    let node = interpolator.axes().node(&indices);
                    let values = interpolator.evaluate(node[X], node[Y], node[Z]);
                    assert_eq!(values, interpolator.packed_field().node_values(&indices));
                }
            }
        }
    }

    #[test]
    fn trilinear_functions_are_reproduced_inside_cells() {
        let interpolator = exact_interpolator();
        for point in [
            Point3::new(0.1, -0.9, 2.01),
            Point3::new(1.3, 0.45, 2.3),
            Point3::new(1.99, 1.99, 2.49),
        ] {
            let values = interpolator.evaluate(point[X], point[Y], point[Z]);
            assert_abs_diff_eq!(values[0], affine(&point), epsilon = 1e-13);
            assert_abs_diff_eq!(values[1], bilinear_product(&point), epsilon = 1e-13);
        }
    }

    #[test]
    fn cell_location_clamps_index_but_not_fraction() {
        let interpolator = exact_interpolator();

        let inside = interpolator.locate_cell(&Point3::new(0.75, 0.5, 2.125));
        assert_eq!(inside.lower_indices, Idx3::new(1, 1, 0));
        assert_eq!(inside.fractions, Vec3::new(0.5, 0.5, 0.5));

        let upper = interpolator.locate_cell(&Point3::new(2.0, 2.0, 2.5));
        assert_eq!(upper.lower_indices, Idx3::new(3, 2, 1));
        assert_eq!(upper.fractions, Vec3::new(1.0, 1.0, 1.0));

        let outside = interpolator.locate_cell(&Point3::new(-0.25, 4.0, 2.0));
        assert_eq!(outside.lower_indices, Idx3::new(0, 2, 0));
        assert_eq!(outside.fractions, Vec3::new(-0.5, 3.0, 0.0));

        let nan = interpolator.locate_cell(&Point3::new(f64::NAN, 0.0, 2.0));
        assert_eq!(nan.lower_indices[X], 0);
        assert!(nan.fractions[X].is_nan());
    }

    #[test]
    fn upper_boundary_uses_last_cell() {
        let interpolator = exact_interpolator();
        let corner = interpolator.evaluate(2.0, 2.0, 2.5);
        assert_eq!(
            corner,
            interpolator.packed_field().node_values(&Idx3::new(4, 3, 2))
        );

        let just_below = interpolator.evaluate(2.0_f64.prev(), 2.0, 2.5);
        assert_abs_diff_eq!(just_below[0], corner[0], epsilon = 1e-14);
    }

    #[test]
    fn outside_points_are_extrapolated_continuously() {
        let interpolator = exact_interpolator();

        // Affine fields are extrapolated exactly
        let point = Point3::new(2.5, -1.5, 1.75);
        let values = interpolator.evaluate(point[X], point[Y], point[Z]);
        assert!(values.iter().all(|value| value.is_finite()));
        assert_abs_diff_eq!(values[0], affine(&point), epsilon = 1e-13);

        let at_boundary = interpolator.evaluate(2.0, 0.3, 2.2);
        let beyond = interpolator.evaluate(2.0_f64.next(), 0.3, 2.2);
        for (a, b) in at_boundary.iter().zip(&beyond) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-13);
        }
    }

    #[test]
    fn strict_evaluation_rejects_outside_points() {
        let interpolator = exact_interpolator();
        let policy = DomainPolicy::default();

        assert_eq!(
            interpolator.evaluate_strict(1.0, 0.0, 2.5, &policy),
            Ok(interpolator.evaluate(1.0, 0.0, 2.5))
        );
        assert_eq!(
            interpolator.evaluate_strict(1.0, 2.5, 2.25, &policy),
            Err(InterpError::OutOfDomain {
                dim: Y,
                coord: 2.5,
                lower: -1.0,
                upper: 2.0
            })
        );

        let lenient = DomainPolicy::with_tolerance(0.5).unwrap();
        assert_eq!(
            interpolator.evaluate_strict(1.0, 2.5, 2.25, &lenient),
            Ok(interpolator.evaluate(1.0, 2.5, 2.25))
        );
        assert!(interpolator
            .evaluate_strict(-0.5, 0.0, 2.25, &lenient)
            .is_err());

        let mut untouched = [7.0, 7.0];
        assert!(interpolator
            .evaluate_strict_into(&Point3::new(f64::NAN, 0.0, 2.25), &policy, &mut untouched)
            .is_err());
        assert_eq!(untouched, [7.0, 7.0]);
    }

    #[test]
    fn trait_methods_match_inherent_methods() {
        let interpolator = exact_interpolator();
        let point = Point3::new(0.3, 1.7, 2.4);
        assert_eq!(
            Interpolator3::interp(&interpolator, &point),
            interpolator.evaluate(0.3, 1.7, 2.4)
        );
        assert_eq!(
            interpolator.interp_strict(&point, &DomainPolicy::default()),
            Ok(interpolator.evaluate(0.3, 1.7, 2.4))
        );
    }

    #[test]
    #[should_panic(expected = "Output length must equal the number of field components")]
    fn wrong_output_length_panics() {
        let interpolator = exact_interpolator();
        let mut values = [0.0; 3];
        interpolator.evaluate_into(&Point3::new(0.5, 0.5, 2.2), &mut values);
    }

    #[test]
    fn single_precision_is_supported() {
        let axes = GridAxes::<f32>::from_bounds(
            In3D::same(3),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        )
        .unwrap();
        let values = Array4::from_shape_fn((1, 3, 3, 3), |(_, i, j, k)| (i + 2 * j + 4 * k) as f32);
        let interpolator = FieldInterpolator::from_packed(axes, values).unwrap();
        assert_eq!(interpolator.evaluate(0.25, 0.25, 0.25), vec![3.5]);
    }

    #[test]
    fn axes_can_be_shared() {
        let axes = Arc::new(exact_axes());
        let first =
            FieldInterpolator::from_components(Arc::clone(&axes), vec![sampled(&axes, affine)])
                .unwrap();
        let second = FieldInterpolator::from_components(
            first.arc_with_axes(),
            vec![sampled(&axes, bilinear_product)],
        )
        .unwrap();
        assert!(Arc::ptr_eq(&first.arc_with_axes(), &second.arc_with_axes()));
        assert_eq!(Arc::strong_count(&axes), 3);
    }
}
