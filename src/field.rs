//! Multi-component fields packed for joint interpolation.

use crate::{
    error::{InterpError, Result},
    geometry::{
        Dim3::{X, Y, Z},
        Idx3, In3D,
    },
    num::BFloat,
};
use ndarray::prelude::*;
use tracing::debug;

/// Field data supplied when creating an interpolator.
#[derive(Clone, Debug)]
pub enum FieldSource<F> {
    /// A 4D array indexed as `[component, i, j, k]`, in any memory layout.
    Packed(Array4<F>),
    /// One 3D array indexed as `[i, j, k]` for each component.
    Components(Vec<Array3<F>>),
}

impl<F> From<Array4<F>> for FieldSource<F> {
    fn from(values: Array4<F>) -> Self {
        Self::Packed(values)
    }
}

impl<F> From<Vec<Array3<F>>> for FieldSource<F> {
    fn from(components: Vec<Array3<F>>) -> Self {
        Self::Components(components)
    }
}

impl<F> FieldSource<F> {
    /// Returns the number of components in the source.
    pub fn n_components(&self) -> usize {
        match self {
            Self::Packed(values) => values.len_of(Axis(0)),
            Self::Components(components) => components.len(),
        }
    }
}

/// The values of several scalar fields defined on the same grid,
/// packed into a single array.
///
/// The array is indexed as `[component, i, j, k]` and stored in
/// column-major order: the component index varies fastest in memory,
/// followed by `i`, `j` and `k`. All component values at a grid node
/// are thus adjacent, so the eight corners of a cell can be blended for
/// every component with one offset computation per corner.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedField<F> {
    data: Vec<F>,
    n_components: usize,
    shape: In3D<usize>,
    node_strides: In3D<usize>,
}

impl<F: BFloat> PackedField<F> {
    /// Packs the given field data, verifying that every component has
    /// the given spatial shape.
    ///
    /// # Errors
    ///
    /// - `InterpError::EmptyField` if the source has no components.
    /// - `InterpError::ShapeMismatch` for the first component whose
    ///   spatial shape differs from `shape`.
    pub fn pack(source: FieldSource<F>, shape: &In3D<usize>) -> Result<Self> {
        let n_components = source.n_components();
        if n_components == 0 {
            return Err(InterpError::EmptyField);
        }

        let data = match source {
            FieldSource::Packed(values) => {
                let dims = values.shape();
                verify_component_shape(0, In3D::new(dims[1], dims[2], dims[3]), shape)?;
                // Iterating the transposed view visits the components
                // innermost and k outermost, which is the packed order.
                values.t().iter().copied().collect()
            }
            FieldSource::Components(components) => {
                for (component, values) in components.iter().enumerate() {
                    let (nx, ny, nz) = values.dim();
                    verify_component_shape(component, In3D::new(nx, ny, nz), shape)?;
                }
                let mut data = Vec::with_capacity(n_components * shape[X] * shape[Y] * shape[Z]);
                for k in 0..shape[Z] {
                    for j in 0..shape[Y] {
                        for i in 0..shape[X] {
                            data.extend(components.iter().map(|values| values[[i, j, k]]));
                        }
                    }
                }
                data
            }
        };

        debug!(
            "Packed {} field component(s) on grid with shape {}",
            n_components, shape
        );

        Ok(Self {
            data,
            n_components,
            shape: shape.clone(),
            node_strides: In3D::new(
                n_components,
                n_components * shape[X],
                n_components * shape[X] * shape[Y],
            ),
        })
    }

    /// Returns the number of field components.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Returns the spatial shape of each component.
    pub fn shape(&self) -> &In3D<usize> {
        &self.shape
    }

    /// Returns the distance in memory between neighbouring nodes along
    /// each dimension.
    pub fn node_strides(&self) -> &In3D<usize> {
        &self.node_strides
    }

    /// Returns a view of the packed values indexed as `[component, i, j, k]`.
    pub fn values(&self) -> ArrayView4<'_, F> {
        ArrayView4::from_shape(
            (
                self.n_components,
                self.shape[X],
                self.shape[Y],
                self.shape[Z],
            )
                .f(),
            &self.data,
        )
        .expect("Packed data length is consistent with its shape")
    }

    /// Returns a view of the values of a single component indexed as `[i, j, k]`.
    ///
    /// # Panics
    ///
    /// If `component` is out of bounds.
    pub fn component(&self, component: usize) -> ArrayView3<'_, F> {
        self.values().index_axis_move(Axis(0), component)
    }

    /// Returns the packed values as a flat slice in memory order.
    pub fn as_slice(&self) -> &[F] {
        &self.data
    }

    /// Returns the offset into the flat slice of the first component
    /// value at the given grid node.
    #[inline]
    pub fn node_offset(&self, indices: &Idx3<usize>) -> usize {
        indices[X] * self.node_strides[X]
            + indices[Y] * self.node_strides[Y]
            + indices[Z] * self.node_strides[Z]
    }

    /// Returns the values of all components at the given grid node.
    ///
    /// # Panics
    ///
    /// If any of the indices is out of bounds.
    pub fn node_values(&self, indices: &Idx3<usize>) -> &[F] {
        let offset = self.node_offset(indices);
        &self.data[offset..offset + self.n_components]
    }
}

fn verify_component_shape(
    component: usize,
    found: In3D<usize>,
    expected: &In3D<usize>,
) -> Result<()> {
    if &found == expected {
        Ok(())
    } else {
        Err(InterpError::ShapeMismatch {
            component,
            expected: expected.clone(),
            found,
        })
    }
}
