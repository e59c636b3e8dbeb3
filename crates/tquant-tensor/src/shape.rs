//! Shape and Strides - Layout Arithmetic for Strided Tensors
//!
//! A tensor's layout is its shape (extent per dimension) plus its strides
//! (storage step per dimension). These helpers derive row-major strides,
//! decide contiguity, translate between multi-dimensional and linear indices,
//! and validate the dimension arguments views accept.
//!
//! @version 0.1.0
//! @author tquant Development Team

use smallvec::SmallVec;

use tquant_core::error::{Error, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Extents of a tensor, inline for up to six dimensions.
pub type Shape = SmallVec<[usize; 6]>;

/// Storage step per dimension.
pub type Strides = SmallVec<[isize; 6]>;

// =============================================================================
// Shape Utilities
// =============================================================================

/// Number of elements described by `shape` (1 for a 0-d shape).
#[must_use]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major (C-order) strides for `shape`.
#[must_use]
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    let mut strides: Strides = smallvec::smallvec![0; shape.len()];
    let mut step = 1isize;
    for (stride, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *stride = step;
        step *= dim.max(1) as isize;
    }
    strides
}

/// Returns true if `strides` walk `shape` in row-major order with no gaps.
///
/// Dimensions of extent 1 never move the cursor, so their stride is ignored.
/// Empty tensors are contiguous.
#[must_use]
pub fn is_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    if shape.len() != strides.len() {
        return false;
    }
    if numel(shape) == 0 {
        return true;
    }

    let mut expected = 1isize;
    for (&dim, &stride) in shape.iter().zip(strides.iter()).rev() {
        if dim == 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected *= dim as isize;
    }
    true
}

/// Storage offset of `indices` under `strides`.
#[must_use]
pub fn linear_index(indices: &[usize], strides: &[isize]) -> usize {
    debug_assert_eq!(indices.len(), strides.len());

    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx as isize * stride)
        .sum::<isize>() as usize
}

/// Multi-dimensional position of the `linear`-th element in row-major order.
#[must_use]
pub fn unravel_index(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    for (slot, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        *slot = linear % dim;
        linear /= dim;
    }
    indices
}

/// Product of the extents after `axis`.
///
/// In a contiguous buffer, consecutive runs of this many elements share the
/// same index along `axis`.
#[must_use]
pub fn inner_size(shape: &[usize], axis: usize) -> usize {
    shape.get(axis + 1..).map_or(1, numel)
}

// =============================================================================
// Shape Manipulation
// =============================================================================

/// Resolves a reshape target against the current shape.
///
/// One entry may be -1, in which case its extent is inferred.
pub fn reshape(old_shape: &[usize], new_shape: &[isize]) -> Result<Shape> {
    let total = numel(old_shape);
    let mut resolved = Shape::with_capacity(new_shape.len());
    let mut inferred = None;
    let mut known = 1usize;

    for (i, &dim) in new_shape.iter().enumerate() {
        match dim {
            -1 if inferred.is_some() => {
                return Err(Error::invalid_operation("reshape accepts at most one -1"));
            }
            -1 => {
                inferred = Some(i);
                resolved.push(0);
            }
            d if d < 0 => {
                return Err(Error::invalid_operation(format!(
                    "reshape extent {d} is negative"
                )));
            }
            d => {
                known *= d as usize;
                resolved.push(d as usize);
            }
        }
    }

    match inferred {
        Some(i) => {
            if known == 0 || total % known != 0 {
                return Err(Error::invalid_operation(format!(
                    "cannot infer reshape extent: {total} elements into {new_shape:?}"
                )));
            }
            resolved[i] = total / known;
        }
        None if known != total => return Err(Error::shape_mismatch(old_shape, &resolved)),
        None => {}
    }

    Ok(resolved)
}

/// Shape with `dim0` and `dim1` exchanged.
pub fn transpose_shape(shape: &[usize], dim0: usize, dim1: usize) -> Result<Shape> {
    let ndim = shape.len();
    for dim in [dim0, dim1] {
        if dim >= ndim {
            return Err(Error::InvalidDimension {
                index: dim as i64,
                ndim,
            });
        }
    }

    let mut swapped = Shape::from_slice(shape);
    swapped.swap(dim0, dim1);
    Ok(swapped)
}

/// Strides with `dim0` and `dim1` exchanged. Dimensions must be in range.
#[must_use]
pub fn transpose_strides(strides: &[isize], dim0: usize, dim1: usize) -> Strides {
    let mut swapped = Strides::from_slice(strides);
    swapped.swap(dim0, dim1);
    swapped
}

// =============================================================================
// Validation
// =============================================================================

/// Maps a possibly negative dimension onto `0..ndim`.
///
/// `-1` names the last dimension.
pub fn normalize_dim(dim: i64, ndim: usize) -> Result<usize> {
    let signed_ndim = ndim as i64;
    let resolved = if dim < 0 { dim + signed_ndim } else { dim };

    if (0..signed_ndim).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(Error::InvalidDimension { index: dim, ndim })
    }
}

/// Checks that `indices` address an element of `shape`.
pub fn validate_indices(indices: &[usize], shape: &[usize]) -> Result<()> {
    if indices.len() != shape.len() {
        return Err(Error::invalid_operation(format!(
            "expected {} indices, got {}",
            shape.len(),
            indices.len()
        )));
    }

    match indices.iter().zip(shape.iter()).find(|(&idx, &dim)| idx >= dim) {
        Some((&index, &size)) => Err(Error::IndexOutOfBounds { index, size }),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
