//! Calibration for Fake Quantization
//!
//! Derives amax inputs from observed data. The per-tensor form returns a
//! 0-dimensional tensor, the per-axis form a 1-D tensor with one entry per
//! slice; both can be passed straight to the quantizers.
//!
//! NaN elements are ignored. Empty inputs (or empty slices) calibrate to 0,
//! which the quantizers treat as a degenerate grid.
//!
//! @version 0.1.0
//! @author tquant Development Team

use rayon::prelude::*;
use tracing::debug;

use tquant_core::Float;
use tquant_tensor::shape::{inner_size, normalize_dim};
use tquant_tensor::Tensor;

use crate::error::{QuantError, QuantResult};

/// Larger of two magnitudes, skipping NaN.
#[inline]
fn abs_max<T: Float>(acc: T, x: T) -> T {
    let a = x.abs();
    if a > acc {
        a
    } else {
        acc
    }
}

/// Returns the largest magnitude in `tensor` as a
/// 0-dimensional tensor on the same device.
///
/// # Example
/// ```rust
/// use tquant_quant::max_abs;
/// use tquant_tensor::Tensor;
///
/// let x = Tensor::from_vec(vec![0.5_f32, -3.0, 2.0], &[3]).unwrap();
/// assert_eq!(max_abs(&x).unwrap().item().unwrap(), 3.0);
/// ```
pub fn max_abs<T: Float>(tensor: &Tensor<T>) -> QuantResult<Tensor<T>> {
    let data = tensor.to_vec();
    let amax = data
        .par_iter()
        .fold(|| T::ZERO, |acc, &x| abs_max(acc, x))
        .reduce(|| T::ZERO, abs_max::<T>);

    debug!(shape = ?tensor.shape(), amax = amax.to_f64_value(), "max_abs");
    Ok(Tensor::from_vec_on(vec![amax], &[], tensor.device())?)
}

/// Returns the largest magnitude of each slice along `axis` as a 1-D tensor
/// on the same device.
pub fn max_abs_along_axis<T: Float>(tensor: &Tensor<T>, axis: i64) -> QuantResult<Tensor<T>> {
    let axis_idx = normalize_dim(axis, tensor.ndim()).map_err(|_| QuantError::InvalidAxis {
        axis,
        ndim: tensor.ndim(),
    })?;
    let extent = tensor.shape()[axis_idx];
    let inner = inner_size(tensor.shape(), axis_idx);
    let data = tensor.to_vec();

    // Row-major chunk `c` of length `inner` lies entirely in slice `c % extent`
    let amax: Vec<T> = if data.is_empty() {
        vec![T::ZERO; extent]
    } else {
        data.par_chunks(inner)
            .enumerate()
            .fold(
                || vec![T::ZERO; extent],
                |mut acc, (c, chunk)| {
                    let slot = &mut acc[c % extent];
                    *slot = chunk.iter().fold(*slot, |m, &x| abs_max(m, x));
                    acc
                },
            )
            .reduce(
                || vec![T::ZERO; extent],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x = abs_max(*x, y);
                    }
                    a
                },
            )
    };

    debug!(shape = ?tensor.shape(), axis = axis_idx, slices = extent, "max_abs_along_axis");
    Ok(Tensor::from_vec_on(amax, &[extent], tensor.device())?)
}

// =============================================================================
// Tests
// =============================================================================
