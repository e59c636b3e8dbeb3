//! Tensor Creation Functions
//!
//! Factory functions for CPU tensors: constant fills and random
//! initialisation. Move the result to an accelerator with
//! [`Tensor::to_device`].
//!
//! @version 0.1.0
//! @author tquant Development Team

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use rand_distr::StandardNormal;

use tquant_core::dtype::{Float, Scalar};
use tquant_core::storage::Storage;
use tquant_core::Device;

use crate::shape::{numel, Shape};
use crate::tensor::Tensor;

fn from_data<T: Scalar>(data: Vec<T>, shape: &[usize]) -> Tensor<T> {
    debug_assert_eq!(data.len(), numel(shape));
    Tensor::from_parts(Storage::from_vec(data, Device::Cpu), Shape::from_slice(shape))
}

// =============================================================================
// Constant Initialization
// =============================================================================

/// Creates a tensor filled with zeros.
///
/// # Example
/// ```rust
/// use tquant_tensor::zeros;
/// let t = zeros::<f32>(&[2, 3]);
/// assert_eq!(t.numel(), 6);
/// ```
#[must_use]
pub fn zeros<T: Scalar>(shape: &[usize]) -> Tensor<T> {
    from_data(vec![T::zeroed(); numel(shape)], shape)
}

/// Creates a tensor filled with `value`.
pub fn full<T: Scalar>(shape: &[usize], value: T) -> Tensor<T> {
    from_data(vec![value; numel(shape)], shape)
}

// =============================================================================
// Random Initialization
// =============================================================================

/// Creates a tensor of uniform random values in [0, 1).
#[must_use]
pub fn rand<T: Float>(shape: &[usize]) -> Tensor<T>
where
    Standard: Distribution<T>,
{
    let mut rng = rand::thread_rng();
    let data: Vec<T> = (0..numel(shape)).map(|_| rng.gen()).collect();
    from_data(data, shape)
}

/// Creates a tensor of standard-normal random values.
#[must_use]
pub fn randn<T: Float>(shape: &[usize]) -> Tensor<T>
where
    StandardNormal: Distribution<T>,
{
    let mut rng = rand::thread_rng();
    let data: Vec<T> = (0..numel(shape))
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    from_data(data, shape)
}

// =============================================================================
// Tests
// =============================================================================
