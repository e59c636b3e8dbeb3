//! Tensor - Strided N-Dimensional Array
//!
//! `Tensor<T>` pairs a shared [`Storage`] buffer with a shape, strides and an
//! offset. Views (transpose, permute, reshape of contiguous data) share the
//! buffer; [`Tensor::contiguous`] and [`Tensor::clone_deep`] copy it.
//!
//! Element-wise kernels run through [`Tensor::apply_indexed_`], which
//! dispatches to the backend of the device the tensor lives on.
//!
//! @version 0.1.0
//! @author tquant Development Team

use core::fmt;

use tquant_core::backends;
use tquant_core::dtype::{DType, Float, Scalar};
use tquant_core::error::{Error, Result};
use tquant_core::storage::Storage;
use tquant_core::Device;

use crate::shape::{
    contiguous_strides, is_contiguous, linear_index, normalize_dim, numel, reshape,
    transpose_shape, transpose_strides, unravel_index, validate_indices, Shape, Strides,
};

// =============================================================================
// Tensor Struct
// =============================================================================

/// An N-dimensional array of scalars resident on one device.
///
/// Cloning a tensor produces another view of the same storage.
#[derive(Clone)]
pub struct Tensor<T: Scalar> {
    /// Underlying data storage (reference-counted).
    pub(crate) storage: Storage<T>,
    /// Extent of each dimension.
    pub(crate) shape: Shape,
    /// Storage step of each dimension.
    pub(crate) strides: Strides,
    /// Position of element zero in storage.
    pub(crate) offset: usize,
}

impl<T: Scalar> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Wraps contiguous storage whose length is already known to match.
    pub(crate) fn from_parts(storage: Storage<T>, shape: Shape) -> Self {
        let strides = contiguous_strides(&shape);
        Self {
            storage,
            shape,
            strides,
            offset: 0,
        }
    }

    /// Creates a row-major tensor over existing storage.
    pub fn from_storage(storage: Storage<T>, shape: &[usize]) -> Result<Self> {
        if numel(shape) != storage.len() {
            return Err(Error::shape_mismatch(&[storage.len()], shape));
        }
        Ok(Self::from_parts(storage, Shape::from_slice(shape)))
    }

    /// Creates a CPU tensor from a vector.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        Self::from_vec_on(data, shape, Device::Cpu)
    }

    /// Creates a tensor from a vector, placing it directly on `device`.
    pub fn from_vec_on(data: Vec<T>, shape: &[usize], device: Device) -> Result<Self> {
        if !device.is_available() {
            return Err(Error::DeviceNotAvailable { device });
        }
        Self::from_storage(Storage::from_vec(data, device), shape)
    }

    /// Creates a CPU tensor by copying a slice.
    pub fn from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Creates a 0-dimensional CPU tensor.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(Storage::from_vec(vec![value], Device::Cpu), Shape::new())
    }

    /// Creates a tensor filled with zeros.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        crate::creation::zeros(shape)
    }

    /// Creates a tensor filled with a constant value.
    #[must_use]
    pub fn full(shape: &[usize], value: T) -> Self {
        crate::creation::full(shape, value)
    }

    /// Creates a tensor with standard-normal random values.
    #[must_use]
    pub fn randn(shape: &[usize]) -> Self
    where
        T: Float,
        rand_distr::StandardNormal: rand::distributions::Distribution<T>,
    {
        crate::creation::randn(shape)
    }

    /// Creates a tensor with uniform random values in [0, 1).
    #[must_use]
    pub fn rand(shape: &[usize]) -> Self
    where
        T: Float,
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        crate::creation::rand(shape)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the strides of the tensor.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns true if the tensor has zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Returns the extent of one dimension (negative indices count from the end).
    pub fn size(&self, dim: i64) -> Result<usize> {
        let idx = normalize_dim(dim, self.ndim())?;
        Ok(self.shape[idx])
    }

    /// Returns the device this tensor is on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.storage.device()
    }

    /// Returns the element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns true if the elements are laid out row-major without gaps.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.shape, &self.strides)
    }

    /// Returns true if this tensor is 0-dimensional.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        validate_indices(indices, &self.shape)?;
        let pos = self.offset + linear_index(indices, &self.strides);
        Ok(self.storage.as_slice()[pos])
    }

    /// Overwrites the element at the given indices.
    ///
    /// Every view sharing this storage observes the write.
    pub fn set(&self, indices: &[usize], value: T) -> Result<()> {
        validate_indices(indices, &self.shape)?;
        let pos = self.offset + linear_index(indices, &self.strides);
        self.storage.as_slice_mut()[pos] = value;
        Ok(())
    }

    /// Returns the value of a single-element tensor.
    pub fn item(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::invalid_operation(format!(
                "item() needs exactly one element, tensor has {}",
                self.numel()
            )));
        }
        self.get(&vec![0; self.ndim()])
    }

    /// Copies the elements out in row-major order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let storage = self.storage.as_slice();
        if self.is_contiguous() {
            return storage[self.offset..self.offset + self.numel()].to_vec();
        }

        (0..self.numel())
            .map(|i| {
                let indices = unravel_index(i, &self.shape);
                storage[self.offset + linear_index(&indices, &self.strides)]
            })
            .collect()
    }

    /// Borrows the elements as one row-major slice.
    ///
    /// Fails with `NotContiguous` for strided views.
    pub fn with_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> Result<R> {
        if !self.is_contiguous() {
            return Err(Error::NotContiguous);
        }
        let storage = self.storage.as_slice();
        Ok(f(&storage[self.offset..self.offset + self.numel()]))
    }

    /// Mutably borrows the elements as one row-major slice.
    ///
    /// The storage write lock is held while `f` runs, so `f` must not touch
    /// any tensor sharing this storage. Fails with `NotContiguous` for strided
    /// views.
    pub fn with_slice_mut<R>(&self, f: impl FnOnce(&mut [T]) -> R) -> Result<R> {
        if !self.is_contiguous() {
            return Err(Error::NotContiguous);
        }
        let len = self.numel();
        let mut storage = self.storage.as_slice_mut();
        Ok(f(&mut storage[self.offset..self.offset + len]))
    }

    /// Replaces element `k` (row-major position) with `op(k, value)` on the
    /// tensor's own device.
    pub fn apply_indexed_<F>(&self, op: F) -> Result<()>
    where
        F: Fn(usize, T) -> T + Send + Sync,
    {
        let device = self.device();
        self.with_slice_mut(|data| backends::map_indexed(device, data, op))?
    }

    // =========================================================================
    // Shape Operations
    // =========================================================================

    /// Returns a tensor with the same elements under a new shape.
    ///
    /// Contiguous tensors are reshaped as views; strided ones are copied
    /// first. One extent may be -1 to infer it.
    pub fn reshape(&self, new_shape: &[isize]) -> Result<Self> {
        let shape = reshape(&self.shape, new_shape)?;
        let base = self.contiguous();
        Ok(Self {
            strides: contiguous_strides(&shape),
            shape,
            storage: base.storage,
            offset: base.offset,
        })
    }

    /// Swaps two dimensions without copying.
    pub fn transpose(&self, dim0: i64, dim1: i64) -> Result<Self> {
        let d0 = normalize_dim(dim0, self.ndim())?;
        let d1 = normalize_dim(dim1, self.ndim())?;

        Ok(Self {
            storage: self.storage.clone(),
            shape: transpose_shape(&self.shape, d0, d1)?,
            strides: transpose_strides(&self.strides, d0, d1),
            offset: self.offset,
        })
    }

    /// Transpose of a 2-D tensor.
    pub fn t(&self) -> Result<Self> {
        if self.ndim() != 2 {
            return Err(Error::invalid_operation(format!(
                "t() needs a 2-D tensor, got {} dimensions",
                self.ndim()
            )));
        }
        self.transpose(0, 1)
    }

    /// Reorders all dimensions without copying.
    pub fn permute(&self, dims: &[usize]) -> Result<Self> {
        let ndim = self.ndim();
        if dims.len() != ndim {
            return Err(Error::invalid_operation(format!(
                "permute needs {ndim} dimensions, got {}",
                dims.len()
            )));
        }

        let mut seen = vec![false; ndim];
        for &d in dims {
            if d >= ndim {
                return Err(Error::InvalidDimension {
                    index: d as i64,
                    ndim,
                });
            }
            if std::mem::replace(&mut seen[d], true) {
                return Err(Error::invalid_operation(format!(
                    "dimension {d} repeated in permute"
                )));
            }
        }

        Ok(Self {
            storage: self.storage.clone(),
            shape: dims.iter().map(|&d| self.shape[d]).collect(),
            strides: dims.iter().map(|&d| self.strides[d]).collect(),
            offset: self.offset,
        })
    }

    /// Returns a row-major tensor on the same device.
    ///
    /// Already-contiguous tensors are returned as a view; otherwise the
    /// elements are gathered into fresh storage.
    #[must_use]
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() {
            return self.clone();
        }
        let storage = Storage::from_vec(self.to_vec(), self.device());
        Self::from_parts(storage, self.shape.clone())
    }

    // =========================================================================
    // Device Operations
    // =========================================================================

    /// Transfers the tensor to `device`.
    ///
    /// The result is contiguous. Transferring to the current device returns
    /// a view.
    pub fn to_device(&self, device: Device) -> Result<Self> {
        if self.device() == device {
            return Ok(self.clone());
        }

        let data = self.to_vec();
        let storage = Storage::from_vec(data, self.device()).to_device(device)?;
        tracing::trace!(shape = ?self.shape(), from = %self.device(), to = %device, "tensor transfer");
        Ok(Self::from_parts(storage, self.shape.clone()))
    }

    /// Transfers to the CPU.
    pub fn cpu(&self) -> Result<Self> {
        self.to_device(Device::Cpu)
    }

    /// Transfers to the first accelerator.
    pub fn accelerator(&self) -> Result<Self> {
        self.to_device(Device::Accelerator(0))
    }

    // =========================================================================
    // Deep Copy
    // =========================================================================

    /// Creates a contiguous copy with its own storage on the same device.
    #[must_use]
    pub fn clone_deep(&self) -> Self {
        let storage = Storage::from_vec(self.to_vec(), self.device());
        Self::from_parts(storage, self.shape.clone())
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl<T: Scalar> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={:?}, dtype={}, device={}",
            self.shape(),
            self.dtype(),
            self.device()
        )?;
        if self.numel() <= 10 {
            write!(f, ", data={:?}", self.to_vec())?;
        }
        write!(f, ")")
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ndim() {
            0 => match self.item() {
                Ok(value) => write!(f, "{value}"),
                Err(_) => write!(f, "[]"),
            },
            1 => {
                write!(f, "[")?;
                for (i, val) in self.to_vec().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{val}")?;
                }
                write!(f, "]")
            }
            _ => write!(f, "Tensor(shape={:?})", self.shape()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
