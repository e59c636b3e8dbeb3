//! Error Types - tquant Core Error Handling
//!
//! Error type shared by the storage, backend and tensor layers. Failures
//! raised here describe layout, residency or indexing problems; the
//! quantization crate wraps them in its own error type.
//!
//! @version 0.1.0
//! @author tquant Development Team

use thiserror::Error;

use crate::device::Device;
use crate::dtype::DType;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for tquant core and tensor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch between tensors or between a shape and its data.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Data type mismatch.
    #[error("DType mismatch: expected {expected}, got {actual}")]
    DTypeMismatch {
        /// The expected data type.
        expected: DType,
        /// The actual data type.
        actual: DType,
    },

    /// Tensor resides on the wrong device.
    #[error("Device mismatch: expected {expected}, got {actual}")]
    DeviceMismatch {
        /// The expected device.
        expected: Device,
        /// The actual device.
        actual: Device,
    },

    /// Invalid dimension index.
    #[error("Invalid dimension: index {index} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension index.
        index: i64,
        /// Number of dimensions in the tensor.
        ndim: usize,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: index {index} for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The size of the dimension.
        size: usize,
    },

    /// Device not available.
    #[error("Device not available: {device}")]
    DeviceNotAvailable {
        /// The unavailable device.
        device: Device,
    },

    /// Contiguous tensor required.
    #[error("Operation requires contiguous tensor")]
    NotContiguous,

    /// Invalid operation for the given tensor.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for tquant core operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
