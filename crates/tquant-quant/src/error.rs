//! Quantization Error Types
//!
//! Error types for fake-quantization operations. Every check runs before any
//! element is written, so an `Err` always leaves the caller's tensor as it was.
//!
//! @version 0.1.0
//! @author tquant Development Team

use thiserror::Error;

use tquant_core::{DType, Device};

/// Result type for quantization operations.
pub type QuantResult<T> = Result<T, QuantError>;

/// Errors that can occur during fake quantization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantError {
    /// Tensor is not resident on the device the operation runs on.
    #[error("Device mismatch: expected {expected}, got {actual}")]
    DeviceMismatch {
        /// Device the operation requires.
        expected: Device,
        /// Device the tensor lives on.
        actual: Device,
    },

    /// In-place or CPU path handed a strided view.
    #[error("Tensor must be contiguous")]
    NotContiguous,

    /// Amax tensor holds the wrong number of values.
    #[error("Amax count mismatch: expected {expected}, got {actual}")]
    AmaxCount {
        /// Number of values the operation needs.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Amax value is negative, infinite or NaN.
    #[error("Invalid amax at index {index}: {value} (must be finite and non-negative)")]
    InvalidAmax {
        /// Position of the offending value in the amax tensor.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Quantization axis does not exist.
    #[error("Invalid axis {axis} for tensor with {ndim} dimensions")]
    InvalidAxis {
        /// Axis as supplied (may be negative).
        axis: i64,
        /// Number of dimensions in the tensor.
        ndim: usize,
    },

    /// Bit width outside the supported range.
    #[error("Invalid bit width: {bits} (must be in 1..={max})")]
    InvalidBitWidth {
        /// Requested bit width.
        bits: u32,
        /// Largest supported bit width.
        max: u32,
    },

    /// Configuration leaves no quantization level.
    #[error("Empty quantization range: {bits}-bit signed narrow range has bound 0")]
    EmptyRange {
        /// Requested bit width.
        bits: u32,
    },

    /// Element type not accepted on this path.
    #[error("DType mismatch: expected {expected}, got {actual}")]
    DTypeMismatch {
        /// Type the path accepts.
        expected: DType,
        /// Type of the tensor.
        actual: DType,
    },

    /// Operation unavailable in this process.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Tensor layer failure.
    #[error("Tensor error: {0}")]
    Tensor(#[from] tquant_core::Error),
}

impl QuantError {
    /// Returns true if the error was caused by a bad argument.
    ///
    /// These are the failures a caller can fix by changing what it passes.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::DeviceMismatch { .. }
                | Self::NotContiguous
                | Self::AmaxCount { .. }
                | Self::InvalidAmax { .. }
                | Self::InvalidAxis { .. }
                | Self::InvalidBitWidth { .. }
                | Self::EmptyRange { .. }
                | Self::DTypeMismatch { .. }
        )
    }

    /// Returns true if the operation is unavailable in this process.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_family() {
        assert!(QuantError::NotContiguous.is_invalid_argument());
        assert!(QuantError::AmaxCount {
            expected: 3,
            actual: 2
        }
        .is_invalid_argument());
        assert!(!QuantError::NotSupported("e4m3".into()).is_invalid_argument());
        assert!(!QuantError::Tensor(tquant_core::Error::NotContiguous).is_invalid_argument());
    }

    #[test]
    fn test_not_supported() {
        let err = QuantError::NotSupported("e4m3 emulation is disabled".into());
        assert!(err.is_not_supported());
        assert_eq!(err.to_string(), "Not supported: e4m3 emulation is disabled");
    }

    #[test]
    fn test_from_core_error() {
        let err: QuantError = tquant_core::Error::shape_mismatch(&[2], &[3]).into();
        assert!(matches!(err, QuantError::Tensor(_)));
    }

    #[test]
    fn test_display_names_the_check() {
        let err = QuantError::InvalidAmax {
            index: 1,
            value: -0.5,
        };
        assert!(err.to_string().contains("index 1"));

        let err = QuantError::DeviceMismatch {
            expected: Device::Accelerator(0),
            actual: Device::Cpu,
        };
        assert_eq!(err.to_string(), "Device mismatch: expected accel:0, got cpu");
    }
}
