//! tquant Tensor - Strided N-Dimensional Arrays
//!
//! This crate provides the `Tensor` type the quantization simulator operates
//! on. Tensors are dense, row-major by default, resident on one device, and
//! share storage between views so that transposed or permuted inputs can be
//! told apart from contiguous ones.
//!
//! # Key Features
//! - N-dimensional tensor with arbitrary shape and strides
//! - Zero-copy views (transpose, permute, reshape of contiguous data)
//! - Explicit device transfer between CPU and accelerator
//! - Element-wise kernels dispatched to the owning device's backend
//!
//! # Example
//! ```rust
//! use tquant_tensor::{Device, Tensor};
//!
//! let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! let on_accel = t.to_device(Device::Accelerator(0)).unwrap();
//! on_accel.apply_indexed_(|_, x| x * 2.0).unwrap();
//! assert_eq!(on_accel.to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]
#![allow(clippy::needless_pass_by_value)]

// =============================================================================
// Modules
// =============================================================================

pub mod creation;
pub mod shape;
pub mod tensor;

// =============================================================================
// Re-exports
// =============================================================================

pub use creation::*;
pub use shape::{Shape, Strides};
pub use tensor::Tensor;
pub use tquant_core::{DType, Device, Error, Result};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::shape::{Shape, Strides};
    pub use crate::tensor::Tensor;
    pub use crate::{full, rand, randn, zeros};
    pub use tquant_core::{DType, Device, Error, Result};
}
