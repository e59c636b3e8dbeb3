//! tquant Core - Foundation Layer for the tquant Quantization Simulator
//!
//! This crate provides the core abstractions that the fake-quantization
//! engine runs on. It handles device residency, memory storage, data types,
//! and the compute backends that execute elementwise kernels.
//!
//! # Key Features
//! - Device abstraction (general-memory CPU, data-parallel accelerator)
//! - Type-safe data type system (f32, f64)
//! - Reference-counted storage shared between tensor views
//! - Sequential and thread-pool backends behind one dispatch function
//!
//! # Example
//! ```rust
//! use tquant_core::{Device, Storage};
//!
//! let device = Device::Cpu;
//! let storage = Storage::<f32>::zeros(1024, device);
//! assert_eq!(storage.len(), 1024);
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric allowances
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
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unused_self)]

// =============================================================================
// Modules
// =============================================================================

pub mod backends;
pub mod device;
pub mod dtype;
pub mod error;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use backends::{AccelBackend, Backend, CpuBackend};
pub use device::{Device, DeviceCapabilities};
pub use dtype::{DType, Float, Numeric, Scalar};
pub use error::{Error, Result};
pub use storage::Storage;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::device::Device;
    pub use crate::dtype::{DType, Float, Numeric, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::storage::Storage;
}
