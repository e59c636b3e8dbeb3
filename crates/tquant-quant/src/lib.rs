//! tquant Quant - Fake-Quantization Simulator
//!
//! Simulates quantizing floating-point tensors to low-bit integers (or to the
//! 8-bit e4m3 float format) and immediately dequantizing them, so that the
//! values carry quantization error while keeping their full storage width.
//!
//! - **Bound calculator**: integer grid bound from a [`QuantizationConfig`]
//! - **Per-tensor**: one amax for the whole tensor, in place or into a copy
//! - **Per-axis**: one amax per slice along an axis
//! - **E4M3**: round to the nearest e4m3 value, saturating at ±448
//!
//! Integer quantization runs on accelerator-resident tensors. E4M3 emulation
//! also has a sequential CPU path and is gated by runtime [`Capabilities`].
//!
//! # Example
//! ```rust
//! use tquant_quant::{fake_quant_per_axis, max_abs_along_axis, QuantizationConfig};
//! use tquant_tensor::{Device, Tensor};
//!
//! let w = Tensor::from_vec_on(vec![0.1_f32, -0.4, 2.0, 1.5], &[2, 2], Device::Accelerator(0))
//!     .unwrap();
//! let amax = max_abs_along_axis(&w, 0).unwrap();
//! let wq = fake_quant_per_axis(&w, &amax, 0, QuantizationConfig::int4()).unwrap();
//! assert_eq!(wq.shape(), &[2, 2]);
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

pub mod bound;
pub mod calibration;
pub mod capabilities;
pub mod config;
pub mod e4m3;
pub mod error;
pub mod kernel;
pub mod per_axis;
pub mod per_tensor;
pub mod simulator;
pub mod stats;

pub use bound::{bits_to_bound, MAX_BIT_WIDTH};
pub use calibration::{max_abs, max_abs_along_axis};
pub use capabilities::Capabilities;
pub use config::{QuantizationConfig, DEFAULT_BIT_WIDTH};
pub use e4m3::{fake_e4m3, fake_e4m3_with, round_to_e4m3, E4M3};
pub use error::{QuantError, QuantResult};
pub use kernel::{fake_quant_value, AMAX_EPSILON};
pub use per_axis::fake_quant_per_axis;
pub use per_tensor::{fake_quant, fake_quant_inplace};
pub use simulator::QuantSimulator;
pub use stats::{quantization_error, QuantizationStats};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuantizationConfig::default();
        assert_eq!(config.bit_width, DEFAULT_BIT_WIDTH);
        assert!(config.bit_width <= MAX_BIT_WIDTH);
        assert!(AMAX_EPSILON > 0.0);
    }
}
