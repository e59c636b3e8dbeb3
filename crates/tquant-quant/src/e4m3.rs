//! E4M3 Emulation
//!
//! Rounds values to the nearest number representable in the 8-bit e4m3
//! floating-point format (1 sign bit, 4 exponent bits with bias 7, 3 mantissa
//! bits, no infinities) and returns them as ordinary floats.
//!
//! Rounding is half-to-even. Magnitudes past [`E4M3::MAX`], infinities
//! included, saturate to `±448`. Zeros keep their sign and NaN stays NaN.
//!
//! @version 0.1.0
//! @author tquant Development Team

use tracing::debug;

use tquant_core::{DType, Float};
use tquant_tensor::Tensor;

use crate::capabilities::Capabilities;
use crate::error::{QuantError, QuantResult};

// =============================================================================
// Format Constants
// =============================================================================

/// Parameters of the e4m3 format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E4M3;

impl E4M3 {
    /// Largest finite magnitude, `1.75 * 2^8`.
    pub const MAX: f64 = 448.0;
    /// Smallest normal magnitude, `2^-6`.
    pub const MIN_NORMAL: f64 = 0.015_625;
    /// Smallest subnormal magnitude, `2^-9`.
    pub const MIN_SUBNORMAL: f64 = 0.001_953_125;
    /// Exponent bias.
    pub const EXPONENT_BIAS: i32 = 7;
    /// Explicit mantissa bits.
    pub const MANTISSA_BITS: u32 = 3;
}

/// `2^k` for exponents in the normal f64 range.
#[inline]
fn exp2i(k: i32) -> f64 {
    f64::from_bits(((k + 1023) as u64) << 52)
}

/// Rounds `x` to the nearest e4m3 value.
///
/// ```rust
/// use tquant_quant::round_to_e4m3;
///
/// assert_eq!(round_to_e4m3(1.0), 1.0);
/// assert_eq!(round_to_e4m3(1.0625), 1.0);   // tie, even mantissa
/// assert_eq!(round_to_e4m3(1.1875), 1.25);  // tie, rounds up to even
/// assert_eq!(round_to_e4m3(1e6), 448.0);
/// ```
pub fn round_to_e4m3(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 {
        return x;
    }

    let mag = x.abs();
    if mag >= E4M3::MAX {
        return E4M3::MAX.copysign(x);
    }

    // Spacing of representable values around `mag`
    let quantum = if mag < E4M3::MIN_NORMAL {
        E4M3::MIN_SUBNORMAL
    } else {
        let exponent = ((mag.to_bits() >> 52) & 0x7ff) as i32 - 1023;
        exp2i(exponent - E4M3::MANTISSA_BITS as i32)
    };

    let rounded = ((mag / quantum).round_ties_even() * quantum).min(E4M3::MAX);
    rounded.copysign(x)
}

// =============================================================================
// Tensor Entry Point
// =============================================================================

/// Returns a copy of `tensor` with every element rounded to e4m3, using the
/// given capabilities.
///
/// Accelerator tensors may have any float dtype and layout. CPU tensors run
/// sequentially and must be contiguous f32.
pub fn fake_e4m3_with<T: Float>(caps: &Capabilities, tensor: &Tensor<T>) -> QuantResult<Tensor<T>> {
    debug!(
        shape = ?tensor.shape(),
        device = %tensor.device(),
        dtype = %tensor.dtype(),
        "fake_e4m3"
    );

    if !caps.e4m3 {
        return Err(QuantError::NotSupported(
            "e4m3 emulation is not available in this process".to_string(),
        ));
    }

    if !tensor.device().is_accelerator() {
        if T::DTYPE != DType::F32 {
            return Err(QuantError::DTypeMismatch {
                expected: DType::F32,
                actual: T::DTYPE,
            });
        }
        if !tensor.is_contiguous() {
            return Err(QuantError::NotContiguous);
        }
    }

    let output = tensor.clone_deep();
    output.apply_indexed_(|_, x| T::from_f64_value(round_to_e4m3(x.to_f64_value())))?;
    Ok(output)
}

/// Returns a copy of `tensor` with every element rounded to e4m3.
///
/// Fails with `NotSupported` when the process-wide capabilities exclude
/// e4m3.
pub fn fake_e4m3<T: Float>(tensor: &Tensor<T>) -> QuantResult<Tensor<T>> {
    fake_e4m3_with(Capabilities::global(), tensor)
}

// =============================================================================
// Tests
// =============================================================================
