//! Fake-Quantization Kernel
//!
//! The element-wise arithmetic shared by the per-tensor and per-axis paths,
//! plus the argument checks both run before touching any data.
//!
//! For an element `x` with grid bound `b` and clipping magnitude `amax`:
//!
//! ```text
//! scale = b / amax
//! q     = round_half_even(clamp(x * scale, lo, b))   lo = -b (signed) or 0
//! out   = q / scale
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

use tquant_core::{Device, Float};
use tquant_tensor::Tensor;

use crate::config::QuantizationConfig;
use crate::error::{QuantError, QuantResult};

/// Amax values below this collapse the grid to zero.
pub const AMAX_EPSILON: f64 = f32::EPSILON as f64;

// =============================================================================
// Grid
// =============================================================================

/// Quantization grid for one amax value, precomputed in the element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Grid<T: Float> {
    scale: T,
    lo: T,
    hi: T,
    degenerate: bool,
}

impl<T: Float> Grid<T> {
    /// Builds the grid for `amax`, which must already be validated.
    pub(crate) fn new(bound: f64, amax: f64, is_unsigned: bool) -> Self {
        let hi = T::from_f64_value(bound);
        let amax_t = T::from_f64_value(amax);
        Self {
            scale: hi / amax_t,
            lo: if is_unsigned { T::ZERO } else { -hi },
            hi,
            degenerate: amax < AMAX_EPSILON,
        }
    }

    /// Snaps `x` onto the grid and maps it back to the real line.
    ///
    /// NaN propagates; infinities clamp to the grid edges.
    #[inline]
    pub(crate) fn apply(&self, x: T) -> T {
        if self.degenerate {
            return T::ZERO;
        }
        let scaled = x * self.scale;
        let clamped = if scaled < self.lo {
            self.lo
        } else if scaled > self.hi {
            self.hi
        } else {
            scaled
        };
        clamped.round_ties_even_value() / self.scale
    }
}

// =============================================================================
// Scalar Entry Point
// =============================================================================

/// Fake-quantizes a single value.
///
/// Uses the same arithmetic as the tensor kernels, so
/// `fake_quant_value(x, a, c)` equals the corresponding element of
/// `fake_quant` on a tensor containing `x` with amax `a`.
pub fn fake_quant_value<T: Float>(x: T, amax: T, config: QuantizationConfig) -> QuantResult<T> {
    let bound = config.bound()?;
    let amax = check_amax_value(0, amax)?;
    Ok(Grid::<T>::new(bound, amax, config.is_unsigned).apply(x))
}

// =============================================================================
// Argument Checks
// =============================================================================

/// Requires the tensor to live on an accelerator.
pub(crate) fn require_accelerator<T: Float>(tensor: &Tensor<T>) -> QuantResult<()> {
    let device = tensor.device();
    if device.is_accelerator() {
        Ok(())
    } else {
        Err(QuantError::DeviceMismatch {
            expected: Device::Accelerator(0),
            actual: device,
        })
    }
}

fn check_amax_value<T: Float>(index: usize, value: T) -> QuantResult<f64> {
    let value = value.to_f64_value();
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(QuantError::InvalidAmax { index, value })
    }
}

/// Reads `amax` as exactly `expected` finite, non-negative values.
///
/// The amax tensor may have any shape and live on any device; only its
/// element count matters.
pub(crate) fn read_amax<T: Float>(amax: &Tensor<T>, expected: usize) -> QuantResult<Vec<f64>> {
    let actual = amax.numel();
    if actual != expected {
        return Err(QuantError::AmaxCount { expected, actual });
    }

    amax.to_vec()
        .into_iter()
        .enumerate()
        .map(|(i, v)| check_amax_value(i, v))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_basic() {
        // bound 127, amax 127 -> scale 1
        let grid = Grid::<f32>::new(127.0, 127.0, false);
        assert_eq!(grid.apply(0.4), 0.0);
        assert_eq!(grid.apply(1.5), 2.0);
        assert_eq!(grid.apply(2.5), 2.0);
        assert_eq!(grid.apply(-3.5), -4.0);
        assert_eq!(grid.apply(1000.0), 127.0);
        assert_eq!(grid.apply(-1000.0), -127.0);
    }

    #[test]
    fn test_grid_unsigned_clamps_negatives() {
        let grid = Grid::<f32>::new(255.0, 1.0, true);
        assert_eq!(grid.apply(-0.7), 0.0);
        assert_eq!(grid.apply(2.0), 1.0);
    }

    #[test]
    fn test_grid_special_values() {
        let grid = Grid::<f64>::new(127.0, 2.0, false);
        assert!(grid.apply(f64::NAN).is_nan());
        assert_eq!(grid.apply(f64::INFINITY), 2.0);
        assert_eq!(grid.apply(f64::NEG_INFINITY), -2.0);
    }

    #[test]
    fn test_degenerate_amax() {
        let grid = Grid::<f32>::new(127.0, 0.0, false);
        assert_eq!(grid.apply(5.0), 0.0);
        assert_eq!(grid.apply(f32::NAN), 0.0);

        let tiny = Grid::<f32>::new(127.0, 1e-9, false);
        assert_eq!(tiny.apply(1e-9), 0.0);
    }

    #[test]
    fn test_fake_quant_value() {
        let config = QuantizationConfig::int8();
        let y = fake_quant_value(0.5_f32, 1.0, config).unwrap();
        assert!((y - 64.0 / 127.0).abs() < 1e-6);

        assert_eq!(
            fake_quant_value(0.5_f32, -1.0, config),
            Err(QuantError::InvalidAmax {
                index: 0,
                value: -1.0
            })
        );
        assert!(fake_quant_value(0.5_f32, f32::INFINITY, config).is_err());
    }

    #[test]
    fn test_read_amax() {
        let amax = Tensor::from_vec(vec![1.0_f32, 2.0], &[2]).unwrap();
        assert_eq!(read_amax(&amax, 2).unwrap(), vec![1.0, 2.0]);
        assert_eq!(
            read_amax(&amax, 3),
            Err(QuantError::AmaxCount {
                expected: 3,
                actual: 2
            })
        );

        let bad = Tensor::from_vec(vec![1.0_f32, f32::NAN], &[1, 2]).unwrap();
        assert!(matches!(
            read_amax(&bad, 2),
            Err(QuantError::InvalidAmax { index: 1, .. })
        ));
    }

    #[test]
    fn test_require_accelerator() {
        let cpu = Tensor::<f32>::zeros(&[2]);
        assert_eq!(
            require_accelerator(&cpu),
            Err(QuantError::DeviceMismatch {
                expected: Device::Accelerator(0),
                actual: Device::Cpu,
            })
        );
        assert!(require_accelerator(&cpu.accelerator().unwrap()).is_ok());
    }
}
