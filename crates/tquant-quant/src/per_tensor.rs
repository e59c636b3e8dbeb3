//! Per-Tensor Fake Quantization
//!
//! One amax value, one grid, applied to every element.
//!
//! @version 0.1.0
//! @author tquant Development Team

use tracing::debug;

use tquant_core::Float;
use tquant_tensor::Tensor;

use crate::config::QuantizationConfig;
use crate::error::{QuantError, QuantResult};
use crate::kernel::{read_amax, require_accelerator, Grid};

/// Validates amax and config and returns the grid to apply.
fn grid_for<T: Float>(amax: &Tensor<T>, config: QuantizationConfig) -> QuantResult<Grid<T>> {
    let amax = read_amax(amax, 1)?[0];
    let bound = config.bound()?;
    Ok(Grid::new(bound, amax, config.is_unsigned))
}

/// Fake-quantizes `tensor` in place.
///
/// The tensor must be contiguous and resident on an accelerator, and `amax`
/// must hold exactly one value. Every view sharing the tensor's storage
/// observes the result. On error the tensor is untouched.
///
/// # Example
/// ```rust
/// use tquant_quant::{fake_quant_inplace, QuantizationConfig};
/// use tquant_tensor::{Device, Tensor};
///
/// let x = Tensor::from_vec_on(vec![0.3_f32, -1.7, 2.2], &[3], Device::Accelerator(0)).unwrap();
/// let amax = Tensor::scalar(2.0_f32);
/// fake_quant_inplace(&x, &amax, QuantizationConfig::int4()).unwrap();
/// ```
pub fn fake_quant_inplace<T: Float>(
    tensor: &Tensor<T>,
    amax: &Tensor<T>,
    config: QuantizationConfig,
) -> QuantResult<()> {
    debug!(
        shape = ?tensor.shape(),
        device = %tensor.device(),
        bits = config.bit_width,
        unsigned = config.is_unsigned,
        "fake_quant_inplace"
    );

    require_accelerator(tensor)?;
    if !tensor.is_contiguous() {
        return Err(QuantError::NotContiguous);
    }
    let grid = grid_for(amax, config)?;

    tensor.apply_indexed_(move |_, x| grid.apply(x))?;
    Ok(())
}

/// Returns a fake-quantized copy of `tensor`.
///
/// Accepts any layout; the result is contiguous, has the same shape and
/// dtype, and lives on the same accelerator. The input is not modified.
pub fn fake_quant<T: Float>(
    tensor: &Tensor<T>,
    amax: &Tensor<T>,
    config: QuantizationConfig,
) -> QuantResult<Tensor<T>> {
    debug!(
        shape = ?tensor.shape(),
        device = %tensor.device(),
        contiguous = tensor.is_contiguous(),
        bits = config.bit_width,
        unsigned = config.is_unsigned,
        "fake_quant"
    );

    require_accelerator(tensor)?;
    let grid = grid_for(amax, config)?;

    let output = tensor.clone_deep();
    output.apply_indexed_(move |_, x| grid.apply(x))?;
    Ok(output)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tquant_tensor::Device;

    fn accel(data: Vec<f32>, shape: &[usize]) -> Tensor<f32> {
        Tensor::from_vec_on(data, shape, Device::Accelerator(0)).unwrap()
    }

    #[test]
    fn test_inplace_int8() {
        let x = accel(vec![0.0, 0.5, -0.5, 1.0, -2.0], &[5]);
        let amax = Tensor::scalar(1.0_f32);

        fake_quant_inplace(&x, &amax, QuantizationConfig::int8()).unwrap();

        let out = x.to_vec();
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 64.0 / 127.0).abs() < 1e-6);
        assert!((out[2] + 64.0 / 127.0).abs() < 1e-6);
        assert_eq!(out[3], 1.0);
        assert_eq!(out[4], -1.0);
    }

    #[test]
    fn test_inplace_rejects_strided() {
        let x = accel(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let view = x.t().unwrap();
        let amax = Tensor::scalar(6.0_f32);

        assert_eq!(
            fake_quant_inplace(&view, &amax, QuantizationConfig::default()),
            Err(QuantError::NotContiguous)
        );
        assert_eq!(x.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_requires_accelerator() {
        let x = Tensor::from_vec(vec![1.0_f32], &[1]).unwrap();
        let amax = Tensor::scalar(1.0_f32);
        let err = fake_quant(&x, &amax, QuantizationConfig::default()).unwrap_err();
        assert!(matches!(err, QuantError::DeviceMismatch { .. }));
        assert!(fake_quant_inplace(&x, &amax, QuantizationConfig::default()).is_err());
    }

    #[test]
    fn test_amax_must_be_single() {
        let x = accel(vec![1.0, 2.0], &[2]);
        let amax = Tensor::from_vec(vec![1.0_f32, 2.0], &[2]).unwrap();
        assert_eq!(
            fake_quant(&x, &amax, QuantizationConfig::default()).unwrap_err(),
            QuantError::AmaxCount {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_fake_quant_leaves_input() {
        let x = accel(vec![0.11, -0.27, 0.93], &[3]);
        let amax = Tensor::scalar(1.0_f32);

        let y = fake_quant(&x, &amax, QuantizationConfig::int4()).unwrap();

        assert_eq!(x.to_vec(), vec![0.11, -0.27, 0.93]);
        assert_eq!(y.device(), Device::Accelerator(0));
        let expected = [1.0 / 7.0, -2.0 / 7.0, 1.0];
        for (got, want) in y.to_vec().iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn test_fake_quant_strided_input() {
        let x = accel(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let view = x.t().unwrap();
        let amax = Tensor::scalar(8.0_f32);
        let config = QuantizationConfig::new(8, false, false);

        let y = fake_quant(&view, &amax, config).unwrap();

        assert_eq!(y.shape(), &[3, 2]);
        assert!(y.is_contiguous());
        // scale = 128 / 8 maps these integers exactly
        assert_eq!(y.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_zero_amax_zeroes_output() {
        let x = accel(vec![3.0, -1.0], &[2]);
        let amax = Tensor::scalar(0.0_f32);
        let y = fake_quant(&x, &amax, QuantizationConfig::default()).unwrap();
        assert_eq!(y.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_f64_tensor() {
        let x = Tensor::from_vec_on(vec![0.26_f64, -0.74], &[2], Device::Accelerator(0)).unwrap();
        let amax = Tensor::scalar(1.0_f64);
        let y = fake_quant(&x, &amax, QuantizationConfig::new(2, false, true)).unwrap();
        // bound 1: levels are -1, 0, 1
        assert_eq!(y.to_vec(), vec![0.0, -1.0]);
    }
}
