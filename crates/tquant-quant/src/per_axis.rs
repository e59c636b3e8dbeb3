//! Per-Axis Fake Quantization
//!
//! Each slice along one axis gets its own amax and therefore its own grid,
//! as used for per-output-channel weight quantization.
//!
//! In a row-major buffer, element `k` lies in slice `(k / inner) % extent`,
//! where `extent` is the axis length and `inner` the product of the extents
//! after it.
//!
//! @version 0.1.0
//! @author tquant Development Team

use tracing::debug;

use tquant_core::Float;
use tquant_tensor::shape::{inner_size, normalize_dim};
use tquant_tensor::Tensor;

use crate::config::QuantizationConfig;
use crate::error::{QuantError, QuantResult};
use crate::kernel::{read_amax, require_accelerator, Grid};

/// Returns a copy of `tensor` fake-quantized slice by slice along `axis`.
///
/// `amax` must hold one value per slice (`tensor.size(axis)` values, any
/// shape). Negative axes count from the end. The input is not modified and
/// the result is contiguous on the same accelerator.
pub fn fake_quant_per_axis<T: Float>(
    tensor: &Tensor<T>,
    amax: &Tensor<T>,
    axis: i64,
    config: QuantizationConfig,
) -> QuantResult<Tensor<T>> {
    debug!(
        shape = ?tensor.shape(),
        device = %tensor.device(),
        axis,
        bits = config.bit_width,
        unsigned = config.is_unsigned,
        "fake_quant_per_axis"
    );

    require_accelerator(tensor)?;
    let axis_idx = normalize_dim(axis, tensor.ndim()).map_err(|_| QuantError::InvalidAxis {
        axis,
        ndim: tensor.ndim(),
    })?;
    let extent = tensor.shape()[axis_idx];
    let amax = read_amax(amax, extent)?;
    let bound = config.bound()?;

    let grids: Vec<Grid<T>> = amax
        .iter()
        .map(|&a| Grid::new(bound, a, config.is_unsigned))
        .collect();
    let inner = inner_size(tensor.shape(), axis_idx);

    let output = tensor.clone_deep();
    output.apply_indexed_(move |k, x| grids[(k / inner) % extent].apply(x))?;
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
    fn test_rows_use_their_own_amax() {
        // Row 0 clips at 1.0, row 1 at 4.0; int4 bound 7
        let x = accel(vec![0.5, 2.0, -3.0, 2.0, 3.9, -8.0], &[2, 3]);
        let amax = Tensor::from_vec(vec![1.0_f32, 4.0], &[2]).unwrap();

        let y = fake_quant_per_axis(&x, &amax, 0, QuantizationConfig::int4()).unwrap();
        let out = y.to_vec();

        let expected = [
            4.0 / 7.0,
            1.0,
            -1.0,
            16.0 / 7.0,
            4.0,
            -4.0,
        ];
        for (got, want) in out.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn test_last_axis_negative_index() {
        let x = accel(vec![1.0, 1.0, 1.0, 1.0], &[2, 2]);
        let amax = Tensor::from_vec(vec![1.0_f32, 0.0], &[2]).unwrap();

        let y = fake_quant_per_axis(&x, &amax, -1, QuantizationConfig::default()).unwrap();
        assert_eq!(y.to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_middle_axis() {
        let x = accel(vec![1.0; 12], &[2, 3, 2]);
        let amax = Tensor::from_vec(vec![1.0_f32, 2.0, 0.0], &[3]).unwrap();

        let y =
            fake_quant_per_axis(&x, &amax, 1, QuantizationConfig::new(8, false, false)).unwrap();
        let out = y.to_vec();

        for (k, &v) in out.iter().enumerate() {
            let slice = (k / 2) % 3;
            let want = if slice == 2 { 0.0 } else { 1.0 };
            assert!((v - want).abs() < 1e-6, "element {k}: {v}");
        }
    }

    #[test]
    fn test_amax_count_mismatch() {
        let x = accel(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let amax = Tensor::from_vec(vec![1.0_f32, 1.0], &[2]).unwrap();

        assert_eq!(
            fake_quant_per_axis(&x, &amax, 1, QuantizationConfig::default()).unwrap_err(),
            QuantError::AmaxCount {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(x.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_invalid_axis() {
        let x = accel(vec![1.0, 2.0], &[2]);
        let amax = Tensor::from_vec(vec![1.0_f32, 1.0], &[2]).unwrap();

        assert_eq!(
            fake_quant_per_axis(&x, &amax, 1, QuantizationConfig::default()).unwrap_err(),
            QuantError::InvalidAxis { axis: 1, ndim: 1 }
        );
        assert!(fake_quant_per_axis(&x, &amax, -2, QuantizationConfig::default()).is_err());
    }

    #[test]
    fn test_strided_input() {
        let x = accel(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let view = x.t().unwrap(); // [[1,4],[2,5],[3,6]]
        let amax = Tensor::from_vec(vec![8.0_f32, 8.0, 0.0], &[3]).unwrap();

        let y = fake_quant_per_axis(&view, &amax, 0, QuantizationConfig::new(8, false, false))
            .unwrap();
        assert_eq!(y.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 0.0, 0.0]);
    }
}
