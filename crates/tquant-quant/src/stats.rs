//! Quantization Error Statistics
//!
//! Measures the noise a fake-quantization pass introduced by comparing the
//! original tensor with its fake-quantized counterpart.
//!
//! @version 0.1.0
//! @author tquant Development Team

use serde::Serialize;

use tquant_core::{Error, Float};
use tquant_tensor::Tensor;

use crate::error::QuantResult;

/// Summary of elementwise differences, accumulated in f64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QuantizationStats {
    /// Root-mean-square error.
    pub rmse: f64,
    /// Largest absolute error.
    pub max_error: f64,
    /// Mean absolute error.
    pub mean_error: f64,
}

/// Compares `original` with `fake_quantized` element by element.
///
/// Shapes must match exactly; devices and layouts may differ. Empty tensors
/// produce all-zero statistics.
pub fn quantization_error<T: Float>(
    original: &Tensor<T>,
    fake_quantized: &Tensor<T>,
) -> QuantResult<QuantizationStats> {
    if original.shape() != fake_quantized.shape() {
        return Err(Error::shape_mismatch(original.shape(), fake_quantized.shape()).into());
    }

    let a = original.to_vec();
    let b = fake_quantized.to_vec();
    if a.is_empty() {
        return Ok(QuantizationStats::default());
    }

    let mut sum_sq = 0.0_f64;
    let mut sum_abs = 0.0_f64;
    let mut max_error = 0.0_f64;
    for (x, y) in a.iter().zip(&b) {
        let diff = (x.to_f64_value() - y.to_f64_value()).abs();
        sum_sq += diff * diff;
        sum_abs += diff;
        max_error = max_error.max(diff);
    }

    let n = a.len() as f64;
    Ok(QuantizationStats {
        rmse: (sum_sq / n).sqrt(),
        max_error,
        mean_error: sum_abs / n,
    })
}
