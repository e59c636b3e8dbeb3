//! Quantization Simulator
//!
//! Bundles the entry operations behind one value that carries its own
//! [`Capabilities`]. The free functions of this crate use the process-wide
//! capabilities; a simulator lets a host (or a test) decide them instead.
//!
//! # Example
//! ```rust
//! use tquant_quant::{Capabilities, QuantSimulator, QuantizationConfig};
//! use tquant_tensor::{Device, Tensor};
//!
//! let sim = QuantSimulator::with_capabilities(Capabilities::detect().with_e4m3(true));
//! let x = Tensor::from_vec_on(vec![0.2_f32, -0.9], &[2], Device::Accelerator(0)).unwrap();
//! let amax = Tensor::scalar(1.0_f32);
//!
//! let q = sim.fake_quant(&x, &amax, QuantizationConfig::int8()).unwrap();
//! let f = sim.fake_e4m3(&x).unwrap();
//! assert_eq!(q.shape(), f.shape());
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

use tquant_core::Float;
use tquant_tensor::Tensor;

use crate::capabilities::Capabilities;
use crate::config::QuantizationConfig;
use crate::e4m3::fake_e4m3_with;
use crate::error::QuantResult;
use crate::{bound, per_axis, per_tensor};

/// Entry point for every fake-quantization operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantSimulator {
    capabilities: Capabilities,
}

impl QuantSimulator {
    /// Creates a simulator using the process-wide capabilities.
    pub fn new() -> Self {
        Self::with_capabilities(*Capabilities::global())
    }

    /// Creates a simulator with explicit capabilities.
    pub const fn with_capabilities(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Returns the capabilities this simulator was built with.
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// See [`bits_to_bound`](crate::bits_to_bound).
    pub fn bits_to_bound(&self, config: QuantizationConfig) -> QuantResult<f64> {
        bound::bits_to_bound(config)
    }

    /// See [`fake_quant_inplace`](crate::fake_quant_inplace).
    pub fn fake_quant_inplace<T: Float>(
        &self,
        tensor: &Tensor<T>,
        amax: &Tensor<T>,
        config: QuantizationConfig,
    ) -> QuantResult<()> {
        per_tensor::fake_quant_inplace(tensor, amax, config)
    }

    /// See [`fake_quant`](crate::fake_quant).
    pub fn fake_quant<T: Float>(
        &self,
        tensor: &Tensor<T>,
        amax: &Tensor<T>,
        config: QuantizationConfig,
    ) -> QuantResult<Tensor<T>> {
        per_tensor::fake_quant(tensor, amax, config)
    }

    /// See [`fake_quant_per_axis`](crate::fake_quant_per_axis).
    pub fn fake_quant_per_axis<T: Float>(
        &self,
        tensor: &Tensor<T>,
        amax: &Tensor<T>,
        axis: i64,
        config: QuantizationConfig,
    ) -> QuantResult<Tensor<T>> {
        per_axis::fake_quant_per_axis(tensor, amax, axis, config)
    }

    /// Rounds every element to e4m3, gated by this simulator's capabilities.
    pub fn fake_e4m3<T: Float>(&self, tensor: &Tensor<T>) -> QuantResult<Tensor<T>> {
        fake_e4m3_with(&self.capabilities, tensor)
    }
}

impl Default for QuantSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_global() {
        let sim = QuantSimulator::default();
        assert_eq!(sim.capabilities(), Capabilities::global());
    }

    #[test]
    fn test_explicit_capabilities_gate_e4m3() {
        let caps = Capabilities::detect();
        let off = QuantSimulator::with_capabilities(caps.with_e4m3(false));
        let on = QuantSimulator::with_capabilities(caps.with_e4m3(true));
        let x = Tensor::from_vec(vec![0.3_f32], &[1]).unwrap();

        assert!(off.fake_e4m3(&x).unwrap_err().is_not_supported());
        assert_eq!(on.fake_e4m3(&x).unwrap().to_vec(), vec![0.3125]);
    }

    #[test]
    fn test_bits_to_bound() {
        let sim = QuantSimulator::with_capabilities(Capabilities::detect());
        assert_eq!(sim.bits_to_bound(QuantizationConfig::int8()).unwrap(), 127.0);
        assert_eq!(sim.bits_to_bound(QuantizationConfig::uint8()).unwrap(), 255.0);
    }
}
