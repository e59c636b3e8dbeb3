//! CPU Backend - Sequential Kernels over General Memory
//!
//! Executes kernels one element at a time on the calling thread. This is the
//! fallback path for tensors that have not been moved to the accelerator.
//!
//! @version 0.1.0
//! @author tquant Development Team

use super::Backend;
use crate::device::{get_available_memory, get_system_memory, DeviceCapabilities};
use crate::dtype::Scalar;

// =============================================================================
// CPU Backend Struct
// =============================================================================

/// Sequential backend for CPU-resident tensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl CpuBackend {
    /// Creates a new CPU backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

// =============================================================================
// Backend Trait Implementation
// =============================================================================

impl Backend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            name: "CPU".to_string(),
            total_memory: get_system_memory(),
            available_memory: get_available_memory(),
            supports_f64: true,
            worker_threads: 1,
        }
    }

    fn synchronize(&self) {
        // Kernels complete before map_indexed returns
    }

    fn map_indexed<T, F>(&self, data: &mut [T], op: F)
    where
        T: Scalar,
        F: Fn(usize, T) -> T + Send + Sync,
    {
        for (i, value) in data.iter_mut().enumerate() {
            *value = op(i, *value);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_backend_basics() {
        let backend = CpuBackend::new();
        assert_eq!(backend.name(), "cpu");
        assert!(backend.is_available());
        assert_eq!(backend.capabilities().worker_threads, 1);
    }

    #[test]
    fn test_cpu_map_indexed() {
        let mut data = vec![1.0_f32, 2.0, 3.0];
        CpuBackend::new().map_indexed(&mut data, |i, x| x + i as f32);
        assert_eq!(data, vec![1.0, 3.0, 5.0]);
    }
}
