//! Backends - Device-Specific Kernel Execution
//!
//! Each device has a backend that runs elementwise kernels over a contiguous
//! buffer. Kernels are expressed as an indexed map: the closure receives the
//! element's linear position and value and returns the replacement value.
//! The position lets slice-wise kernels (per-axis quantization) recover which
//! slice an element belongs to.
//!
//! # Available Backends
//! - `cpu` - sequential loop over general memory (always available)
//! - `accel` - data-parallel worker pool
//!
//! @version 0.1.0
//! @author tquant Development Team

use crate::device::{Device, DeviceCapabilities};
use crate::dtype::Scalar;
use crate::error::{Error, Result};

// =============================================================================
// Backend Modules
// =============================================================================

pub mod accel;
pub mod cpu;

// =============================================================================
// Re-exports
// =============================================================================

pub use accel::AccelBackend;
pub use cpu::CpuBackend;

/// Buffers shorter than this run inline even on the accelerator.
pub const PARALLEL_THRESHOLD: usize = 4096;

// =============================================================================
// Backend Trait
// =============================================================================

/// Common trait for all compute backends.
///
/// Backends are concrete types selected by [`map_indexed`]; the trait fixes
/// the surface they share rather than enabling dynamic dispatch.
pub trait Backend: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &'static str;

    /// Returns whether this backend is available on the current system.
    fn is_available(&self) -> bool;

    /// Returns the device capabilities.
    fn capabilities(&self) -> DeviceCapabilities;

    /// Waits until all submitted work has completed.
    fn synchronize(&self);

    /// Replaces every element `data[i]` with `op(i, data[i])`.
    fn map_indexed<T, F>(&self, data: &mut [T], op: F)
    where
        T: Scalar,
        F: Fn(usize, T) -> T + Send + Sync;
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs an indexed map on the backend serving `device`.
///
/// Returns once the kernel has completed.
pub fn map_indexed<T, F>(device: Device, data: &mut [T], op: F) -> Result<()>
where
    T: Scalar,
    F: Fn(usize, T) -> T + Send + Sync,
{
    match device {
        Device::Cpu => {
            let backend = CpuBackend::new();
            tracing::trace!(backend = backend.name(), len = data.len(), "dispatch");
            backend.map_indexed(data, op);
        }
        Device::Accelerator(idx) => {
            let backend = AccelBackend::new(idx).ok_or(Error::DeviceNotAvailable { device })?;
            tracing::trace!(
                backend = backend.name(),
                device = %device,
                len = data.len(),
                "dispatch"
            );
            backend.map_indexed(data, op);
            backend.synchronize();
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_across_devices() {
        let mut on_cpu: Vec<f32> = (0..10_000).map(|i| i as f32).collect();
        let mut on_accel = on_cpu.clone();

        map_indexed(Device::Cpu, &mut on_cpu, |i, x| x * 2.0 + (i % 3) as f32).unwrap();
        map_indexed(Device::Accelerator(0), &mut on_accel, |i, x| {
            x * 2.0 + (i % 3) as f32
        })
        .unwrap();

        assert_eq!(on_cpu, on_accel);
        assert_eq!(on_cpu[4], 9.0);
    }

    #[test]
    fn test_dispatch_missing_accelerator() {
        let mut data = vec![1.0_f32];
        let device = Device::Accelerator(usize::MAX);
        assert_eq!(
            map_indexed(device, &mut data, |_, x| x),
            Err(Error::DeviceNotAvailable { device })
        );
        assert_eq!(data, vec![1.0]);
    }
}
