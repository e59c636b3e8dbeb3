//! Device Abstraction - Compute Residency Management
//!
//! Identifies where tensor storage lives and which backend executes kernels
//! over it. General memory is served by the CPU device; the accelerator is a
//! data-parallel compute device backed by a dedicated worker pool. Tensors
//! move between the two explicitly.
//!
//! # Key Features
//! - Unified device abstraction across backends
//! - Device availability checking
//! - Device capability queries
//!
//! # Example
//! ```rust
//! use tquant_core::Device;
//!
//! let cpu = Device::Cpu;
//! assert!(cpu.is_available());
//! assert!(cpu.is_cpu());
//!
//! let accel = Device::Accelerator(0);
//! assert!(accel.is_accelerator());
//! assert_eq!(accel.to_string(), "accel:0");
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

use core::fmt;
use sysinfo::System;

// =============================================================================
// Device Enum
// =============================================================================

/// Represents a compute device where tensors can be allocated and operations executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// General-memory CPU device (always available). Kernels run sequentially.
    #[default]
    Cpu,

    /// Data-parallel accelerator with device ordinal.
    Accelerator(usize),
}

impl Device {
    /// Returns true if this device is available on the current system.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Cpu => true,
            Self::Accelerator(idx) => crate::backends::accel::is_device_available(idx),
        }
    }

    /// Returns true if this is the CPU device.
    #[must_use]
    pub const fn is_cpu(self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Returns true if this is an accelerator device.
    #[must_use]
    pub const fn is_accelerator(self) -> bool {
        matches!(self, Self::Accelerator(_))
    }

    /// Returns the device ordinal for accelerators, or 0 for CPU.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Cpu => 0,
            Self::Accelerator(idx) => idx,
        }
    }

    /// Returns the name of this device type.
    #[must_use]
    pub const fn device_type(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Accelerator(_) => "accel",
        }
    }

    /// Returns the CPU device.
    #[must_use]
    pub const fn cpu() -> Self {
        Self::Cpu
    }

    /// Returns the accelerator with the given ordinal.
    #[must_use]
    pub const fn accelerator(index: usize) -> Self {
        Self::Accelerator(index)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Accelerator(idx) => write!(f, "accel:{idx}"),
        }
    }
}

// =============================================================================
// Device Capabilities
// =============================================================================

/// Information about a device's capabilities.
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    /// Name of the device.
    pub name: String,
    /// Total memory in bytes.
    pub total_memory: usize,
    /// Available memory in bytes.
    pub available_memory: usize,
    /// Whether the device supports f64 kernels.
    pub supports_f64: bool,
    /// Number of workers executing kernels concurrently.
    pub worker_threads: usize,
}

impl Device {
    /// Returns the capabilities of this device.
    #[must_use]
    pub fn capabilities(self) -> DeviceCapabilities {
        match self {
            Self::Cpu => DeviceCapabilities {
                name: "CPU".to_string(),
                total_memory: get_system_memory(),
                available_memory: get_available_memory(),
                supports_f64: true,
                worker_threads: 1,
            },
            Self::Accelerator(idx) => crate::backends::accel::get_capabilities(idx),
        }
    }
}

impl DeviceCapabilities {
    /// Returns true if the device supports f32.
    #[must_use]
    pub const fn supports_f32(&self) -> bool {
        true
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Returns the total system memory in bytes.
pub(crate) fn get_system_memory() -> usize {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory() as usize
}

/// Returns the available system memory in bytes.
pub(crate) fn get_available_memory() -> usize {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.available_memory() as usize
}

/// Returns the number of hardware threads.
pub(crate) fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

// =============================================================================
// Device Count Functions
// =============================================================================

/// Returns the number of available accelerator devices.
#[must_use]
pub fn accelerator_count() -> usize {
    crate::backends::accel::device_count()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_device() {
        let device = Device::Cpu;
        assert!(device.is_cpu());
        assert!(!device.is_accelerator());
        assert!(device.is_available());
        assert_eq!(device.device_type(), "cpu");
    }

    #[test]
    fn test_accelerator_device() {
        let device = Device::accelerator(0);
        assert!(device.is_accelerator());
        assert_eq!(device.index(), 0);
        assert_eq!(device.device_type(), "accel");
        assert!(device.is_available());
        assert!(!Device::Accelerator(accelerator_count()).is_available());
    }

    #[test]
    fn test_device_display() {
        assert_eq!(format!("{}", Device::Cpu), "cpu");
        assert_eq!(format!("{}", Device::Accelerator(0)), "accel:0");
    }

    #[test]
    fn test_device_default() {
        assert_eq!(Device::default(), Device::Cpu);
    }

    #[test]
    fn test_device_capabilities() {
        let caps = Device::Cpu.capabilities();
        assert_eq!(caps.name, "CPU");
        assert!(caps.supports_f32());
        assert_eq!(caps.worker_threads, 1);

        let accel = Device::Accelerator(0).capabilities();
        assert!(accel.worker_threads >= 1);
    }
}
