//! Runtime Capabilities
//!
//! Which optional operations this process can run. The process-wide value is
//! resolved once, on first use, from the `e4m3` cargo feature and the
//! `TQUANT_DISABLE_E4M3` environment variable; hosts that manage their own
//! runtime can build a [`Capabilities`] value directly and hand it to a
//! [`QuantSimulator`](crate::QuantSimulator).
//!
//! @version 0.1.0
//! @author tquant Development Team

use std::sync::OnceLock;

use tracing::{info, warn};

use tquant_core::device::accelerator_count;
use tquant_core::Device;

/// Environment variable that turns e4m3 emulation off when set to anything
/// other than an empty string or `0`.
pub const DISABLE_E4M3_ENV: &str = "TQUANT_DISABLE_E4M3";

static GLOBAL: OnceLock<Capabilities> = OnceLock::new();

/// Optional operations and compute resources available to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether e4m3 emulation may run.
    pub e4m3: bool,
    /// Number of accelerator devices.
    pub accelerator_count: usize,
    /// Worker threads behind the first accelerator (0 when none).
    pub accelerator_threads: usize,
}

impl Capabilities {
    /// Returns the process-wide capabilities, resolving them on first call.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            let caps = Self::detect();
            info!(
                e4m3 = caps.e4m3,
                accelerators = caps.accelerator_count,
                accelerator_threads = caps.accelerator_threads,
                "quantization capabilities resolved"
            );
            if !caps.e4m3 {
                warn!(
                    feature = cfg!(feature = "e4m3"),
                    env = DISABLE_E4M3_ENV,
                    "e4m3 emulation unavailable"
                );
            }
            caps
        })
    }

    /// Probes the build, environment and devices without caching.
    pub fn detect() -> Self {
        let disabled = flag_set(std::env::var(DISABLE_E4M3_ENV).ok().as_deref());
        let accelerators = accelerator_count();
        Self {
            e4m3: cfg!(feature = "e4m3") && !disabled,
            accelerator_count: accelerators,
            accelerator_threads: if accelerators > 0 {
                Device::Accelerator(0).capabilities().worker_threads
            } else {
                0
            },
        }
    }

    /// Returns a copy with e4m3 availability overridden.
    pub const fn with_e4m3(mut self, e4m3: bool) -> Self {
        self.e4m3 = e4m3;
        self
    }

    /// Returns true if at least one accelerator is available.
    pub const fn has_accelerator(&self) -> bool {
        self.accelerator_count > 0
    }
}

/// Interprets an on/off environment value: unset, empty and `0` are off.
fn flag_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        !v.is_empty() && v != "0"
    })
}

// =============================================================================
// Tests
// =============================================================================
