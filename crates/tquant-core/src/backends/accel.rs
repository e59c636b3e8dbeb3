//! Accelerator Backend - Data-Parallel Kernels
//!
//! The accelerator is a dedicated rayon thread pool created once per process.
//! Tensors resident on `Device::Accelerator(0)` have their kernels split
//! across the pool's workers; there is no ordering between elements.
//!
//! The pool size defaults to the machine's available parallelism and can be
//! pinned with the `TQUANT_ACCEL_THREADS` environment variable, read once
//! when the pool is first needed.
//!
//! @version 0.1.0
//! @author tquant Development Team

use std::sync::OnceLock;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{Backend, PARALLEL_THRESHOLD};
use crate::device::{get_available_memory, get_system_memory, num_cpus, DeviceCapabilities};
use crate::dtype::Scalar;

/// Environment variable overriding the accelerator worker count.
pub const ACCEL_THREADS_ENV: &str = "TQUANT_ACCEL_THREADS";

/// Minimum number of elements handed to one worker at a time.
const MIN_SPLIT_LEN: usize = 1024;

// =============================================================================
// Global State
// =============================================================================

struct AccelState {
    pool: ThreadPool,
    threads: usize,
}

static ACCEL_STATE: OnceLock<Option<AccelState>> = OnceLock::new();

fn get_accel_state() -> Option<&'static AccelState> {
    ACCEL_STATE.get_or_init(init_accel).as_ref()
}

fn init_accel() -> Option<AccelState> {
    let threads = std::env::var(ACCEL_THREADS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(num_cpus);

    match ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("tquant-accel-{i}"))
        .build()
    {
        Ok(pool) => {
            tracing::debug!(threads, "accelerator pool started");
            Some(AccelState { pool, threads })
        }
        Err(err) => {
            tracing::warn!(error = %err, "accelerator pool could not be started");
            None
        }
    }
}

// =============================================================================
// Device Queries
// =============================================================================

/// Returns true if the accelerator pool is running.
pub fn is_available() -> bool {
    get_accel_state().is_some()
}

/// Returns the number of accelerator devices (the pool counts as one).
pub fn device_count() -> usize {
    usize::from(is_available())
}

/// Returns whether a specific accelerator ordinal exists.
pub fn is_device_available(index: usize) -> bool {
    index < device_count()
}

/// Returns the capabilities of an accelerator device.
pub fn get_capabilities(index: usize) -> DeviceCapabilities {
    match get_accel_state() {
        Some(state) if index < device_count() => DeviceCapabilities {
            name: format!("Accelerator {index} ({} workers)", state.threads),
            total_memory: get_system_memory(),
            available_memory: get_available_memory(),
            supports_f64: true,
            worker_threads: state.threads,
        },
        _ => DeviceCapabilities {
            name: format!("Accelerator {index} (not available)"),
            total_memory: 0,
            available_memory: 0,
            supports_f64: false,
            worker_threads: 0,
        },
    }
}

// =============================================================================
// Accelerator Backend Struct
// =============================================================================

/// Backend for accelerator-resident tensors.
pub struct AccelBackend {
    device_index: usize,
    state: &'static AccelState,
}

impl std::fmt::Debug for AccelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccelBackend")
            .field("device_index", &self.device_index)
            .field("threads", &self.state.threads)
            .finish()
    }
}

impl AccelBackend {
    /// Creates a backend for the given ordinal, or `None` if it does not exist.
    pub fn new(device_index: usize) -> Option<Self> {
        if !is_device_available(device_index) {
            return None;
        }
        let state = get_accel_state()?;
        Some(Self {
            device_index,
            state,
        })
    }

    /// Returns the device ordinal.
    pub fn device_index(&self) -> usize {
        self.device_index
    }

    /// Returns the number of pool workers.
    pub fn threads(&self) -> usize {
        self.state.threads
    }
}

// =============================================================================
// Backend Trait Implementation
// =============================================================================

impl Backend for AccelBackend {
    fn name(&self) -> &'static str {
        "accel"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn capabilities(&self) -> DeviceCapabilities {
        get_capabilities(self.device_index)
    }

    fn synchronize(&self) {
        // install() joins every task before returning
    }

    fn map_indexed<T, F>(&self, data: &mut [T], op: F)
    where
        T: Scalar,
        F: Fn(usize, T) -> T + Send + Sync,
    {
        if data.len() < PARALLEL_THRESHOLD {
            for (i, value) in data.iter_mut().enumerate() {
                *value = op(i, *value);
            }
            return;
        }

        self.state.pool.install(|| {
            data.par_iter_mut()
                .with_min_len(MIN_SPLIT_LEN)
                .enumerate()
                .for_each(|(i, value)| *value = op(i, *value));
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
