//! Storage - Buffer Management for Tensors
//!
//! Every tensor element lives in a `Storage` buffer tagged with the device it
//! resides on. Storage is reference-counted so that views (transposes,
//! reshapes) share one buffer; the in-place quantizer writes through the
//! same buffer the caller holds.
//!
//! # Example
//! ```rust
//! use tquant_core::{Storage, Device};
//!
//! let storage = Storage::<f32>::zeros(100, Device::Cpu);
//! assert_eq!(storage.len(), 100);
//! ```
//!
//! @version 0.1.0
//! @author tquant Development Team

use core::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::device::Device;
use crate::dtype::Scalar;
use crate::error::{Error, Result};

// =============================================================================
// Storage Struct
// =============================================================================

/// Shared, device-tagged element buffer.
///
/// Cloning a `Storage` shares the buffer; use [`Storage::deep_copy`] for an
/// independent copy.
#[derive(Debug)]
pub struct Storage<T: Scalar> {
    inner: Arc<RwLock<StorageInner<T>>>,
}

#[derive(Debug)]
struct StorageInner<T: Scalar> {
    data: Vec<T>,
    device: Device,
}

impl<T: Scalar> Storage<T> {
    /// Creates zero-initialized storage of `len` elements on `device`.
    #[must_use]
    pub fn zeros(len: usize, device: Device) -> Self {
        Self::from_vec(vec![T::zeroed(); len], device)
    }

    /// Wraps an existing vector as storage resident on `device`.
    #[must_use]
    pub fn from_vec(data: Vec<T>, device: Device) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StorageInner { data, device })),
        }
    }

    /// Returns the number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the device this storage resides on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.inner.read().device
    }

    /// Returns true if no other handle shares this buffer.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Returns a read guard over the elements.
    ///
    /// Blocks while a writer holds the buffer.
    #[must_use]
    pub fn as_slice(&self) -> StorageReadGuard<'_, T> {
        StorageReadGuard {
            guard: self.inner.read(),
        }
    }

    /// Returns a write guard over the elements.
    ///
    /// Blocks while any other guard on the buffer is alive.
    #[must_use]
    pub fn as_slice_mut(&self) -> StorageWriteGuard<'_, T> {
        StorageWriteGuard {
            guard: self.inner.write(),
        }
    }

    /// Makes an independent copy on the same device.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        let inner = self.inner.read();
        Self::from_vec(inner.data.clone(), inner.device)
    }

    /// Transfers this storage to `device`.
    ///
    /// Both devices address host memory, so a transfer is a copy that
    /// re-tags the residency. Transferring to the current device shares the
    /// buffer instead of copying.
    pub fn to_device(&self, device: Device) -> Result<Self> {
        if self.device() == device {
            return Ok(self.clone());
        }

        if !device.is_available() {
            return Err(Error::DeviceNotAvailable { device });
        }

        let data = self.inner.read().data.clone();
        tracing::trace!(from = %self.device(), to = %device, len = data.len(), "storage transfer");
        Ok(Self::from_vec(data, device))
    }
}

impl<T: Scalar> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// =============================================================================
// Guard Types for Safe Access
// =============================================================================

/// Read guard for storage data.
pub struct StorageReadGuard<'a, T: Scalar> {
    guard: RwLockReadGuard<'a, StorageInner<T>>,
}

impl<T: Scalar> Deref for StorageReadGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

/// Write guard for storage data.
pub struct StorageWriteGuard<'a, T: Scalar> {
    guard: RwLockWriteGuard<'a, StorageInner<T>>,
}

impl<T: Scalar> Deref for StorageWriteGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

impl<T: Scalar> DerefMut for StorageWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard.data
    }
}

// =============================================================================
// Tests
// =============================================================================
