// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization fence handles.
//!
//! A producer hands a layer an *acquire fence* together with a buffer; the
//! fence signals once the buffer contents are ready to read. Closing a fence
//! twice is undefined at the platform level, so ownership is encoded in the
//! type: an [`AcquireFence`] closes its handle exactly once, when it is
//! dropped. Replacing a layer's fence, resetting the layer, or destroying it
//! all drop the previous value.
//!
//! *Release fences* flow the other way (compositor to producer) and are plain
//! [`RawFence`] values; a layer never owns them.

use alloc::sync::Arc;
use core::fmt;

/// A raw platform fence handle (a file descriptor on Linux-like systems).
pub type RawFence = i32;

/// The "no fence" sentinel.
pub const NO_FENCE: RawFence = -1;

/// Platform fence primitives.
///
/// Implemented by the platform glue (e.g. on top of `close(2)` and `dup(2)`).
/// Tests substitute a counting implementation.
pub trait FenceOps: Send + Sync {
    /// Closes `fence`. Called at most once per handle.
    fn close(&self, fence: RawFence);

    /// Creates a new handle referring to the same sync object.
    ///
    /// Returns `None` if the platform cannot duplicate the handle.
    fn dup(&self, fence: RawFence) -> Option<RawFence>;
}

/// An owned acquire fence. Closed on drop.
pub struct AcquireFence {
    raw: RawFence,
    ops: Arc<dyn FenceOps>,
}

impl AcquireFence {
    /// Takes ownership of `raw`.
    ///
    /// Returns `None` for negative handles (including [`NO_FENCE`]); nothing
    /// is owned in that case, so nothing will be closed.
    #[must_use]
    pub fn from_raw(raw: RawFence, ops: Arc<dyn FenceOps>) -> Option<Self> {
        if raw < 0 {
            return None;
        }
        Some(Self { raw, ops })
    }

    /// Returns the raw handle without giving up ownership.
    #[inline]
    #[must_use]
    pub fn as_raw(&self) -> RawFence {
        self.raw
    }

    /// Gives up ownership and returns the raw handle. The caller is now
    /// responsible for closing it.
    #[must_use]
    pub fn into_raw(mut self) -> RawFence {
        core::mem::replace(&mut self.raw, NO_FENCE)
    }

    /// Duplicates the handle into a second, independently owned fence.
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        let raw = self.ops.dup(self.raw)?;
        Self::from_raw(raw, Arc::clone(&self.ops))
    }
}

impl Drop for AcquireFence {
    fn drop(&mut self) {
        if self.raw >= 0 {
            self.ops.close(self.raw);
        }
    }
}

impl fmt::Debug for AcquireFence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquireFence")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}
