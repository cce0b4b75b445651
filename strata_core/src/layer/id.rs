// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity.

use core::fmt;

/// Sentinel slot index meaning "no layer".
const INVALID: u32 = u32::MAX;

/// A handle to a layer slot in a [`LayerStack`](super::LayerStack).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a layer is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    /// Slot index into the stack.
    pub(crate) idx: u32,
    /// Generation counter; must match the stack's generation for this slot.
    pub(crate) generation: u32,
}

impl LayerId {
    /// The id of a layer that is not placed in any stack.
    pub const DETACHED: Self = Self {
        idx: INVALID,
        generation: 0,
    };

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Whether this is [`DETACHED`](Self::DETACHED).
    #[inline]
    #[must_use]
    pub const fn is_detached(self) -> bool {
        self.idx == INVALID
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::DETACHED
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            f.write_str("LayerId(detached)")
        } else {
            write!(f, "LayerId({}@gen{})", self.idx, self.generation)
        }
    }
}
