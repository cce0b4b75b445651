// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display identity and the collaborators injected into every layer.
//!
//! Layers need two things from outside: the device's display registry (to
//! drop per-display state cached for a layer whose composition type changed)
//! and the diagnostics policy. Both are handed over at construction through a
//! [`LayerContext`], so layers never reach for global state and tests can run
//! without a live display subsystem.

use alloc::sync::Arc;
use core::fmt;

use crate::diag::{Diagnostics, DiagnosticsConfig};
use crate::layer::LayerId;

/// Identifies a display. Assigned by the device; opaque to layers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DisplayId(pub u32);

impl fmt::Debug for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Disp{}", self.0)
    }
}

/// The device-level map from display id to display state.
pub trait DisplayRegistry: Send + Sync {
    /// Drops whatever `display` cached for `layer`'s previous composition
    /// type (plane assignment, validated strategy, ...).
    ///
    /// Unknown displays are ignored.
    fn invalidate_composition(&self, display: DisplayId, layer: LayerId);
}

/// A registry with no displays. Invalidation is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRegistry;

impl DisplayRegistry for NullRegistry {
    fn invalidate_composition(&self, _display: DisplayId, _layer: LayerId) {}
}

/// Collaborators shared by the layers of a device.
#[derive(Clone)]
pub struct LayerContext {
    /// Display registry notified of composition-type changes.
    pub registry: Arc<dyn DisplayRegistry>,
    /// Verbosity policy for layer diagnostics.
    pub diagnostics: Arc<Diagnostics>,
}

impl LayerContext {
    /// Bundles a registry with a diagnostics policy.
    #[must_use]
    pub fn new(registry: Arc<dyn DisplayRegistry>, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            registry,
            diagnostics,
        }
    }

    /// A context with no registry and the given diagnostics configuration.
    #[must_use]
    pub fn detached(config: DiagnosticsConfig) -> Self {
        Self::new(Arc::new(NullRegistry), Arc::new(Diagnostics::new(config)))
    }
}

impl Default for LayerContext {
    fn default() -> Self {
        Self::detached(DiagnosticsConfig::default())
    }
}

impl fmt::Debug for LayerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerContext")
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
