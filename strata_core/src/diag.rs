// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostic verbosity policy.
//!
//! Layer setters emit through [`tracing`], but whether a given line is emitted
//! at all is decided by a [`Diagnostics`] policy injected through
//! [`LayerContext`](crate::registry::LayerContext). The policy is shared by all
//! layers of a device and can be adjusted at runtime (e.g. from a debug
//! property) without touching the layers.
//!
//! | level | emitted                                    |
//! |-------|--------------------------------------------|
//! | 0     | nothing but errors                         |
//! | >= 1  | rejected mutations (`WARN`)                |
//! | >= 2  | fence closes, dim-layer detection (`INFO`) |
//! | >= 4  | every field change (`DEBUG`)               |
//!
//! Errors (an attempt to switch a layer to the invalid composition type) are
//! emitted at every level unless
//! [`suppress_errors`](DiagnosticsConfig::suppress_errors) is set.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// A diagnostic verbosity level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebugLevel(pub u8);

impl DebugLevel {
    /// Only errors.
    pub const SILENT: Self = Self(0);
    /// Rejected mutations.
    pub const WARN: Self = Self(1);
    /// Resource lifecycle events.
    pub const INFO: Self = Self(2);
    /// Per-field change tracing.
    pub const VERBOSE: Self = Self(4);
}

/// Static diagnostics configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Verbosity threshold.
    pub level: DebugLevel,
    /// Drop error-level output too.
    pub suppress_errors: bool,
}

impl DiagnosticsConfig {
    /// Errors only.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            level: DebugLevel::SILENT,
            suppress_errors: false,
        }
    }

    /// Errors and rejected mutations. The production default.
    #[must_use]
    pub const fn warnings() -> Self {
        Self {
            level: DebugLevel::WARN,
            suppress_errors: false,
        }
    }

    /// Everything, including per-field changes.
    #[must_use]
    pub const fn verbose() -> Self {
        Self {
            level: DebugLevel::VERBOSE,
            suppress_errors: false,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self::warnings()
    }
}

/// Runtime verbosity policy shared by the layers of a device.
#[derive(Debug)]
pub struct Diagnostics {
    level: AtomicU8,
    suppress_errors: AtomicBool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticsConfig::default())
    }
}

impl Diagnostics {
    /// Creates a policy from a configuration.
    #[must_use]
    pub const fn new(config: DiagnosticsConfig) -> Self {
        Self {
            level: AtomicU8::new(config.level.0),
            suppress_errors: AtomicBool::new(config.suppress_errors),
        }
    }

    /// Current verbosity level.
    #[must_use]
    pub fn level(&self) -> DebugLevel {
        DebugLevel(self.level.load(Ordering::Relaxed))
    }

    /// Changes the verbosity level.
    pub fn set_level(&self, level: DebugLevel) {
        self.level.store(level.0, Ordering::Relaxed);
    }

    /// Enables or disables error output.
    pub fn set_suppress_errors(&self, suppress: bool) {
        self.suppress_errors.store(suppress, Ordering::Relaxed);
    }

    /// Returns whether output at `level` should be emitted.
    #[inline]
    #[must_use]
    pub fn enabled(&self, level: DebugLevel) -> bool {
        self.level() >= level
    }

    /// Returns whether errors should be emitted.
    #[inline]
    #[must_use]
    pub fn errors_enabled(&self) -> bool {
        !self.suppress_errors.load(Ordering::Relaxed)
    }
}
