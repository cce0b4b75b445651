// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer snapshots, dumpsys-style dumps, and JSON export for strata
//! diagnostics.
//!
//! - [`snapshot::LayerSnapshot`]: a detached, plain-data copy of one
//!   layer's client-visible state.
//! - [`pretty::write_stack`]: human-readable dump of a whole display, one
//!   block per layer in z-order.
//! - [`json::stack_to_json`]: the same information as a
//!   [`serde_json::Value`] for post-mortem tooling.

pub mod json;
pub mod pretty;
pub mod snapshot;
