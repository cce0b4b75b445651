// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer state tracking for hardware display composition.
//!
//! `strata_core` holds the complete client-visible state of every
//! compositable surface on a display and decides, on each property update,
//! whether the change is material enough to mark the layer dirty for the next
//! validate/present cycle. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Windowing system (HAL entry points)
//!       │  set_buffer / set_display_frame / set_z_order / ...
//!       ▼
//!   Layer ──► LayerDirty bits, owned AcquireFence, regions
//!       │
//!       ▼
//!   LayerStack::evaluate() ──► FrameChanges ──► Presenter::apply()
//! ```
//!
//! **[`layer`]**: the [`Layer`](layer::Layer) state machine, its property
//! value types, and the per-display [`LayerStack`](layer::LayerStack) with
//! generational handles and a defined z-order tie-break.
//!
//! **[`dirty`]**: the [`LayerDirty`](dirty::LayerDirty) bitmask, one bit per
//! mutable property category.
//!
//! **[`geometry`]**: integer rectangles and regions; the float source crop is
//! a [`kurbo::Rect`].
//!
//! **[`buffer`]** / **[`fence`]**: native buffer and sync fence primitives.
//! Buffers are shared, never freed by a layer; acquire fences are owned
//! handles that close exactly once.
//!
//! **[`registry`]**: the [`DisplayRegistry`](registry::DisplayRegistry)
//! collaborator and the [`LayerContext`](registry::LayerContext) that injects
//! it, together with the diagnostics policy, into every layer.
//!
//! **[`diag`]**: verbosity policy for the `tracing` output of layer setters.
//!
//! **[`backend`]**: the [`Presenter`](backend::Presenter) trait that display
//! drivers implement to consume evaluated changes.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod buffer;
pub mod diag;
pub mod dirty;
pub mod error;
pub mod fence;
pub mod geometry;
pub mod layer;
pub mod registry;
