// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer state and per-display layer stacks.
//!
//! A *layer* is one compositable surface on a display. Each layer has:
//!
//! - An identity ([`LayerId`]), a generational handle into its display's
//!   [`LayerStack`] that becomes stale when the layer is destroyed.
//! - **Client properties** set through the windowing system: buffer and
//!   acquire fence, sideband stream, source crop, display frame, transform,
//!   blend mode, plane alpha, color, dataspace, z-order, composition type,
//!   visible and damage regions.
//! - **Derived queries** consumed by the driver: [`Layer::format`],
//!   [`Layer::has_alpha`], [`Layer::packed_color`].
//!
//! # Dirty tracking
//!
//! Setters compare before they store. A changed value raises the matching
//! [`LayerDirty`](crate::dirty::LayerDirty) bit; an identical value does
//! nothing at all. [`LayerStack::evaluate`] drains every layer's bits into a
//! [`FrameChanges`] for the driver.

mod evaluate;
mod id;
mod props;
mod stack;
mod state;

pub use evaluate::FrameChanges;
pub use id::LayerId;
pub use props::{BlendMode, Color, CompositionType, Dataspace, Transform, ValidatedComposition};
pub use stack::LayerStack;
pub use state::{Layer, LayerChanges};
