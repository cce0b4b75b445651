// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driver contract for display-controller integrations.
//!
//! `strata_core` stops at finalized layer state. Programming overlay planes,
//! blending, and scanout belong to *driver* crates, which implement
//! [`Presenter`] and are fed once per validate/present cycle.
//!
//! # Crate boundaries
//!
//! `strata_core` owns layer state, change tracking, and this contract. The HAL
//! glue receives calls from the windowing system, forwards them to the right
//! [`Layer`](crate::layer::Layer), and wires the stack to a driver in its
//! present path.

use crate::layer::{FrameChanges, LayerStack};

/// Applies evaluated frame changes to display hardware.
///
/// # Present path pseudocode
///
/// ```rust,ignore
/// fn present_display(stack: &mut LayerStack, driver: &mut impl Presenter) {
///     // Drain: close every layer's accumulation window
///     let changes = stack.evaluate();
///
///     // Present: reprogram only what changed
///     driver.apply(stack, &changes);
///
///     // Report release fences back into the layers
///     for (id, fence) in driver.release_fences() {
///         stack.get_mut(id)?.set_release_fence(fence);
///     }
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`FrameChanges`] to the hardware, reading current
    /// property values from `stack` as needed.
    fn apply(&mut self, stack: &LayerStack, changes: &FrameChanges);
}
