// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation: draining per-layer changes for the driver.
//!
//! Each validate/present cycle calls [`LayerStack::evaluate`] once. It closes
//! the accumulation window of every live layer
//! ([`Layer::take_changes`](super::Layer::take_changes)) and reports, per
//! layer, which property categories changed and whether a new buffer was
//! bound, along with the layers added and removed since the previous call.
//!
//! Draining and setting both go through `&mut LayerStack`, so a setter can
//! never race the drain and lose a bit.

use alloc::vec::Vec;
use core::mem;

use super::id::LayerId;
use super::stack::LayerStack;
use super::state::LayerChanges;
use crate::dirty::LayerDirty;

/// The set of changes produced by a single [`LayerStack::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Layers with at least one change, in slot order.
    pub layers: Vec<(LayerId, LayerChanges)>,
    /// Layers created since the last evaluate.
    pub added: Vec<LayerId>,
    /// Layers destroyed since the last evaluate.
    pub removed: Vec<LayerId>,
    /// Whether the bottom-to-top order may differ from the previous frame.
    pub order_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.added.clear();
        self.removed.clear();
        self.order_changed = false;
    }

    /// Returns `true` if nothing changed and the previous frame can be
    /// presented again.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Changes recorded for `id`, if any.
    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<LayerChanges> {
        self.layers
            .iter()
            .find(|(changed, _)| *changed == id)
            .map(|&(_, changes)| changes)
    }

    /// Union of the dirty bits of all changed layers.
    #[must_use]
    pub fn dirty_union(&self) -> LayerDirty {
        self.layers
            .iter()
            .fold(LayerDirty::empty(), |acc, (_, changes)| acc | changes.dirty)
    }
}

impl LayerStack {
    /// Drains every layer's accumulated changes.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        for (id, layer) in self.layers_mut() {
            let layer_changes = layer.take_changes();
            if !layer_changes.is_empty() {
                changes.layers.push((id, layer_changes));
            }
        }

        mem::swap(&mut changes.added, &mut self.pending_added);
        mem::swap(&mut changes.removed, &mut self.pending_removed);
        self.pending_added.clear();
        self.pending_removed.clear();

        changes.order_changed = !changes.added.is_empty()
            || !changes.removed.is_empty()
            || changes.dirty_union().contains(LayerDirty::Z_ORDER);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::diag::DiagnosticsConfig;
    use crate::geometry::IntRect;
    use crate::registry::{DisplayId, LayerContext};

    fn stack() -> LayerStack {
        LayerStack::new(
            DisplayId(0),
            LayerContext::detached(DiagnosticsConfig::silent()),
        )
    }

    #[test]
    fn first_evaluate_reports_added_layers() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        let changes = stack.evaluate();
        assert_eq!(changes.added, vec![a, b]);
        assert!(changes.layers.is_empty(), "new layers start clean");
        assert!(changes.order_changed);

        let changes = stack.evaluate();
        assert!(changes.is_empty(), "second evaluate has nothing to report");
        assert!(!changes.order_changed);
    }

    #[test]
    fn evaluate_drains_dirty_bits() {
        let mut stack = stack();
        let id = stack.create_layer();
        let _ = stack.evaluate();

        let layer = stack.get_mut(id).unwrap();
        layer.set_display_frame(IntRect::new(0, 0, 100, 100));
        layer.set_transform(crate::layer::Transform::ROT_90);

        let changes = stack.evaluate();
        let layer_changes = changes.get(id).unwrap();
        assert_eq!(
            layer_changes.dirty,
            LayerDirty::DISPLAY_FRAME | LayerDirty::TRANSFORM
        );
        assert!(!changes.order_changed, "geometry changes keep the order");
        assert!(stack.get(id).unwrap().dirty().is_empty(), "bits cleared");
    }

    #[test]
    fn z_order_change_marks_order_changed() {
        let mut stack = stack();
        let id = stack.create_layer();
        let _ = stack.evaluate();

        stack.get_mut(id).unwrap().set_z_order(2);
        let changes = stack.evaluate();
        assert!(changes.order_changed);
        assert_eq!(changes.dirty_union(), LayerDirty::Z_ORDER);
    }

    #[test]
    fn destroyed_layers_are_reported() {
        let mut stack = stack();
        let id = stack.create_layer();
        let _ = stack.evaluate();

        stack.destroy_layer(id).unwrap();
        let changes = stack.evaluate();
        assert_eq!(changes.removed, vec![id]);
        assert!(changes.order_changed);
    }

    #[test]
    fn create_then_destroy_within_a_frame() {
        let mut stack = stack();
        let id = stack.create_layer();
        stack.destroy_layer(id).unwrap();
        let changes = stack.evaluate();
        assert!(changes.is_empty(), "a layer never presented is never reported");
        assert!(!changes.order_changed);
        assert!(!stack.is_alive(id));
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut stack = stack();
        let id = stack.create_layer();
        let mut changes = FrameChanges::default();
        stack.evaluate_into(&mut changes);
        assert_eq!(changes.added, vec![id]);

        stack.get_mut(id).unwrap().set_z_order(1);
        stack.evaluate_into(&mut changes);
        assert!(changes.added.is_empty(), "previous contents are cleared");
        assert_eq!(changes.get(id).map(|c| c.dirty), Some(LayerDirty::Z_ORDER));
    }
}
