// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-display layer storage with allocation and z-ordering.

use alloc::vec::Vec;

use super::id::LayerId;
use super::state::Layer;
use crate::error::LayerError;
use crate::registry::{DisplayId, LayerContext};

#[derive(Debug)]
struct Slot {
    /// Handle for this occupant. The layer's own copy is only a mirror.
    id: LayerId,
    layer: Layer,
    /// Creation sequence number; breaks z-order ties.
    seq: u64,
}

/// The layers of one display.
///
/// Layers are addressed by [`LayerId`] handles. Destroyed layers free their
/// slot for reuse, and generation counters make stale handles fail with
/// [`LayerError::BadLayer`] instead of reaching the slot's new occupant.
#[derive(Debug)]
pub struct LayerStack {
    display: DisplayId,
    ctx: LayerContext,

    // -- Allocation --
    slots: Vec<Option<Slot>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    next_seq: u64,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<LayerId>,
    pub(crate) pending_removed: Vec<LayerId>,
}

impl LayerStack {
    /// Creates an empty stack for `display`. New layers receive `ctx`.
    #[must_use]
    pub fn new(display: DisplayId, ctx: LayerContext) -> Self {
        Self {
            display,
            ctx,
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            next_seq: 0,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    /// The display this stack belongs to.
    #[must_use]
    pub fn display(&self) -> DisplayId {
        self.display
    }

    // -- Allocation API --

    /// Creates a layer with default properties and returns its handle.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a display never holds anywhere near u32::MAX layers"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(None);
            self.generation.push(0);
            idx
        };
        let id = LayerId {
            idx,
            generation: self.generation[idx as usize],
        };

        let mut layer = Layer::new(self.display, self.ctx.clone());
        layer.attach(self.display, id);
        self.slots[idx as usize] = Some(Slot {
            id,
            layer,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.pending_added.push(id);
        id
    }

    /// Destroys a layer, closing its acquire fence and freeing its slot.
    ///
    /// # Errors
    ///
    /// [`LayerError::BadLayer`] if the handle is stale.
    pub fn destroy_layer(&mut self, id: LayerId) -> Result<(), LayerError> {
        self.validate(id)?;
        self.slots[id.idx as usize] = None;
        self.free_list.push(id.idx);
        let before = self.pending_added.len();
        self.pending_added.retain(|&added| added != id);
        if self.pending_added.len() == before {
            self.pending_removed.push(id);
        }
        Ok(())
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        self.validate(id).is_ok()
    }

    /// Number of live layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if the stack holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Access --

    /// Returns the layer behind `id`.
    ///
    /// # Errors
    ///
    /// [`LayerError::BadLayer`] if the handle is stale.
    pub fn get(&self, id: LayerId) -> Result<&Layer, LayerError> {
        self.validate(id)?;
        self.slots[id.idx as usize]
            .as_ref()
            .map(|slot| &slot.layer)
            .ok_or(LayerError::BadLayer)
    }

    /// Returns the layer behind `id` for mutation.
    ///
    /// The stack owns the layer's display and id: both are restored here
    /// and on [`evaluate`](Self::evaluate), whatever the caller did to the
    /// layer in between (including replacing it wholesale).
    ///
    /// # Errors
    ///
    /// [`LayerError::BadLayer`] if the handle is stale.
    pub fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer, LayerError> {
        self.validate(id)?;
        let display = self.display;
        let slot = self.slots[id.idx as usize]
            .as_mut()
            .ok_or(LayerError::BadLayer)?;
        slot.layer.attach(display, slot.id);
        Ok(&mut slot.layer)
    }

    /// Returns the layer behind `id` to its defaults on this stack's
    /// display, closing its acquire fence.
    ///
    /// # Errors
    ///
    /// [`LayerError::BadLayer`] if the handle is stale.
    pub fn reset_layer(&mut self, id: LayerId) -> Result<(), LayerError> {
        let display = self.display;
        self.get_mut(id)?.reset(display);
        Ok(())
    }

    /// Iterates over live layers in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &Layer)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (slot.id, &slot.layer))
    }

    /// Returns live layers bottom to top.
    ///
    /// Layers are sorted by [`z_order`](Layer::z_order); layers with equal
    /// keys keep their creation order, so the result never depends on slot
    /// reuse.
    #[must_use]
    pub fn z_ordered(&self) -> Vec<LayerId> {
        let mut keyed: Vec<(u32, u64, LayerId)> = self
            .slots
            .iter()
            .flatten()
            .map(|slot| (slot.layer.z_order(), slot.seq, slot.id))
            .collect();
        keyed.sort_unstable_by_key(|&(z, seq, _)| (z, seq));
        keyed.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Iterates mutably over live layers in slot order, re-attaching each
    /// to this stack first.
    pub(crate) fn layers_mut(&mut self) -> impl Iterator<Item = (LayerId, &mut Layer)> + '_ {
        let display = self.display;
        self.slots.iter_mut().flatten().map(move |slot| {
            slot.layer.attach(display, slot.id);
            (slot.id, &mut slot.layer)
        })
    }

    // -- Internal helpers --

    fn validate(&self, id: LayerId) -> Result<(), LayerError> {
        let idx = id.idx as usize;
        let live = idx < self.slots.len()
            && self.generation[idx] == id.generation
            && self.slots[idx].is_some();
        if live {
            Ok(())
        } else {
            Err(LayerError::BadLayer)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::diag::DiagnosticsConfig;
    use crate::dirty::LayerDirty;

    fn stack() -> LayerStack {
        LayerStack::new(
            DisplayId(0),
            LayerContext::detached(DiagnosticsConfig::silent()),
        )
    }

    #[test]
    fn create_and_destroy() {
        let mut stack = stack();
        let id = stack.create_layer();
        assert!(stack.is_alive(id));
        assert_eq!(stack.get(id).unwrap().id(), id);
        stack.destroy_layer(id).unwrap();
        assert!(!stack.is_alive(id));
        assert!(stack.is_empty());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut stack = stack();
        let id1 = stack.create_layer();
        stack.destroy_layer(id1).unwrap();
        let id2 = stack.create_layer();
        // id2 reuses the same slot but has a different generation.
        assert!(!stack.is_alive(id1));
        assert!(stack.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(stack.get_mut(id1).unwrap_err(), LayerError::BadLayer);
        assert_eq!(stack.destroy_layer(id1), Err(LayerError::BadLayer));
    }

    #[test]
    fn detached_id_is_never_alive() {
        let mut stack = stack();
        let _ = stack.create_layer();
        assert!(!stack.is_alive(LayerId::DETACHED));
    }

    #[test]
    fn layers_know_their_display() {
        let mut stack = LayerStack::new(DisplayId(3), LayerContext::default());
        let id = stack.create_layer();
        assert_eq!(stack.get(id).unwrap().display(), DisplayId(3));
    }

    #[test]
    fn z_order_sorts_ascending() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        let c = stack.create_layer();
        stack.get_mut(a).unwrap().set_z_order(5);
        stack.get_mut(b).unwrap().set_z_order(1);
        stack.get_mut(c).unwrap().set_z_order(3);
        assert_eq!(stack.z_ordered(), vec![b, c, a]);
    }

    #[test]
    fn z_order_ties_keep_creation_order() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        let c = stack.create_layer();
        // Free slot 0, then refill it: the newcomer must still sort last.
        stack.destroy_layer(a).unwrap();
        let d = stack.create_layer();
        assert_eq!(d.idx, a.idx, "slot is reused");
        for id in [b, c, d] {
            stack.get_mut(id).unwrap().set_z_order(7);
        }
        assert_eq!(stack.z_ordered(), vec![b, c, d]);
    }

    #[test]
    fn iter_visits_live_layers() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        stack.destroy_layer(a).unwrap();
        let ids: Vec<_> = stack.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b]);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn handles_come_from_the_slot_not_the_layer() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        let layer = stack.get_mut(a).unwrap();
        layer.attach(DisplayId(0), b);
        layer.set_z_order(3);

        assert_eq!(stack.z_ordered(), vec![b, a], "no duplicate handles");
        let ids: Vec<_> = stack.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);

        let changes = stack.evaluate();
        assert_eq!(changes.layers, vec![(a, changes.get(a).unwrap())]);
        assert_eq!(changes.get(a).unwrap().dirty, LayerDirty::Z_ORDER);
        assert_eq!(changes.get(b), None, "b did not change");
        assert_eq!(stack.get(a).unwrap().id(), a, "mirror restored");
    }

    #[test]
    fn replaced_layer_is_reattached() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        let _ = stack.evaluate();

        *stack.get_mut(b).unwrap() = Layer::new(DisplayId(9), LayerContext::default());
        assert_eq!(stack.z_ordered(), vec![a, b], "no detached handles");

        let layer = stack.get_mut(b).unwrap();
        assert_eq!(layer.id(), b);
        assert_eq!(layer.display(), DisplayId(0));
        layer.set_z_order(1);
        let changes = stack.evaluate();
        assert_eq!(changes.get(b).unwrap().dirty, LayerDirty::Z_ORDER);
    }

    #[test]
    fn layers_stay_on_their_display() {
        let mut stack = stack();
        let a = stack.create_layer();
        stack.get_mut(a).unwrap().set_z_order(4);

        stack.reset_layer(a).unwrap();
        let layer = stack.get(a).unwrap();
        assert_eq!(layer.display(), DisplayId(0));
        assert_eq!(layer.id(), a);
        assert_eq!(layer.z_order(), 0);

        stack.get_mut(a).unwrap().reset(DisplayId(5));
        assert_eq!(stack.get_mut(a).unwrap().display(), DisplayId(0));

        stack.destroy_layer(a).unwrap();
        assert_eq!(stack.reset_layer(a), Err(LayerError::BadLayer));
    }
}
