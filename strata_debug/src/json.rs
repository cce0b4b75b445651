// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of layer state.
//!
//! The schema is flat and stable enough for scripts: enums are written as
//! their variant names, handles and fences as integers, rectangles as
//! `[left, top, right, bottom]` arrays, and dirty bits as a list of names.

use serde_json::{Value, json};

use strata_core::geometry::{IntRect, Region};
use strata_core::layer::LayerStack;

use crate::snapshot::LayerSnapshot;

/// Exports every live layer of `stack`, in z-order.
#[must_use]
pub fn stack_to_json(stack: &LayerStack) -> Value {
    let layers: Vec<Value> = stack
        .z_ordered()
        .into_iter()
        .filter_map(|id| stack.get(id).ok())
        .map(|layer| snapshot_to_json(&LayerSnapshot::capture(layer)))
        .collect();
    json!({
        "display": stack.display().0,
        "layers": layers,
    })
}

/// Exports one snapshot.
#[must_use]
pub fn snapshot_to_json(s: &LayerSnapshot) -> Value {
    let crop = s.source_crop;
    json!({
        "display": s.display.0,
        "id": {
            "index": s.id.index(),
            "generation": s.id.generation(),
        },
        "z_order": s.z_order,
        "composition_type": format!("{:?}", s.composition_type),
        "validated": s.validated.map(|v| format!("{v:?}")),
        "blend_mode": format!("{:?}", s.blend_mode),
        "transform": s.transform.bits(),
        "dataspace": s.dataspace.0,
        "buffer": s.has_buffer.then_some(s.format.0),
        "has_alpha": s.has_alpha,
        "sideband": s.has_sideband,
        "acquire_fence": s.acquire_fence,
        "release_fence": s.release_fence,
        "source_crop": [crop.x0, crop.y0, crop.x1, crop.y1],
        "display_frame": rect(s.display_frame),
        "plane_alpha": s.plane_alpha,
        "color": s.color.to_argb(),
        "dim": s.is_dim,
        "visible_region": region(&s.visible_region),
        "damage_region": region(&s.damage_region),
        "dirty": s.dirty.iter_names().map(|(name, _)| name).collect::<Vec<_>>(),
        "buffer_changed": s.buffer_changed,
    })
}

fn rect(r: IntRect) -> Value {
    json!([r.left, r.top, r.right, r.bottom])
}

fn region(region: &Region) -> Value {
    region.rects().iter().copied().map(rect).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use kurbo::Rect;
    use strata_core::buffer::{NativeBuffer, PixelFormat};
    use strata_core::diag::DiagnosticsConfig;
    use strata_core::fence::{AcquireFence, FenceOps, RawFence};
    use strata_core::layer::CompositionType;
    use strata_core::registry::{DisplayId, LayerContext};

    #[derive(Debug)]
    struct Buffer;

    impl NativeBuffer for Buffer {
        fn format(&self) -> PixelFormat {
            PixelFormat::RGBA_FP16
        }
    }

    struct Fences;

    impl FenceOps for Fences {
        fn close(&self, _fence: RawFence) {}

        fn dup(&self, _fence: RawFence) -> Option<RawFence> {
            None
        }
    }

    fn stack() -> LayerStack {
        LayerStack::new(
            DisplayId(3),
            LayerContext::detached(DiagnosticsConfig::silent()),
        )
    }

    #[test]
    fn empty_stack() {
        let value = stack_to_json(&stack());
        assert_eq!(value, json!({ "display": 3, "layers": [] }));
    }

    #[test]
    fn layer_fields() {
        let mut stack = stack();
        let id = stack.create_layer();
        let layer = stack.get_mut(id).unwrap();
        layer.set_buffer(
            Some(Arc::new(Buffer)),
            AcquireFence::from_raw(12, Arc::new(Fences)),
        );
        layer.set_composition_type(CompositionType::Device).unwrap();
        layer.set_source_crop(Rect::new(0.0, 0.0, 10.5, 20.0));
        layer.set_surface_damage(&[]);
        layer.set_blend_mode(2);

        let value = stack_to_json(&stack);
        let l = &value["layers"][0];
        assert_eq!(l["id"], json!({ "index": 0, "generation": 0 }));
        assert_eq!(l["composition_type"], "Device");
        assert_eq!(l["validated"], Value::Null);
        assert_eq!(l["blend_mode"], "Premultiplied");
        assert_eq!(l["buffer"], 0x16);
        assert_eq!(l["has_alpha"], true);
        assert_eq!(l["acquire_fence"], 12);
        assert_eq!(l["release_fence"], -1);
        assert_eq!(l["source_crop"], json!([0.0, 0.0, 10.5, 20.0]));
        assert_eq!(l["damage_region"], json!([[0, 0, 10, 20]]));
        assert_eq!(l["plane_alpha"], 255);
        assert_eq!(
            l["dirty"],
            json!(["BUFFER", "BLEND_MODE", "COMPOSITION_TYPE", "SOURCE_CROP"])
        );
        assert_eq!(l["buffer_changed"], true);
    }

    #[test]
    fn layers_follow_z_order() {
        let mut stack = stack();
        let a = stack.create_layer();
        let b = stack.create_layer();
        stack.get_mut(a).unwrap().set_z_order(2);
        stack.get_mut(b).unwrap().set_z_order(1);

        let value = stack_to_json(&stack);
        let indices: Vec<_> = value["layers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"]["index"].as_u64().unwrap())
            .collect();
        assert_eq!(indices, [1, 0]);
    }
}
