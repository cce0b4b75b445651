// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-data capture of a layer's state.

use kurbo::Rect;

use strata_core::buffer::PixelFormat;
use strata_core::dirty::LayerDirty;
use strata_core::fence::{AcquireFence, NO_FENCE, RawFence};
use strata_core::geometry::{IntRect, Region};
use strata_core::layer::{
    BlendMode, Color, CompositionType, Dataspace, Layer, LayerId, Transform, ValidatedComposition,
};
use strata_core::registry::DisplayId;

/// Everything a dump needs to know about one layer.
///
/// Holds no references into the layer, so it can be kept past the layer's
/// lifetime or sent to another thread.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSnapshot {
    /// Owning display.
    pub display: DisplayId,
    /// Handle within the display's stack.
    pub id: LayerId,
    /// Z-order key.
    pub z_order: u32,
    /// Requested composition type.
    pub composition_type: CompositionType,
    /// Compositor verdict from the last validation.
    pub validated: Option<ValidatedComposition>,
    /// Blend mode.
    pub blend_mode: BlendMode,
    /// Rotation/flip transform.
    pub transform: Transform,
    /// Dataspace tag.
    pub dataspace: Dataspace,
    /// Pixel format of the bound buffer.
    pub format: PixelFormat,
    /// Whether alpha blending is needed.
    pub has_alpha: bool,
    /// Whether a buffer is bound.
    pub has_buffer: bool,
    /// Whether a sideband stream is attached.
    pub has_sideband: bool,
    /// Raw acquire fence handle, or [`NO_FENCE`].
    pub acquire_fence: RawFence,
    /// Raw release fence handle, or [`NO_FENCE`].
    pub release_fence: RawFence,
    /// Sampled sub-region of the buffer.
    pub source_crop: Rect,
    /// Destination rectangle.
    pub display_frame: IntRect,
    /// Quantized plane alpha.
    pub plane_alpha: u8,
    /// Solid fill color.
    pub color: Color,
    /// Opaque solid fill.
    pub is_dim: bool,
    /// Visible region.
    pub visible_region: Region,
    /// Damage region.
    pub damage_region: Region,
    /// Pending dirty bits.
    pub dirty: LayerDirty,
    /// Whether a new buffer is pending.
    pub buffer_changed: bool,
}

impl LayerSnapshot {
    /// Copies the current state of `layer`. Does not drain its changes.
    #[must_use]
    pub fn capture(layer: &Layer) -> Self {
        Self {
            display: layer.display(),
            id: layer.id(),
            z_order: layer.z_order(),
            composition_type: layer.composition_type(),
            validated: layer.validated_composition(),
            blend_mode: layer.blend_mode(),
            transform: layer.transform(),
            dataspace: layer.dataspace(),
            format: layer.format(),
            has_alpha: layer.has_alpha(),
            has_buffer: layer.buffer().is_some(),
            has_sideband: layer.sideband_stream().is_some(),
            acquire_fence: layer.acquire_fence().map_or(NO_FENCE, AcquireFence::as_raw),
            release_fence: layer.release_fence(),
            source_crop: layer.source_crop(),
            display_frame: layer.display_frame(),
            plane_alpha: layer.plane_alpha_u8(),
            color: layer.color(),
            is_dim: layer.is_dim(),
            visible_region: layer.visible_region().clone(),
            damage_region: layer.damage_region().clone(),
            dirty: layer.dirty(),
            buffer_changed: layer.buffer_changed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::diag::DiagnosticsConfig;
    use strata_core::registry::LayerContext;

    #[test]
    fn capture_default_layer() {
        let layer = Layer::new(
            DisplayId(2),
            LayerContext::detached(DiagnosticsConfig::silent()),
        );
        let snap = LayerSnapshot::capture(&layer);
        assert_eq!(snap.display, DisplayId(2));
        assert!(snap.id.is_detached());
        assert_eq!(snap.format, PixelFormat::UNKNOWN);
        assert_eq!(snap.acquire_fence, NO_FENCE);
        assert_eq!(snap.plane_alpha, 255);
        assert!(!snap.has_buffer);
        assert!(snap.visible_region.is_empty());
        assert!(snap.dirty.is_empty());
    }

    #[test]
    fn capture_does_not_drain() {
        let mut layer = Layer::new(DisplayId(0), LayerContext::default());
        layer.set_z_order(5);
        layer
            .set_visible_region(&[IntRect::new(0, 0, 4, 4)])
            .unwrap();
        let snap = LayerSnapshot::capture(&layer);
        assert_eq!(snap.z_order, 5);
        assert_eq!(snap.visible_region.rects(), &[IntRect::new(0, 0, 4, 4)]);
        assert_eq!(snap.dirty, LayerDirty::Z_ORDER | LayerDirty::VISIBLE_REGION);
        assert_eq!(layer.dirty(), snap.dirty, "layer still dirty");
    }
}
