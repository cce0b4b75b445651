// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-surface layer state machine.

use alloc::sync::Arc;
use core::fmt;
use core::mem;

use kurbo::Rect;

use super::id::LayerId;
use super::props::{
    BlendMode, Color, CompositionType, Dataspace, Transform, ValidatedComposition,
};
use crate::buffer::{NativeBuffer, PixelFormat, SidebandStream};
use crate::diag::DebugLevel;
use crate::dirty::LayerDirty;
use crate::error::LayerError;
use crate::fence::{AcquireFence, NO_FENCE, RawFence};
use crate::geometry::{IntRect, Region};
use crate::registry::{DisplayId, LayerContext};

/// Changes accumulated by a [`Layer`] since the previous drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerChanges {
    /// Property categories whose value changed.
    pub dirty: LayerDirty,
    /// Whether a different buffer was bound.
    pub buffer_changed: bool,
}

impl LayerChanges {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty() && !self.buffer_changed
    }
}

/// The complete client-visible state of one compositable surface.
///
/// Every setter compares against the stored value first: writing an
/// identical value is a true no-op (no dirty bit, no log line, no side
/// effect). A changed value is stored and raises exactly the matching
/// [`LayerDirty`] bit. Bits accumulate until the compositor drains them with
/// [`take_changes`](Self::take_changes); writing back the value a property had
/// at the start of the window does not clear its bit.
///
/// The layer owns its acquire fence (closed when replaced, on
/// [`reset`](Self::reset), and on drop) and shares, but never frees, its
/// buffer and sideband stream.
pub struct Layer {
    display: DisplayId,
    id: LayerId,
    ctx: LayerContext,

    buffer: Option<Arc<dyn NativeBuffer>>,
    sideband: Option<Arc<dyn SidebandStream>>,
    acquire_fence: Option<AcquireFence>,
    release_fence: RawFence,

    transform: Transform,
    blend_mode: BlendMode,
    source_crop: Rect,
    display_frame: IntRect,
    plane_alpha: f32,
    plane_alpha_u8: u8,
    color: Color,
    dataspace: Dataspace,
    z_order: u32,
    composition_type: CompositionType,
    validated: Option<ValidatedComposition>,

    visible_region: Region,
    damage_region: Region,

    dirty: LayerDirty,
    buffer_changed: bool,
}

impl Layer {
    /// Creates a layer on `display` with every property at its default.
    ///
    /// The layer starts detached ([`LayerId::DETACHED`]) and clean.
    #[must_use]
    pub fn new(display: DisplayId, ctx: LayerContext) -> Self {
        Self {
            display,
            id: LayerId::DETACHED,
            ctx,
            buffer: None,
            sideband: None,
            acquire_fence: None,
            release_fence: NO_FENCE,
            transform: Transform::IDENTITY,
            blend_mode: BlendMode::default(),
            source_crop: Rect::ZERO,
            display_frame: IntRect::ZERO,
            plane_alpha: 1.0,
            plane_alpha_u8: u8::MAX,
            color: Color::default(),
            dataspace: Dataspace::UNKNOWN,
            z_order: 0,
            composition_type: CompositionType::Invalid,
            validated: None,
            visible_region: Region::new(),
            damage_region: Region::new(),
            dirty: LayerDirty::empty(),
            buffer_changed: false,
        }
    }

    /// Returns the layer to its freshly constructed state on `display`,
    /// keeping its id and context.
    ///
    /// Closes the acquire fence if one is held.
    pub fn reset(&mut self, display: DisplayId) {
        let id = self.id;
        let ctx = self.ctx.clone();
        *self = Self::new(display, ctx);
        self.id = id;
    }

    // -- Identity --

    /// Owning display.
    #[must_use]
    pub fn display(&self) -> DisplayId {
        self.display
    }

    /// Position in the display's layer stack.
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Binds the layer to its slot in a display's layer stack.
    pub(crate) fn attach(&mut self, display: DisplayId, id: LayerId) {
        self.display = display;
        self.id = id;
    }

    // -- Getters (read-only, no dirty marking) --

    /// Bound buffer, if any.
    #[must_use]
    pub fn buffer(&self) -> Option<&Arc<dyn NativeBuffer>> {
        self.buffer.as_ref()
    }

    /// Sideband stream, if any.
    #[must_use]
    pub fn sideband_stream(&self) -> Option<&Arc<dyn SidebandStream>> {
        self.sideband.as_ref()
    }

    /// The currently held acquire fence.
    #[must_use]
    pub fn acquire_fence(&self) -> Option<&AcquireFence> {
        self.acquire_fence.as_ref()
    }

    /// Hands the acquire fence over to the caller (typically the driver,
    /// which waits on it before scanning out the buffer).
    pub fn take_acquire_fence(&mut self) -> Option<AcquireFence> {
        self.acquire_fence.take()
    }

    /// Release fence reported by the compositor, or [`NO_FENCE`].
    #[must_use]
    pub fn release_fence(&self) -> RawFence {
        self.release_fence
    }

    /// Rotation/flip transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Blend mode.
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Sampled sub-region of the buffer.
    #[must_use]
    pub fn source_crop(&self) -> Rect {
        self.source_crop
    }

    /// Destination rectangle on the display.
    #[must_use]
    pub fn display_frame(&self) -> IntRect {
        self.display_frame
    }

    /// Plane alpha as last accepted, in `0.0..=1.0`.
    #[must_use]
    pub fn plane_alpha(&self) -> f32 {
        self.plane_alpha
    }

    /// Plane alpha quantized to `0..=255`.
    #[must_use]
    pub fn plane_alpha_u8(&self) -> u8 {
        self.plane_alpha_u8
    }

    /// Solid fill color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Dataspace tag.
    #[must_use]
    pub fn dataspace(&self) -> Dataspace {
        self.dataspace
    }

    /// Z-order key. Higher values draw on top.
    #[must_use]
    pub fn z_order(&self) -> u32 {
        self.z_order
    }

    /// Requested composition type.
    #[must_use]
    pub fn composition_type(&self) -> CompositionType {
        self.composition_type
    }

    /// The compositor's verdict from the last validation, if any.
    #[must_use]
    pub fn validated_composition(&self) -> Option<ValidatedComposition> {
        self.validated
    }

    /// Visible (unoccluded) part of the display frame.
    #[must_use]
    pub fn visible_region(&self) -> &Region {
        &self.visible_region
    }

    /// Part of the source that changed since the previous frame.
    #[must_use]
    pub fn damage_region(&self) -> &Region {
        &self.damage_region
    }

    /// Dirty bits accumulated since the last drain.
    #[must_use]
    pub fn dirty(&self) -> LayerDirty {
        self.dirty
    }

    /// Whether a different buffer was bound since the last drain.
    #[must_use]
    pub fn buffer_changed(&self) -> bool {
        self.buffer_changed
    }

    /// Whether this is an opaque solid fill ("dim layer").
    #[must_use]
    pub fn is_dim(&self) -> bool {
        self.composition_type == CompositionType::SolidColor && self.color.is_opaque()
    }

    // -- Derived queries --

    /// Pixel format of the bound buffer, or [`PixelFormat::UNKNOWN`].
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.buffer
            .as_ref()
            .map_or(PixelFormat::UNKNOWN, |buffer| buffer.format())
    }

    /// Whether the layer needs alpha blending: either the plane alpha is
    /// below opaque, or the bound buffer's format carries alpha.
    #[must_use]
    pub fn has_alpha(&self) -> bool {
        self.plane_alpha_u8 != u8::MAX || self.format().has_alpha()
    }

    /// The solid fill color packed as `0xAARRGGBB`.
    #[must_use]
    pub fn packed_color(&self) -> u32 {
        self.color.to_argb()
    }

    // -- Mutation API (marks dirty on change) --

    /// Sets the blend mode from an HWC2 code.
    ///
    /// Codes outside `1..=3` are ignored without error, for compatibility
    /// with callers that pass `Invalid` (0) or vendor values.
    pub fn set_blend_mode(&mut self, code: i32) {
        let Some(mode) = BlendMode::from_hwc2(code) else {
            return;
        };
        if mode == self.blend_mode {
            return;
        }
        self.blend_mode = mode;
        self.dirty |= LayerDirty::BLEND_MODE;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                ?mode,
                "blend mode changed"
            );
        }
    }

    /// Binds `buffer`, which becomes readable once `acquire_fence` signals.
    ///
    /// A missing buffer or a missing fence is rejected and the layer is left
    /// unchanged; a fence passed along with a missing buffer is closed. On
    /// acceptance the previously held fence is closed and replaced, whether
    /// or not the buffer itself changed. [`LayerDirty::BUFFER`] is raised only
    /// when a different buffer is bound.
    pub fn set_buffer(
        &mut self,
        buffer: Option<Arc<dyn NativeBuffer>>,
        acquire_fence: Option<AcquireFence>,
    ) {
        let Some(buffer) = buffer else {
            if self.enabled(DebugLevel::WARN) {
                tracing::warn!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    "invalid buffer handle"
                );
            }
            return;
        };
        let Some(acquire_fence) = acquire_fence else {
            if self.enabled(DebugLevel::WARN) {
                tracing::warn!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    "acquire fence missing"
                );
            }
            return;
        };

        if let Some(old) = self.acquire_fence.replace(acquire_fence) {
            if self.enabled(DebugLevel::INFO) {
                tracing::info!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    fence = old.as_raw(),
                    "closing acquire fence"
                );
            }
            drop(old);
        }

        if self
            .buffer
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &buffer))
        {
            return;
        }
        self.buffer = Some(buffer);
        self.buffer_changed = true;
        self.dirty |= LayerDirty::BUFFER;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                format = ?self.format(),
                "buffer changed"
            );
        }
    }

    /// Sets the solid fill color.
    pub fn set_color(&mut self, color: Color) {
        if color == self.color {
            return;
        }
        self.color = color;
        self.dirty |= LayerDirty::COLOR;
        if self.is_dim() && self.enabled(DebugLevel::INFO) {
            tracing::info!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                "dim layer"
            );
        }
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                argb = color.to_argb(),
                "color changed"
            );
        }
    }

    /// Sets who draws the layer.
    ///
    /// On change, the owning display is told to drop state it cached for this
    /// layer's previous composition type.
    ///
    /// # Errors
    ///
    /// [`LayerError::InvalidCompositionType`] if `ty` is
    /// [`CompositionType::Invalid`]; the layer is left unchanged.
    pub fn set_composition_type(&mut self, ty: CompositionType) -> Result<(), LayerError> {
        if ty == CompositionType::Invalid {
            if self.ctx.diagnostics.errors_enabled() {
                tracing::error!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    site = "Layer::set_composition_type",
                    "composition type is invalid"
                );
            }
            return Err(LayerError::InvalidCompositionType {
                display: self.display,
            });
        }
        if ty == self.composition_type {
            return Ok(());
        }
        self.composition_type = ty;
        self.dirty |= LayerDirty::COMPOSITION_TYPE;
        self.ctx
            .registry
            .invalidate_composition(self.display, self.id);
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                composition = ?ty,
                "composition type changed"
            );
        }
        Ok(())
    }

    /// Sets the dataspace.
    pub fn set_dataspace(&mut self, dataspace: Dataspace) {
        if dataspace == self.dataspace {
            return;
        }
        self.dataspace = dataspace;
        self.dirty |= LayerDirty::DATASPACE;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                dataspace = dataspace.0,
                "dataspace changed"
            );
        }
    }

    /// Sets the destination rectangle. Compared exactly.
    pub fn set_display_frame(&mut self, frame: IntRect) {
        if frame == self.display_frame {
            return;
        }
        self.display_frame = frame;
        self.dirty |= LayerDirty::DISPLAY_FRAME;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                ?frame,
                "display frame changed"
            );
        }
    }

    /// Sets the plane alpha.
    ///
    /// The value is quantized to `round(alpha * 255)` clamped to `0..=255`;
    /// only a change of the quantized value counts. NaN quantizes to 0.
    pub fn set_plane_alpha(&mut self, alpha: f32) {
        let quantized = quantize_alpha(alpha);
        if quantized == self.plane_alpha_u8 {
            return;
        }
        self.plane_alpha = alpha;
        self.plane_alpha_u8 = quantized;
        self.dirty |= LayerDirty::PLANE_ALPHA;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                alpha = quantized,
                "plane alpha changed"
            );
        }
    }

    /// Attaches or detaches a sideband stream.
    ///
    /// Raises [`LayerDirty::SIDEBAND`] when the stream identity changes.
    pub fn set_sideband_stream(&mut self, stream: Option<Arc<dyn SidebandStream>>) {
        let same = match (&self.sideband, &stream) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        self.sideband = stream;
        self.dirty |= LayerDirty::SIDEBAND;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                attached = self.sideband.is_some(),
                "sideband stream changed"
            );
        }
    }

    /// Sets the sampled sub-region of the buffer.
    ///
    /// Edges are compared for exact equality, without epsilon.
    pub fn set_source_crop(&mut self, crop: Rect) {
        if crop == self.source_crop {
            return;
        }
        self.source_crop = crop;
        self.dirty |= LayerDirty::SOURCE_CROP;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                ?crop,
                "source crop changed"
            );
        }
    }

    /// Replaces the damage region.
    ///
    /// An empty list means the whole layer changed and is recorded as the
    /// source crop, truncated to integers. Damage is not dirty-tracked.
    pub fn set_surface_damage(&mut self, rects: &[IntRect]) {
        if rects.is_empty() {
            self.damage_region.replace(&[IntRect::from_truncated(self.source_crop)]);
        } else {
            self.damage_region.replace(rects);
        }
        if self.enabled(DebugLevel::VERBOSE) {
            for rect in self.damage_region.rects() {
                tracing::debug!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    ?rect,
                    "damage rect"
                );
            }
        }
    }

    /// Sets the rotation/flip transform.
    pub fn set_transform(&mut self, transform: Transform) {
        if transform == self.transform {
            return;
        }
        self.transform = transform;
        self.dirty |= LayerDirty::TRANSFORM;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                transform = transform.bits(),
                "transform changed"
            );
        }
    }

    /// Replaces the visible region.
    ///
    /// # Errors
    ///
    /// [`LayerError::EmptyVisibleRegion`] if `rects` is empty; the current
    /// region is kept.
    pub fn set_visible_region(&mut self, rects: &[IntRect]) -> Result<(), LayerError> {
        if rects.is_empty() {
            if self.enabled(DebugLevel::WARN) {
                tracing::warn!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    "empty visible region"
                );
            }
            return Err(LayerError::EmptyVisibleRegion);
        }
        if rects == self.visible_region.rects() {
            return Ok(());
        }
        self.visible_region.replace(rects);
        self.dirty |= LayerDirty::VISIBLE_REGION;
        if self.enabled(DebugLevel::VERBOSE) {
            for rect in rects {
                tracing::debug!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    ?rect,
                    "visible rect"
                );
            }
        }
        Ok(())
    }

    /// Sets the z-order key.
    pub fn set_z_order(&mut self, z_order: u32) {
        if z_order == self.z_order {
            return;
        }
        self.z_order = z_order;
        self.dirty |= LayerDirty::Z_ORDER;
        if self.enabled(DebugLevel::VERBOSE) {
            tracing::debug!(
                target: "strata::layer",
                display = ?self.display,
                layer = ?self.id,
                z_order,
                "z-order changed"
            );
        }
    }

    /// Records the release fence produced by the compositor for the current
    /// buffer. The layer does not own it.
    pub fn set_release_fence(&mut self, fence: RawFence) {
        self.release_fence = fence;
    }

    /// Records the compositor's verdict for this layer.
    pub fn set_validated_composition(&mut self, verdict: ValidatedComposition) {
        self.validated = Some(verdict);
    }

    // -- Drain / copy --

    /// Returns the accumulated changes and starts a new accumulation window.
    pub fn take_changes(&mut self) -> LayerChanges {
        LayerChanges {
            dirty: mem::take(&mut self.dirty),
            buffer_changed: mem::take(&mut self.buffer_changed),
        }
    }

    /// Copies every property of `src` into this layer, keeping this layer's
    /// display, id, and context.
    ///
    /// The acquire fence is duplicated rather than shared; this layer's own
    /// fence is closed. Since every property is conceptually new, the layer
    /// ends up fully dirty with `buffer_changed` set.
    pub fn copy_from(&mut self, src: &Self) {
        let fence = src.acquire_fence.as_ref().and_then(|fence| {
            let copy = fence.try_clone();
            if copy.is_none() && self.enabled(DebugLevel::WARN) {
                tracing::warn!(
                    target: "strata::layer",
                    display = ?self.display,
                    layer = ?self.id,
                    fence = fence.as_raw(),
                    "could not duplicate acquire fence"
                );
            }
            copy
        });
        self.acquire_fence = fence;

        self.buffer.clone_from(&src.buffer);
        self.sideband.clone_from(&src.sideband);
        self.release_fence = src.release_fence;
        self.transform = src.transform;
        self.blend_mode = src.blend_mode;
        self.source_crop = src.source_crop;
        self.display_frame = src.display_frame;
        self.plane_alpha = src.plane_alpha;
        self.plane_alpha_u8 = src.plane_alpha_u8;
        self.color = src.color;
        self.dataspace = src.dataspace;
        self.z_order = src.z_order;
        self.composition_type = src.composition_type;
        self.validated = src.validated;
        self.visible_region.clone_from(&src.visible_region);
        self.damage_region.clone_from(&src.damage_region);

        self.dirty = LayerDirty::all();
        self.buffer_changed = true;
    }

    // -- Internal helpers --

    fn enabled(&self, level: DebugLevel) -> bool {
        self.ctx.diagnostics.enabled(level)
    }
}

/// Quantizes a normalized alpha to `0..=255`, rounding half away from zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to 0.0..=255.5 before the cast"
)]
fn quantize_alpha(alpha: f32) -> u8 {
    ((alpha * 255.0).clamp(0.0, 255.0) + 0.5) as u8
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("display", &self.display)
            .field("id", &self.id)
            .field("buffer", &self.buffer)
            .field("sideband", &self.sideband)
            .field("acquire_fence", &self.acquire_fence)
            .field("release_fence", &self.release_fence)
            .field("transform", &self.transform)
            .field("blend_mode", &self.blend_mode)
            .field("source_crop", &self.source_crop)
            .field("display_frame", &self.display_frame)
            .field("plane_alpha", &self.plane_alpha_u8)
            .field("color", &self.color)
            .field("dataspace", &self.dataspace)
            .field("z_order", &self.z_order)
            .field("composition_type", &self.composition_type)
            .field("validated", &self.validated)
            .field("visible_region", &self.visible_region)
            .field("damage_region", &self.damage_region)
            .field("dirty", &self.dirty)
            .field("buffer_changed", &self.buffer_changed)
            .finish_non_exhaustive()
    }
}
