// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking bits for layer properties.
//!
//! Every mutable property category of a [`Layer`](crate::layer::Layer) owns
//! exactly one bit. A setter raises its bit only when the stored value
//! actually changes, so a repeated write of an identical value leaves the
//! mask untouched.
//!
//! # Accumulation window
//!
//! Bits accumulate from construction (or the last drain) until the
//! downstream validate/present cycle calls
//! [`Layer::take_changes`](crate::layer::Layer::take_changes), which returns
//! the mask and clears it. Layers never clear their own bits otherwise.
//!
//! Damage is deliberately absent: surface damage is replaced wholesale every
//! frame and is consumed as a region, not as a change bit.

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Set of property categories changed since the last drain.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerDirty: u32 {
        /// Bound buffer identity changed.
        const BUFFER = 1 << 0;
        /// Blend mode changed.
        const BLEND_MODE = 1 << 1;
        /// Solid fill color changed.
        const COLOR = 1 << 2;
        /// Composition type changed.
        const COMPOSITION_TYPE = 1 << 3;
        /// Dataspace changed.
        const DATASPACE = 1 << 4;
        /// Destination rectangle changed.
        const DISPLAY_FRAME = 1 << 5;
        /// Quantized plane alpha changed.
        const PLANE_ALPHA = 1 << 6;
        /// Source crop changed.
        const SOURCE_CROP = 1 << 7;
        /// Rotation/flip transform changed.
        const TRANSFORM = 1 << 8;
        /// Visible region changed.
        const VISIBLE_REGION = 1 << 9;
        /// Z-order changed.
        const Z_ORDER = 1 << 10;
        /// Sideband stream identity changed.
        const SIDEBAND = 1 << 11;
    }
}

impl LayerDirty {
    /// Whether any geometry input of the layer changed.
    ///
    /// Drivers use this to decide whether plane scaling and placement need to
    /// be reprogrammed.
    #[must_use]
    pub fn has_geometry_change(self) -> bool {
        self.intersects(
            Self::DISPLAY_FRAME | Self::SOURCE_CROP | Self::TRANSFORM | Self::VISIBLE_REGION,
        )
    }
}

impl fmt::Display for LayerDirty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("clean");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn bits_are_distinct() {
        let all = LayerDirty::all();
        assert_eq!(all.bits().count_ones(), 12, "one bit per property category");
    }

    #[test]
    fn geometry_change_detection() {
        assert!(LayerDirty::SOURCE_CROP.has_geometry_change());
        assert!((LayerDirty::COLOR | LayerDirty::TRANSFORM).has_geometry_change());
        assert!(!(LayerDirty::COLOR | LayerDirty::Z_ORDER).has_geometry_change());
    }

    #[test]
    fn display_lists_names() {
        assert_eq!(LayerDirty::empty().to_string(), "clean");
        assert_eq!(
            (LayerDirty::BUFFER | LayerDirty::Z_ORDER).to_string(),
            "BUFFER | Z_ORDER"
        );
    }
}
