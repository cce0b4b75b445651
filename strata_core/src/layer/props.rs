// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value types for layer properties.

use bitflags::bitflags;

/// Who is responsible for drawing a layer.
///
/// Discriminants match the HWC2 wire values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CompositionType {
    /// Not yet assigned. Never a legal target of
    /// [`set_composition_type`](super::Layer::set_composition_type).
    #[default]
    Invalid = 0,
    /// Drawn by the client (GPU) into the client target.
    Client = 1,
    /// Scanned out by display hardware.
    Device = 2,
    /// Filled with a solid color by the hardware.
    SolidColor = 3,
    /// Hardware cursor plane.
    Cursor = 4,
    /// Fed from a sideband stream.
    Sideband = 5,
}

/// The compositor's verdict for a layer after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidatedComposition {
    /// Falls back to client composition.
    Client,
    /// Handled on a hardware plane.
    Device,
}

/// How a layer's pixels combine with what lies below.
///
/// Discriminants are the driver's internal blending values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BlendMode {
    /// Source replaces destination.
    #[default]
    None = 0x0100,
    /// Source color is already multiplied by its alpha.
    Premultiplied = 0x0105,
    /// Source color is multiplied by its alpha during blending.
    Coverage = 0x0405,
}

impl BlendMode {
    const HWC2_TABLE: [Self; 3] = [Self::None, Self::Premultiplied, Self::Coverage];

    /// Maps an HWC2 blend-mode code (1, 2 or 3) to a blend mode.
    ///
    /// Any other code, including HWC2's own `Invalid` (0), yields `None`.
    #[must_use]
    pub fn from_hwc2(code: i32) -> Option<Self> {
        let index = usize::try_from(code.checked_sub(1)?).ok()?;
        Self::HWC2_TABLE.get(index).copied()
    }

    /// The driver's internal value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

bitflags! {
    /// Rotation and flip applied to the source before display.
    ///
    /// Unknown bits are retained so that vendor extensions still compare
    /// correctly.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Transform: u32 {
        /// Mirror horizontally.
        const FLIP_H = 1 << 0;
        /// Mirror vertically.
        const FLIP_V = 1 << 1;
        /// Rotate 90 degrees clockwise.
        const ROT_90 = 1 << 2;
        /// Rotate 180 degrees.
        const ROT_180 = Self::FLIP_H.bits() | Self::FLIP_V.bits();
        /// Rotate 270 degrees clockwise.
        const ROT_270 = Self::ROT_180.bits() | Self::ROT_90.bits();
    }
}

impl Transform {
    /// No rotation or flip.
    pub const IDENTITY: Self = Self::empty();
}

/// A color-space / transfer-function tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dataspace(pub i32);

impl Dataspace {
    /// Unspecified dataspace.
    pub const UNKNOWN: Self = Self(0);
}

/// An 8-bit-per-channel color, used for solid color layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the channels as `0xAARRGGBB`.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Whether the alpha channel is fully opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == u8::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_mode_table() {
        assert_eq!(BlendMode::from_hwc2(1), Some(BlendMode::None));
        assert_eq!(BlendMode::from_hwc2(2), Some(BlendMode::Premultiplied));
        assert_eq!(BlendMode::from_hwc2(3), Some(BlendMode::Coverage));
        assert_eq!(BlendMode::from_hwc2(0), None);
        assert_eq!(BlendMode::from_hwc2(4), None);
        assert_eq!(BlendMode::from_hwc2(-1), None);
        assert_eq!(BlendMode::from_hwc2(i32::MIN), None);
    }

    #[test]
    fn default_blend_mode_is_the_legacy_sentinel() {
        assert_eq!(BlendMode::default().raw(), 0x100);
    }

    #[test]
    fn argb_packing() {
        let c = Color::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_argb(), 0x4411_2233);
        assert_eq!(Color::new(0, 0, 0xFF, 0xFF).to_argb(), 0xFF00_00FF);
    }

    #[test]
    fn composite_rotations() {
        assert_eq!(Transform::ROT_270.bits(), 7);
        assert!(Transform::ROT_270.contains(Transform::ROT_90));
        assert_eq!(Transform::from_bits_retain(0x40).bits(), 0x40);
    }
}
