// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native image buffers and sideband streams.
//!
//! Both are allocated and owned by the platform's buffer subsystem. A layer
//! holds them through [`Arc`](alloc::sync::Arc) so a bound buffer can never
//! dangle, but a layer never frees one: dropping the last reference is the
//! producer's business. Identity (not content) is what layers compare.

use core::fmt;

/// A HAL pixel format tag.
///
/// The value is owned by the buffer subsystem and treated as an opaque
/// identifier. Only [`has_alpha`](Self::has_alpha) interprets it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PixelFormat(pub u32);

impl PixelFormat {
    /// Returned by [`Layer::format`](crate::layer::Layer::format) when no
    /// buffer is bound.
    pub const UNKNOWN: Self = Self(u32::MAX);
    /// 32-bit RGBA, 8 bits per channel.
    pub const RGBA_8888: Self = Self(0x1);
    /// 32-bit RGBX, alpha channel ignored.
    pub const RGBX_8888: Self = Self(0x2);
    /// 24-bit packed RGB.
    pub const RGB_888: Self = Self(0x3);
    /// 16-bit RGB 5:6:5.
    pub const RGB_565: Self = Self(0x4);
    /// 32-bit BGRA, 8 bits per channel.
    pub const BGRA_8888: Self = Self(0x5);
    /// 64-bit RGBA, half-float channels.
    pub const RGBA_FP16: Self = Self(0x16);
    /// 32-bit RGBA, 10:10:10:2.
    pub const RGBA_1010102: Self = Self(0x2B);

    /// Highest format value covered by the alpha table.
    const ALPHA_TABLE_LEN: u32 = 43;
    /// Bit `n` is set when format `n + 1` carries per-pixel alpha.
    const ALPHA_TABLE: u64 = 1 << (Self::RGBA_8888.0 - 1)
        | 1 << (Self::BGRA_8888.0 - 1)
        | 1 << (Self::RGBA_FP16.0 - 1)
        | 1 << (Self::RGBA_1010102.0 - 1);

    /// Returns whether pixels of this format carry an alpha channel.
    ///
    /// Formats outside `1..=43` (including [`UNKNOWN`](Self::UNKNOWN)) are
    /// defined to have none.
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        let index = self.0.wrapping_sub(1);
        if index >= Self::ALPHA_TABLE_LEN {
            return false;
        }
        (Self::ALPHA_TABLE >> index) & 1 != 0
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNKNOWN {
            f.write_str("PixelFormat(unknown)")
        } else {
            write!(f, "PixelFormat({:#x})", self.0)
        }
    }
}

/// A native image buffer bound to a layer.
pub trait NativeBuffer: fmt::Debug + Send + Sync {
    /// The buffer's pixel format, as recorded in its metadata.
    fn format(&self) -> PixelFormat;
}

/// An alternate image source (e.g. a tunneled video stream) that bypasses
/// buffer submission.
pub trait SidebandStream: fmt::Debug + Send + Sync {}
