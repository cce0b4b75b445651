// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and rectangle lists.
//!
//! Display-space geometry (display frame, visible and damage regions) is
//! integral. The source crop samples the buffer at sub-pixel precision and is
//! carried as a [`kurbo::Rect`].

use alloc::vec::Vec;
use core::fmt;

/// An axis-aligned integer rectangle with exclusive right/bottom edges.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl IntRect {
    /// The all-zero rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its four edges.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Converts a float rectangle by truncating each edge toward zero.
    ///
    /// Values outside the `i32` range saturate and NaN becomes 0.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation toward zero is the documented conversion"
    )]
    pub fn from_truncated(rect: kurbo::Rect) -> Self {
        Self {
            left: rect.x0 as i32,
            top: rect.y0 as i32,
            right: rect.x1 as i32,
            bottom: rect.y1 as i32,
        }
    }

    /// Width, or 0 for inverted rectangles.
    #[must_use]
    pub fn width(self) -> u32 {
        self.right.saturating_sub(self.left).max(0).unsigned_abs()
    }

    /// Height, or 0 for inverted rectangles.
    #[must_use]
    pub fn height(self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0).unsigned_abs()
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

impl fmt::Debug for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

impl From<IntRect> for kurbo::Rect {
    fn from(r: IntRect) -> Self {
        Self::new(
            f64::from(r.left),
            f64::from(r.top),
            f64::from(r.right),
            f64::from(r.bottom),
        )
    }
}

/// An ordered list of rectangles.
///
/// Rectangles are kept in the order the client supplied them; overlaps are
/// not coalesced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<IntRect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Returns the rectangles in insertion order.
    #[must_use]
    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    /// Number of rectangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if the region holds no rectangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Replaces the contents with copies of `rects`, reusing the allocation.
    pub fn replace(&mut self, rects: &[IntRect]) {
        self.rects.clear();
        self.rects.extend_from_slice(rects);
    }

    /// Bounding box of all rectangles, or `None` for an empty region.
    #[must_use]
    pub fn bounds(&self) -> Option<kurbo::Rect> {
        let mut iter = self.rects.iter().map(|&r| kurbo::Rect::from(r));
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }
}

impl From<&[IntRect]> for Region {
    fn from(rects: &[IntRect]) -> Self {
        Self {
            rects: rects.to_vec(),
        }
    }
}
