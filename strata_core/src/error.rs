// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rejected mutations.

use crate::registry::DisplayId;

/// A mutation the layer refused. State is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    /// `Invalid` is not a composition type a layer can be switched to.
    #[error("[{display:?}] composition type is invalid")]
    InvalidCompositionType {
        /// Display owning the layer.
        display: DisplayId,
    },
    /// A visible region must contain at least one rectangle.
    #[error("visible region is empty")]
    EmptyVisibleRegion,
    /// The layer handle is stale or belongs to another stack.
    #[error("no such layer")]
    BadLayer,
}

impl LayerError {
    /// HWC2 `BadLayer` status.
    pub const BAD_LAYER: i32 = 3;
    /// HWC2 `BadParameter` status.
    pub const BAD_PARAMETER: i32 = 4;

    /// Returns the HWC2 status code reported to the windowing system.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidCompositionType { .. } | Self::EmptyVisibleRegion => Self::BAD_PARAMETER,
            Self::BadLayer => Self::BAD_LAYER,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn codes() {
        let invalid = LayerError::InvalidCompositionType {
            display: DisplayId(0),
        };
        assert_eq!(invalid.code(), 4);
        assert_eq!(LayerError::EmptyVisibleRegion.code(), 4);
        assert_eq!(LayerError::BadLayer.code(), 3);
    }

    #[test]
    fn message_names_display() {
        let err = LayerError::InvalidCompositionType {
            display: DisplayId(2),
        };
        assert_eq!(err.to_string(), "[Disp2] composition type is invalid");
    }
}
