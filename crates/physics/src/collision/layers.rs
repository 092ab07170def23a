//! Collider layers and layer masks for query filtering.
//!
//! Every collider sits on exactly one of 32 layers. Queries and per-layer
//! rules (such as "this layer counts as stairs") are expressed as masks.

use serde::{Deserialize, Serialize};

/// Layer index of a collider (0..32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layer(u8);

impl Layer {
    /// Default layer for untagged geometry.
    pub const DEFAULT: Self = Self(0);

    /// Layer conventionally used for stair geometry.
    pub const STAIRS: Self = Self(1);

    /// Small props the camera should see through.
    pub const DETAIL: Self = Self(2);

    /// Create a layer, wrapping the index into the valid range.
    #[inline]
    pub const fn new(index: u8) -> Self {
        Self(index % 32)
    }

    /// Layer index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Mask containing only this layer.
    #[inline]
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

/// Bit set of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);

    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Check whether the given layer is part of this mask.
    #[inline]
    pub fn contains(self, layer: Layer) -> bool {
        (self.0 & (1 << layer.index())) != 0
    }

    /// This mask plus one more layer.
    #[inline]
    pub fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.mask().0)
    }

    /// This mask minus one layer.
    #[inline]
    pub fn without(self, layer: Layer) -> Self {
        Self(self.0 & !layer.mask().0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
