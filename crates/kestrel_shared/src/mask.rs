//! Collision masks.
//!
//! A [`Mask`] tags a collider with the semantic categories it belongs to.
//! Queries pass a mask and only consider colliders whose mask intersects it.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Bitset of collider categories.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Mask(pub u32);

impl Mask {
    /// No categories
    pub const NONE: Self = Self(0);
    /// Blocks movers on both axes
    pub const SOLID: Self = Self(1 << 0);
    /// The player actor
    pub const PLAYER: Self = Self(1 << 1);
    /// Enemy actors
    pub const ENEMY: Self = Self(1 << 2);
    /// Collectible items
    pub const ITEM: Self = Self(1 << 3);
    /// One-way platforms, blocking only from above
    pub const JUMPTHRU: Self = Self(1 << 4);
    /// Ladders and vines
    pub const CLIMBABLE: Self = Self(1 << 5);
    /// Room boundary volumes
    pub const ROOM_BOUNDS: Self = Self(1 << 6);
    /// Player attack hitboxes
    pub const PLAYER_ATTACK: Self = Self(1 << 7);
    /// Spikes, lava and other damaging geometry
    pub const HAZARD: Self = Self(1 << 8);
    /// Every category
    pub const ALL: Self = Self(u32::MAX);

    /// Whether the two masks share at least one category
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every category of `other` is present in `self`
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no category is set
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Mask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Mask {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}
