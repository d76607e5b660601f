//! RGBA colors handed to render sinks.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Creates a color from its channels
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque red - solid geometry in debug views
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    /// Opaque green - actors in debug views
    pub const GREEN: Self = Self::rgba(0, 255, 0, 255);
    /// Opaque yellow - one-way platforms in debug views
    pub const YELLOW: Self = Self::rgba(255, 255, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
