//! # KESTREL Shared
//!
//! Plain data types used across the workspace.
//!
//! ## Coordinate system
//!
//! All positions are integer pixels and **y grows upward**: "below" an
//! object means a negative y offset. Rectangles are anchored at their
//! bottom-left corner.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod mask;
pub mod math;

pub use color::Color;
pub use mask::Mask;
pub use math::{approach, Point, RectI, Vec2};
