//! # KESTREL Physics
//!
//! Deterministic pixel-stepped movement:
//! - [`Collider`]: shapes, masks and overlap queries
//! - [`Mover`]: velocity, sub-pixel remainder, axis-ordered resolution
//! - [`Solid`]: kinematic platforms that carry their riders
//!
//! No broad phase: every query scans the live colliders of the world.

mod collider;
mod mover;
mod solid;

pub use collider::{Collider, Grid, Shape};
pub use mover::{Mover, MoverCallback, GROUND_OFFSET};
pub use solid::Solid;
