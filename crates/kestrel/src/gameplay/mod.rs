//! # Gameplay Hooks
//!
//! Generic mechanisms any room content can build on:
//! - Timers that fire, repeat or clean up after themselves
//! - Hurtboxes reporting hits with an invulnerability window
//! - Pickups collected on contact

pub mod hurtbox;
pub mod pickup;
pub mod timer;

pub use hurtbox::{HurtCallback, Hurtbox};
pub use pickup::{Pickup, PickupCallback};
pub use timer::{Timer, TimerCallback, TimerMode};
