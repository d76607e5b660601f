//! # KESTREL
//!
//! The main game crate: pixel-stepped physics, rooms and the frame driver
//! on top of the [`kestrel_core`] runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  room.rs       descriptor (TOML) ──> entities + SpawnFactory      │
//! │                                                                  │
//! │  physics/      Collider <── Mover (X then Y, 1px steps)          │
//! │                    ^                                             │
//! │                    └──────── Solid (carries riders)              │
//! │                                                                  │
//! │  gameplay/     Timer, Hurtbox, Pickup                            │
//! │  tilemap.rs    tile textures                                     │
//! │                                                                  │
//! │  game_loop.rs  fixed timestep ──> World::update / render         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `physics`: collision shapes, movers and moving platforms
//! - `gameplay`: timers, hurtboxes and pickups
//! - `room`: room descriptors and instantiation
//! - `game_loop`: frame orchestration, timing and configuration

#![deny(missing_docs)]
#![deny(unsafe_code)]

use std::sync::Arc;

use kestrel_core::{ComponentRegistry, RegistryBuilder};

pub mod error;
pub mod game_loop;
pub mod gameplay;
pub mod physics;
pub mod room;
pub mod spawn;
pub mod tilemap;

// Re-export the runtime
pub use kestrel_core as core;
pub use kestrel_shared as shared;

// Re-export commonly used types
pub use error::{ConfigError, ConfigResult, RoomError, RoomResult};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig};
pub use gameplay::{Hurtbox, Pickup, Timer, TimerMode};
pub use physics::{Collider, Mover, Solid};
pub use room::{Room, RoomDescriptor, RoomInstance, SpawnFactory, MAX_ROOM_CELLS};
pub use tilemap::Tilemap;

/// Registers the built-in components on `builder`.
///
/// Kinds update in registration order, so game components that steer
/// movers (players, enemies) should be registered before calling this.
/// Built-ins update as: timers, hurtboxes, pickups, movers, solids; then
/// the update-less colliders and tilemaps.
#[must_use]
pub fn register_builtins(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register::<Timer>()
        .register::<Hurtbox>()
        .register::<Pickup>()
        .register::<Mover>()
        .register::<Solid>()
        .register::<Collider>()
        .register::<Tilemap>()
}

/// Registry holding only the built-in components.
#[must_use]
pub fn registry() -> Arc<ComponentRegistry> {
    register_builtins(ComponentRegistry::builder()).build()
}
