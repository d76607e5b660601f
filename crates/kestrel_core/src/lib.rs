//! # KESTREL Core Runtime
//!
//! Entity-Component runtime for 2D rooms:
//! - Entities are positioned containers of components
//! - Components are pooled per concrete type and reset before reuse
//! - Every type keeps an intrusive alive list walked in insertion order
//!
//! ## Frame Rules
//!
//! 1. **Types update in registration order** - all instances of the first
//!    registered type update before the second type begins
//! 2. **Walks survive destruction** - a component may destroy itself or any
//!    other component during `update`; not-yet-visited victims are skipped
//! 3. **Render is rebuilt every frame** - visible components are gathered,
//!    stable-sorted by depth, dispatched and forgotten
//!
//! ## Example
//!
//! ```rust,ignore
//! use kestrel_core::{ComponentRegistry, World};
//!
//! let registry = ComponentRegistry::builder().register::<Spin>().build();
//! let mut world = World::new(registry);
//! let entity = world.add_entity();
//! let spin = world.acquire::<Spin>();
//! world.add(entity, spin);
//! world.update(1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;
pub mod memory;

pub use ecs::{
    AliveList, Component, ComponentId, ComponentRegistry, ComponentType, DrawCommand, DrawList,
    Entity, EntityId, Linked, ListNode, RegistryBuilder, RenderSink, TextureId, World,
};
pub use error::{EcsError, EcsResult};
pub use memory::{Pool, PoolStats, Poolable};
