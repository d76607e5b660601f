//! # Entity-Component Runtime
//!
//! - Entities: positioned containers with generational ids
//! - Components: pooled behavior units, one storage per registered kind
//! - World: owns both and drives update and render passes

mod component;
mod entity;
mod list;
mod registry;
mod render;
mod storage;
mod world;

pub use component::{Component, ComponentId, ComponentType};
pub use entity::{Entity, EntityId};
pub use list::{AliveList, Iter as AliveIter, Linked, ListNode};
pub use registry::{ComponentRegistry, RegistryBuilder};
pub use render::{DrawCommand, DrawList, RenderSink, TextureId};
pub use world::World;
