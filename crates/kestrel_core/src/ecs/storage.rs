//! # Component Storage
//!
//! Dense per-type storage split in two halves:
//! - Untyped headers (owner, flags, depth, alive-list links) that the world
//!   walks without knowing the concrete type
//! - Typed values plus the type's instance pool, reached by downcasting
//!
//! Slots are recycled through a free list; each reuse bumps the slot's
//! generation so ids of the previous occupant go stale.

use std::any::{type_name, Any};

use super::component::Component;
use super::entity::EntityId;
use super::list::{AliveList, Linked, ListNode};
use crate::memory::{Pool, PoolStats};

/// Bookkeeping shared by every component regardless of its type.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ComponentHeader {
    pub(crate) entity: EntityId,
    pub(crate) generation: u32,
    pub(crate) alive: bool,
    pub(crate) active: bool,
    pub(crate) visible: bool,
    pub(crate) depth: i32,
    /// Destruction requested while the value was checked out.
    pub(crate) pending: bool,
    node: ListNode,
}

impl Default for ComponentHeader {
    fn default() -> Self {
        Self {
            entity: EntityId::NULL,
            generation: 0,
            alive: false,
            active: true,
            visible: true,
            depth: 0,
            pending: false,
            node: ListNode::default(),
        }
    }
}

impl Linked for ComponentHeader {
    fn node(&self) -> &ListNode {
        &self.node
    }
    fn node_mut(&mut self) -> &mut ListNode {
        &mut self.node
    }
}

/// Type-erased half of a storage.
pub(crate) trait ValueStore: Any {
    /// Moves the value out of `index` (if present) and back into the pool.
    fn release(&mut self, index: u32);
    /// Whether a value sits in `index`.
    fn holds(&self, index: u32) -> bool;
    /// Counters of the type's pool.
    fn pool_stats(&self) -> PoolStats;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Values of one concrete component type, indexed like the headers.
///
/// A `None` in a live slot means the value is checked out by a callback.
pub(crate) struct TypedStore<T: Component> {
    pub(crate) values: Vec<Option<T>>,
    pub(crate) pool: Pool<T>,
}

impl<T: Component> TypedStore<T> {
    pub(crate) fn boxed() -> Box<dyn ValueStore> {
        Box::new(Self {
            values: Vec::new(),
            pool: Pool::new(),
        })
    }

    pub(crate) fn insert(&mut self, index: u32, value: T) {
        let index = index as usize;
        if index >= self.values.len() {
            self.values.resize_with(index + 1, || None);
        }
        self.values[index] = Some(value);
    }
}

impl<T: Component> ValueStore for TypedStore<T> {
    fn release(&mut self, index: u32) {
        if let Some(value) = self.values.get_mut(index as usize).and_then(Option::take) {
            self.pool.release(value);
        }
    }

    fn holds(&self, index: u32) -> bool {
        self.values
            .get(index as usize)
            .is_some_and(Option::is_some)
    }

    fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Storage for every instance of one component type.
pub(crate) struct ComponentStorage {
    pub(crate) headers: Vec<ComponentHeader>,
    pub(crate) list: AliveList,
    free: Vec<u32>,
    values: Box<dyn ValueStore>,
}

impl ComponentStorage {
    pub(crate) fn new(values: Box<dyn ValueStore>) -> Self {
        Self {
            headers: Vec::new(),
            list: AliveList::new(),
            free: Vec::new(),
            values,
        }
    }

    /// Claims a slot for `entity` and links it at the tail of the alive
    /// list. Returns the slot index and its new generation.
    pub(crate) fn allocate(&mut self, entity: EntityId, depth: i32) -> (u32, u32) {
        let index = if let Some(index) = self.free.pop() {
            index
        } else {
            self.headers.push(ComponentHeader::default());
            (self.headers.len() - 1) as u32
        };

        let header = &mut self.headers[index as usize];
        header.generation = header.generation.wrapping_add(1);
        header.entity = entity;
        header.alive = true;
        header.active = true;
        header.visible = true;
        header.depth = depth;
        header.pending = false;
        let generation = header.generation;

        self.list.push_back(&mut self.headers, index);
        (index, generation)
    }

    /// Whether `index` is alive and still at `generation`.
    #[inline]
    pub(crate) fn is_live(&self, index: u32, generation: u32) -> bool {
        self.headers
            .get(index as usize)
            .is_some_and(|header| header.alive && header.generation == generation)
    }

    /// Whether the live slot's value is out with a running callback.
    #[inline]
    pub(crate) fn is_checked_out(&self, index: u32) -> bool {
        self.headers
            .get(index as usize)
            .is_some_and(|header| header.alive)
            && !self.values.holds(index)
    }

    /// Unlinks the slot, frees it and returns its value to the pool.
    pub(crate) fn kill(&mut self, index: u32) {
        self.list.unlink(&mut self.headers, index);

        let header = &mut self.headers[index as usize];
        header.alive = false;
        header.pending = false;
        header.entity = EntityId::NULL;

        self.free.push(index);
        self.values.release(index);
    }

    pub(crate) fn pool_stats(&self) -> PoolStats {
        self.values.pool_stats()
    }

    pub(crate) fn typed<T: Component>(&self) -> &TypedStore<T> {
        match self.values.as_any().downcast_ref::<TypedStore<T>>() {
            Some(store) => store,
            None => panic!("storage does not hold `{}` values", type_name::<T>()),
        }
    }

    pub(crate) fn typed_mut<T: Component>(&mut self) -> &mut TypedStore<T> {
        match self.values.as_any_mut().downcast_mut::<TypedStore<T>>() {
            Some(store) => store,
            None => panic!("storage does not hold `{}` values", type_name::<T>()),
        }
    }
}
