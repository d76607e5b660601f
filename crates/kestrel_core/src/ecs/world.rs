//! # ECS World
//!
//! The central container for all entities and components of one room.
//! Owns the entity slots, one storage (with its pool and alive list) per
//! registered component kind, and drives the update and render passes.

use std::any::type_name;
use std::mem;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use kestrel_shared::Point;
use tracing::trace;

use super::component::{Component, ComponentId, ComponentType};
use super::entity::{Entity, EntityId};
use super::list::{AliveList, Linked};
use super::registry::ComponentRegistry;
use super::render::RenderSink;
use super::storage::{ComponentHeader, ComponentStorage};
use crate::error::{EcsError, EcsResult};
use crate::memory::{PoolStats, Poolable};

/// Serial handed to the next world, so ids from one world are rejected by
/// another.
static NEXT_WORLD_SERIAL: AtomicU32 = AtomicU32::new(0);

/// Unwraps an invariant check, aborting the calling operation on failure.
#[track_caller]
fn fatal<T>(result: EcsResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("{error}"),
    }
}

/// The ECS World - container for all simulation state of a room.
///
/// Invariant violations (foreign or destroyed ids, unregistered kinds) are
/// programmer errors: the plain accessors panic, the `try_*` accessors
/// return [`EcsError`].
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new(registry);
///
/// let player = world.add_entity_at(Point::new(16, 32));
/// let mover = world.acquire::<Mover>();
/// world.add(player, mover);
///
/// world.update(1.0 / 60.0);
/// world.render(&mut batch);
/// ```
pub struct World {
    serial: u32,
    registry: Arc<ComponentRegistry>,
    entities: Vec<Entity>,
    free_entities: Vec<u32>,
    entity_list: AliveList,
    storages: Vec<ComponentStorage>,
    /// Transient gather buffer for render passes.
    render_queue: Vec<ComponentId>,
    /// Slot the running update walk visits next.
    cursor: Option<(ComponentType, u32)>,
}

impl World {
    /// Creates an empty world holding every kind of `registry`.
    #[must_use]
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        let storages = registry
            .types()
            .iter()
            .map(|info| ComponentStorage::new((info.new_store)()))
            .collect();

        Self {
            serial: NEXT_WORLD_SERIAL.fetch_add(1, Ordering::Relaxed),
            registry,
            entities: Vec::new(),
            free_entities: Vec::new(),
            entity_list: AliveList::new(),
            storages,
            render_queue: Vec::new(),
            cursor: None,
        }
    }

    /// The registry this world was built from.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Serial stamped into every id this world issues.
    #[inline]
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Adds an entity at the origin.
    pub fn add_entity(&mut self) -> EntityId {
        self.add_entity_at(Point::ZERO)
    }

    /// Adds an entity at `position`, reusing a free slot when possible.
    ///
    /// O(1) amortized.
    pub fn add_entity_at(&mut self, position: Point) -> EntityId {
        let index = if let Some(index) = self.free_entities.pop() {
            index
        } else {
            self.entities.push(Entity::default());
            (self.entities.len() - 1) as u32
        };

        let slot = &mut self.entities[index as usize];
        let generation = slot.id().generation().wrapping_add(1);
        let id = EntityId::new(index, generation, self.serial);
        slot.spawn(id, position);

        self.entity_list.push_back(&mut self.entities, index);
        trace!(%id, "entity added");
        id
    }

    /// The live slot behind `id`, pending or not.
    fn entity_slot(&self, id: EntityId) -> EcsResult<&Entity> {
        if id.is_null() {
            return Err(EcsError::DeadEntity(id));
        }
        if id.world() != self.serial {
            return Err(EcsError::ForeignEntity(id));
        }
        match self.entities.get(id.index() as usize) {
            Some(entity) if entity.is_alive() && entity.id() == id => Ok(entity),
            _ => Err(EcsError::DeadEntity(id)),
        }
    }

    fn check_entity(&self, id: EntityId) -> EcsResult<()> {
        if self.entity_slot(id)?.is_pending() {
            Err(EcsError::DeadEntity(id))
        } else {
            Ok(())
        }
    }

    /// Whether `id` refers to a live entity of this world.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.check_entity(id).is_ok()
    }

    /// Looks an entity up.
    ///
    /// # Errors
    ///
    /// Fails if the id is foreign or the entity was destroyed.
    pub fn try_entity(&self, id: EntityId) -> EcsResult<&Entity> {
        self.check_entity(id)?;
        Ok(&self.entities[id.index() as usize])
    }

    /// Looks an entity up mutably.
    ///
    /// # Errors
    ///
    /// Fails if the id is foreign or the entity was destroyed.
    pub fn try_entity_mut(&mut self, id: EntityId) -> EcsResult<&mut Entity> {
        self.check_entity(id)?;
        Ok(&mut self.entities[id.index() as usize])
    }

    /// Looks an entity up.
    ///
    /// # Panics
    ///
    /// Panics if the id is foreign or the entity was destroyed.
    #[track_caller]
    #[must_use]
    pub fn entity(&self, id: EntityId) -> &Entity {
        fatal(self.try_entity(id))
    }

    /// Looks an entity up mutably.
    ///
    /// # Panics
    ///
    /// Panics if the id is foreign or the entity was destroyed.
    #[track_caller]
    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        fatal(self.try_entity_mut(id))
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn entity_count(&self) -> usize {
        self.entity_list.len()
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entity_list
            .iter(&self.entities)
            .map(|index| self.entities[index as usize].id())
    }

    /// Destroys an entity and every component it owns.
    ///
    /// # Panics
    ///
    /// Panics if the id is foreign or the entity was already destroyed.
    #[track_caller]
    pub fn destroy_entity(&mut self, id: EntityId) {
        fatal(self.try_destroy_entity(id));
    }

    /// Destroys an entity and every component it owns.
    ///
    /// Every owned component receives `destroyed` (newest first) before any
    /// of them is unlinked; then they are removed newest first, the entity
    /// leaves the alive list and its slot is reset for reuse. Destroying an
    /// entity that is already being destroyed is a no-op.
    ///
    /// If one of its components is checked out (running `update` or a
    /// [`World::with_component`] closure), the teardown waits until that
    /// component is back. Until then the entity and its components read as
    /// destroyed, and the hooks later run with everything still linked.
    ///
    /// # Errors
    ///
    /// Fails if the id is foreign or the entity was already destroyed.
    pub fn try_destroy_entity(&mut self, id: EntityId) -> EcsResult<()> {
        let entity = self.entity_slot(id)?;
        if entity.is_pending() || entity.is_destroying() {
            return Ok(());
        }
        if entity.components().iter().any(|&c| self.is_checked_out(c)) {
            self.entities[id.index() as usize].set_pending(true);
            trace!(%id, "entity destruction deferred");
            return Ok(());
        }
        self.tear_down_entity(id);
        Ok(())
    }

    fn tear_down_entity(&mut self, id: EntityId) {
        let index = id.index() as usize;
        self.entities[index].mark_destroying();

        let owned = self.entities[index].components().to_vec();
        for &component in owned.iter().rev() {
            if self.contains(component) {
                self.notify_destroyed(component);
            }
        }
        for &component in owned.iter().rev() {
            if self.contains(component) {
                self.remove_component(component);
            }
        }

        // Components added by the hooks themselves
        while let Some(&component) = self.entities[index].components().last() {
            if self.contains(component) {
                self.notify_destroyed(component);
            }
            if self.contains(component) {
                self.remove_component(component);
            } else {
                self.entities[index].remove_component(component);
            }
        }

        self.entity_list.unlink(&mut self.entities, id.index());
        self.entities[index].reset();
        self.free_entities.push(id.index());
        trace!(%id, "entity destroyed");
    }

    /// Runs a deferred entity teardown once none of its components is out.
    fn finish_pending_entity(&mut self, id: EntityId) {
        let Ok(entity) = self.entity_slot(id) else {
            return;
        };
        if !entity.is_pending() {
            return;
        }
        let owned = entity.components().to_vec();
        if owned.iter().any(|&c| self.is_checked_out(c)) {
            return;
        }

        self.entities[id.index() as usize].set_pending(false);
        for &component in &owned {
            self.header_mut(component).pending = false;
        }
        self.tear_down_entity(id);
    }

    /// Destroys every entity.
    pub fn clear(&mut self) {
        let ids: Vec<EntityId> = self.entities().collect();
        for id in ids {
            if self.is_alive(id) {
                self.destroy_entity(id);
            }
        }
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// The registered type of `T`.
    ///
    /// # Errors
    ///
    /// Fails if `T` was never registered.
    pub fn try_type_of<T: Component>(&self) -> EcsResult<ComponentType> {
        self.registry
            .type_of::<T>()
            .ok_or(EcsError::UnregisteredType(type_name::<T>()))
    }

    /// The registered type of `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    #[track_caller]
    #[must_use]
    pub fn type_of<T: Component>(&self) -> ComponentType {
        fatal(self.try_type_of::<T>())
    }

    /// Takes a reset `T` out of the type's pool, ready to be configured and
    /// passed to [`World::add`].
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    #[track_caller]
    pub fn acquire<T: Component>(&mut self) -> T {
        let ty = self.type_of::<T>();
        self.storages[ty.index()].typed_mut::<T>().pool.acquire()
    }

    /// Counters of the pool behind `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    #[track_caller]
    #[must_use]
    pub fn pool_stats<T: Component>(&self) -> PoolStats {
        let ty = self.type_of::<T>();
        self.storages[ty.index()].pool_stats()
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity is foreign or destroyed, or `T` is unregistered.
    #[track_caller]
    pub fn add<T: Component>(&mut self, entity: EntityId, component: T) -> ComponentId {
        fatal(self.try_add(entity, component))
    }

    /// Attaches `component` to `entity`: tags it with its type, links it at
    /// the tail of the type's alive list and appends it to the entity's
    /// component set.
    ///
    /// # Errors
    ///
    /// Fails if the entity is foreign or destroyed, or `T` is unregistered.
    pub fn try_add<T: Component>(&mut self, entity: EntityId, component: T) -> EcsResult<ComponentId> {
        self.check_entity(entity)?;
        let ty = self.try_type_of::<T>()?;

        let depth = component.initial_depth();
        let storage = &mut self.storages[ty.index()];
        let (index, generation) = storage.allocate(entity, depth);
        storage.typed_mut::<T>().insert(index, component);

        let id = ComponentId::new(ty, index, generation, self.serial);
        self.entities[entity.index() as usize].push_component(id);
        trace!(%id, %entity, kind = self.registry.name(ty), "component added");
        Ok(id)
    }

    /// Whether `id` names a live slot, pending or not.
    fn check_slot(&self, id: ComponentId) -> EcsResult<()> {
        if id.world() != self.serial {
            return Err(EcsError::ForeignComponent(id));
        }
        let live = self
            .storages
            .get(id.ty().index())
            .is_some_and(|storage| storage.is_live(id.index(), id.generation()));
        if live {
            Ok(())
        } else {
            Err(EcsError::DeadComponent(id))
        }
    }

    fn check_component(&self, id: ComponentId) -> EcsResult<()> {
        self.check_slot(id)?;
        if self.is_pending(id) {
            Err(EcsError::DeadComponent(id))
        } else {
            Ok(())
        }
    }

    /// Whether the live component, or its entity, awaits a deferred teardown.
    fn is_pending(&self, id: ComponentId) -> bool {
        let header = self.header(id);
        header.pending || self.entities[header.entity.index() as usize].is_pending()
    }

    fn is_checked_out(&self, id: ComponentId) -> bool {
        self.storages[id.ty().index()].is_checked_out(id.index())
    }

    /// Whether `id` refers to a live component of this world.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.check_component(id).is_ok()
    }

    fn header(&self, id: ComponentId) -> &ComponentHeader {
        &self.storages[id.ty().index()].headers[id.index() as usize]
    }

    fn header_mut(&mut self, id: ComponentId) -> &mut ComponentHeader {
        &mut self.storages[id.ty().index()].headers[id.index() as usize]
    }

    fn id_at(&self, ty: ComponentType, index: u32) -> ComponentId {
        let generation = self.storages[ty.index()].headers[index as usize].generation;
        ComponentId::new(ty, index, generation, self.serial)
    }

    fn check_kind<T: Component>(&self, id: ComponentId) -> EcsResult<ComponentType> {
        self.check_component(id)?;
        let ty = self.try_type_of::<T>()?;
        if ty == id.ty() {
            Ok(ty)
        } else {
            Err(EcsError::TypeMismatch {
                id,
                expected: type_name::<T>(),
            })
        }
    }

    /// Looks a component up by id.
    ///
    /// # Errors
    ///
    /// Fails if the id is foreign, destroyed, of another kind, or the
    /// component is running its own callback.
    pub fn try_component<T: Component>(&self, id: ComponentId) -> EcsResult<&T> {
        let ty = self.check_kind::<T>(id)?;
        self.storages[ty.index()].typed::<T>().values[id.index() as usize]
            .as_ref()
            .ok_or(EcsError::BusyComponent(id))
    }

    /// Looks a component up mutably by id.
    ///
    /// # Errors
    ///
    /// See [`World::try_component`].
    pub fn try_component_mut<T: Component>(&mut self, id: ComponentId) -> EcsResult<&mut T> {
        let ty = self.check_kind::<T>(id)?;
        self.storages[ty.index()].typed_mut::<T>().values[id.index() as usize]
            .as_mut()
            .ok_or(EcsError::BusyComponent(id))
    }

    /// Looks a component up by id.
    ///
    /// # Panics
    ///
    /// See [`World::try_component`].
    #[track_caller]
    #[must_use]
    pub fn component<T: Component>(&self, id: ComponentId) -> &T {
        fatal(self.try_component(id))
    }

    /// Looks a component up mutably by id.
    ///
    /// # Panics
    ///
    /// See [`World::try_component`].
    #[track_caller]
    pub fn component_mut<T: Component>(&mut self, id: ComponentId) -> &mut T {
        fatal(self.try_component_mut(id))
    }

    /// Non-fatal lookup: the component if `id` is live, of kind `T` and not
    /// checked out.
    #[must_use]
    pub fn get<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.try_component(id).ok()
    }

    /// Mutable variant of [`World::get`].
    pub fn get_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.try_component_mut(id).ok()
    }

    /// Checks a component out of its slot and runs `f` with both the
    /// component and the world, the same way `update` hooks run.
    ///
    /// If `f` destroys the component or its entity, the teardown runs once
    /// `f` returns and the component is back in its slot.
    ///
    /// # Panics
    ///
    /// Panics if the id is foreign, destroyed, of another kind, or already
    /// checked out.
    #[track_caller]
    pub fn with_component<T, R, F>(&mut self, id: ComponentId, f: F) -> R
    where
        T: Component,
        F: FnOnce(&mut T, &mut World) -> R,
    {
        let ty = fatal(self.check_kind::<T>(id));
        let taken = self.storages[ty.index()].typed_mut::<T>().values[id.index() as usize].take();
        let mut component = fatal(taken.ok_or(EcsError::BusyComponent(id)));

        let result = f(&mut component, self);
        self.check_in(id, component);
        self.finish_pending(id);
        result
    }

    /// The entity owning a component.
    ///
    /// # Errors
    ///
    /// Fails if the id is foreign or destroyed.
    pub fn try_entity_of(&self, id: ComponentId) -> EcsResult<EntityId> {
        self.check_component(id)?;
        Ok(self.header(id).entity)
    }

    /// The entity owning a component.
    ///
    /// # Panics
    ///
    /// Panics if the id is foreign or destroyed.
    #[track_caller]
    #[must_use]
    pub fn entity_of(&self, id: ComponentId) -> EntityId {
        fatal(self.try_entity_of(id))
    }

    /// Components owned by `entity`, in the order they were added.
    ///
    /// # Panics
    ///
    /// Panics if the entity is foreign or destroyed.
    #[track_caller]
    #[must_use]
    pub fn components_of(&self, entity: EntityId) -> &[ComponentId] {
        self.entity(entity).components()
    }

    /// First component of kind `T` owned by `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity is foreign or destroyed, or `T` is unregistered.
    #[track_caller]
    #[must_use]
    pub fn find<T: Component>(&self, entity: EntityId) -> Option<ComponentId> {
        let ty = self.type_of::<T>();
        self.entity(entity)
            .components()
            .iter()
            .copied()
            .find(|component| component.ty() == ty)
    }

    /// Head of `T`'s alive list - the oldest live instance.
    ///
    /// Used as a singleton lookup ("the" player) and as a scan entry point.
    #[track_caller]
    #[must_use]
    pub fn first<T: Component>(&self) -> Option<ComponentId> {
        let ty = self.type_of::<T>();
        self.storages[ty.index()]
            .list
            .head()
            .map(|index| self.id_at(ty, index))
    }

    /// Tail of `T`'s alive list - the newest live instance.
    #[track_caller]
    #[must_use]
    pub fn last<T: Component>(&self) -> Option<ComponentId> {
        let ty = self.type_of::<T>();
        self.storages[ty.index()]
            .list
            .tail()
            .map(|index| self.id_at(ty, index))
    }

    /// Number of live instances of `T`.
    #[track_caller]
    #[must_use]
    pub fn count<T: Component>(&self) -> usize {
        self.storages[self.type_of::<T>().index()].list.len()
    }

    /// Ids of every live `T` in alive-list order.
    #[track_caller]
    pub fn ids<T: Component>(&self) -> impl Iterator<Item = ComponentId> + '_ {
        let ty = self.type_of::<T>();
        let storage = &self.storages[ty.index()];
        storage
            .list
            .iter(&storage.headers)
            .map(move |index| self.id_at(ty, index))
    }

    /// Every live `T` in alive-list order, skipping checked-out instances and
    /// those awaiting a deferred teardown.
    #[track_caller]
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (ComponentId, &T)> + '_ {
        let ty = self.type_of::<T>();
        let storage = &self.storages[ty.index()];
        let values = &storage.typed::<T>().values;
        let serial = self.serial;
        storage.list.iter(&storage.headers).filter_map(move |index| {
            let id = ComponentId::new(ty, index, storage.headers[index as usize].generation, serial);
            if self.is_pending(id) {
                return None;
            }
            values[index as usize].as_ref().map(|value| (id, value))
        })
    }

    /// Whether the component takes part in updates.
    #[track_caller]
    #[must_use]
    pub fn is_active(&self, id: ComponentId) -> bool {
        fatal(self.check_component(id));
        self.header(id).active
    }

    /// Enables or disables the component's update.
    #[track_caller]
    pub fn set_active(&mut self, id: ComponentId, active: bool) {
        fatal(self.check_component(id));
        self.header_mut(id).active = active;
    }

    /// Whether the component takes part in render passes.
    #[track_caller]
    #[must_use]
    pub fn is_visible(&self, id: ComponentId) -> bool {
        fatal(self.check_component(id));
        self.header(id).visible
    }

    /// Shows or hides the component.
    #[track_caller]
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) {
        fatal(self.check_component(id));
        self.header_mut(id).visible = visible;
    }

    /// Render depth of the component; lower draws first.
    #[track_caller]
    #[must_use]
    pub fn depth(&self, id: ComponentId) -> i32 {
        fatal(self.check_component(id));
        self.header(id).depth
    }

    /// Changes the component's render depth.
    #[track_caller]
    pub fn set_depth(&mut self, id: ComponentId, depth: i32) {
        fatal(self.check_component(id));
        self.header_mut(id).depth = depth;
    }

    /// Destroys a component.
    ///
    /// # Panics
    ///
    /// Panics if the id is foreign or already destroyed.
    #[track_caller]
    pub fn destroy(&mut self, id: ComponentId) {
        fatal(self.try_destroy(id));
    }

    /// Destroys a component: runs its `destroyed` hook, removes it from its
    /// entity, unlinks it and returns it (reset) to its pool.
    ///
    /// A checked-out component (running `update` or a
    /// [`World::with_component`] closure) is torn down once it is back, and
    /// reads as destroyed until then. Destroying a component whose teardown
    /// is already pending is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if the id is foreign or already destroyed.
    pub fn try_destroy(&mut self, id: ComponentId) -> EcsResult<()> {
        self.check_slot(id)?;
        if self.is_pending(id) {
            return Ok(());
        }
        if self.is_checked_out(id) {
            self.header_mut(id).pending = true;
            trace!(%id, "component destruction deferred");
            return Ok(());
        }
        self.destroy_now(id);
        Ok(())
    }

    fn destroy_now(&mut self, id: ComponentId) {
        let owner = self.header(id).entity;
        self.notify_destroyed(id);
        if self.check_slot(id).is_ok() {
            self.remove_component(id);
        }
        // The hook may have doomed the owner while this component was out
        self.finish_pending_entity(owner);
    }

    fn notify_destroyed(&mut self, id: ComponentId) {
        let hook = self.registry.info(id.ty()).destroyed;
        hook(self, id);
    }

    fn remove_component(&mut self, id: ComponentId) {
        let ty = id.ty();
        let index = id.index();
        let owner = self.header(id).entity;
        if let Some(entity) = self.entities.get_mut(owner.index() as usize) {
            entity.remove_component(id);
        }

        // A running walk must never land on an unlinked slot
        if self.cursor == Some((ty, index)) {
            self.cursor = self.header(id).node().next().map(|next| (ty, next));
        }

        self.storages[ty.index()].kill(index);
        trace!(%id, "component destroyed");
    }

    /// Puts a checked-out component back into its slot.
    fn check_in<T: Component>(&mut self, id: ComponentId, component: T) {
        let live = self.check_slot(id).is_ok();
        let store = self.storages[id.ty().index()].typed_mut::<T>();
        if live {
            store.insert(id.index(), component);
        } else {
            store.pool.release(component);
        }
    }

    /// Runs the teardown requested while `id` was checked out.
    fn finish_pending(&mut self, id: ComponentId) {
        if self.check_slot(id).is_err() {
            return;
        }
        let owner = self.header(id).entity;
        if self.entities[owner.index() as usize].is_pending() {
            self.finish_pending_entity(owner);
        } else if self.header(id).pending {
            self.header_mut(id).pending = false;
            self.destroy_now(id);
        }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Runs one update pass.
    ///
    /// Kinds update in registration order; each kind walks its alive list
    /// from the head, capturing the successor before calling `update`.
    /// Components that are inactive, or whose entity is inactive, are
    /// skipped. Kinds without instances cost nothing.
    pub fn update(&mut self, dt: f32) {
        let registry = Arc::clone(&self.registry);
        for (index, info) in registry.types().iter().enumerate() {
            (info.update)(self, ComponentType(index as u16), dt);
        }
    }

    /// Renders every visible component of every visible entity, lowest
    /// depth first. Equal depths keep gather order (kind, then insertion).
    pub fn render(&mut self, sink: &mut dyn RenderSink) {
        self.render_pass(sink, false);
    }

    /// Same ordering as [`World::render`], dispatching `debug_render`.
    pub fn debug_render(&mut self, sink: &mut dyn RenderSink) {
        self.render_pass(sink, true);
    }

    fn render_pass(&mut self, sink: &mut dyn RenderSink, debug: bool) {
        let mut queue = mem::take(&mut self.render_queue);

        for (ty, storage) in self.storages.iter().enumerate() {
            let ty = ComponentType(ty as u16);
            for index in storage.list.iter(&storage.headers) {
                let header = &storage.headers[index as usize];
                if header.visible && self.entities[header.entity.index() as usize].visible {
                    queue.push(ComponentId::new(ty, index, header.generation, self.serial));
                }
            }
        }

        // Stable: equal depths keep gather order
        queue.sort_by_key(|id| self.header(*id).depth);

        let registry = Arc::clone(&self.registry);
        for &id in &queue {
            let info = registry.info(id.ty());
            let draw = if debug { info.debug_render } else { info.render };
            draw(self, id, sink);
        }

        queue.clear();
        self.render_queue = queue;
    }
}

// =============================================================================
// Per-kind dispatch, monomorphized once per registered type
// =============================================================================

pub(crate) fn update_kind<T: Component>(world: &mut World, ty: ComponentType, dt: f32) {
    world.cursor = world.storages[ty.index()]
        .list
        .head()
        .map(|index| (ty, index));

    while let Some((_, index)) = world.cursor {
        let header = &world.storages[ty.index()].headers[index as usize];
        world.cursor = header.node().next().map(|next| (ty, next));

        let owner = header.entity;
        if !header.active || !world.entities[owner.index() as usize].active {
            continue;
        }

        let id = world.id_at(ty, index);
        if world.is_pending(id) {
            continue;
        }
        let Some(mut component) = world.storages[ty.index()].typed_mut::<T>().values
            [index as usize]
            .take()
        else {
            continue;
        };
        component.update(world, id, dt);
        world.check_in(id, component);
        world.finish_pending(id);
    }
}

pub(crate) fn render_kind<T: Component>(world: &World, id: ComponentId, sink: &mut dyn RenderSink) {
    if let Some(component) = world.get::<T>(id) {
        component.render(world, id, sink);
    }
}

pub(crate) fn debug_render_kind<T: Component>(
    world: &World,
    id: ComponentId,
    sink: &mut dyn RenderSink,
) {
    if let Some(component) = world.get::<T>(id) {
        component.debug_render(world, id, sink);
    }
}

pub(crate) fn destroyed_kind<T: Component>(world: &mut World, id: ComponentId) {
    let slot = &mut world.storages[id.ty().index()].typed_mut::<T>().values[id.index() as usize];
    let Some(mut component) = slot.take() else {
        return;
    };
    component.destroyed(world, id);
    world.check_in(id, component);
    // Teardown is already under way for this one
    if world.check_slot(id).is_ok() {
        world.header_mut(id).pending = false;
    }
}
