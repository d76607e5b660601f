//! # Entity Management
//!
//! Entities are positioned containers of components. Their slots live in
//! the world and are recycled; ids carry a generation counter so a stale
//! id never resolves to the slot's next occupant.

use std::fmt;

use kestrel_shared::Point;

use super::component::ComponentId;
use super::list::{Linked, ListNode};
use crate::memory::Poolable;

/// Unique identifier for an entity.
///
/// Made of:
/// - Slot index into the world's entity array
/// - Generation counter for detecting stale references
/// - Serial of the world that issued it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
    world: u32,
}

impl EntityId {
    /// Creates an entity id from its parts.
    #[inline]
    #[must_use]
    pub(crate) const fn new(index: u32, generation: u32, world: u32) -> Self {
        Self {
            index,
            generation,
            world,
        }
    }

    /// Returns the slot index portion of the id.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation portion of the id.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns the serial of the world that issued the id.
    #[inline]
    #[must_use]
    pub const fn world(self) -> u32 {
        self.world
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
        world: u32::MAX,
    };

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index == u32::MAX && self.generation == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("entity(null)");
        }
        write!(f, "entity({}v{}@w{})", self.index, self.generation, self.world)
    }
}

/// An entity slot.
///
/// Entities have no behavior of their own: a position, two flags and the
/// ordered list of components they own.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Integer position in world pixels.
    pub position: Point,
    /// Inactive entities skip the update of all their components.
    pub active: bool,
    /// Invisible entities skip the render of all their components.
    pub visible: bool,
    id: EntityId,
    components: Vec<ComponentId>,
    node: ListNode,
    alive: bool,
    destroying: bool,
    pending: bool,
}

impl Entity {
    /// The id of this entity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Owned components, in the order they were added.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    /// Whether the slot currently holds a live entity.
    #[inline]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the entity is in the middle of being destroyed.
    #[inline]
    #[must_use]
    pub const fn is_destroying(&self) -> bool {
        self.destroying
    }

    /// Whether destruction was requested while one of its components was
    /// running a callback. Such an entity is torn down once the component
    /// is back, and reads as destroyed until then.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub(crate) fn spawn(&mut self, id: EntityId, position: Point) {
        self.id = id;
        self.position = position;
        self.alive = true;
    }

    pub(crate) fn mark_destroying(&mut self) {
        self.destroying = true;
    }

    pub(crate) fn push_component(&mut self, id: ComponentId) {
        self.components.push(id);
    }

    pub(crate) fn remove_component(&mut self, id: ComponentId) {
        if let Some(position) = self.components.iter().rposition(|c| *c == id) {
            self.components.remove(position);
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            active: true,
            visible: true,
            id: EntityId::NULL,
            components: Vec::new(),
            node: ListNode::default(),
            alive: false,
            destroying: false,
            pending: false,
        }
    }
}

impl Poolable for Entity {
    /// Keeps the slot's id (its generation is bumped on the next spawn) and
    /// the component list's capacity.
    fn reset(&mut self) {
        self.position = Point::ZERO;
        self.active = true;
        self.visible = true;
        self.components.clear();
        self.node = ListNode::default();
        self.alive = false;
        self.destroying = false;
        self.pending = false;
    }
}

impl Linked for Entity {
    fn node(&self) -> &ListNode {
        &self.node
    }
    fn node_mut(&mut self) -> &mut ListNode {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_parts() {
        let id = EntityId::new(12345, 67890, 3);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert_eq!(id.world(), 3);
        assert!(!id.is_null());
        assert!(EntityId::default().is_null());
    }

    #[test]
    fn test_entity_reset_clears_links_and_components() {
        let mut entity = Entity::default();
        entity.spawn(EntityId::new(0, 1, 0), Point::new(4, 5));
        entity.active = false;
        entity.mark_destroying();
        entity.set_pending(true);

        entity.reset();
        assert!(!entity.is_alive());
        assert!(!entity.is_destroying());
        assert!(!entity.is_pending());
        assert!(entity.active);
        assert_eq!(entity.position, Point::ZERO);
        assert!(entity.components().is_empty());
        assert_eq!(entity.id().generation(), 1);
    }
}
