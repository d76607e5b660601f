//! # Component System
//!
//! Components are units of behavior attached to exactly one entity. Each
//! concrete kind is registered once and gets a dense [`ComponentType`];
//! instances are pooled per kind.

use std::fmt;

use super::render::RenderSink;
use super::world::World;
use crate::memory::Poolable;

/// Dense index of a registered component kind.
///
/// Assigned in registration order, which is also the update order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentType(pub(crate) u16);

impl ComponentType {
    /// Position of the kind in the registry.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to one component instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId {
    ty: ComponentType,
    index: u32,
    generation: u32,
    world: u32,
}

impl ComponentId {
    #[inline]
    pub(crate) const fn new(ty: ComponentType, index: u32, generation: u32, world: u32) -> Self {
        Self {
            ty,
            index,
            generation,
            world,
        }
    }

    /// The kind of the component.
    #[inline]
    #[must_use]
    pub const fn ty(self) -> ComponentType {
        self.ty
    }

    /// Slot index inside the kind's storage.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when the id was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Serial of the world that issued the id.
    #[inline]
    #[must_use]
    pub const fn world(self) -> u32 {
        self.world
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component(t{}:{}v{}@w{})",
            self.ty.0, self.index, self.generation, self.world
        )
    }
}

/// A unit of behavior attached to an entity.
///
/// All hooks default to no-ops. While a hook runs, the component is checked
/// out of its slot, so the hook receives both `&mut self` and the world;
/// looking the same component up through the world during that time yields
/// nothing.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Drift { speed: i32 }
///
/// impl Poolable for Drift {}
///
/// impl Component for Drift {
///     fn update(&mut self, world: &mut World, me: ComponentId, _dt: f32) {
///         let entity = world.entity_of(me);
///         world.entity_mut(entity).position.x += self.speed;
///     }
/// }
/// ```
pub trait Component: Poolable + 'static {
    /// Render depth assigned when the component is added.
    fn initial_depth(&self) -> i32 {
        0
    }

    /// Per-frame logic. Called only while both the component and its entity
    /// are active.
    fn update(&mut self, _world: &mut World, _me: ComponentId, _dt: f32) {}

    /// Draws the component. Called in depth order for visible components of
    /// visible entities.
    fn render(&self, _world: &World, _me: ComponentId, _sink: &mut dyn RenderSink) {}

    /// Draws debug overlays (collision shapes, paths).
    fn debug_render(&self, _world: &World, _me: ComponentId, _sink: &mut dyn RenderSink) {}

    /// Releases resources the component owns outside the world. Called
    /// before the component is unlinked and returned to its pool.
    fn destroyed(&mut self, _world: &mut World, _me: ComponentId) {}
}
