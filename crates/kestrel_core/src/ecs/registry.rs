//! # Component Registry
//!
//! The table of component kinds a world can hold. Built once at startup,
//! then shared read-only by every world through an `Arc`.
//!
//! Registration order is significant: it fixes each kind's
//! [`ComponentType`] and therefore the order in which kinds update.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::component::{Component, ComponentId, ComponentType};
use super::render::RenderSink;
use super::storage::{TypedStore, ValueStore};
use super::world::{self, World};

/// Dispatch entry for one registered kind.
pub(crate) struct TypeInfo {
    pub(crate) name: &'static str,
    pub(crate) update: fn(&mut World, ComponentType, f32),
    pub(crate) render: fn(&World, ComponentId, &mut dyn RenderSink),
    pub(crate) debug_render: fn(&World, ComponentId, &mut dyn RenderSink),
    pub(crate) destroyed: fn(&mut World, ComponentId),
    pub(crate) new_store: fn() -> Box<dyn ValueStore>,
}

impl TypeInfo {
    fn of<T: Component>() -> Self {
        Self {
            name: type_name::<T>(),
            update: world::update_kind::<T>,
            render: world::render_kind::<T>,
            debug_render: world::debug_render_kind::<T>,
            destroyed: world::destroyed_kind::<T>,
            new_store: TypedStore::<T>::boxed,
        }
    }
}

/// Read-only table of registered component kinds.
#[derive(Default)]
pub struct ComponentRegistry {
    types: Vec<TypeInfo>,
    lookup: HashMap<TypeId, ComponentType>,
}

impl ComponentRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The type id of `T`, if registered.
    #[must_use]
    pub fn type_of<T: Component>(&self) -> Option<ComponentType> {
        self.lookup.get(&TypeId::of::<T>()).copied()
    }

    /// Rust type name of a registered kind.
    #[must_use]
    pub fn name(&self, ty: ComponentType) -> &'static str {
        self.types[ty.index()].name
    }

    pub(crate) fn info(&self, ty: ComponentType) -> &TypeInfo {
        &self.types[ty.index()]
    }

    pub(crate) fn types(&self) -> &[TypeInfo] {
        &self.types
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.types.iter().map(|info| info.name))
            .finish()
    }
}

/// Builder for [`ComponentRegistry`].
///
/// # Example
///
/// ```rust,ignore
/// let registry = ComponentRegistry::builder()
///     .register::<Player>()   // updates first
///     .register::<Mover>()
///     .register::<Collider>()
///     .build();
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    registry: ComponentRegistry,
}

impl RegistryBuilder {
    /// Registers `T`. Registering the same kind twice keeps its first id.
    ///
    /// # Panics
    ///
    /// Panics if more than `u16::MAX` kinds are registered.
    #[must_use]
    pub fn register<T: Component>(mut self) -> Self {
        let key = TypeId::of::<T>();
        if self.registry.lookup.contains_key(&key) {
            return self;
        }

        let index = self.registry.types.len();
        assert!(index < usize::from(u16::MAX), "too many component types");

        let ty = ComponentType(index as u16);
        self.registry.types.push(TypeInfo::of::<T>());
        self.registry.lookup.insert(key, ty);
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> Arc<ComponentRegistry> {
        Arc::new(self.registry)
    }
}
