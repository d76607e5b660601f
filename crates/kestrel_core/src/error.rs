//! # Runtime Error Types
//!
//! Every variant is a programmer error. The panicking accessors on
//! [`World`](crate::World) format these; the `try_*` accessors return them.

use thiserror::Error;

use crate::ecs::{ComponentId, EntityId};

/// Invariant violations detected by the runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity id was issued by a different world.
    #[error("entity {0} belongs to another world")]
    ForeignEntity(EntityId),

    /// The entity has been destroyed (or the id is null).
    #[error("entity {0} has been destroyed")]
    DeadEntity(EntityId),

    /// The component id was issued by a different world.
    #[error("component {0} belongs to another world")]
    ForeignComponent(ComponentId),

    /// The component has been destroyed.
    #[error("component {0} has been destroyed")]
    DeadComponent(ComponentId),

    /// The component is checked out by its own `update` or hook.
    #[error("component {0} is busy running its own callback")]
    BusyComponent(ComponentId),

    /// The concrete component type was never registered.
    #[error("component type `{0}` is not registered")]
    UnregisteredType(&'static str),

    /// The id refers to a component of a different concrete type.
    #[error("component {id} is not a `{expected}`")]
    TypeMismatch {
        /// The offending id.
        id: ComponentId,
        /// The type the caller asked for.
        expected: &'static str,
    },
}

/// Result type for runtime operations.
pub type EcsResult<T> = Result<T, EcsError>;
