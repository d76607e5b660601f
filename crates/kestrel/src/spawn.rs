//! # Spawn Helpers
//!
//! Shortcuts for spawn factories: each helper adds a pooled collider and
//! wires it to the component that needs it on the same entity.

use kestrel_core::{ComponentId, EntityId, World};
use kestrel_shared::{Mask, Point, RectI};

use crate::gameplay::{Hurtbox, Pickup};
use crate::physics::{Collider, Mover, Solid};

/// Ids of a component and the collider it was wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wired {
    /// The collider.
    pub collider: ComponentId,
    /// The component using it.
    pub component: ComponentId,
}

/// Adds a rect collider to `entity`.
pub fn collider(world: &mut World, entity: EntityId, rect: RectI, mask: Mask) -> ComponentId {
    let mut collider = world.acquire::<Collider>();
    collider.set_rect(rect);
    collider.mask = mask;
    world.add(entity, collider)
}

/// Adds a rect collider and a mover using it.
pub fn mover(world: &mut World, entity: EntityId, rect: RectI, mask: Mask) -> Wired {
    let collider = collider(world, entity, rect, mask);
    let mut mover = world.acquire::<Mover>();
    mover.collider = Some(collider);
    let component = world.add(entity, mover);
    Wired {
        collider,
        component,
    }
}

/// Adds a solid rect collider and a platform travelling between the first
/// and last of `waypoints`.
pub fn solid(
    world: &mut World,
    entity: EntityId,
    rect: RectI,
    waypoints: &[Point],
    speed: f32,
) -> Wired {
    let collider = collider(world, entity, rect, Mask::SOLID);
    let mut solid = world.acquire::<Solid>();
    solid.waypoints.extend_from_slice(waypoints);
    solid.speed = speed;
    solid.collider = Some(collider);
    let component = world.add(entity, solid);
    Wired {
        collider,
        component,
    }
}

/// Adds a rect collider and a hurtbox reacting to `hurt_by`.
pub fn hurtbox(
    world: &mut World,
    entity: EntityId,
    rect: RectI,
    hurt_by: Mask,
    cooldown: f32,
) -> Wired {
    let collider = collider(world, entity, rect, Mask::NONE);
    let mut hurtbox = world.acquire::<Hurtbox>();
    hurtbox.hurt_by = hurt_by;
    hurtbox.cooldown = cooldown;
    hurtbox.collider = Some(collider);
    let component = world.add(entity, hurtbox);
    Wired {
        collider,
        component,
    }
}

/// Adds an item collider and a pickup collected by `collected_by`.
pub fn pickup(world: &mut World, entity: EntityId, rect: RectI, collected_by: Mask) -> Wired {
    let collider = collider(world, entity, rect, Mask::ITEM);
    let mut pickup = world.acquire::<Pickup>();
    pickup.collected_by = collected_by;
    pickup.collider = Some(collider);
    let component = world.add(entity, pickup);
    Wired {
        collider,
        component,
    }
}
