//! # Pickup
//!
//! Collectible hook: the first collider of the `collected_by` categories to
//! touch it collects it, and the pickup's entity is removed.

use kestrel_core::{Component, ComponentId, EntityId, Poolable, World};
use kestrel_shared::{Mask, Point};
use tracing::trace;

use crate::physics::Collider;

/// Callback fired on collection. Receives the world, the pickup id and the
/// collecting entity.
pub type PickupCallback = Box<dyn FnMut(&mut World, ComponentId, EntityId)>;

/// Collectible component.
#[derive(Default)]
pub struct Pickup {
    /// Categories allowed to collect.
    pub collected_by: Mask,
    /// Collider tested against collectors.
    pub collider: Option<ComponentId>,
    /// Fired on collection, before the entity is removed.
    pub on_pickup: Option<PickupCallback>,
}

impl Poolable for Pickup {}

impl Pickup {
    /// Installs the collection callback.
    pub fn on_pickup(&mut self, callback: impl FnMut(&mut World, ComponentId, EntityId) + 'static) {
        self.on_pickup = Some(Box::new(callback));
    }
}

impl Component for Pickup {
    fn update(&mut self, world: &mut World, me: ComponentId, _dt: f32) {
        let Some(collider) = self.collider else {
            return;
        };
        let Some(hit) = Collider::first_hit_by(world, collider, self.collected_by, Point::ZERO)
        else {
            return;
        };

        let owner = world.entity_of(me);
        let collector = world.entity_of(hit);
        if let Some(mut callback) = self.on_pickup.take() {
            callback(world, me, collector);
            self.on_pickup.get_or_insert(callback);
        }

        trace!(pickup = %owner, %collector, "collected");
        if world.is_alive(owner) {
            world.destroy_entity(owner);
        }
    }
}
