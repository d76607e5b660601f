//! # Hurtbox
//!
//! Reports hits from colliders of the `hurt_by` categories, at most once
//! per invulnerability window.

use kestrel_core::{Component, ComponentId, EntityId, Poolable, World};
use kestrel_shared::{Mask, Point};

use crate::physics::Collider;

/// Callback fired on a hit. Receives the world, the hurtbox id and the
/// attacking entity.
pub type HurtCallback = Box<dyn FnMut(&mut World, ComponentId, EntityId)>;

/// Damage-receiving component.
#[derive(Default)]
pub struct Hurtbox {
    /// Categories that cause damage.
    pub hurt_by: Mask,
    /// Invulnerability after a hit, in seconds.
    pub cooldown: f32,
    /// Invulnerability left, in seconds.
    pub invulnerable: f32,
    /// Collider tested against attackers.
    pub collider: Option<ComponentId>,
    /// Fired on a hit.
    pub on_hurt: Option<HurtCallback>,
}

impl Poolable for Hurtbox {}

impl Hurtbox {
    /// Installs the hit callback.
    pub fn on_hurt(&mut self, callback: impl FnMut(&mut World, ComponentId, EntityId) + 'static) {
        self.on_hurt = Some(Box::new(callback));
    }
}

impl Component for Hurtbox {
    fn update(&mut self, world: &mut World, me: ComponentId, dt: f32) {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        if self.invulnerable > 0.0 {
            return;
        }

        let Some(collider) = self.collider else {
            return;
        };
        let Some(hit) = Collider::first_hit_by(world, collider, self.hurt_by, Point::ZERO) else {
            return;
        };

        let attacker = world.entity_of(hit);
        self.invulnerable = self.cooldown;
        if let Some(mut callback) = self.on_hurt.take() {
            callback(world, me, attacker);
            self.on_hurt.get_or_insert(callback);
        }
    }
}
