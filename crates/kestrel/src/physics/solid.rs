//! # Solid
//!
//! Kinematic platform. Travels back and forth between its first and last
//! waypoint and carries every mover riding on top of it.

use kestrel_core::{Component, ComponentId, EntityId, Poolable, RenderSink, World};
use kestrel_shared::{Color, Point, RectI};

use super::mover::Mover;

/// Kinematic platform component.
#[derive(Clone, Debug)]
pub struct Solid {
    /// Path points; only the first and the last one are travelled between.
    pub waypoints: Vec<Point>,
    /// Path parameter in `[0, 1]`.
    pub t: f32,
    /// Whether `t` is increasing.
    pub forward: bool,
    /// Change of `t` per second.
    pub speed: f32,
    /// The platform's own collider, used to detect riders.
    pub collider: Option<ComponentId>,
}

impl Default for Solid {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            t: 0.0,
            forward: true,
            speed: 0.0,
            collider: None,
        }
    }
}

impl Poolable for Solid {
    fn reset(&mut self) {
        self.waypoints.clear();
        self.t = 0.0;
        self.forward = true;
        self.speed = 0.0;
        self.collider = None;
    }
}

impl Solid {
    /// Integer position on the path at the current `t`.
    #[must_use]
    pub fn target(&self) -> Option<Point> {
        let from = self.waypoints.first()?.as_vec2();
        let to = self.waypoints.last()?.as_vec2();
        Some(from.lerp(to, self.t).round())
    }

    /// Entities of every mover riding this platform, excluding movers on
    /// the platform's own entity.
    fn riders(&self, world: &World, owner: EntityId) -> Vec<EntityId> {
        let Some(collider) = self.collider else {
            return Vec::new();
        };

        let mut riders = Vec::new();
        for (id, mover) in world.iter::<Mover>() {
            let entity = world.entity_of(id);
            if entity != owner && !riders.contains(&entity) && mover.is_riding(world, collider) {
                riders.push(entity);
            }
        }
        riders
    }
}

impl Component for Solid {
    fn update(&mut self, world: &mut World, me: ComponentId, dt: f32) {
        if self.t > 1.0 {
            self.t = 1.0;
            self.forward = false;
        } else if self.t < 0.0 {
            self.t = 0.0;
            self.forward = true;
        }

        let Some(target) = self.target() else {
            return;
        };

        let owner = world.entity_of(me);
        let delta = target - world.entity(owner).position;
        if delta != Point::ZERO {
            // Riders are found against the pre-move position
            let riders = self.riders(world, owner);
            world.entity_mut(owner).position = target;
            for rider in riders {
                world.entity_mut(rider).position += delta;
            }
        }

        let direction = if self.forward { 1.0 } else { -1.0 };
        self.t += direction * self.speed * dt;
    }

    fn debug_render(&self, _world: &World, _me: ComponentId, sink: &mut dyn RenderSink) {
        for point in [self.waypoints.first(), self.waypoints.last()].into_iter().flatten() {
            sink.rect(RectI::new(point.x, point.y, 1, 1), Color::YELLOW);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_uses_first_and_last_waypoint() {
        let solid = Solid {
            waypoints: vec![Point::new(0, 0), Point::new(100, 100), Point::new(10, 0)],
            t: 0.25,
            ..Solid::default()
        };
        // The middle waypoint is ignored
        assert_eq!(solid.target(), Some(Point::new(3, 0)));
    }

    #[test]
    fn test_target_rounds_to_nearest() {
        let solid = Solid {
            waypoints: vec![Point::new(0, 0), Point::new(0, 3)],
            t: 0.5,
            ..Solid::default()
        };
        assert_eq!(solid.target(), Some(Point::new(0, 2)));
        assert_eq!(Solid::default().target(), None);
    }
}
