//! # Mover
//!
//! Physics-integrating component. Integrates speed into a sub-pixel
//! remainder and moves its entity in whole-pixel steps, X axis first, one
//! pixel at a time against the colliders of the world.
//!
//! Coordinates are y-up: gravity is usually negative and "the ground" is
//! one pixel below (`y - 1`).

use kestrel_core::{Component, ComponentId, Poolable, World};
use kestrel_shared::{approach, Mask, Point, Vec2};

use super::collider::Collider;

/// Callback fired when a move is blocked.
///
/// Receives the mover itself, the world and the mover's id.
pub type MoverCallback = Box<dyn FnMut(&mut Mover, &mut World, ComponentId)>;

/// Vertical offset checked by [`Mover::on_ground`].
pub const GROUND_OFFSET: i32 = -1;

/// Physics-integrating component.
///
/// Without a collider the mover still integrates and moves, unobstructed.
#[derive(Default)]
pub struct Mover {
    /// Velocity in pixels per second.
    pub speed: Vec2,
    /// Sub-pixel movement carried to the next frame, each axis in (-1, 1).
    pub remainder: Vec2,
    /// Vertical acceleration applied while airborne.
    pub gravity: f32,
    /// Horizontal deceleration applied while grounded.
    pub friction: f32,
    /// Collider used for blocking and ground checks.
    pub collider: Option<ComponentId>,
    /// Replaces the default stop when the X axis is blocked.
    pub on_hit_x: Option<MoverCallback>,
    /// Replaces the default stop when the Y axis is blocked.
    pub on_hit_y: Option<MoverCallback>,
    /// Fired after every blocked X step.
    pub on_squish_x: Option<MoverCallback>,
    /// Fired after every blocked Y step.
    pub on_squish_y: Option<MoverCallback>,
}

impl Poolable for Mover {}

/// Movement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug)]
enum Hook {
    HitX,
    HitY,
    SquishX,
    SquishY,
}

impl Mover {
    /// Creates a mover wired to `collider`.
    #[must_use]
    pub fn with_collider(collider: ComponentId) -> Self {
        Self {
            collider: Some(collider),
            ..Self::default()
        }
    }

    /// Zeroes horizontal speed and remainder.
    pub fn stop_x(&mut self) {
        self.speed.x = 0.0;
        self.remainder.x = 0.0;
    }

    /// Zeroes vertical speed and remainder.
    pub fn stop_y(&mut self) {
        self.speed.y = 0.0;
        self.remainder.y = 0.0;
    }

    fn check(&self, world: &World, mask: Mask, offset: Point) -> bool {
        self.collider
            .is_some_and(|collider| Collider::check_by(world, collider, mask, offset))
    }

    /// Whether a solid, or a jumpthru the mover is not inside, lies `dist`
    /// pixels away vertically.
    #[must_use]
    pub fn on_ground_by(&self, world: &World, dist: i32) -> bool {
        self.collider.is_some()
            && (self.check(world, Mask::SOLID, Point::new(0, dist))
                || self.on_jumpthru_by(world, dist))
    }

    /// [`Mover::on_ground_by`] one pixel below.
    #[must_use]
    pub fn on_ground(&self, world: &World) -> bool {
        self.on_ground_by(world, GROUND_OFFSET)
    }

    /// Whether a jumpthru lies `dist` pixels away vertically while the mover
    /// does not currently overlap one.
    #[must_use]
    pub fn on_jumpthru_by(&self, world: &World, dist: i32) -> bool {
        self.check(world, Mask::JUMPTHRU, Point::new(0, dist))
            && !self.check(world, Mask::JUMPTHRU, Point::ZERO)
    }

    /// [`Mover::on_jumpthru_by`] one pixel below.
    #[must_use]
    pub fn on_jumpthru(&self, world: &World) -> bool {
        self.on_jumpthru_by(world, GROUND_OFFSET)
    }

    /// Whether the mover rests on `solid_collider`: clear of it now,
    /// touching it one pixel lower.
    #[must_use]
    pub fn is_riding(&self, world: &World, solid_collider: ComponentId) -> bool {
        let Some(mine) = self.collider else {
            return false;
        };
        let Some(collider) = world.get::<Collider>(mine) else {
            return false;
        };
        !collider.overlaps_with(world, mine, solid_collider, Point::ZERO)
            && collider.overlaps_with(world, mine, solid_collider, Point::DOWN)
    }

    /// Moves horizontally pixel by pixel. Returns whether a solid blocked
    /// the move.
    pub fn move_x(&mut self, world: &mut World, me: ComponentId, amount: i32) -> bool {
        self.step(world, me, Axis::X, amount)
    }

    /// Moves vertically pixel by pixel. Returns whether a solid (or, moving
    /// down, a jumpthru) blocked the move.
    pub fn move_y(&mut self, world: &mut World, me: ComponentId, amount: i32) -> bool {
        self.step(world, me, Axis::Y, amount)
    }

    fn blocked(&self, world: &World, axis: Axis, sign: i32) -> bool {
        match axis {
            Axis::X => self.check(world, Mask::SOLID, Point::new(sign, 0)),
            Axis::Y => {
                self.check(world, Mask::SOLID, Point::new(0, sign))
                    || (sign < 0 && self.on_jumpthru_by(world, sign))
            }
        }
    }

    fn step(&mut self, world: &mut World, me: ComponentId, axis: Axis, amount: i32) -> bool {
        let owner = world.entity_of(me);
        let sign = amount.signum();
        let mut remaining = amount;

        while remaining != 0 {
            if self.blocked(world, axis, sign) {
                self.hit(world, me, axis);
                return true;
            }

            let position = &mut world.entity_mut(owner).position;
            match axis {
                Axis::X => position.x += sign,
                Axis::Y => position.y += sign,
            }
            remaining -= sign;
        }
        false
    }

    fn hit(&mut self, world: &mut World, me: ComponentId, axis: Axis) {
        let (hit, squish) = match axis {
            Axis::X => (Hook::HitX, Hook::SquishX),
            Axis::Y => (Hook::HitY, Hook::SquishY),
        };

        if !self.fire(world, me, hit) {
            match axis {
                Axis::X => self.stop_x(),
                Axis::Y => self.stop_y(),
            }
        }
        self.fire(world, me, squish);
    }

    fn hook(&mut self, hook: Hook) -> &mut Option<MoverCallback> {
        match hook {
            Hook::HitX => &mut self.on_hit_x,
            Hook::HitY => &mut self.on_hit_y,
            Hook::SquishX => &mut self.on_squish_x,
            Hook::SquishY => &mut self.on_squish_y,
        }
    }

    /// Runs a callback if set. It is taken out while it runs and restored
    /// unless it installed a replacement.
    fn fire(&mut self, world: &mut World, me: ComponentId, hook: Hook) -> bool {
        let Some(mut callback) = self.hook(hook).take() else {
            return false;
        };
        callback(self, world, me);
        self.hook(hook).get_or_insert(callback);
        true
    }
}

impl Component for Mover {
    fn update(&mut self, world: &mut World, me: ComponentId, dt: f32) {
        let grounded = self.on_ground(world);

        if self.friction > 0.0 && grounded {
            self.speed.x = approach(self.speed.x, 0.0, self.friction * dt);
        }
        // Only solids hold a mover up; a jumpthru stops it through on_hit_y
        if self.gravity != 0.0 && !self.check(world, Mask::SOLID, Point::DOWN) {
            self.speed.y += self.gravity * dt;
        }

        let total = self.remainder + self.speed * dt;
        let whole = total.trunc();
        self.remainder = total - whole;

        self.move_x(world, me, whole.x as i32);
        // A hit callback may have destroyed this mover
        if world.contains(me) {
            self.move_y(world, me, whole.y as i32);
        }
    }
}
