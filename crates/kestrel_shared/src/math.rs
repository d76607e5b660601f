//! Mathematical types shared by the runtime, the physics components and
//! render sinks.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Integer 2D point - entity positions, pixel offsets, grid cells
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Point {
    /// X component
    pub x: i32,
    /// Y component (up is positive)
    pub y: i32,
}

impl Point {
    /// Creates a new point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const ZERO: Self = Self::new(0, 0);

    /// One pixel to the right
    pub const RIGHT: Self = Self::new(1, 0);

    /// One pixel to the left
    pub const LEFT: Self = Self::new(-1, 0);

    /// One pixel up
    pub const UP: Self = Self::new(0, 1);

    /// One pixel down
    pub const DOWN: Self = Self::new(0, -1);

    /// Converts to a float vector
    #[must_use]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// 2D float vector - velocities, sub-pixel remainders
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Linear interpolation between `self` and `other`
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Rounds each component to the nearest integer point
    #[must_use]
    pub fn round(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Truncates each component toward zero
    #[must_use]
    pub fn trunc(self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Moves `value` toward `target` by at most `amount`, never overshooting.
#[must_use]
pub fn approach(value: f32, target: f32, amount: f32) -> f32 {
    if value > target {
        (value - amount).max(target)
    } else {
        (value + amount).min(target)
    }
}

/// Integer axis-aligned rectangle, anchored at its bottom-left corner.
///
/// Covers the half-open ranges `[x, x + w)` and `[y, y + h)`.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct RectI {
    /// Left edge
    pub x: i32,
    /// Bottom edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl RectI {
    /// Creates a new rectangle
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge (inclusive)
    #[inline]
    #[must_use]
    pub const fn left(self) -> i32 {
        self.x
    }

    /// Right edge (exclusive)
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (inclusive)
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y
    }

    /// Top edge (exclusive)
    #[inline]
    #[must_use]
    pub const fn top(self) -> i32 {
        self.y + self.h
    }

    /// Bottom-left corner
    #[must_use]
    pub const fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns this rectangle moved by `offset`
    #[must_use]
    pub const fn translate(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Strict intersection test. Rectangles sharing only an edge do not
    /// overlap.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// Whether `point` lies inside the rectangle
    #[must_use]
    pub const fn contains(self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.bottom()
            && point.y < self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = RectI::new(0, 0, 4, 4);
        let b = RectI::new(4, 0, 4, 4);
        assert!(!a.overlaps(b));
        assert!(!b.overlaps(a));
        assert!(a.overlaps(b.translate(Point::LEFT)));
    }

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach(5.0, 0.0, 2.0), 3.0);
        assert_eq!(approach(1.0, 0.0, 2.0), 0.0);
        assert_eq!(approach(-1.0, 0.0, 2.0), 0.0);
        assert_eq!(approach(-5.0, 0.0, 2.0), -3.0);
    }

    #[test]
    fn test_vec2_lerp_and_round() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, -3.0);
        assert_eq!(a.lerp(b, 0.5).round(), Point::new(5, -2));
        assert_eq!(Vec2::new(-1.7, 2.9).trunc(), Vec2::new(-1.0, 2.0));
    }

    #[test]
    fn test_point_bytemuck() {
        let p = Point::new(1, 2);
        let bytes: &[u8] = bytemuck::bytes_of(&p);
        assert_eq!(bytes.len(), 8);
    }
}
