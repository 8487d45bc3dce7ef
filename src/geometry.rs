//! Plain 2D value types handed to the drawing layer.
//!
//! Equality is exact coordinate equality. Two endpoints computed by the same arithmetic from the
//! same cell coordinates compare equal, which is what lets the drawing layer share one point
//! between the segments meeting there. No tolerance is applied.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Copy, Clone, Debug, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    #[inline]
    pub fn new(x: f64, y: f64) -> Vector {
        Vector { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product of the two vectors lying in the xy plane.
    #[inline]
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Signed angle in radians that rotates `a` onto `b`, counter clockwise positive.
    pub fn angle_between(a: Vector, b: Vector) -> f64 {
        a.cross(b).atan2(a.dot(b))
    }

    /// Component wise multiplication.
    #[inline]
    pub fn scaled(self, sx: f64, sy: f64) -> Vector {
        Vector::new(self.x * sx, self.y * sy)
    }
}

// -0.0 == 0.0, so the hash must not see the sign of a zero. Adding positive zero
// turns a negative zero into a positive one and leaves every other value alone.
#[inline]
fn hashable_bits(v: f64) -> u64 {
    (v + 0.0).to_bits()
}

impl PartialEq for Vector {
    fn eq(&self, other: &Vector) -> bool {
        self.x == other.x && self.y == other.y
    }
}

// Coordinates are always finite: produced from integer cell positions and finite scales.
impl Eq for Vector {}

impl Hash for Vector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hashable_bits(self.x).hash(state);
        hashable_bits(self.y).hash(state);
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector {
    fn from(x_y_pair: (f64, f64)) -> Vector {
        Vector::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// A directed line segment. `(a, b)` and `(b, a)` are different segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineSegment {
    pub start: Vector,
    pub end: Vector,
}

impl LineSegment {
    #[inline]
    pub fn new(start: Vector, end: Vector) -> LineSegment {
        LineSegment { start, end }
    }

    #[inline]
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::new(Vector::new(x1, y1), Vector::new(x2, y2))
    }

    #[inline]
    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Angle in degrees swept from `start` to `end`, both read as position vectors about the
    /// origin. Counter clockwise positive, in the range (-180, 180].
    pub fn angle(&self) -> f64 {
        Vector::angle_between(self.start, self.end).to_degrees()
    }

    /// Do the two segments sweep the same `angle`, give or take `tolerance` degrees?
    pub fn is_equal_angle(&self, other: &LineSegment, tolerance: f64) -> bool {
        (self.angle() - other.angle()).abs() < tolerance
    }

    pub fn reversed(&self) -> LineSegment {
        LineSegment::new(self.end, self.start)
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> LineSegment {
        LineSegment::new(self.start.scaled(sx, sy), self.end.scaled(sx, sy))
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.start, self.end)
    }
}
