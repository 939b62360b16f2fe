//! Various 2d geometry utilities that completes the `glam` math crate.

use std::ops::{Add, AddAssign, Sub, SubAssign, BitOr, BitOrAssign};
use std::fmt;

use glam::Vec2;


/// An axis-aligned bounding box in the 2d world plane, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {

    /// Construct a new bounding box from the minimum and maximum points.
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Construct a new bounding box from its center point and half size.
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Calculate the size of this bounding box.
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    /// Calculate the center of the bounding box.
    pub fn center(self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Expand this bounding box in all direction by the given delta.
    pub fn inflate(self, delta: Vec2) -> Self {
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Offset this bounding box' coordinates by the given delta.
    pub fn offset(self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Expand this bounding box by the given delta, only in the delta's direction.
    pub fn expand(mut self, delta: Vec2) -> Self {

        if delta.x < 0.0 {
            self.min.x += delta.x;
        } else if delta.x > 0.0 {
            self.max.x += delta.x;
        }

        if delta.y < 0.0 {
            self.min.y += delta.y;
        } else if delta.y > 0.0 {
            self.max.y += delta.y;
        }

        self

    }

    /// Return true if this bounding box intersects with the given one.
    pub fn intersects(self, other: Self) -> bool {
        other.max.x > self.min.x && other.min.x < self.max.x &&
        other.max.y > self.min.y && other.min.y < self.max.y
    }

    /// Return true if this bounding box intersects with the given one on the X axis.
    pub fn intersects_x(self, other: Self) -> bool {
        other.max.x > self.min.x && other.min.x < self.max.x
    }

    /// Return true if this bounding box intersects with the given one on the Y axis.
    pub fn intersects_y(self, other: Self) -> bool {
        other.max.y > self.min.y && other.min.y < self.max.y
    }

    /// Return true if this bounding box contains the given point.
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Calculate the distance between the given point and this bounding box,
    /// zero if the point is contained.
    pub fn distance(self, point: Vec2) -> f32 {
        (point - point.clamp(self.min, self.max)).length()
    }

    /// Simulate an offset of the given bounding box by the given delta, but with this
    /// bounding box potentially colliding with it in the way, this function will return
    /// the new delta that avoid this collision.
    pub fn calc_x_delta(self, other: Self, mut dx: f32) -> f32 {
        if other.max.y > self.min.y && other.min.y < self.max.y {
            if dx > 0.0 && other.max.x <= self.min.x {
                dx = dx.min(self.min.x - other.max.x);
            } else if dx < 0.0 && other.min.x >= self.max.x {
                dx = dx.max(self.max.x - other.min.x);
            }
        }
        dx
    }

    /// Simulate an offset of the given bounding box by the given delta, but with this
    /// bounding box potentially colliding with it in the way, this function will return
    /// the new delta that avoid this collision.
    pub fn calc_y_delta(self, other: Self, mut dy: f32) -> f32 {
        if other.max.x > self.min.x && other.min.x < self.max.x {
            if dy > 0.0 && other.max.y <= self.min.y {
                dy = dy.min(self.min.y - other.max.y);
            } else if dy < 0.0 && other.min.y >= self.max.y {
                dy = dy.max(self.max.y - other.min.y);
            }
        }
        dy
    }

}

impl Add<Vec2> for BoundingBox {
    type Output = BoundingBox;
    #[inline]
    fn add(self, rhs: Vec2) -> Self::Output {
        self.offset(rhs)
    }
}

impl AddAssign<Vec2> for BoundingBox {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        *self = self.offset(rhs);
    }
}

impl Sub<Vec2> for BoundingBox {
    type Output = BoundingBox;
    #[inline]
    fn sub(self, rhs: Vec2) -> Self::Output {
        self.offset(-rhs)
    }
}

impl SubAssign<Vec2> for BoundingBox {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = self.offset(-rhs);
    }
}

// The bit or operator can be used to make a union of two bounding boxes.
impl BitOr<BoundingBox> for BoundingBox {
    type Output = BoundingBox;
    #[inline]
    fn bitor(self, rhs: BoundingBox) -> Self::Output {
        BoundingBox {
            min: self.min.min(rhs.min),
            max: self.max.max(rhs.max),
        }
    }
}

impl BitOrAssign for BoundingBox {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}


/// Calculate the euclidean square distance between two positions.
pub fn square_distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length_squared()
}

/// Return true if the two positions are within the given maximum euclidean
/// distance from each other.
pub fn positions_in_range(a: Vec2, b: Vec2, max_distance: f32) -> bool {
    square_distance(a, b) <= max_distance * max_distance
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn delta_clipping() {

        let wall = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        let moving = BoundingBox::new(0.0, 0.0, 5.0, 5.0);

        // Moving right toward the wall gets clipped at its left face.
        assert_eq!(wall.calc_x_delta(moving, 100.0), 5.0);
        // Moving away is never clipped.
        assert_eq!(wall.calc_x_delta(moving, -100.0), -100.0);
        // No clipping when the boxes do not overlap on the other axis.
        let above = moving.offset(Vec2::new(0.0, -20.0));
        assert_eq!(wall.calc_x_delta(above, 100.0), 100.0);

    }

    #[test]
    fn range_predicate() {
        assert!(positions_in_range(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), 5.0));
        assert!(!positions_in_range(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), 4.9));
    }

}
