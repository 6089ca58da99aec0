use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// A point or displacement in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    #[must_use]
    pub fn distance_sq(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    #[must_use]
    pub fn distance(self, other: Vec2) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Absolute angle of the vector from `self` to `target`.
    #[must_use]
    pub fn angle_to(self, target: Vec2) -> f64 {
        (target.y - self.y).atan2(target.x - self.x)
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped.is_finite() {
        wrapped
    } else {
        0.0
    }
}

/// Signed smallest difference `to - from`, in `[-π, π]`.
#[must_use]
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let mut diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff -= TAU;
    }
    diff
}

/// Axis-aligned rectangle stored by its minimum corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle of the given size centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }

    /// Grows the rectangle by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Squared distance from `point` to the closest point of the rectangle.
    /// Zero when the point lies inside.
    #[inline]
    #[must_use]
    pub fn distance_sq_to(&self, point: Vec2) -> f64 {
        let cx = point.x.clamp(self.x, self.max_x());
        let cy = point.y.clamp(self.y, self.max_y());
        point.distance_sq(Vec2::new(cx, cy))
    }

    /// Circle-vs-rectangle overlap using the closest-point test.
    #[inline]
    #[must_use]
    pub fn intersects_circle(&self, center: Vec2, radius: f64) -> bool {
        self.distance_sq_to(center) < radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_overlap_uses_closest_point() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(rect.intersects_circle(Vec2::new(25.0, 10.0), 6.0));
        assert!(!rect.intersects_circle(Vec2::new(25.0, 10.0), 4.0));
        // Corner: axis gaps are 4 each, true distance ~5.66
        assert!(!rect.intersects_circle(Vec2::new(24.0, 24.0), 5.0));
        assert!(rect.intersects_circle(Vec2::new(10.0, 10.0), 0.5));
    }

    #[test]
    fn test_angle_helpers() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-9);
        assert!((angle_delta(0.1, TAU - 0.1) + 0.2).abs() < 1e-9);
        assert!(normalize_angle(f64::NAN) == 0.0);
    }

    #[test]
    fn test_centered_rect_roundtrip() {
        let rect = Rect::centered(Vec2::new(50.0, 40.0), 20.0, 10.0);
        assert_eq!(rect.center(), Vec2::new(50.0, 40.0));
        assert!(rect.contains(Vec2::new(41.0, 36.0)));
    }
}
