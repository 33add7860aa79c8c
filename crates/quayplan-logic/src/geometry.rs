//! Plane geometry shared by every placer.
//!
//! The terminal lives in the XZ plane with Y up. Rectangles are always
//! axis-aligned; rotated footprints are reduced to their axis-aligned bounds
//! with [`rotated_bounds`].

use serde::{Deserialize, Serialize};

/// Tolerance used for containment and overlap tests (meters).
pub const EPSILON: f32 = 1e-3;

/// Clamp a numeric input to a safe minimum. Non-finite values become `min`.
pub fn sanitize(value: f32, min: f32) -> f32 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

/// Clamp a numeric input into `[min, max]`. Non-finite values become `min`.
pub fn sanitize_range(value: f32, min: f32, max: f32) -> f32 {
    sanitize(value, min).min(max.max(min))
}

/// World-space point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Bounding box of a placed entity: width along local X, depth along local Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Footprint {
    pub const fn new(width: f32, depth: f32, height: f32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Uniformly scaled copy (all three axes).
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            depth: self.depth * factor,
            height: self.height * factor,
        }
    }

    /// Plan-view area in m².
    pub fn area(self) -> f32 {
        self.width * self.depth
    }

    /// Copy with every dimension clamped to at least `min`.
    pub fn sanitized(self, min: f32) -> Self {
        Self {
            width: sanitize(self.width, min),
            depth: sanitize(self.depth, min),
            height: sanitize(self.height, min),
        }
    }
}

/// Axis-aligned rectangle in the XZ plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    /// Build from bounds, swapping any inverted pair.
    pub fn from_bounds(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_z: min_z.min(max_z),
            max_z: min_z.max(max_z),
        }
    }

    /// Build from a center point and extents.
    pub fn from_center(cx: f32, cz: f32, width: f32, depth: f32) -> Self {
        let hw = width.abs() / 2.0;
        let hd = depth.abs() / 2.0;
        Self {
            min_x: cx - hw,
            max_x: cx + hw,
            min_z: cz - hd,
            max_z: cz + hd,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn area(&self) -> f32 {
        self.width() * self.depth()
    }

    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn center_z(&self) -> f32 {
        (self.min_z + self.max_z) / 2.0
    }

    /// Width over depth. Degenerate rectangles report 1.0.
    pub fn aspect(&self) -> f32 {
        if self.is_degenerate() {
            1.0
        } else {
            self.width() / self.depth()
        }
    }

    /// True when either side is (close to) zero or a bound is not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_z.is_finite()
            && self.max_z.is_finite())
            || self.width() <= EPSILON
            || self.depth() <= EPSILON
    }

    /// Shrink by `margin` on every side. Collapses onto the center line
    /// instead of inverting when the margin is too large.
    pub fn inset(&self, margin: f32) -> Self {
        let m = sanitize(margin, 0.0);
        let mx = m.min(self.width() / 2.0);
        let mz = m.min(self.depth() / 2.0);
        Self {
            min_x: self.min_x + mx,
            max_x: self.max_x - mx,
            min_z: self.min_z + mz,
            max_z: self.max_z - mz,
        }
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_z: self.min_z - margin,
            max_z: self.max_z + margin,
        }
    }

    pub fn contains_point(&self, x: f32, z: f32) -> bool {
        x >= self.min_x - EPSILON
            && x <= self.max_x + EPSILON
            && z >= self.min_z - EPSILON
            && z <= self.max_z + EPSILON
    }

    /// `other` lies inside `self` (edges may touch).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x >= self.min_x - EPSILON
            && other.max_x <= self.max_x + EPSILON
            && other.min_z >= self.min_z - EPSILON
            && other.max_z <= self.max_z + EPSILON
    }

    /// Interior overlap; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection_area(other) > EPSILON
    }

    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let d = self.max_z.min(other.max_z) - self.min_z.max(other.min_z);
        if w <= 0.0 || d <= 0.0 {
            0.0
        } else {
            w * d
        }
    }
}

/// Axis-aligned bounds of a `width × depth` box centered at `(x, z)` and
/// rotated by `rotation_y` about +Y.
pub fn rotated_bounds(x: f32, z: f32, width: f32, depth: f32, rotation_y: f32) -> Rect {
    let (s, c) = rotation_y.sin_cos();
    let (s, c) = (s.abs(), c.abs());
    let w = width * c + depth * s;
    let d = width * s + depth * c;
    Rect::from_center(x, z, w, d)
}

/// Unit vector of local +X after rotating by `rotation_y` about +Y, as (x, z).
pub fn tangent(rotation_y: f32) -> (f32, f32) {
    let (s, c) = rotation_y.sin_cos();
    (c, -s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn sanitize_clamps_nan_and_negative() {
        assert_eq!(sanitize(f32::NAN, 1.0), 1.0);
        assert_eq!(sanitize(-5.0, 1.0), 1.0);
        assert_eq!(sanitize(f32::INFINITY, 2.0), 2.0);
        assert_eq!(sanitize(3.5, 1.0), 3.5);
        assert_eq!(sanitize_range(50.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn rect_basic_measures() {
        let r = Rect::from_bounds(10.0, -10.0, 0.0, 5.0);
        assert_eq!(r.min_x, -10.0);
        assert_eq!(r.width(), 20.0);
        assert_eq!(r.depth(), 5.0);
        assert_eq!(r.area(), 100.0);
        assert_eq!(r.center_x(), 0.0);
        assert_eq!(r.center_z(), 2.5);
        assert!((r.aspect() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn inset_never_inverts() {
        let r = Rect::from_center(0.0, 0.0, 10.0, 4.0);
        let shrunk = r.inset(3.0);
        assert!((shrunk.width() - 4.0).abs() < 1e-6);
        assert!(shrunk.depth().abs() < 1e-6, "depth collapses to zero");
        assert!(shrunk.is_degenerate());
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::from_bounds(0.0, 10.0, 0.0, 10.0);
        let b = Rect::from_bounds(10.0, 20.0, 0.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::from_bounds(5.0, 15.0, 5.0, 15.0);
        assert!(a.overlaps(&c));
        assert!((a.intersection_area(&c) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn containment_with_tolerance() {
        let outer = Rect::from_bounds(0.0, 10.0, 0.0, 10.0);
        assert!(outer.contains_rect(&Rect::from_bounds(0.0, 10.0, 2.0, 3.0)));
        assert!(!outer.contains_rect(&Rect::from_bounds(-1.0, 5.0, 2.0, 3.0)));
        assert!(outer.contains_point(10.0, 0.0));
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let r = rotated_bounds(0.0, 0.0, 20.0, 4.0, FRAC_PI_2);
        assert!((r.width() - 4.0).abs() < 1e-4);
        assert!((r.depth() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn tangent_follows_rotation() {
        let (x, z) = tangent(0.0);
        assert!((x - 1.0).abs() < 1e-6 && z.abs() < 1e-6);
        let (x, z) = tangent(FRAC_PI_2);
        assert!(x.abs() < 1e-6 && (z + 1.0).abs() < 1e-6);
    }
}
