//! Shape-shape collision detection and response
//!
//! Every shape is treated as a circle of radius `size`, whatever its
//! silhouette. The response is a 1-D elastic exchange along one axis of a
//! rotated frame, with `size` standing in for mass. The rotated y component
//! is carried through untouched, so this is an approximation and not a true
//! 2-D elastic collision.

use glam::Vec2;

use super::shape::Shape;
use crate::consts::SPIN_FACTOR;

/// Rotate a velocity by `angle` radians
///
/// x' = x cos - y sin, y' = x sin + y cos
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// 1-D elastic collision along x; y components are returned unchanged
///
/// v1 = u1 (m1 - m2) / (m1 + m2) + u2 2 m2 / (m1 + m2), symmetric for v2
#[inline]
pub fn elastic_exchange(u1: Vec2, m1: f32, u2: Vec2, m2: f32) -> (Vec2, Vec2) {
    let total = m1 + m2;
    let v1 = Vec2::new(u1.x * (m1 - m2) / total + u2.x * 2.0 * m2 / total, u1.y);
    let v2 = Vec2::new(u2.x * (m2 - m1) / total + u1.x * 2.0 * m1 / total, u2.y);
    (v1, v2)
}

/// Whether two shapes overlap (touching exactly is not a collision)
#[inline]
pub fn shapes_overlap(a: &Shape, b: &Shape) -> bool {
    a.pos.distance(b.pos) < a.size + b.size
}

/// Click hit-test using the same circle approximation as collisions
#[inline]
pub fn point_in_shape(point: Vec2, shape: &Shape) -> bool {
    point.distance(shape.pos) <= shape.size
}

/// Resolve a possible collision between two shapes, mutating both in place
///
/// Does nothing unless the circles strictly overlap. Coincident centers are
/// not special-cased: `atan2(0, 0)` yields 0 and the response proceeds along
/// the x axis.
pub fn resolve(a: &mut Shape, b: &mut Shape) {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let min_dist = a.size + b.size;

    if distance >= min_dist {
        return;
    }

    let angle = delta.y.atan2(delta.x);

    let u1 = rotate(a.vel, angle);
    let u2 = rotate(b.vel, angle);

    let (v1, v2) = elastic_exchange(u1, a.size, u2, b.size);

    a.vel = rotate(v1, -angle);
    b.vel = rotate(v2, -angle);

    a.rotation_speed = (a.vel.x + a.vel.y) * SPIN_FACTOR;
    b.rotation_speed = (b.vel.x + b.vel.y) * SPIN_FACTOR;

    // Push apart along the normal; the extra pixel keeps them from
    // re-triggering next frame
    let overlap = 0.5 * (min_dist - distance + 1.0);
    let normal = Vec2::new(angle.cos(), angle.sin());
    a.pos -= normal * overlap;
    b.pos += normal * overlap;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{Rgb, ShapeKind};
    use proptest::prelude::*;

    fn shape(pos: Vec2, vel: Vec2, size: f32) -> Shape {
        Shape {
            id: 0,
            kind: ShapeKind::Ball,
            pos,
            vel,
            size,
            color: Rgb::new(255, 0, 0),
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn test_head_on_equal_mass_exchanges_velocity() {
        let mut a = shape(Vec2::new(100.0, 100.0), Vec2::new(5.0, 0.0), 30.0);
        let mut b = shape(Vec2::new(110.0, 100.0), Vec2::new(-5.0, 0.0), 30.0);

        resolve(&mut a, &mut b);

        assert!((a.vel.x - -5.0).abs() < 1e-4);
        assert!((b.vel.x - 5.0).abs() < 1e-4);
        assert!(a.vel.y.abs() < 1e-4);
        assert!(b.vel.y.abs() < 1e-4);

        // Separated past the contact distance
        assert!(a.pos.distance(b.pos) >= 60.0);
        assert!((a.pos.x - 74.5).abs() < 1e-3);
        assert!((b.pos.x - 135.5).abs() < 1e-3);

        assert!((a.rotation_speed - -5.0 * SPIN_FACTOR).abs() < 1e-5);
        assert!((b.rotation_speed - 5.0 * SPIN_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn test_touching_is_not_a_collision() {
        let mut a = shape(Vec2::new(0.0, 0.0), Vec2::new(1.0, 2.0), 30.0);
        let mut b = shape(Vec2::new(60.0, 0.0), Vec2::new(-3.0, 4.0), 30.0);

        resolve(&mut a, &mut b);

        assert_eq!(a.vel, Vec2::new(1.0, 2.0));
        assert_eq!(b.vel, Vec2::new(-3.0, 4.0));
        assert_eq!(a.pos, Vec2::new(0.0, 0.0));
        assert_eq!(b.pos, Vec2::new(60.0, 0.0));
        assert_eq!(a.rotation_speed, 0.0);
    }

    #[test]
    fn test_coincident_centers_resolve_along_x() {
        let mut a = shape(Vec2::new(50.0, 50.0), Vec2::new(1.0, 0.0), 30.0);
        let mut b = shape(Vec2::new(50.0, 50.0), Vec2::new(0.0, 0.0), 30.0);

        resolve(&mut a, &mut b);

        // atan2(0, 0) = 0, so the push is purely horizontal
        assert!((a.pos.x - 19.5).abs() < 1e-3);
        assert!((b.pos.x - 80.5).abs() < 1e-3);
        assert_eq!(a.pos.y, 50.0);
        assert_eq!(b.pos.y, 50.0);
    }

    #[test]
    fn test_heavier_shape_keeps_direction() {
        let mut a = shape(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), 50.0);
        let mut b = shape(Vec2::new(40.0, 0.0), Vec2::new(0.0, 0.0), 25.0);

        resolve(&mut a, &mut b);

        assert!(a.vel.x > 0.0);
        assert!(b.vel.x > a.vel.x);
    }

    #[test]
    fn test_point_in_shape_boundary_inclusive() {
        let s = shape(Vec2::new(100.0, 100.0), Vec2::ZERO, 30.0);
        assert!(point_in_shape(Vec2::new(130.0, 100.0), &s));
        assert!(point_in_shape(Vec2::new(100.0, 100.0), &s));
        assert!(!point_in_shape(Vec2::new(131.0, 100.0), &s));
    }

    #[test]
    fn test_rotate_round_trip() {
        let v = Vec2::new(3.0, -2.0);
        let back = rotate(rotate(v, 0.7), -0.7);
        assert!((back - v).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_momentum_conserved(
            ax in 100.0f32..200.0, ay in 100.0f32..200.0,
            dx in -40.0f32..40.0, dy in -40.0f32..40.0,
            avx in -5.0f32..5.0, avy in -5.0f32..5.0,
            bvx in -5.0f32..5.0, bvy in -5.0f32..5.0,
            m1 in 25.0f32..55.0, m2 in 25.0f32..55.0,
        ) {
            let mut a = shape(Vec2::new(ax, ay), Vec2::new(avx, avy), m1);
            let mut b = shape(Vec2::new(ax + dx, ay + dy), Vec2::new(bvx, bvy), m2);
            prop_assume!(shapes_overlap(&a, &b));

            let before = a.vel * m1 + b.vel * m2;
            resolve(&mut a, &mut b);
            let after = a.vel * m1 + b.vel * m2;

            prop_assert!((before - after).length() < 1e-2);
        }

        #[test]
        fn prop_rotated_frame_momentum_conserved(
            u1x in -5.0f32..5.0, u2x in -5.0f32..5.0,
            m1 in 25.0f32..55.0, m2 in 25.0f32..55.0,
        ) {
            let (v1, v2) = elastic_exchange(Vec2::new(u1x, 1.0), m1, Vec2::new(u2x, -1.0), m2);
            prop_assert!((m1 * v1.x + m2 * v2.x - (m1 * u1x + m2 * u2x)).abs() < 1e-2);
            prop_assert_eq!(v1.y, 1.0);
            prop_assert_eq!(v2.y, -1.0);
        }

        #[test]
        fn prop_no_overlap_no_change(
            ax in 0.0f32..500.0, ay in 0.0f32..500.0,
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.0f32..200.0,
            m1 in 25.0f32..55.0, m2 in 25.0f32..55.0,
        ) {
            let gap = m1 + m2 + 0.01 + extra;
            let b_pos = Vec2::new(ax, ay) + Vec2::new(angle.cos(), angle.sin()) * gap;
            let mut a = shape(Vec2::new(ax, ay), Vec2::new(1.0, -1.0), m1);
            let mut b = shape(b_pos, Vec2::new(-2.0, 3.0), m2);
            prop_assume!(!shapes_overlap(&a, &b));

            resolve(&mut a, &mut b);

            prop_assert_eq!(a.vel, Vec2::new(1.0, -1.0));
            prop_assert_eq!(b.vel, Vec2::new(-2.0, 3.0));
            prop_assert_eq!(a.pos, Vec2::new(ax, ay));
            prop_assert_eq!(b.pos, b_pos);
        }
    }
}
