//! Axis-aligned bounding-box collision test
//!
//! Shared by both per-tick sweeps (projectiles vs obstacles, ship vs
//! obstacles). The test is open-interval: boxes that merely share an edge or
//! corner do not collide.

use glam::Vec2;

/// True iff the two boxes strictly overlap on both axes.
///
/// `pos` is the top-left corner of each box, `size` its extent.
#[inline]
pub fn boxes_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_a.x + size_a.x > pos_b.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_a.y + size_a.y > pos_b.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(5.0, 5.0);
        assert!(boxes_overlap(a, Vec2::splat(10.0), b, Vec2::splat(10.0)));
    }

    #[test]
    fn test_separated_boxes_miss() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(50.0, 0.0);
        assert!(!boxes_overlap(a, Vec2::splat(10.0), b, Vec2::splat(10.0)));
    }

    #[test]
    fn test_touching_edge_does_not_collide() {
        // b starts exactly where a ends on the x axis
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(!boxes_overlap(a, Vec2::splat(10.0), b, Vec2::splat(10.0)));
    }

    #[test]
    fn test_touching_corner_does_not_collide() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 10.0);
        assert!(!boxes_overlap(a, Vec2::splat(10.0), b, Vec2::splat(10.0)));
    }

    #[test]
    fn test_containment_collides() {
        let outer = Vec2::new(0.0, 0.0);
        let inner = Vec2::new(40.0, 40.0);
        assert!(boxes_overlap(
            outer,
            Vec2::splat(100.0),
            inner,
            Vec2::splat(5.0)
        ));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            aw in 1.0f32..60.0, ah in 1.0f32..60.0,
            bw in 1.0f32..60.0, bh in 1.0f32..60.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let sa = Vec2::new(aw, ah);
            let sb = Vec2::new(bw, bh);
            prop_assert_eq!(boxes_overlap(a, sa, b, sb), boxes_overlap(b, sb, a, sa));
        }
    }
}
