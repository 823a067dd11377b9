use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
    pub offset: Vec2,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    /// Modify BoxCollider with given size and offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        (p0.min(p1), p0.max(p1))
    }

    /// Point containment in world space. Edges count as inside.
    pub fn contains_point(&self, position: Vec2, point: Vec2) -> bool {
        let (min, max) = self.aabb(position);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Distance along `direction` (unit length) from `origin` to the first
    /// point of the collider, using the slab method.
    ///
    /// A ray starting inside the box hits at distance `0.0`. A zero direction
    /// never hits.
    pub fn ray_intersection(&self, position: Vec2, origin: Vec2, direction: Vec2) -> Option<f32> {
        if direction == Vec2::ZERO {
            return None;
        }
        if self.contains_point(position, origin) {
            return Some(0.0);
        }

        let (min, max) = self.aabb(position);
        let mut t_enter = 0.0_f32;
        let mut t_exit = f32::INFINITY;

        for axis in 0..2 {
            let o = origin[axis];
            let d = direction[axis];
            if d == 0.0 {
                // parallel to this slab
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn aabb_normalizes_negative_size() {
        let c = BoxCollider::new(-4.0, -2.0);
        let (min, max) = c.aabb(Vec2::new(10.0, 10.0));
        assert_eq!(min, Vec2::new(6.0, 8.0));
        assert_eq!(max, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn ray_down_hits_top_face() {
        // floor spanning x in [-50, 50], y in [-10, 0]
        let floor = BoxCollider::new(100.0, 10.0).with_offset(Vec2::new(-50.0, -10.0));
        let t = floor
            .ray_intersection(Vec2::ZERO, Vec2::new(3.0, 25.0), Vec2::NEG_Y)
            .unwrap();
        assert!(approx_eq(t, 25.0));
    }

    #[test]
    fn ray_down_misses_box_to_the_side() {
        let floor = BoxCollider::new(10.0, 10.0);
        assert!(
            floor
                .ray_intersection(Vec2::ZERO, Vec2::new(20.0, 30.0), Vec2::NEG_Y)
                .is_none()
        );
    }

    #[test]
    fn ray_pointing_away_misses() {
        let floor = BoxCollider::new(10.0, 10.0);
        assert!(
            floor
                .ray_intersection(Vec2::ZERO, Vec2::new(5.0, 30.0), Vec2::Y)
                .is_none()
        );
    }

    #[test]
    fn ray_starting_inside_hits_at_zero() {
        let floor = BoxCollider::new(10.0, 10.0);
        let t = floor
            .ray_intersection(Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::NEG_Y)
            .unwrap();
        assert!(approx_eq(t, 0.0));
    }

    #[test]
    fn zero_direction_never_hits() {
        let floor = BoxCollider::new(10.0, 10.0);
        assert!(
            floor
                .ray_intersection(Vec2::ZERO, Vec2::new(5.0, 20.0), Vec2::ZERO)
                .is_none()
        );
    }

    #[test]
    fn diagonal_ray_enters_through_corner_region() {
        let c = BoxCollider::new(10.0, 10.0);
        let dir = Vec2::new(1.0, -1.0).normalize();
        let t = c
            .ray_intersection(Vec2::ZERO, Vec2::new(-5.0, 15.0), dir)
            .unwrap();
        // enters at y = 10 after travelling 5 units on each axis
        assert!(approx_eq(t, 5.0 * std::f32::consts::SQRT_2));
    }
}
