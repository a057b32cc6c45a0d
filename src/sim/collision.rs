//! Circle-circle collision detection and response
//!
//! Resolution is discrete-time: bodies may already interpenetrate when the
//! pair is checked, so every resolved contact also pushes the centers apart.
//! The velocity update blends the two velocities rather than conserving
//! momentum by mass; `Body::mass` is not consulted.

use glam::Vec2;

use super::body::Body;
use crate::consts::*;

/// Normal used when two centers coincide exactly
pub const COINCIDENT_NORMAL: Vec2 = Vec2::Y;

/// Extra clearance per body after de-overlap, so rounding cannot leave a
/// resting pair touching
pub const SEPARATION_SLOP: f32 = 1e-3;

/// Outcome of checking one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Not overlapping
    Miss,
    /// Overlapping but already moving apart; nothing changed
    Separating,
    /// Overlapping and approaching; velocities, spin and positions updated
    Resolved {
        /// Unit normal pointing from `b` toward `a`
        normal: Vec2,
        /// Overlap depth before correction
        penetration: f32,
    },
}

impl Contact {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Contact::Resolved { .. })
    }
}

/// Check and resolve a single pair
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> Contact {
    let delta = a.pos - b.pos;
    let distance = delta.length();
    let reach = a.radius + b.radius;

    if distance >= reach {
        return Contact::Miss;
    }

    let normal = if distance > 0.0 {
        delta / distance
    } else {
        COINCIDENT_NORMAL
    };

    let relative = a.vel - b.vel;
    if relative.dot(normal) > 0.0 {
        return Contact::Separating;
    }

    let (va, vb) = (a.vel, b.vel);
    a.vel = 0.5 * (va + vb + REBOUND_COEFFICIENT * (vb - va));
    b.vel = 0.5 * (vb + va + REBOUND_COEFFICIENT * (va - vb));

    // Glancing spin: opposite senses for the two bodies
    let cross = normal.perp_dot(relative);
    let sense = if cross > 0.0 { 1.0 } else { -1.0 };
    a.angular_vel = -a.vel.length() * SPIN_FACTOR * sense;
    b.angular_vel = -b.vel.length() * SPIN_FACTOR * -sense;

    let penetration = reach - distance;
    let separation = normal * (penetration / 2.0 + SEPARATION_SLOP);
    a.pos += separation;
    b.pos -= separation;

    a.stopped = false;
    b.stopped = false;

    Contact::Resolved {
        normal,
        penetration,
    }
}

/// Mutable references to two distinct elements of a slice
pub(super) fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i != j, "pair_mut requires distinct indices");
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        let mut body = Body::new(Vec2::new(x, y), 25.0);
        body.vel = Vec2::new(vx, vy);
        body.stopped = vx == 0.0 && vy == 0.0;
        body
    }

    #[test]
    fn test_miss_when_apart() {
        let mut a = body(0.0, 0.0, 10.0, 0.0);
        let mut b = body(50.0, 0.0, 0.0, 0.0);
        // Touching exactly is not overlapping
        assert_eq!(resolve_pair(&mut a, &mut b), Contact::Miss);
        assert_eq!(a.vel, Vec2::new(10.0, 0.0));
        assert!(b.stopped);
    }

    #[test]
    fn test_head_on_symmetry() {
        let mut a = body(0.0, 0.0, 10.0, 0.0);
        let mut b = body(40.0, 0.0, -10.0, 0.0);

        let contact = resolve_pair(&mut a, &mut b);
        assert!(contact.is_resolved());

        // Equal and opposite, reversed and scaled by the rebound coefficient
        assert!((a.vel.x + b.vel.x).abs() < 1e-5);
        assert!((a.vel.x - (-8.0)).abs() < 1e-5);
        assert!((b.vel.x - 8.0).abs() < 1e-5);
        assert_eq!(a.vel.y, 0.0);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_separating_pair_untouched() {
        let mut a = body(0.0, 0.0, -10.0, 0.0);
        let mut b = body(40.0, 0.0, 10.0, 0.0);
        let before = (a.clone(), b.clone());

        assert_eq!(resolve_pair(&mut a, &mut b), Contact::Separating);
        assert_eq!((a, b), before);
    }

    #[test]
    fn test_overlap_correction() {
        let mut a = body(0.0, 0.0, 10.0, 0.0);
        let mut b = body(40.0, 0.0, 0.0, 0.0);

        let contact = resolve_pair(&mut a, &mut b);
        match contact {
            Contact::Resolved { normal, penetration } => {
                assert_eq!(normal, Vec2::new(-1.0, 0.0));
                assert!((penetration - 10.0).abs() < 1e-5);
            }
            other => panic!("expected resolved contact, got {other:?}"),
        }
        // Half the penetration each, plus the slop
        assert!((a.pos.x - (-5.0 - SEPARATION_SLOP)).abs() < 1e-5);
        assert!((b.pos.x - (45.0 + SEPARATION_SLOP)).abs() < 1e-5);
        assert!((a.pos.distance(b.pos) - (50.0 + 2.0 * SEPARATION_SLOP)).abs() < 1e-5);
        assert!(resolve_pair(&mut a, &mut b) == Contact::Miss);
    }

    #[test]
    fn test_wakes_resting_body() {
        let mut a = body(0.0, 0.0, 20.0, 0.0);
        let mut b = body(45.0, 0.0, 0.0, 0.0);
        assert!(b.stopped);

        resolve_pair(&mut a, &mut b);
        assert!(!a.stopped);
        assert!(!b.stopped);
        // 0.5 * (20 + 0.8 * 20) = 18 for the struck body
        assert!((b.vel.x - 18.0).abs() < 1e-5);
        assert!((a.vel.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_glancing_spin_opposes() {
        let mut a = body(0.0, 0.0, 10.0, 5.0);
        let mut b = body(30.0, 30.0, 0.0, 0.0);

        assert!(resolve_pair(&mut a, &mut b).is_resolved());
        assert!(a.angular_vel != 0.0);
        assert!(a.angular_vel.signum() != b.angular_vel.signum());
    }

    #[test]
    fn test_coincident_centers_use_fallback_normal() {
        let mut a = body(100.0, 100.0, 0.0, -5.0);
        let mut b = body(100.0, 100.0, 0.0, 0.0);

        let contact = resolve_pair(&mut a, &mut b);
        assert_eq!(
            contact,
            Contact::Resolved {
                normal: COINCIDENT_NORMAL,
                penetration: 50.0,
            }
        );
        assert!((a.pos.y - (125.0 + SEPARATION_SLOP)).abs() < 1e-4);
        assert!((b.pos.y - (75.0 - SEPARATION_SLOP)).abs() < 1e-4);
        assert!(a.pos.is_finite() && b.pos.is_finite());
    }

    #[test]
    #[should_panic]
    fn test_pair_mut_rejects_same_index() {
        let mut values = [1, 2, 3];
        let _ = pair_mut(&mut values, 1, 1);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut values = [1, 2, 3, 4];
        {
            let (x, y) = pair_mut(&mut values, 0, 3);
            std::mem::swap(x, y);
        }
        assert_eq!(values, [4, 2, 3, 1]);
        {
            let (x, y) = pair_mut(&mut values, 2, 1);
            *x += 10;
            *y += 20;
        }
        assert_eq!(values, [4, 22, 13, 1]);
    }
}
