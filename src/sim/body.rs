//! Disc bodies and per-step integration
//!
//! Every player projectile and enemy target is a `Body`. Integration is
//! explicit Euler with multiplicative friction; a body that drops below
//! `STOP_EPSILON` on both axes snaps to rest and stops integrating until a
//! collision, burst or launch wakes it up again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Effect carried by a special body, released once when it comes to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Radial push on every body within `EFFECT_RADIUS`
    Burst,
}

impl SpecialEffect {
    /// Reach of the effect from the source center
    pub fn radius(&self) -> f32 {
        match self {
            SpecialEffect::Burst => EFFECT_RADIUS,
        }
    }

    /// Impulse applied at zero distance (falls off linearly to the radius)
    pub fn force(&self) -> f32 {
        match self {
            SpecialEffect::Burst => PUSH_FORCE,
        }
    }
}

/// Which roster a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyId {
    Enemy(usize),
    Player(usize),
}

/// A simulated disc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    /// Degrees per second, derived from linear speed
    pub angular_vel: f32,
    /// Carried for completeness; collisions treat all bodies as equal mass
    pub mass: f32,
    pub radius: f32,
    pub stopped: bool,
    /// Special bodies carry an effect
    pub effect: Option<SpecialEffect>,
    pub launched: bool,
    pub triggered_special: bool,
}

impl Body {
    /// A body at rest
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            mass: DEFAULT_MASS,
            radius,
            stopped: true,
            effect: None,
            launched: false,
            triggered_special: false,
        }
    }

    pub fn with_effect(mut self, effect: SpecialEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.effect.is_some()
    }

    /// Launched special body whose effect has not fired yet
    #[inline]
    pub fn has_pending_effect(&self) -> bool {
        self.is_special() && self.launched && !self.triggered_special
    }

    /// Axis-aligned bounding box as (min, max)
    #[inline]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = Vec2::splat(self.radius);
        (self.pos - half, self.pos + half)
    }

    /// Add an impulse and wake the body
    pub fn push(&mut self, impulse: Vec2) {
        self.vel += impulse;
        self.stopped = false;
    }

    /// Advance one timestep.
    ///
    /// Returns the body's effect on the step it comes to rest if the effect
    /// is still armed; the caller is responsible for applying it.
    pub fn integrate(&mut self, dt: f32) -> Option<SpecialEffect> {
        if self.stopped {
            return None;
        }

        self.pos += self.vel * dt;
        self.vel *= FRICTION_COEFFICIENT;

        self.angular_vel = -self.vel.length() * SPIN_FACTOR;
        self.rotation += self.angular_vel * dt;

        if self.vel.x.abs() < STOP_EPSILON && self.vel.y.abs() < STOP_EPSILON {
            self.vel = Vec2::ZERO;
            self.angular_vel = 0.0;
            self.stopped = true;

            if self.has_pending_effect() {
                self.triggered_special = true;
                return self.effect;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moving(vel: Vec2) -> Body {
        let mut body = Body::new(Vec2::new(500.0, 500.0), PLAYER_RADIUS);
        body.push(vel);
        body
    }

    #[test]
    fn test_stopped_body_does_not_move() {
        let mut body = Body::new(Vec2::new(10.0, 20.0), 25.0);
        assert!(body.integrate(SIM_DT).is_none());
        assert_eq!(body.pos, Vec2::new(10.0, 20.0));
        assert_eq!(body.rotation, 0.0);
    }

    #[test]
    fn test_integrate_applies_friction_and_spin() {
        let mut body = moving(Vec2::new(100.0, 0.0));
        body.integrate(0.1);

        assert!((body.pos.x - 510.0).abs() < 1e-4);
        assert!((body.vel.x - 98.0).abs() < 1e-4);
        assert!((body.angular_vel - (-49.0)).abs() < 1e-4);
        assert!((body.rotation - (-4.9)).abs() < 1e-4);
        assert!(!body.stopped);
    }

    #[test]
    fn test_snaps_to_rest_below_epsilon() {
        let mut body = moving(Vec2::new(0.005, -0.005));
        body.integrate(SIM_DT);
        assert!(body.stopped);
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.angular_vel, 0.0);
    }

    #[test]
    fn test_special_fires_once_on_rest() {
        let mut body = moving(Vec2::new(3.0, 4.0)).with_effect(SpecialEffect::Burst);
        body.launched = true;

        let mut fired = 0;
        for _ in 0..2000 {
            if body.integrate(SIM_DT).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(body.stopped);
        assert!(body.triggered_special);

        // Woken by a collision without a new launch: stays spent
        body.push(Vec2::new(1.0, 0.0));
        for _ in 0..2000 {
            assert!(body.integrate(SIM_DT).is_none());
        }
    }

    #[test]
    fn test_unlaunched_special_does_not_fire() {
        let mut body = moving(Vec2::new(1.0, 0.0)).with_effect(SpecialEffect::Burst);
        for _ in 0..2000 {
            assert!(body.integrate(SIM_DT).is_none());
        }
        assert!(!body.triggered_special);
    }

    proptest! {
        #[test]
        fn prop_friction_converges(vx in -500.0f32..500.0, vy in -500.0f32..500.0) {
            let mut body = moving(Vec2::new(vx, vy));
            // 0.98^n * 500 < 0.01 well before 1000 steps
            for _ in 0..1000 {
                body.integrate(SIM_DT);
            }
            prop_assert!(body.stopped);
            prop_assert_eq!(body.vel, Vec2::ZERO);
            prop_assert_eq!(body.angular_vel, 0.0);
        }
    }
}
