//! Arena walls
//!
//! The playable box is the window minus per-side insets reserved for HUD
//! chrome. A body whose bounding box crosses an inset rebounds on that axis
//! and is clamped back inside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::*;

/// Arena extents and HUD insets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            margin_left: MARGIN_LEFT,
            margin_right: MARGIN_RIGHT,
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
        }
    }
}

impl Arena {
    /// Minimum corner of the legal box
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.margin_left, self.margin_top)
    }

    /// Maximum corner of the legal box
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width - self.margin_right, self.height - self.margin_bottom)
    }

    /// Whether a body's bounding box is fully inside the legal box
    pub fn contains(&self, body: &Body) -> bool {
        let (lo, hi) = body.bounds();
        let (min, max) = (self.min(), self.max());
        lo.x >= min.x && lo.y >= min.y && hi.x <= max.x && hi.y <= max.y
    }
}

/// Rebound a body off the arena walls.
///
/// Each axis is handled independently; returns true if either rebounded.
pub fn resolve_boundary(body: &mut Body, arena: &Arena) -> bool {
    let (lo, hi) = body.bounds();
    let (min, max) = (arena.min(), arena.max());
    let r = body.radius;
    let mut hit = false;

    if lo.x < min.x || hi.x > max.x {
        body.vel.x = -body.vel.x * REBOUND_COEFFICIENT;
        body.pos.x = clamp_axis(body.pos.x, min.x + r, max.x - r);
        hit = true;
    }

    if lo.y < min.y || hi.y > max.y {
        body.vel.y = -body.vel.y * REBOUND_COEFFICIENT;
        body.pos.y = clamp_axis(body.pos.y, min.y + r, max.y - r);
        hit = true;
    }

    hit
}

/// Clamp that tolerates an inverted range (body wider than the arena)
#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi { (lo + hi) / 2.0 } else { v.clamp(lo, hi) }
}
