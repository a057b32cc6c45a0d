//! Target zone scoring
//!
//! The score is a live gauge: the number of enemies whose bounding box lies
//! entirely outside the target zone right now. It is recomputed every step,
//! not accumulated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::*;

/// Axis-aligned target rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetZone {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for TargetZone {
    fn default() -> Self {
        Self::from_origin_size(
            Vec2::new(ZONE_X, ZONE_Y),
            Vec2::new(ZONE_WIDTH, ZONE_HEIGHT),
        )
    }
}

impl TargetZone {
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// True only if the body's box does not overlap the zone at all
    pub fn is_fully_outside(&self, body: &Body) -> bool {
        let (lo, hi) = body.bounds();
        hi.x <= self.min.x || lo.x >= self.max.x || hi.y <= self.min.y || lo.y >= self.max.y
    }

    /// True if the body's box lies entirely within the zone
    pub fn contains(&self, body: &Body) -> bool {
        let (lo, hi) = body.bounds();
        lo.x >= self.min.x && hi.x <= self.max.x && lo.y >= self.min.y && hi.y <= self.max.y
    }

    /// Number of bodies knocked out of the zone
    pub fn count_outside(&self, bodies: &[Body]) -> u32 {
        bodies.iter().filter(|b| self.is_fully_outside(b)).count() as u32
    }
}

/// Current score and best score seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub current: u32,
    pub high: u32,
}

impl ScoreTracker {
    /// Start from a previously recorded best
    pub fn with_high(high: u32) -> Self {
        Self { current: 0, high }
    }

    /// Record the latest score; the high score never decreases
    pub fn observe(&mut self, score: u32) {
        self.current = score;
        if score > self.high {
            self.high = score;
        }
    }
}
