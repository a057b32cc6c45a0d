//! Charge-and-release launching
//!
//! Holding the launch input accumulates charge up to `CHARGE_MAX_TIME`;
//! releasing fires the selected player body toward the aim point at a speed
//! proportional to the charge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::state::ShotCounters;
use crate::consts::*;

/// Which counter a launch is charged against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotMode {
    /// Limited to one launch per player body
    Primary,
    /// Post-round exploration, unlimited
    Replay,
}

/// Selection and charge state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchController {
    pub charging: bool,
    /// Seconds held, clamped to `[0, CHARGE_MAX_TIME]`
    pub charge_time: f32,
    /// Player index to fire next (validated at launch)
    pub selected: usize,
}

impl LaunchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    /// Start a fresh charge
    pub fn begin_charge(&mut self) {
        self.charging = true;
        self.charge_time = 0.0;
    }

    /// Accumulate charge while held and shots remain
    pub fn charge(&mut self, dt: f32, budget_left: bool) {
        if !self.charging || !budget_left {
            return;
        }
        self.charge_time = (self.charge_time + dt).clamp(0.0, CHARGE_MAX_TIME);
    }

    /// Normalized charge for the charge bar
    #[inline]
    pub fn charge_fraction(&self) -> f32 {
        self.charge_time / CHARGE_MAX_TIME
    }

    /// End the charge and fire the selected body.
    ///
    /// Ignored if no charge is in progress.
    pub fn release(
        &mut self,
        players: &mut [Body],
        aim: Vec2,
        mode: ShotMode,
        shots: &mut ShotCounters,
    ) -> Option<BodyId> {
        if !self.charging {
            return None;
        }
        self.charging = false;
        self.launch(players, self.selected, aim, mode, shots)
    }

    /// Fire `players[index]` toward `aim` at the current charge.
    ///
    /// Out-of-range indices and an exhausted primary budget are silently
    /// ignored.
    pub fn launch(
        &self,
        players: &mut [Body],
        index: usize,
        aim: Vec2,
        mode: ShotMode,
        shots: &mut ShotCounters,
    ) -> Option<BodyId> {
        if mode == ShotMode::Primary && shots.remaining(players.len()) == 0 {
            log::debug!("Launch ignored: no shots left");
            return None;
        }
        let Some(body) = players.get_mut(index) else {
            log::debug!("Launch ignored: no player {}", index);
            return None;
        };

        let direction = (aim - body.pos).normalize_or_zero();
        body.vel = direction * self.charge_fraction() * MAX_LAUNCH_SPEED;
        body.stopped = false;
        body.launched = true;
        // Each launch arms the effect again
        if body.is_special() {
            body.triggered_special = false;
        }

        match mode {
            ShotMode::Primary => shots.primary += 1,
            ShotMode::Replay => shots.replay += 1,
        }

        log::debug!("Launched player {} at {:?}", index, body.vel);
        Some(BodyId::Player(index))
    }
}
