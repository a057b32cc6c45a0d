//! World state and core simulation types
//!
//! Everything a round needs to resume lives here. Presentation state
//! (charge bar, selection, phase) is owned by `crate::round`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, SpecialEffect};
use super::boundary::Arena;
use super::score::{ScoreTracker, TargetZone};
use crate::consts::*;

/// Feedback emitted by the simulation for the presentation shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Two bodies collided while approaching (fires every step they stay so)
    Collision { a: BodyId, b: BodyId },
    /// A body rebounded off an arena wall
    WallRebound(BodyId),
    /// A player body was launched
    Launched(BodyId),
    /// A special body released its effect
    SpecialReleased { source: BodyId, effect: SpecialEffect },
    /// The primary round ended with this score
    RoundFinished { score: u32 },
}

/// Launches taken, split by mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotCounters {
    /// Primary playthrough; capped by the player count
    pub primary: u32,
    /// Replay exploration; unrestricted
    pub replay: u32,
}

impl ShotCounters {
    /// Primary shots left for a roster of `players` bodies
    pub fn remaining(&self, players: usize) -> u32 {
        (players as u32).saturating_sub(self.primary)
    }
}

/// Enemies and players in stable insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub enemies: Vec<Body>,
    pub players: Vec<Body>,
}

/// Staging positions for the four player bodies, left to right
pub fn player_slots() -> [Vec2; 4] {
    let x = ARENA_WIDTH / 2.0;
    let y = ARENA_HEIGHT - 170.0;
    [
        Vec2::new(x - 170.0, y),
        Vec2::new(x - 70.0, y),
        Vec2::new(x + 30.0, y),
        Vec2::new(x + 130.0, y),
    ]
}

impl Roster {
    /// Fresh roster: seeded enemies inside the zone, four staged players
    pub fn spawn(rng: &mut Pcg32, zone: &TargetZone) -> Self {
        Self {
            enemies: spawn_enemies(rng, zone, NUM_ENEMIES),
            players: spawn_players(),
        }
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        match id {
            BodyId::Enemy(i) => self.enemies.get(i),
            BodyId::Player(i) => self.players.get(i),
        }
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        match id {
            BodyId::Enemy(i) => self.enemies.get_mut(i),
            BodyId::Player(i) => self.players.get_mut(i),
        }
    }

    /// Every body id, enemies first
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + use<> {
        let enemies = (0..self.enemies.len()).map(BodyId::Enemy);
        let players = (0..self.players.len()).map(BodyId::Player);
        enemies.chain(players)
    }

    pub fn players_stopped(&self) -> bool {
        self.players.iter().all(|p| p.stopped)
    }

    pub fn enemies_stopped(&self) -> bool {
        self.enemies.iter().all(|e| e.stopped)
    }

    /// Some launched special has not released its effect yet
    pub fn effect_pending(&self) -> bool {
        self.players.iter().any(Body::has_pending_effect)
    }
}

/// Four player bodies; the last two carry a burst
pub fn spawn_players() -> Vec<Body> {
    player_slots()
        .into_iter()
        .enumerate()
        .map(|(i, pos)| {
            let body = Body::new(pos, PLAYER_RADIUS);
            if i >= 2 {
                body.with_effect(SpecialEffect::Burst)
            } else {
                body
            }
        })
        .collect()
}

/// Maximum placement attempts per enemy before accepting a crowded spot
const SPAWN_ATTEMPTS: u32 = 1000;

/// Scatter enemies inside the zone, keeping a gap between centers
pub fn spawn_enemies(rng: &mut Pcg32, zone: &TargetZone, count: usize) -> Vec<Body> {
    let r = ENEMY_RADIUS;
    let min_spacing = 2.0 * r + ENEMY_SPAWN_GAP;
    let lo = zone.min + Vec2::splat(r);
    let hi = zone.max - Vec2::splat(r);

    let mut enemies: Vec<Body> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut pos = Vec2::ZERO;
        for attempt in 0..SPAWN_ATTEMPTS {
            pos = Vec2::new(rng.random_range(lo.x..=hi.x), rng.random_range(lo.y..=hi.y));
            let clear = enemies.iter().all(|e| e.pos.distance(pos) >= min_spacing);
            if clear {
                break;
            }
            if attempt + 1 == SPAWN_ATTEMPTS {
                log::warn!("No clear spawn spot after {} tries; placing anyway", SPAWN_ATTEMPTS);
            }
        }
        enemies.push(Body::new(pos, r));
    }
    enemies
}

/// Undrained events kept across ticks; older ones are dropped beyond this
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed used for enemy placement
    pub seed: u64,
    pub arena: Arena,
    pub zone: TargetZone,
    pub roster: Roster,
    pub shots: ShotCounters,
    pub score: ScoreTracker,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Feedback since the last drain (not persisted). The shell drains this
    /// once per frame; `tick` caps it at `MAX_PENDING_EVENTS`.
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl GameState {
    /// Create a new round with the given seed
    pub fn new(seed: u64) -> Self {
        let zone = TargetZone::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let roster = Roster::spawn(&mut rng, &zone);
        Self::with_roster(seed, roster)
    }

    /// Wrap an explicit roster with default arena and zone
    pub fn with_roster(seed: u64, roster: Roster) -> Self {
        Self {
            seed,
            arena: Arena::default(),
            zone: TargetZone::default(),
            roster,
            shots: ShotCounters::default(),
            score: ScoreTracker::default(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop the oldest events past `MAX_PENDING_EVENTS`
    pub fn trim_events(&mut self) {
        let excess = self.events.len().saturating_sub(MAX_PENDING_EVENTS);
        if excess > 0 {
            log::warn!("Dropping {} undrained events", excess);
            self.events.drain(..excess);
        }
    }

    /// Recompute the live score from enemy positions
    pub fn update_score(&mut self) {
        let outside = self.zone.count_outside(&self.roster.enemies);
        self.score.observe(outside);
    }

    /// Every primary shot spent and the whole world at rest
    pub fn round_complete(&self) -> bool {
        self.shots.primary as usize >= self.roster.players.len()
            && self.roster.players_stopped()
            && !self.roster.effect_pending()
            && self.roster.enemies_stopped()
    }
}
