//! Disc Sling - a charge-and-launch disc physics toy
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (bodies, walls, collisions, launches, scoring)
//! - `round`: Round state machine (Playing / EndScreen / ArchiveView) and its save points
//! - `persistence`: Versioned binary snapshots of the full roster
//! - `highscores`: Append-only high score log
//! - `settings`: JSON configuration

pub mod highscores;
pub mod persistence;
pub mod round;
pub mod settings;
pub mod sim;

pub use highscores::HighScoreLog;
pub use round::{Command, FrameView, Round, RoundPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Integration timestep per frame (world units are scaled to this step)
    pub const SIM_DT: f32 = 0.1;
    /// Charge time accumulated per frame while the launch button is held
    pub const CHARGE_DT: f32 = 0.016;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;
    /// Arena insets kept clear for the HUD
    pub const MARGIN_LEFT: f32 = 280.0;
    pub const MARGIN_RIGHT: f32 = 300.0;
    pub const MARGIN_TOP: f32 = 120.0;
    pub const MARGIN_BOTTOM: f32 = 0.0;

    /// Target zone (top-left corner and size)
    pub const ZONE_X: f32 = 710.0;
    pub const ZONE_Y: f32 = 290.0;
    pub const ZONE_WIDTH: f32 = 500.0;
    pub const ZONE_HEIGHT: f32 = 500.0;

    /// Body defaults
    pub const PLAYER_RADIUS: f32 = 25.0;
    pub const ENEMY_RADIUS: f32 = 25.0;
    pub const DEFAULT_MASS: f32 = 1.0;
    pub const NUM_ENEMIES: usize = 6;
    /// Extra clearance between enemy centers at spawn
    pub const ENEMY_SPAWN_GAP: f32 = 50.0;

    /// Velocity retained after a wall or body collision
    pub const REBOUND_COEFFICIENT: f32 = 0.8;
    /// Velocity retained per integration step
    pub const FRICTION_COEFFICIENT: f32 = 0.98;
    /// Below this on both axes a body snaps to rest
    pub const STOP_EPSILON: f32 = 0.01;
    /// Cosmetic spin per unit of linear speed
    pub const SPIN_FACTOR: f32 = 0.5;

    /// Launch charge
    pub const CHARGE_MAX_TIME: f32 = 4.0;
    pub const MAX_LAUNCH_SPEED: f32 = 250.0;

    /// Special burst
    pub const EFFECT_RADIUS: f32 = 150.0;
    pub const PUSH_FORCE: f32 = 100.0;
}

