//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies then players, by index)
//! - No rendering, audio or file dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod effect;
pub mod launch;
pub mod score;
pub mod state;
pub mod tick;

pub use body::{Body, BodyId, SpecialEffect};
pub use boundary::{Arena, resolve_boundary};
pub use collision::{Contact, resolve_pair};
pub use launch::{LaunchController, ShotMode};
pub use score::{ScoreTracker, TargetZone};
pub use state::{GameState, Roster, ShotCounters, SimEvent};
pub use tick::tick;
