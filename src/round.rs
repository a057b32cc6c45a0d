//! Round state machine
//!
//! `Round` sits between the presentation shell and the simulation. It turns
//! discrete commands into launches, paces the charge bar, steps the world
//! once per frame and moves between phases:
//!
//! ```text
//! Playing --(all shots spent, world at rest)--> EndScreen <--toggle--> ArchiveView
//! ```
//!
//! The finished round is written to disk on the way into `EndScreen` and
//! reloaded each time `ArchiveView` is entered, so replay experiments never
//! leak into the recorded result.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::highscores::HighScoreLog;
use crate::persistence::{self, Snapshot};
use crate::settings::Settings;
use crate::sim::{
    BodyId, GameState, LaunchController, ScoreTracker, ShotMode, SimEvent, tick,
};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Primary playthrough, one launch per player body
    Playing,
    /// Round over, result recorded
    EndScreen,
    /// Exploring the recorded result with unlimited launches
    ArchiveView,
}

/// Input from the presentation shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Choose which player body the next launch fires
    Select(usize),
    /// Launch button pressed
    BeginCharge,
    /// Launch button released with the pointer at `aim`
    Release { aim: Vec2 },
    /// Switch between EndScreen and ArchiveView
    ToggleReplay,
    /// Write the manual save slot
    SaveNow,
    /// Restore the manual save slot
    LoadNow,
    /// Stop the loop
    Quit,
}

/// Per-body draw data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub id: BodyId,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub stopped: bool,
    pub special: bool,
}

/// Everything the shell needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub phase: RoundPhase,
    pub bodies: Vec<BodyView>,
    pub score: u32,
    pub high_score: u32,
    pub shots_remaining: u32,
    pub replay_shots: u32,
    pub charge_fraction: f32,
    pub selected: usize,
}

/// One play session: world, phase, charge and save points
pub struct Round {
    settings: Settings,
    state: GameState,
    phase: RoundPhase,
    launcher: LaunchController,
    scores: HighScoreLog,
    /// Result recorded on entering EndScreen
    finished: Option<Snapshot>,
    quit: bool,
}

impl Round {
    /// Fresh round seeded from settings, high score read from the log
    pub fn new(settings: Settings) -> Self {
        let state = GameState::new(settings.seed);
        Self::with_state(settings, state)
    }

    /// Start playing from an explicit world
    pub fn with_state(settings: Settings, mut state: GameState) -> Self {
        let scores = HighScoreLog::new(settings.highscore_path.clone());
        state.score = ScoreTracker::with_high(scores.load_best().max(state.score.high));
        state.update_score();

        Self {
            settings,
            state,
            phase: RoundPhase::Playing,
            launcher: LaunchController::new(),
            scores,
            finished: None,
            quit: false,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn launcher(&self) -> &LaunchController {
        &self.launcher
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Result recorded when the round finished
    pub fn finished(&self) -> Option<&Snapshot> {
        self.finished.as_ref()
    }

    pub fn is_quitting(&self) -> bool {
        self.quit
    }

    /// Take simulation feedback since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.drain_events()
    }

    /// Launch mode for the current phase, if launching is allowed at all
    fn shot_mode(&self) -> Option<ShotMode> {
        match self.phase {
            RoundPhase::Playing => Some(ShotMode::Primary),
            RoundPhase::ArchiveView => Some(ShotMode::Replay),
            RoundPhase::EndScreen => None,
        }
    }

    fn budget_left(&self) -> bool {
        match self.phase {
            RoundPhase::Playing => self.state.shots.remaining(self.state.roster.players.len()) > 0,
            RoundPhase::ArchiveView => true,
            RoundPhase::EndScreen => false,
        }
    }

    /// Apply one input command
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Quit => {
                log::info!("Quit requested");
                self.quit = true;
            }
            Command::ToggleReplay => match self.phase {
                RoundPhase::EndScreen => self.enter_replay(),
                RoundPhase::ArchiveView => self.leave_replay(),
                RoundPhase::Playing => log::debug!("Replay toggle ignored while playing"),
            },
            Command::Select(index) => {
                if self.shot_mode().is_some() {
                    self.launcher.select(index);
                }
            }
            Command::BeginCharge => {
                if self.shot_mode().is_some() && self.budget_left() {
                    self.launcher.begin_charge();
                }
            }
            Command::Release { aim } => {
                let Some(mode) = self.shot_mode() else {
                    return;
                };
                let launched = self.launcher.release(
                    &mut self.state.roster.players,
                    aim,
                    mode,
                    &mut self.state.shots,
                );
                if let Some(id) = launched {
                    self.state.events.push(SimEvent::Launched(id));
                }
            }
            Command::SaveNow => {
                if self.phase == RoundPhase::Playing {
                    let path = self.settings.save_path.clone();
                    if let Err(e) = persistence::save_snapshot(&path, &Snapshot::capture(&self.state)) {
                        log::warn!("Save to {} failed: {}", path.display(), e);
                    }
                }
            }
            Command::LoadNow => {
                if self.phase == RoundPhase::Playing {
                    let path = self.settings.save_path.clone();
                    if self.load_from(&path) {
                        self.launcher = LaunchController::new();
                    }
                }
            }
        }
    }

    /// Advance one frame. Returns false once the session should close.
    pub fn frame(&mut self) -> bool {
        if self.quit {
            return false;
        }

        match self.phase {
            RoundPhase::EndScreen => {}
            RoundPhase::Playing | RoundPhase::ArchiveView => {
                let budget_left = self.budget_left();
                self.launcher.charge(self.settings.charge_dt, budget_left);
                tick(&mut self.state, self.settings.step_dt);

                if self.phase == RoundPhase::Playing && self.state.round_complete() {
                    self.finish_round();
                }
            }
        }
        true
    }

    /// Record the result and show the end screen
    fn finish_round(&mut self) {
        let snapshot = Snapshot::capture(&self.state);
        let score = snapshot.score;

        let path = &self.settings.final_save_path;
        if let Err(e) = persistence::save_snapshot(path, &snapshot) {
            log::error!("Could not record final state to {}: {}", path.display(), e);
        }
        if let Err(e) = self.scores.append(score) {
            log::error!("Could not append to {}: {}", self.scores.path().display(), e);
        }

        log::info!("Round finished: score {} (best {})", score, self.state.score.high);
        self.state.events.push(SimEvent::RoundFinished { score });
        self.finished = Some(snapshot);
        self.launcher = LaunchController::new();
        self.phase = RoundPhase::EndScreen;
    }

    /// Reopen the recorded result for free play
    fn enter_replay(&mut self) {
        let path = self.settings.final_save_path.clone();
        self.load_from(&path);
        self.state.shots.replay = 0;
        self.launcher = LaunchController::new();
        self.phase = RoundPhase::ArchiveView;
        log::info!("Entered replay");
    }

    /// Drop replay changes and go back to the end screen
    fn leave_replay(&mut self) {
        if let Some(finished) = &self.finished {
            finished.restore(&mut self.state);
        }
        self.launcher = LaunchController::new();
        self.phase = RoundPhase::EndScreen;
        log::info!("Left replay");
    }

    /// Replace the world from a snapshot file; on failure the world is kept
    fn load_from(&mut self, path: &std::path::Path) -> bool {
        match persistence::load_snapshot(path) {
            Ok(snapshot) => {
                snapshot.restore(&mut self.state);
                true
            }
            Err(e) => {
                log::warn!("Load from {} failed: {}", path.display(), e);
                false
            }
        }
    }

    /// Snapshot of everything drawable
    pub fn view(&self) -> FrameView {
        let bodies = self
            .state
            .roster
            .ids()
            .filter_map(|id| {
                self.state.roster.get(id).map(|b| BodyView {
                    id,
                    pos: b.pos,
                    radius: b.radius,
                    rotation: b.rotation,
                    stopped: b.stopped,
                    special: b.is_special(),
                })
            })
            .collect();

        FrameView {
            phase: self.phase,
            bodies,
            score: self.state.score.current,
            high_score: self.state.score.high,
            shots_remaining: self.state.shots.remaining(self.state.roster.players.len()),
            replay_shots: self.state.shots.replay,
            charge_fraction: self.launcher.charge_fraction(),
            selected: self.launcher.selected,
        }
    }
}
