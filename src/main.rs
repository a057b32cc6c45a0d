//! Disc Sling headless driver
//!
//! Plays one scripted round through the same command surface a windowed
//! shell would use, then optionally explores the result in replay.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use disc_sling::consts::CHARGE_MAX_TIME;
use disc_sling::sim::SimEvent;
use disc_sling::{Command, Round, RoundPhase, Settings};

#[derive(Parser)]
#[command(name = "disc-sling", about = "Headless disc sling round")]
struct Args {
    /// Settings file (JSON); defaults are used when it is missing
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Override the enemy placement seed
    #[arg(long)]
    seed: Option<u64>,

    /// Charge fraction for every shot, 0 to 1
    #[arg(long, default_value_t = 0.6)]
    charge: f32,

    /// Launches to take in replay once the round is over
    #[arg(long, default_value_t = 0)]
    replay_shots: u32,

    /// Give up after this many frames
    #[arg(long, default_value_t = 200_000)]
    max_frames: u64,
}

/// Running count of simulation feedback
#[derive(Debug, Default)]
struct EventTally {
    collisions: u32,
    rebounds: u32,
    launches: u32,
    specials: u32,
}

impl EventTally {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Collision { .. } => self.collisions += 1,
            SimEvent::WallRebound(_) => self.rebounds += 1,
            SimEvent::Launched(_) => self.launches += 1,
            SimEvent::SpecialReleased { source, effect } => {
                log::info!("{:?} released {:?}", source, effect);
                self.specials += 1;
            }
            SimEvent::RoundFinished { score } => log::info!("Round finished with {}", score),
        }
    }
}

struct Driver {
    round: Round,
    frames: u64,
    max_frames: u64,
    charge_frames: u64,
    tally: EventTally,
}

impl Driver {
    /// Advance one frame, failing once the frame budget is spent
    fn step(&mut self) -> Result<(), Box<dyn Error>> {
        if self.frames >= self.max_frames {
            return Err(format!("gave up after {} frames", self.max_frames).into());
        }
        self.round.frame();
        self.frames += 1;
        for event in self.round.drain_events() {
            self.tally.record(&event);
        }
        Ok(())
    }

    /// Charge and fire one player body at the enemy closest to it
    fn shoot(&mut self, index: usize) -> Result<(), Box<dyn Error>> {
        self.round.handle(Command::Select(index));
        self.round.handle(Command::BeginCharge);
        for _ in 0..self.charge_frames {
            self.step()?;
        }
        let aim = self.aim_for(index);
        self.round.handle(Command::Release { aim });
        for event in self.round.drain_events() {
            self.tally.record(&event);
        }
        Ok(())
    }

    fn aim_for(&self, index: usize) -> Vec2 {
        let state = self.round.state();
        let zone_center = (state.zone.min + state.zone.max) / 2.0;
        let Some(player) = state.roster.players.get(index) else {
            return zone_center;
        };
        state
            .roster
            .enemies
            .iter()
            .map(|e| e.pos)
            .min_by(|a, b| a.distance(player.pos).total_cmp(&b.distance(player.pos)))
            .unwrap_or(zone_center)
    }

    /// Step until `done` holds
    fn run_until(&mut self, done: impl Fn(&Round) -> bool) -> Result<(), Box<dyn Error>> {
        while !done(&self.round) {
            self.step()?;
        }
        Ok(())
    }
}

fn world_at_rest(round: &Round) -> bool {
    let roster = &round.state().roster;
    roster.players_stopped() && roster.enemies_stopped() && !roster.effect_pending()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load(&args.settings);
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if settings.charge_dt <= 0.0 || settings.step_dt <= 0.0 {
        return Err("step_dt and charge_dt must be positive".into());
    }

    let charge = args.charge.clamp(0.0, 1.0);
    let charge_frames = (charge * CHARGE_MAX_TIME / settings.charge_dt).round() as u64;
    log::info!(
        "Disc Sling starting (seed {}, charge {:.2} over {} frames)",
        settings.seed,
        charge,
        charge_frames
    );

    let mut driver = Driver {
        round: Round::new(settings),
        frames: 0,
        max_frames: args.max_frames,
        charge_frames,
        tally: EventTally::default(),
    };

    let players = driver.round.state().roster.players.len();
    for index in 0..players {
        driver.shoot(index)?;
    }
    driver.run_until(|round| round.phase() == RoundPhase::EndScreen)?;

    let view = driver.round.view();
    println!("Round over after {} frames", driver.frames);
    println!("  score:      {}", view.score);
    println!("  high score: {}", view.high_score);
    println!(
        "  events:     {} collisions, {} wall rebounds, {} bursts",
        driver.tally.collisions, driver.tally.rebounds, driver.tally.specials
    );

    if args.replay_shots > 0 {
        driver.round.handle(Command::ToggleReplay);
        for shot in 0..args.replay_shots as usize {
            driver.shoot(shot % players)?;
        }
        driver.run_until(world_at_rest)?;

        let replay = driver.round.view();
        println!(
            "Replay: {} shots, score {} (recorded result unchanged)",
            replay.replay_shots, replay.score
        );
        driver.round.handle(Command::ToggleReplay);
    }

    driver.round.handle(Command::Quit);
    driver.round.frame();
    log::info!("{} launches in {} frames", driver.tally.launches, driver.frames);
    Ok(())
}
