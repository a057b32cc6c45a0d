//! Fixed timestep simulation tick
//!
//! One tick integrates every body (releasing any special effect on the step
//! its body comes to rest), rebounds bodies off the walls, resolves every
//! colliding pair once, and refreshes the live score.

use super::body::BodyId;
use super::boundary::resolve_boundary;
use super::collision::{pair_mut, resolve_pair};
use super::effect;
use super::state::{GameState, SimEvent};

/// Advance the world by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    state.time_ticks += 1;
    state.trim_events();

    integrate_all(state, dt);
    resolve_walls(state);
    resolve_collisions(state);
    state.update_score();
}

/// Integrate enemies then players, dispatching effects as bodies come to rest
fn integrate_all(state: &mut GameState, dt: f32) {
    for id in state.roster.ids() {
        let released = state.roster.get_mut(id).and_then(|body| body.integrate(dt));
        if let Some(fx) = released {
            effect::trigger(&mut state.roster, id, fx);
            state.events.push(SimEvent::SpecialReleased { source: id, effect: fx });
        }
    }
}

fn resolve_walls(state: &mut GameState) {
    let arena = state.arena;
    for id in state.roster.ids() {
        if let Some(body) = state.roster.get_mut(id) {
            if resolve_boundary(body, &arena) {
                state.events.push(SimEvent::WallRebound(id));
            }
        }
    }
}

/// Single pass: player-enemy, player-player, enemy-enemy
fn resolve_collisions(state: &mut GameState) {
    let roster = &mut state.roster;
    let events = &mut state.events;

    for (i, player) in roster.players.iter_mut().enumerate() {
        for (j, enemy) in roster.enemies.iter_mut().enumerate() {
            if resolve_pair(player, enemy).is_resolved() {
                events.push(SimEvent::Collision {
                    a: BodyId::Player(i),
                    b: BodyId::Enemy(j),
                });
            }
        }
    }

    for i in 0..roster.players.len() {
        for j in i + 1..roster.players.len() {
            let (a, b) = pair_mut(&mut roster.players, i, j);
            if resolve_pair(a, b).is_resolved() {
                events.push(SimEvent::Collision {
                    a: BodyId::Player(i),
                    b: BodyId::Player(j),
                });
            }
        }
    }

    for i in 0..roster.enemies.len() {
        for j in i + 1..roster.enemies.len() {
            let (a, b) = pair_mut(&mut roster.enemies, i, j);
            if resolve_pair(a, b).is_resolved() {
                events.push(SimEvent::Collision {
                    a: BodyId::Enemy(i),
                    b: BodyId::Enemy(j),
                });
            }
        }
    }
}
