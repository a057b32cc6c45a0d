//! Special effect dispatch
//!
//! Bodies only carry a `SpecialEffect` tag; the step calls `trigger` with the
//! source id so the effect can reach the rest of the roster without the body
//! holding a reference back to it.

use glam::Vec2;

use super::body::{BodyId, SpecialEffect};
use super::state::Roster;

/// Apply `effect` centered on the source body.
///
/// Returns the number of bodies pushed.
pub fn trigger(roster: &mut Roster, source: BodyId, effect: SpecialEffect) -> usize {
    let Some(origin) = roster.get(source).map(|b| b.pos) else {
        return 0;
    };

    match effect {
        SpecialEffect::Burst => burst(roster, source, origin, effect.radius(), effect.force()),
    }
}

/// Radial push with linear falloff
fn burst(roster: &mut Roster, source: BodyId, origin: Vec2, radius: f32, force: f32) -> usize {
    let mut pushed = 0;
    for id in roster.ids() {
        if id == source {
            continue;
        }
        let Some(body) = roster.get_mut(id) else {
            continue;
        };

        let delta = body.pos - origin;
        let distance = delta.length();
        if distance > 0.0 && distance < radius {
            let falloff = 1.0 - distance / radius;
            body.push(delta / distance * force * falloff);
            pushed += 1;
        }
    }

    if pushed > 0 {
        log::debug!("{:?} burst at {:?} pushed {} bodies", source, origin, pushed);
    }
    pushed
}
