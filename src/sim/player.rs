//! Player controller: movement, shield and weapon fire

use glam::Vec3;
use rand::Rng;

use super::state::{Entity, EntityKind, GameEvent, GameState};
use super::tick::TickInput;
use crate::consts::*;
use crate::settings::Movement;

/// Apply movement for one tick
///
/// `held` is the current input, `pressed` only the rising edges.
pub fn move_player(state: &mut GameState, held: &TickInput, pressed: &TickInput, dt: f32) {
    match state.rules.movement {
        Movement::Continuous => {
            let mut dx = 0.0;
            if held.left {
                dx -= PLAYER_SPEED * dt;
            }
            if held.right {
                dx += PLAYER_SPEED * dt;
            }
            state.player.pos.x = (state.player.pos.x + dx).clamp(-PLAYER_X_LIMIT, PLAYER_X_LIMIT);
        }
        Movement::Lanes => {
            let last = state.lanes.len().saturating_sub(1);
            let lane = state.player.lane;
            let target = if pressed.left && !pressed.right {
                lane.saturating_sub(1)
            } else if pressed.right && !pressed.left {
                (lane + 1).min(last)
            } else {
                lane
            };
            if target != lane {
                state.player.lane = target;
                state.player.pos.x = state.lanes[target];
                kick_dust(state);
            }
        }
    }
}

/// Raise the shield on a key edge, then count its timers down
pub fn update_shield(state: &mut GameState, pressed: &TickInput) {
    if pressed.shield && state.player.shield.activate() {
        log::debug!("Shield up");
        state.events.push(GameEvent::ShieldRaised);
    }
    if state.player.shield.update() {
        log::debug!("Shield down, cooling");
        state.events.push(GameEvent::ShieldExpired);
    }
}

/// Count down flash and boost timers
pub fn update_timers(state: &mut GameState) {
    let player = &mut state.player;
    player.flash_ticks = player.flash_ticks.saturating_sub(1);
    player.boost_ticks = player.boost_ticks.saturating_sub(1);
}

/// Fire one projectile on the fire edge
pub fn fire(state: &mut GameState, pressed: &TickInput) -> bool {
    if !state.rules.weapons || !pressed.fire {
        return false;
    }
    let id = state.next_entity_id();
    let pos = state.player.pos - Vec3::Z;
    state.projectiles.push(Entity::new(
        id,
        EntityKind::Bullet,
        pos,
        Vec3::new(0.0, 0.0, -PROJECTILE_SPEED),
        0.1,
    ));
    true
}

/// Cosmetic dust puff behind the player after a lane hop
fn kick_dust(state: &mut GameState) {
    for _ in 0..DUST_PER_STEP {
        let id = state.next_entity_id();
        let vel = Vec3::new(
            state.rng.random_range(-1.0..1.0),
            state.rng.random_range(0.5..1.5),
            state.rng.random_range(1.0..2.0),
        );
        let dust = Entity::new(id, EntityKind::Dust, state.player.pos, vel, 0.15)
            .with_ttl(DUST_TTL_TICKS);
        state.debris.push(dust);
    }
}
