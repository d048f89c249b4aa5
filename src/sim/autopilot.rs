//! Idle/demo AI that plays the game
//!
//! Produces the same `TickInput` a player would, so attract mode and the
//! headless native host run through the normal tick path.

use super::state::{GameState, Mode};
use super::tick::TickInput;
use crate::settings::Movement;

/// How close in x an obstacle must be to count as in a lane
const LANE_TOLERANCE: f32 = 1.0;
/// Seconds to impact below which the shield goes up
const SHIELD_PANIC_SECS: f32 = 0.3;

/// Distance ahead of `x` to the nearest obstacle in that column (None = clear)
fn clearance(state: &GameState, x: f32) -> Option<f32> {
    let player_z = state.player.pos.z;
    state
        .obstacles
        .iter()
        .filter(|o| o.pos.z < player_z + 1.0 && (o.pos.x - x).abs() < o.size + LANE_TOLERANCE)
        .map(|o| player_z - o.pos.z)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Lane with the most room ahead, preferring the nearest one on ties
fn safest_lane(state: &GameState) -> Option<usize> {
    let player_x = state.player.pos.x;
    let score = |i: usize| clearance(state, state.lanes[i]).unwrap_or(f32::INFINITY);
    (0..state.lanes.len()).max_by(|&a, &b| {
        score(a)
            .partial_cmp(&score(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let da = (state.lanes[a] - player_x).abs();
                let db = (state.lanes[b] - player_x).abs();
                db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
            })
    })
}

/// Pick the input for this tick
pub fn autopilot(state: &GameState) -> TickInput {
    let prev = state.prev_input;
    let mut input = TickInput::default();

    match state.mode {
        Mode::Menu | Mode::Selection { .. } => {
            input.confirm = !prev.confirm;
        }
        Mode::Playing => {
            let player = &state.player;
            let Some(danger) = clearance(state, player.pos.x) else {
                return input;
            };

            if let Some(lane) = safest_lane(state) {
                let target_x = state.lanes[lane];
                match state.rules.movement {
                    Movement::Continuous => {
                        input.left = target_x < player.pos.x - 0.1;
                        input.right = target_x > player.pos.x + 0.1;
                    }
                    Movement::Lanes => {
                        input.left = lane < player.lane && !prev.left;
                        input.right = lane > player.lane && !prev.right;
                    }
                }
            }

            if state.rules.weapons {
                input.fire = !prev.fire;
            }

            let closing = state
                .obstacles
                .iter()
                .map(|o| o.vel.z)
                .fold(0.1_f32, f32::max);
            if danger / closing < SHIELD_PANIC_SECS && player.shield.ready() {
                input.shield = true;
            }
        }
        Mode::Loading | Mode::Transitioning | Mode::Paused | Mode::GameOver { .. } => {}
    }

    input
}
