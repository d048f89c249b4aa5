//! Scoring and level progression

use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Level for a score, starting at 1
pub fn level_for(score: u64) -> u32 {
    (score / LEVEL_SCORE) as u32 + 1
}

/// Progress through the current level on a 0-99 scale
pub fn level_progress(score: u64) -> u32 {
    ((score % LEVEL_SCORE) / (LEVEL_SCORE / 100)) as u32
}

/// Distance shown on the HUD, in km
pub fn distance_km(score: u64) -> f64 {
    score as f64 / DISTANCE_SCALE
}

/// Award points and fire a level-up notification if the level changed
pub fn add_score(state: &mut GameState, points: u64) {
    state.run.score = state.run.score.saturating_add(points);
    let level = level_for(state.run.score);
    if level > state.run.level {
        state.run.level = level;
        log::info!("Level {} reached", level);
        state.events.push(GameEvent::LevelUp(level));
    }
}

/// Per-tick survival score
pub fn tick_score(state: &mut GameState) {
    let points = if state.player.boosted() { 2 } else { 1 };
    add_score(state, points);
}
