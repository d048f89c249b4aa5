//! Obstacle spawning
//!
//! Cadence, lane choice and stat rolls all scale with score/level and draw
//! from the run's seeded RNG.

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::progression::level_progress;
use super::state::{Entity, EntityKind, GameEvent, GameState};
use crate::consts::*;
use crate::settings::{Difficulty, Movement};

/// Ticks between spawns for a score, never below the difficulty floor
pub fn spawn_interval(score: u64, difficulty: Difficulty) -> u32 {
    let step = (score / SPAWN_INTERVAL_SCORE_STEP).min(SPAWN_INTERVAL_BASE as u64) as u32;
    SPAWN_INTERVAL_BASE
        .saturating_sub(step)
        .max(difficulty.spawn_floor())
}

/// Obstacle speed: base + min(factor * score, cap) + jitter
pub fn obstacle_speed(score: u64, rng: &mut Pcg32) -> f32 {
    let scaled = (OBSTACLE_SPEED_FACTOR * score as f32).min(OBSTACLE_SPEED_CAP);
    OBSTACLE_BASE_SPEED + scaled + rng.random::<f32>() * OBSTACLE_SPEED_JITTER
}

/// Hits needed to destroy an asteroid of this size
pub fn health_for_size(size: f32) -> u32 {
    if size < 0.65 {
        1
    } else if size < 0.85 {
        2
    } else {
        3
    }
}

/// Boss stats for a level: (health, speed)
pub fn boss_stats(level: u32) -> (u32, f32) {
    (10 + 2 * level, 2.4 + 0.1 * level as f32)
}

/// Whether the next spawn should be a boss
pub fn boss_due(state: &GameState) -> bool {
    let level = state.run.level;
    state.rules.bosses
        && level % BOSS_LEVEL_PERIOD == 0
        && level_progress(state.run.score) >= BOSS_PROGRESS_THRESHOLD
        && state.run.boss_level != Some(level)
        && !state.boss_alive()
}

/// Advance the spawn counter and create entities when it runs past the interval
///
/// Returns the number of obstacles created this tick.
pub fn try_spawn(state: &mut GameState) -> usize {
    state.run.spawn_counter += 1;
    if state.run.spawn_counter <= spawn_interval(state.run.score, state.run.difficulty) {
        return 0;
    }
    state.run.spawn_counter = 0;

    if boss_due(state) {
        spawn_boss(state);
        return 1;
    }

    let count = if state.rules.rows {
        state.rng.random_range(1..state.lanes.len().max(2))
    } else {
        1
    };
    spawn_row(state, count)
}

fn spawn_boss(state: &mut GameState) {
    let level = state.run.level;
    let (health, speed) = boss_stats(level);
    let id = state.next_entity_id();
    let boss = Entity::new(
        id,
        EntityKind::Boss,
        Vec3::new(0.0, 0.0, SPAWN_Z),
        Vec3::new(0.0, 0.0, speed),
        BOSS_SIZE,
    )
    .with_health(health)
    .with_spin(Vec3::new(0.0, 0.3, 0.0));
    state.obstacles.push(boss);
    state.run.boss_level = Some(level);
    log::info!("Boss incoming at level {} ({} hp)", level, health);
    state.events.push(GameEvent::BossIncoming(level));
}

/// Spawn `count` obstacles in distinct random lanes
fn spawn_row(state: &mut GameState, count: usize) -> usize {
    let mut lanes: Vec<usize> = (0..state.lanes.len()).collect();
    lanes.shuffle(&mut state.rng);
    let count = count.min(lanes.len());
    let (taken, free) = lanes.split_at(count);

    let kind = match state.rules.movement {
        Movement::Continuous => EntityKind::Asteroid,
        Movement::Lanes => EntityKind::Obstacle,
    };
    let speed = obstacle_speed(state.run.score, &mut state.rng);

    for &lane in taken {
        let size = OBSTACLE_MIN_SIZE + state.rng.random::<f32>() * OBSTACLE_SIZE_RANGE;
        let health = if state.rules.sized_health {
            health_for_size(size)
        } else {
            1
        };
        let spin = Vec3::new(
            state.rng.random_range(-0.6..0.6),
            state.rng.random_range(-0.6..0.6),
            state.rng.random_range(-0.6..0.6),
        );
        let id = state.next_entity_id();
        let entity = Entity::new(
            id,
            kind,
            Vec3::new(state.lanes[lane], 0.0, SPAWN_Z),
            Vec3::new(0.0, 0.0, speed),
            size,
        )
        .with_health(health)
        .with_spin(spin);
        log::debug!("Spawned {:?} {} in lane {} at speed {:.2}", kind, id, lane, speed);
        state.obstacles.push(entity);
    }

    if state.rules.power_ups && !free.is_empty() && state.rng.random_bool(POWER_UP_CHANCE) {
        let lane = free[state.rng.random_range(0..free.len())];
        let id = state.next_entity_id();
        state.power_ups.push(Entity::new(
            id,
            EntityKind::PowerUp,
            Vec3::new(state.lanes[lane], 0.0, SPAWN_Z),
            Vec3::new(0.0, 0.0, speed),
            0.4,
        ));
    }

    count
}
