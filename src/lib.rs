//! Astrolane - asteroid dodger and lane runner arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, modes, scoring)
//! - `driver`: Fixed timestep loop the host owns
//! - `bridge`: One-way push of HUD/scene snapshots to the presentation layer
//! - `assets`: Asset load gate with fallback tracking
//! - `highscores`: Single persisted high score slot
//! - `settings`: Variant, difficulty and cosmetic preferences

pub mod assets;
pub mod bridge;
pub mod driver;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetGate, AssetHandle};
pub use bridge::{Banner, HudFrame, Presenter, SceneView};
pub use driver::Driver;
pub use highscores::HighScore;
pub use settings::{Difficulty, Settings, Variant};

/// Game configuration constants
///
/// Rates are in units per second and timers in ticks at `SIM_DT`.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Ticks per second, used for HUD second countdowns
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Player defaults
    pub const INITIAL_HEALTH: u32 = 3;
    pub const MAX_HEALTH: u32 = 5;
    /// Continuous movement speed (0.2 per frame)
    pub const PLAYER_SPEED: f32 = 12.0;
    /// Continuous movement clamp, symmetric around 0
    pub const PLAYER_X_LIMIT: f32 = 5.0;
    /// Player hitbox half extents (box policy)
    pub const PLAYER_HALF_EXTENTS: [f32; 3] = [0.5, 0.5, 0.75];
    /// Player hit radius (radius policy)
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const DAMAGE_FLASH_TICKS: u32 = 12;

    /// Shield timings
    pub const SHIELD_DURATION_TICKS: u32 = 300;
    pub const SHIELD_COOLDOWN_TICKS: u32 = 600;
    /// Extra hit radius while shielded (widen policy)
    pub const SHIELD_RADIUS_BONUS: f32 = 0.7;

    /// Lanes
    pub const LANE_SPACING: f32 = 2.0;
    /// Lanes asteroids fall in for the continuous variants
    pub const ASTEROID_LANE_COUNT: usize = 5;

    /// Playfield depth bounds
    pub const SPAWN_Z: f32 = -100.0;
    pub const OBSTACLE_DESPAWN_Z: f32 = 5.0;
    pub const PROJECTILE_DESPAWN_Z: f32 = -30.0;

    /// Spawn cadence
    pub const SPAWN_INTERVAL_BASE: u32 = 60;
    pub const SPAWN_INTERVAL_SCORE_STEP: u64 = 500;

    /// Obstacle speed curve: base + min(factor * score, cap) + jitter
    pub const OBSTACLE_BASE_SPEED: f32 = 4.8;
    pub const OBSTACLE_SPEED_FACTOR: f32 = 0.012;
    pub const OBSTACLE_SPEED_CAP: f32 = 25.2;
    pub const OBSTACLE_SPEED_JITTER: f32 = 3.0;
    pub const OBSTACLE_MIN_SIZE: f32 = 0.5;
    pub const OBSTACLE_SIZE_RANGE: f32 = 0.5;

    /// Boss rules
    pub const BOSS_LEVEL_PERIOD: u32 = 5;
    pub const BOSS_PROGRESS_THRESHOLD: u32 = 90;
    pub const BOSS_SIZE: f32 = 2.5;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 48.0;
    pub const PROJECTILE_HIT_RADIUS: f32 = 1.0;
    pub const KILL_BONUS: u64 = 50;
    pub const BOSS_BONUS_PER_LEVEL: u64 = 100;

    /// Cosmetic particles
    pub const DEBRIS_PER_EXPLOSION: usize = 8;
    pub const DEBRIS_TTL_TICKS: u32 = 30;
    pub const DEBRIS_SPEED: f32 = 6.0;
    pub const DUST_PER_STEP: usize = 3;
    pub const DUST_TTL_TICKS: u32 = 20;

    /// Pickup thresholds (axis separated)
    pub const PICKUP_HALF_WIDTH: f32 = 0.8;
    pub const PICKUP_HALF_DEPTH: f32 = 1.0;
    /// Chance that a lane spawn also places a power-up
    pub const POWER_UP_CHANCE: f64 = 0.15;
    pub const MOUNT_POINTS_FOR_UPGRADE: u32 = 3;
    pub const SPEED_BOOST_TICKS: u32 = 300;
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;

    /// Scoring and progression
    pub const LEVEL_SCORE: u64 = 1000;
    pub const DISTANCE_SCALE: f64 = 1000.0;

    /// Mode timings
    pub const GAME_OVER_DELAY_TICKS: u32 = 180;
    pub const TRANSITION_EPSILON: f32 = 0.01;
    /// Fraction of remaining camera distance kept per 60 Hz frame
    pub const TRANSITION_RETAIN: f32 = 0.95;
    pub const MENU_ORBIT_SPEED: f32 = 0.3;
}

/// Evenly spaced lane offsets centred on zero
///
/// Five lanes gives `[-4, -2, 0, 2, 4]`.
pub fn lane_offsets(count: usize) -> Vec<f32> {
    let count = count.max(1);
    let mid = (count - 1) as f32 / 2.0;
    (0..count)
        .map(|i| (i as f32 - mid) * consts::LANE_SPACING)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_offsets_five() {
        assert_eq!(lane_offsets(5), vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_lane_offsets_even_count_is_centred() {
        let lanes = lane_offsets(10);
        assert_eq!(lanes.len(), 10);
        assert!((lanes[0] + lanes[9]).abs() < 1e-6);
        assert!((lanes[1] - lanes[0] - consts::LANE_SPACING).abs() < 1e-6);
    }

    #[test]
    fn test_lane_offsets_never_empty() {
        assert_eq!(lane_offsets(0), vec![0.0]);
    }
}
