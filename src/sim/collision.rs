//! Collision detection and resolution
//!
//! Geometry tests are free functions; the `resolve_*` passes mutate the
//! entity collections in place. Collections are walked in reverse index order
//! so `Vec::remove` never skips an element.

use glam::Vec3;
use rand::Rng;

use super::progression::add_score;
use super::state::{Entity, EntityKind, GameEvent, GameState, Mode, Upgrade};
use crate::consts::*;
use crate::settings::{Hitbox, ShieldPolicy};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }
}

/// Euclidean proximity test
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Separate lateral/depth thresholds
#[inline]
pub fn within_axes(a: Vec3, b: Vec3, half_width: f32, half_depth: f32) -> bool {
    (a.x - b.x).abs() < half_width && (a.z - b.z).abs() < half_depth
}

fn obstacle_box(entity: &Entity) -> Aabb {
    Aabb::from_center(entity.pos, Vec3::splat(entity.size))
}

/// Does the player touch this obstacle under the variant's policy?
pub fn player_hits(state: &GameState, obstacle: &Entity) -> bool {
    let player = &state.player;
    match state.rules.hitbox {
        Hitbox::Box => {
            let player_box = Aabb::from_center(player.pos, Vec3::from(PLAYER_HALF_EXTENTS));
            player_box.intersects(&obstacle_box(obstacle))
        }
        Hitbox::Radius => {
            let mut radius = PLAYER_RADIUS + obstacle.size;
            if player.shield.active && state.rules.shield == ShieldPolicy::Widen {
                radius += SHIELD_RADIUS_BONUS;
            }
            within_radius(player.pos, obstacle.pos, radius)
        }
        Hitbox::Axis => within_axes(player.pos, obstacle.pos, PICKUP_HALF_WIDTH, PICKUP_HALF_DEPTH),
    }
}

/// Does this projectile strike the obstacle?
pub fn projectile_hits(hitbox: Hitbox, projectile: &Entity, obstacle: &Entity) -> bool {
    match hitbox {
        Hitbox::Box => obstacle_box(obstacle).contains_point(projectile.pos),
        Hitbox::Radius | Hitbox::Axis => within_radius(
            projectile.pos,
            obstacle.pos,
            PROJECTILE_HIT_RADIUS.max(obstacle.size),
        ),
    }
}

/// Player against every obstacle
///
/// Returns the number of obstacles consumed. Stops evaluating once health
/// runs out so game over is entered exactly once.
pub fn resolve_player_obstacles(state: &mut GameState) -> usize {
    let mut consumed = 0;
    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;
        if !player_hits(state, &state.obstacles[i]) {
            continue;
        }
        state.obstacles.remove(i);
        consumed += 1;

        if state.player.shield.active {
            state.events.push(GameEvent::ShieldAbsorbed);
            continue;
        }

        state.player.health = state.player.health.saturating_sub(1);
        if state.flash {
            state.player.flash_ticks = DAMAGE_FLASH_TICKS;
        }
        state.events.push(GameEvent::Damaged {
            health: state.player.health,
        });
        log::debug!("Player hit, health {}", state.player.health);

        if state.player.health == 0 {
            enter_game_over(state);
            break;
        }
    }
    consumed
}

/// Record the final score and switch to `GameOver`
pub fn enter_game_over(state: &mut GameState) {
    if state.mode != Mode::Playing {
        return;
    }
    let score = state.run.score;
    if score > state.run.high_score {
        state.run.high_score = score;
        log::info!("New high score {}", score);
        state.events.push(GameEvent::NewHighScore(score));
    }
    state.events.push(GameEvent::GameOver { score });
    state.set_mode(Mode::GameOver {
        ticks_left: GAME_OVER_DELAY_TICKS,
    });
}

/// Projectiles against obstacles, at most one hit per projectile
///
/// Returns the number of obstacles destroyed.
pub fn resolve_projectiles(state: &mut GameState) -> usize {
    let mut destroyed = 0;
    let hitbox = state.rules.hitbox;
    let mut p = state.projectiles.len();
    while p > 0 {
        p -= 1;
        let target = state
            .obstacles
            .iter()
            .rposition(|o| projectile_hits(hitbox, &state.projectiles[p], o));
        let Some(o) = target else {
            continue;
        };

        state.projectiles.remove(p);
        if !state.obstacles[o].hit() {
            continue;
        }

        let obstacle = state.obstacles.remove(o);
        let bonus = if obstacle.is_boss() {
            BOSS_BONUS_PER_LEVEL * state.run.level as u64
        } else {
            KILL_BONUS
        };
        add_score(state, bonus);
        explode(state, obstacle.pos);
        state.events.push(GameEvent::ObstacleDestroyed {
            id: obstacle.id,
            bonus,
        });
        destroyed += 1;
    }
    destroyed
}

/// Spawn one batch of explosion debris
pub fn explode(state: &mut GameState, at: Vec3) {
    for _ in 0..DEBRIS_PER_EXPLOSION {
        let dir = Vec3::new(
            state.rng.random_range(-1.0..1.0),
            state.rng.random_range(-1.0..1.0),
            state.rng.random_range(-1.0..1.0),
        )
        .normalize_or(Vec3::Y);
        let id = state.next_entity_id();
        let shard = Entity::new(id, EntityKind::Debris, at, dir * DEBRIS_SPEED, 0.2)
            .with_ttl(DEBRIS_TTL_TICKS)
            .with_spin(dir * 4.0);
        state.debris.push(shard);
    }
}

/// Player against power-ups; every third pickup grants an upgrade
pub fn resolve_power_ups(state: &mut GameState) -> usize {
    let mut collected = 0;
    let mut i = state.power_ups.len();
    while i > 0 {
        i -= 1;
        if !within_axes(
            state.player.pos,
            state.power_ups[i].pos,
            PICKUP_HALF_WIDTH,
            PICKUP_HALF_DEPTH,
        ) {
            continue;
        }
        state.power_ups.remove(i);
        collected += 1;

        let player = &mut state.player;
        player.mount_points += 1;
        state.events.push(GameEvent::PowerUpCollected {
            mount_points: player.mount_points,
        });

        if player.mount_points >= MOUNT_POINTS_FOR_UPGRADE {
            player.mount_points = 0;
            let upgrade = if player.health < MAX_HEALTH {
                player.health += 1;
                Upgrade::ExtraLife
            } else {
                player.boost_ticks = SPEED_BOOST_TICKS;
                Upgrade::SpeedBoost
            };
            log::info!("Upgrade granted: {:?}", upgrade);
            state.events.push(GameEvent::UpgradeGranted(upgrade));
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, Variant};

    fn playing(variant: Variant) -> GameState {
        let settings = Settings {
            variant,
            ..Default::default()
        };
        let mut state = GameState::new(&settings, 3, 0);
        state.mode = Mode::Playing;
        state
    }

    fn rock(state: &mut GameState, pos: Vec3, health: u32) {
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Entity::new(id, EntityKind::Asteroid, pos, Vec3::Z, 0.6).with_health(health));
    }

    fn bullet(state: &mut GameState, pos: Vec3) {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Entity::new(id, EntityKind::Bullet, pos, -Vec3::Z, 0.1));
    }

    #[test]
    fn test_aabb() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center(Vec3::new(1.5, 0.0, 0.0), Vec3::ONE);
        let c = Aabb::from_center(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains_point(Vec3::new(0.9, -0.9, 0.0)));
        assert!(!a.contains_point(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_widen_policy_grows_radius() {
        let mut state = playing(Variant::Siege);
        rock(&mut state, Vec3::new(1.5, 0.0, 0.0), 1);
        assert!(!player_hits(&state, &state.obstacles[0]));
        state.player.shield.activate();
        assert!(player_hits(&state, &state.obstacles[0]));
    }

    #[test]
    fn test_hit_decrements_health_and_flashes() {
        let mut state = playing(Variant::Dodger);
        rock(&mut state, Vec3::new(0.3, 0.0, 0.2), 1);
        assert_eq!(resolve_player_obstacles(&mut state), 1);
        assert_eq!(state.player.health, INITIAL_HEALTH - 1);
        assert_eq!(state.player.flash_ticks, DAMAGE_FLASH_TICKS);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_shield_absorbs_two_hits_in_one_tick() {
        let mut state = playing(Variant::Dodger);
        state.player.shield.activate();
        rock(&mut state, Vec3::new(0.2, 0.0, 0.0), 1);
        rock(&mut state, Vec3::new(-0.2, 0.0, 0.5), 1);
        rock(&mut state, Vec3::new(4.0, 0.0, -50.0), 1);

        assert_eq!(resolve_player_obstacles(&mut state), 2);
        assert_eq!(state.player.health, 3);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(
            state
                .events
                .iter()
                .filter(|e| **e == GameEvent::ShieldAbsorbed)
                .count(),
            2
        );
    }

    #[test]
    fn test_last_hit_ends_run_once() {
        let mut state = playing(Variant::Dodger);
        state.player.health = 1;
        state.run.score = 700;
        state.run.high_score = 500;
        rock(&mut state, Vec3::ZERO, 1);
        rock(&mut state, Vec3::new(0.1, 0.0, 0.0), 1);

        resolve_player_obstacles(&mut state);
        assert_eq!(state.player.health, 0);
        assert!(matches!(state.mode, Mode::GameOver { .. }));
        assert_eq!(state.run.high_score, 700);
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // A second pass cannot re-enter game over or underflow health
        resolve_player_obstacles(&mut state);
        assert_eq!(state.player.health, 0);
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_high_score_kept_when_not_beaten() {
        let mut state = playing(Variant::Dodger);
        state.run.score = 100;
        state.run.high_score = 500;
        enter_game_over(&mut state);
        assert_eq!(state.run.high_score, 500);
        assert!(!state.events.contains(&GameEvent::NewHighScore(100)));
    }

    #[test]
    fn test_projectile_kill_awards_bonus_and_debris() {
        let mut state = playing(Variant::Siege);
        rock(&mut state, Vec3::new(0.0, 0.0, -10.0), 1);
        bullet(&mut state, Vec3::new(0.3, 0.0, -10.2));

        assert_eq!(resolve_projectiles(&mut state), 1);
        assert_eq!(state.run.score, KILL_BONUS);
        assert_eq!(state.debris.len(), DEBRIS_PER_EXPLOSION);
        assert!(state.obstacles.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_every_kill_explodes_regardless_of_effects() {
        for (variant, effects) in [
            (Variant::Dodger, true),
            (Variant::Dodger, false),
            (Variant::Siege, false),
        ] {
            let settings = Settings {
                variant,
                effects,
                ..Default::default()
            };
            let mut state = GameState::new(&settings, 3, 0);
            state.mode = Mode::Playing;
            rock(&mut state, Vec3::new(0.0, 0.0, -10.0), 1);
            bullet(&mut state, Vec3::new(0.0, 0.0, -10.0));

            assert_eq!(resolve_projectiles(&mut state), 1);
            assert_eq!(state.run.score, KILL_BONUS);
            assert_eq!(state.debris.len(), DEBRIS_PER_EXPLOSION, "{:?}", variant);
            assert!(
                state
                    .debris
                    .iter()
                    .all(|d| d.kind == EntityKind::Debris && d.ttl == Some(DEBRIS_TTL_TICKS))
            );
        }
    }

    #[test]
    fn test_projectile_consumed_when_target_survives() {
        let mut state = playing(Variant::Siege);
        rock(&mut state, Vec3::new(0.0, 0.0, -10.0), 3);
        bullet(&mut state, Vec3::new(0.0, 0.0, -10.0));

        assert_eq!(resolve_projectiles(&mut state), 0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.obstacles[0].health, 2);
        assert_eq!(state.run.score, 0);
    }

    #[test]
    fn test_one_hit_per_projectile() {
        let mut state = playing(Variant::Dodger);
        rock(&mut state, Vec3::new(0.0, 0.0, -10.0), 1);
        rock(&mut state, Vec3::new(0.1, 0.0, -10.0), 1);
        bullet(&mut state, Vec3::new(0.05, 0.0, -10.0));

        assert_eq!(resolve_projectiles(&mut state), 1);
        assert_eq!(state.obstacles.len(), 1);
        // Reverse order: the later rock takes the hit
        assert_eq!(state.obstacles[0].pos.x, 0.0);
    }

    #[test]
    fn test_boss_bonus_scales_with_level() {
        let mut state = playing(Variant::Siege);
        state.run.level = 5;
        state.run.score = 4950;
        let id = state.next_entity_id();
        state.obstacles.push(Entity::new(
            id,
            EntityKind::Boss,
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::Z,
            BOSS_SIZE,
        ));
        bullet(&mut state, Vec3::new(1.0, 0.0, -10.0));
        resolve_projectiles(&mut state);
        assert_eq!(state.run.score, 4950 + 500);
    }

    #[test]
    fn test_third_pickup_grants_extra_life() {
        let mut state = playing(Variant::Runner);
        for _ in 0..MOUNT_POINTS_FOR_UPGRADE {
            let id = state.next_entity_id();
            state.power_ups.push(Entity::new(
                id,
                EntityKind::PowerUp,
                Vec3::new(0.0, 0.0, 0.5),
                Vec3::Z,
                0.4,
            ));
        }
        assert_eq!(resolve_power_ups(&mut state), 3);
        assert_eq!(state.player.mount_points, 0);
        assert_eq!(state.player.health, INITIAL_HEALTH + 1);
        assert!(state.events.contains(&GameEvent::UpgradeGranted(Upgrade::ExtraLife)));
    }

    #[test]
    fn test_full_health_pickup_boosts() {
        let mut state = playing(Variant::Runner);
        state.player.health = MAX_HEALTH;
        state.player.mount_points = MOUNT_POINTS_FOR_UPGRADE - 1;
        let id = state.next_entity_id();
        state.power_ups.push(Entity::new(
            id,
            EntityKind::PowerUp,
            Vec3::ZERO,
            Vec3::Z,
            0.4,
        ));
        resolve_power_ups(&mut state);
        assert_eq!(state.player.boost_ticks, SPEED_BOOST_TICKS);
        assert_eq!(state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_pickup_ignores_adjacent_lane() {
        let mut state = playing(Variant::Runner);
        let id = state.next_entity_id();
        state.power_ups.push(Entity::new(
            id,
            EntityKind::PowerUp,
            Vec3::new(LANE_SPACING, 0.0, 0.0),
            Vec3::Z,
            0.4,
        ));
        assert_eq!(resolve_power_ups(&mut state), 0);
        assert_eq!(state.power_ups.len(), 1);
    }
}
