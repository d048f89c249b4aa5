//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context; nothing lives in globals.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tick::TickInput;
use crate::assets::AssetGate;
use crate::consts::*;
use crate::lane_offsets;
use crate::settings::{Difficulty, Movement, Rules, Settings, Variant};

/// Top-level phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Waiting for outstanding asset loads to settle
    Loading,
    /// Title screen with idle camera orbit
    Menu,
    /// Cycling through the roster
    Selection { index: usize },
    /// Camera flying from the menu pose to the play pose
    Transitioning,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended, returns to menu when the countdown runs out
    GameOver { ticks_left: u32 },
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Loading => "loading",
            Mode::Menu => "menu",
            Mode::Selection { .. } => "selection",
            Mode::Transitioning => "transitioning",
            Mode::Playing => "playing",
            Mode::Paused => "paused",
            Mode::GameOver { .. } => "gameover",
        }
    }
}

/// Entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Asteroid,
    Boss,
    Bullet,
    Debris,
    Dust,
    Obstacle,
    PowerUp,
}

/// A transient simulated object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    /// Remaining ticks for cosmetic particles
    pub ttl: Option<u32>,
    /// Cosmetic tumble (radians per second)
    pub spin: Vec3,
    pub rotation: Vec3,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec3, vel: Vec3, size: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            size,
            health: 1,
            max_health: 1,
            ttl: None,
            spin: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.max(1);
        self.max_health = self.health;
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_spin(mut self, spin: Vec3) -> Self {
        self.spin = spin;
        self
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EntityKind::Boss
    }

    /// Move by velocity * dt (scaled), tumble, and count down ttl
    ///
    /// Returns false once a ttl has run out.
    pub fn advance(&mut self, dt: f32, scale: f32) -> bool {
        self.pos += self.vel * dt * scale;
        self.rotation += self.spin * dt;
        match self.ttl.as_mut() {
            Some(ttl) => {
                *ttl = ttl.saturating_sub(1);
                *ttl > 0
            }
            None => true,
        }
    }

    /// Apply one point of damage, returns true if destroyed
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}

/// Shield timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub active: bool,
    /// Ticks left while active
    pub timer: u32,
    /// Ticks left before it can be raised again
    pub cooldown: u32,
}

impl Shield {
    pub fn ready(&self) -> bool {
        !self.active && self.cooldown == 0
    }

    /// Raise the shield if ready
    pub fn activate(&mut self) -> bool {
        if !self.ready() {
            return false;
        }
        self.active = true;
        self.timer = SHIELD_DURATION_TICKS;
        true
    }

    /// Count down one tick, returns true on the tick the shield drops
    pub fn update(&mut self) -> bool {
        if self.active {
            self.timer = self.timer.saturating_sub(1);
            if self.timer == 0 {
                self.active = false;
                self.cooldown = SHIELD_COOLDOWN_TICKS;
                return true;
            }
        } else if self.cooldown > 0 {
            self.cooldown -= 1;
        }
        false
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Lane index (lane variants only)
    pub lane: usize,
    /// Selected roster entry
    pub skin: usize,
    pub shield: Shield,
    pub health: u32,
    /// Damage flash countdown
    pub flash_ticks: u32,
    pub mount_points: u32,
    pub boost_ticks: u32,
}

impl Player {
    pub fn new(lanes: &[f32]) -> Self {
        let mut player = Self {
            pos: Vec3::ZERO,
            lane: 0,
            skin: 0,
            shield: Shield::default(),
            health: INITIAL_HEALTH,
            flash_ticks: 0,
            mount_points: 0,
            boost_ticks: 0,
        };
        player.reset(lanes);
        player
    }

    /// Restore round defaults, keeping the chosen skin
    pub fn reset(&mut self, lanes: &[f32]) {
        self.lane = lanes.len() / 2;
        self.pos = Vec3::new(lanes.get(self.lane).copied().unwrap_or(0.0), 0.0, 0.0);
        self.shield = Shield::default();
        self.health = INITIAL_HEALTH;
        self.flash_ticks = 0;
        self.mount_points = 0;
        self.boost_ticks = 0;
    }

    pub fn boosted(&self) -> bool {
        self.boost_ticks > 0
    }
}

/// Per-run counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub level: u32,
    pub spawn_counter: u32,
    pub difficulty: Difficulty,
    /// Best score so far (loaded from and written back to persistence by the host)
    pub high_score: u64,
    /// Level the last boss was spawned on
    pub boss_level: Option<u32>,
    /// Ticks spent in Playing this run
    pub ticks: u64,
}

impl RunState {
    pub fn new(difficulty: Difficulty, high_score: u64) -> Self {
        Self {
            score: 0,
            level: 1,
            spawn_counter: 0,
            difficulty,
            high_score,
            boss_level: None,
            ticks: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.difficulty, self.high_score);
    }
}

/// Camera pose on the title screen
pub const MENU_CAMERA: Vec3 = Vec3::new(0.0, 6.0, 16.0);
/// Camera pose during play
pub const PLAY_CAMERA: Vec3 = Vec3::new(0.0, 2.0, 8.0);

/// Camera state
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec3,
    /// Menu orbit angle (radians)
    pub orbit: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: MENU_CAMERA,
            orbit: 0.0,
        }
    }
}

/// Temporary upgrades granted by mount points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    ExtraLife,
    SpeedBoost,
}

/// One-shot notifications produced during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ModeChanged { from: Mode, to: Mode },
    LevelUp(u32),
    BossIncoming(u32),
    Damaged { health: u32 },
    ShieldAbsorbed,
    ShieldRaised,
    ShieldExpired,
    ObstacleDestroyed { id: u32, bonus: u64 },
    PowerUpCollected { mount_points: u32 },
    UpgradeGranted(Upgrade),
    NewHighScore(u64),
    GameOver { score: u64 },
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub variant: Variant,
    pub rules: Rules,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub mode: Mode,
    pub player: Player,
    pub run: RunState,
    /// Asteroids, lane obstacles and bosses
    pub obstacles: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    /// Explosion debris and dust (cosmetic)
    pub debris: Vec<Entity>,
    pub power_ups: Vec<Entity>,
    pub camera: Camera,
    /// Lateral offsets for spawning and lane movement
    pub lanes: Vec<f32>,
    /// Draw debris/dust particles (they are simulated either way)
    pub effects: bool,
    /// Damage flash and menu orbit
    pub flash: bool,
    pub assets: AssetGate,
    /// Events from the last tick, drained by the host
    pub events: Vec<GameEvent>,
    /// Input held on the previous tick, for edge detection
    pub(crate) prev_input: TickInput,
    next_id: u32,
}

impl GameState {
    /// Create a new game state in `Loading`
    pub fn new(settings: &Settings, seed: u64, high_score: u64) -> Self {
        let rules = settings.variant.rules();
        let lanes = match rules.movement {
            Movement::Lanes => lane_offsets(settings.difficulty.lane_count()),
            Movement::Continuous => lane_offsets(ASTEROID_LANE_COUNT),
        };
        let player = Player::new(&lanes);

        Self {
            variant: settings.variant,
            rules,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: Mode::Loading,
            player,
            run: RunState::new(settings.difficulty, high_score),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            debris: Vec::new(),
            power_ups: Vec::new(),
            camera: Camera::default(),
            lanes,
            effects: settings.effects,
            flash: settings.effective_flash(),
            assets: AssetGate::new(),
            events: Vec::new(),
            prev_input: TickInput::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Switch mode, recording the transition
    pub fn set_mode(&mut self, to: Mode) {
        let from = self.mode;
        if from == to {
            return;
        }
        log::info!("Mode {} -> {}", from.as_str(), to.as_str());
        self.mode = to;
        self.events.push(GameEvent::ModeChanged { from, to });
    }

    /// Drop every transient entity
    pub fn clear_entities(&mut self) {
        self.obstacles.clear();
        self.projectiles.clear();
        self.debris.clear();
        self.power_ups.clear();
    }

    /// Start a fresh run: counters, player and collections back to defaults
    pub fn reset_run(&mut self) {
        self.clear_entities();
        self.run.reset();
        self.player.reset(&self.lanes);
    }

    pub fn boss_alive(&self) -> bool {
        self.obstacles.iter().any(Entity::is_boss)
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|e| e.id);
        self.debris.sort_by_key(|e| e.id);
        self.power_ups.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_cycle() {
        let mut shield = Shield::default();
        assert!(shield.activate());
        assert!(!shield.activate());
        for _ in 0..SHIELD_DURATION_TICKS - 1 {
            assert!(!shield.update());
        }
        assert!(shield.update());
        assert!(!shield.active);
        assert_eq!(shield.cooldown, SHIELD_COOLDOWN_TICKS);
        assert!(!shield.activate());

        for _ in 0..SHIELD_COOLDOWN_TICKS {
            shield.update();
        }
        assert!(shield.ready());
    }

    #[test]
    fn test_entity_ttl_expires() {
        let mut debris =
            Entity::new(1, EntityKind::Debris, Vec3::ZERO, Vec3::X, 0.1).with_ttl(2);
        assert!(debris.advance(SIM_DT, 1.0));
        assert!(!debris.advance(SIM_DT, 1.0));
        assert!(debris.pos.x > 0.0);
    }

    #[test]
    fn test_entity_hit_saturates() {
        let mut rock = Entity::new(1, EntityKind::Asteroid, Vec3::ZERO, Vec3::Z, 1.0).with_health(2);
        assert!(!rock.hit());
        assert!(rock.hit());
        assert!(rock.hit());
        assert_eq!(rock.health, 0);
    }

    #[test]
    fn test_new_state_starts_loading_in_centre_lane() {
        let settings = Settings {
            variant: Variant::Runner,
            ..Default::default()
        };
        let state = GameState::new(&settings, 7, 0);
        assert_eq!(state.mode, Mode::Loading);
        assert_eq!(state.lanes.len(), 5);
        assert_eq!(state.player.lane, 2);
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_set_mode_records_event_once() {
        let mut state = GameState::new(&Settings::default(), 1, 0);
        state.set_mode(Mode::Menu);
        state.set_mode(Mode::Menu);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ModeChanged {
                from: Mode::Loading,
                to: Mode::Menu
            }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_reset_run_keeps_high_score_and_skin() {
        let mut state = GameState::new(&Settings::default(), 1, 900);
        state.run.score = 5000;
        state.player.skin = 2;
        state.player.health = 1;
        state.reset_run();
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.high_score, 900);
        assert_eq!(state.player.skin, 2);
        assert_eq!(state.player.health, INITIAL_HEALTH);
    }
}
