//! Presentation bridge
//!
//! Turns the simulation state into plain snapshots (HUD strings, banners,
//! drawables) and pushes them one way to whatever draws them. Nothing here
//! is read back by the simulation.

use glam::Vec3;
use serde::Serialize;

use crate::assets::{AssetGate, AssetHandle};
use crate::consts::*;
use crate::settings::ROSTER;
use crate::sim::{
    Entity, EntityKind, GameEvent, GameState, Mode, Shield, Upgrade, distance_km, level_progress,
};

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudFrame {
    pub mode: &'static str,
    pub score: u64,
    pub high_score: u64,
    /// e.g. "1.2 km"
    pub distance: String,
    /// One heart per remaining health point
    pub hearts: String,
    pub shield: String,
    pub level: String,
    /// 0-99
    pub progress: u32,
    pub mount_points: u32,
    /// Roster entry shown on the selection screen / during play
    pub skin: Option<&'static str>,
    /// Player is flashing red
    pub flash: bool,
    pub asset_error: Option<String>,
}

impl HudFrame {
    pub fn from_state(state: &GameState) -> Self {
        let skin_index = match state.mode {
            Mode::Selection { index } => index,
            _ => state.player.skin,
        };
        let skin = if state.rules.roster > 0 {
            ROSTER.get(skin_index).copied()
        } else {
            None
        };

        Self {
            mode: state.mode.as_str(),
            score: state.run.score,
            high_score: state.run.high_score,
            distance: format_distance(state.run.score),
            hearts: "\u{2764}\u{fe0f}".repeat(state.player.health as usize),
            shield: shield_status(&state.player.shield),
            level: format!("LEVEL {}", state.run.level),
            progress: level_progress(state.run.score),
            mount_points: state.player.mount_points,
            skin,
            flash: state.player.flash_ticks > 0,
            asset_error: state.assets.error_text(),
        }
    }
}

pub fn format_distance(score: u64) -> String {
    format!("{:.1} km", distance_km(score))
}

/// Shield line: time left, cooldown left, or ready
pub fn shield_status(shield: &Shield) -> String {
    if shield.active {
        format!("SHIELD: {}s", shield.timer.div_ceil(TICKS_PER_SECOND))
    } else if shield.cooldown > 0 {
        format!("COOLDOWN: {}s", shield.cooldown.div_ceil(TICKS_PER_SECOND))
    } else {
        "SHIELD: READY".to_string()
    }
}

/// Transient notification banner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Banner {
    LevelUp(u32),
    BossIncoming(u32),
    Upgrade(Upgrade),
    NewHighScore(u64),
    GameOver { score: u64 },
}

impl Banner {
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::LevelUp(level) => Some(Banner::LevelUp(level)),
            GameEvent::BossIncoming(level) => Some(Banner::BossIncoming(level)),
            GameEvent::UpgradeGranted(upgrade) => Some(Banner::Upgrade(upgrade)),
            GameEvent::NewHighScore(score) => Some(Banner::NewHighScore(score)),
            GameEvent::GameOver { score } => Some(Banner::GameOver { score }),
            _ => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Banner::LevelUp(level) => format!("LEVEL {}!", level),
            Banner::BossIncoming(_) => "WARNING: BOSS INCOMING".to_string(),
            Banner::Upgrade(Upgrade::ExtraLife) => "EXTRA LIFE".to_string(),
            Banner::Upgrade(Upgrade::SpeedBoost) => "SPEED BOOST".to_string(),
            Banner::NewHighScore(score) => format!("NEW HIGH SCORE: {}", score),
            Banner::GameOver { score } => {
                format!("GAME OVER\nDistance: {}", format_distance(*score))
            }
        }
    }
}

/// Loaded model handles; `None` means the primitive is always used
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSlots {
    pub player: Option<AssetHandle>,
    pub obstacle: Option<AssetHandle>,
}

/// How a drawable should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Model {
    /// The loaded model behind this handle
    Loaded(AssetHandle),
    /// Model failed or is still pending, draw the fallback primitive
    Fallback,
    /// Always a primitive (bullets, particles, pickups)
    Primitive,
}

impl Model {
    fn resolve(gate: &AssetGate, slot: Option<AssetHandle>) -> Self {
        match slot {
            Some(handle) if !gate.uses_fallback(handle) => Model::Loaded(handle),
            Some(_) => Model::Fallback,
            None => Model::Primitive,
        }
    }
}

/// One object for the scene graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawable {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub rotation: Vec3,
    pub size: f32,
    pub model: Model,
}

/// Scene snapshot for one rendered frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub camera: Vec3,
    pub player_pos: Vec3,
    pub player_model: Model,
    pub shield: bool,
    pub drawables: Vec<Drawable>,
}

impl SceneView {
    pub fn from_state(state: &GameState, models: &ModelSlots) -> Self {
        let obstacle_model = Model::resolve(&state.assets, models.obstacle);
        let drawable = |e: &Entity| Drawable {
            id: e.id,
            kind: e.kind,
            pos: e.pos,
            rotation: e.rotation,
            size: e.size,
            model: match e.kind {
                EntityKind::Asteroid | EntityKind::Obstacle | EntityKind::Boss => obstacle_model,
                _ => Model::Primitive,
            },
        };

        // Particles are simulated regardless, hidden here when effects are off
        let particles: &[Entity] = if state.effects { &state.debris } else { &[] };
        let drawables = state
            .obstacles
            .iter()
            .chain(&state.power_ups)
            .chain(&state.projectiles)
            .chain(particles)
            .map(drawable)
            .collect();

        Self {
            camera: state.camera.pos,
            player_pos: state.player.pos,
            player_model: Model::resolve(&state.assets, models.player),
            shield: state.player.shield.active,
            drawables,
        }
    }
}

/// Receiver for presentation snapshots
pub trait Presenter {
    fn hud(&mut self, frame: &HudFrame);
    fn banner(&mut self, banner: &Banner);
    fn render(&mut self, view: &SceneView);
}

/// Push one frame: banners for this tick's events, then HUD, then the scene
pub fn present<P: Presenter>(
    state: &GameState,
    events: &[GameEvent],
    models: &ModelSlots,
    presenter: &mut P,
) {
    for banner in events.iter().filter_map(Banner::from_event) {
        presenter.banner(&banner);
    }
    presenter.hud(&HudFrame::from_state(state));
    presenter.render(&SceneView::from_state(state, models));
}

/// Presenter that writes to the log (native headless host)
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_hud: Option<HudFrame>,
}

impl Presenter for LogPresenter {
    fn hud(&mut self, frame: &HudFrame) {
        let changed = self.last_hud.as_ref().is_none_or(|last| {
            last.mode != frame.mode || last.hearts != frame.hearts || last.level != frame.level
        });
        if changed {
            log::info!(
                "[{}] {} {} {} {}",
                frame.mode,
                frame.distance,
                frame.hearts,
                frame.level,
                frame.shield
            );
        }
        self.last_hud = Some(frame.clone());
    }

    fn banner(&mut self, banner: &Banner) {
        log::info!("** {} **", banner.text());
    }

    fn render(&mut self, view: &SceneView) {
        log::trace!("render {} drawables", view.drawables.len());
    }
}

/// Presenter that keeps everything it was given
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub huds: Vec<HudFrame>,
    pub banners: Vec<Banner>,
    pub frames: Vec<SceneView>,
}

impl Presenter for RecordingPresenter {
    fn hud(&mut self, frame: &HudFrame) {
        self.huds.push(frame.clone());
    }

    fn banner(&mut self, banner: &Banner) {
        self.banners.push(banner.clone());
    }

    fn render(&mut self, view: &SceneView) {
        self.frames.push(view.clone());
    }
}
