//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod player;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use collision::{Aabb, within_axes, within_radius};
pub use progression::{distance_km, level_for, level_progress};
pub use spawner::{spawn_interval, try_spawn};
pub use state::{
    Camera, Entity, EntityKind, GameEvent, GameState, MENU_CAMERA, Mode, PLAY_CAMERA, Player,
    RunState, Shield, Upgrade,
};
pub use tick::{TickInput, tick};
