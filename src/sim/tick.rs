//! Fixed timestep simulation tick
//!
//! Core game loop: one call per simulation step, driven by the host's
//! accumulator. All mode transitions happen here.

use super::collision::{resolve_player_obstacles, resolve_power_ups, resolve_projectiles};
use super::player::{fire, move_player, update_shield, update_timers};
use super::progression::tick_score;
use super::spawner::try_spawn;
use super::state::{Camera, GameState, MENU_CAMERA, Mode, PLAY_CAMERA};
use crate::consts::*;

/// Held input state for a single tick (deterministic)
///
/// The host mirrors its key map into this every tick and never clears it;
/// the simulation derives press edges itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Fire (mouse button / space)
    pub fire: bool,
    pub shield: bool,
    /// Pause toggle (escape)
    pub pause: bool,
    /// Start / select (enter)
    pub confirm: bool,
    /// Back to menu from pause or selection
    pub quit: bool,
}

impl TickInput {
    /// Mirror a keyboard `code` (DOM `KeyboardEvent.code`) into the held set
    pub fn set_key(&mut self, code: &str, down: bool) {
        match code {
            "KeyA" | "ArrowLeft" => self.left = down,
            "KeyD" | "ArrowRight" => self.right = down,
            "Space" => self.fire = down,
            "KeyS" => self.shield = down,
            "Escape" | "KeyP" => self.pause = down,
            "Enter" => self.confirm = down,
            "KeyQ" => self.quit = down,
            _ => {}
        }
    }

    /// Mirror a mouse button; the primary button fires
    pub fn set_mouse_button(&mut self, button: i16, down: bool) {
        if button == 0 {
            self.fire = down;
        }
    }

    /// Buttons that went down since `prev`
    pub fn rising(&self, prev: &TickInput) -> TickInput {
        TickInput {
            left: self.left && !prev.left,
            right: self.right && !prev.right,
            fire: self.fire && !prev.fire,
            shield: self.shield && !prev.shield,
            pause: self.pause && !prev.pause,
            confirm: self.confirm && !prev.confirm,
            quit: self.quit && !prev.quit,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let pressed = input.rising(&state.prev_input);
    state.prev_input = *input;

    match state.mode {
        Mode::Loading => {
            if state.assets.is_settled() {
                state.set_mode(Mode::Menu);
            }
        }

        Mode::Menu => {
            if state.flash {
                state.camera.orbit += MENU_ORBIT_SPEED * dt;
                let (sin, cos) = state.camera.orbit.sin_cos();
                state.camera.pos = glam::Vec3::new(
                    MENU_CAMERA.z * sin,
                    MENU_CAMERA.y,
                    MENU_CAMERA.z * cos,
                );
            }
            if pressed.confirm {
                if state.rules.roster > 0 {
                    let index = state.player.skin;
                    state.set_mode(Mode::Selection { index });
                } else {
                    state.set_mode(Mode::Transitioning);
                }
            }
        }

        Mode::Selection { index } => {
            let roster = state.rules.roster.max(1);
            if pressed.quit {
                state.set_mode(Mode::Menu);
            } else if pressed.confirm {
                state.player.skin = index;
                log::info!("Selected roster entry {}", index);
                state.set_mode(Mode::Transitioning);
            } else if pressed.left && !pressed.right {
                state.mode = Mode::Selection {
                    index: (index + roster - 1) % roster,
                };
            } else if pressed.right && !pressed.left {
                state.mode = Mode::Selection {
                    index: (index + 1) % roster,
                };
            }
        }

        Mode::Transitioning => {
            let t = 1.0 - TRANSITION_RETAIN.powf(dt * TICKS_PER_SECOND as f32);
            state.camera.pos = state.camera.pos.lerp(PLAY_CAMERA, t);
            if state.camera.pos.distance(PLAY_CAMERA) < TRANSITION_EPSILON {
                state.camera.pos = PLAY_CAMERA;
                state.reset_run();
                state.set_mode(Mode::Playing);
            }
        }

        Mode::Playing => {
            if pressed.pause {
                state.set_mode(Mode::Paused);
            } else {
                play(state, input, &pressed, dt);
            }
        }

        Mode::Paused => {
            if pressed.pause {
                state.set_mode(Mode::Playing);
            } else if pressed.quit {
                return_to_menu(state);
            }
        }

        Mode::GameOver { ticks_left } => {
            advance_debris(state, dt);
            let ticks_left = ticks_left.saturating_sub(1);
            if ticks_left == 0 {
                return_to_menu(state);
            } else {
                state.mode = Mode::GameOver { ticks_left };
            }
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// One tick of active play, in controller → spawner → collision → scoring order
fn play(state: &mut GameState, held: &TickInput, pressed: &TickInput, dt: f32) {
    state.run.ticks += 1;

    move_player(state, held, pressed, dt);
    update_shield(state, pressed);
    update_timers(state);
    fire(state, pressed);

    try_spawn(state);
    advance_entities(state, dt);

    resolve_player_obstacles(state);
    if state.mode != Mode::Playing {
        return;
    }
    resolve_projectiles(state);
    resolve_power_ups(state);

    tick_score(state);
}

/// Move everything and drop entities that left the playfield or expired
fn advance_entities(state: &mut GameState, dt: f32) {
    let scale = if state.player.boosted() {
        SPEED_BOOST_FACTOR
    } else {
        1.0
    };
    state.obstacles.retain_mut(|o| {
        o.advance(dt, scale);
        o.pos.z <= OBSTACLE_DESPAWN_Z
    });
    state.power_ups.retain_mut(|p| {
        p.advance(dt, scale);
        p.pos.z <= OBSTACLE_DESPAWN_Z
    });
    state.projectiles.retain_mut(|p| {
        p.advance(dt, 1.0);
        p.pos.z >= PROJECTILE_DESPAWN_Z
    });
    advance_debris(state, dt);
}

fn advance_debris(state: &mut GameState, dt: f32) {
    state.debris.retain_mut(|d| d.advance(dt, 1.0));
}

fn return_to_menu(state: &mut GameState) {
    state.clear_entities();
    state.camera = Camera::default();
    state.set_mode(Mode::Menu);
}
