//! Game mode state machine
//!
//! `frame` is the host's per-refresh entry point: it applies player input,
//! runs the chapter banner countdown, and only steps the simulation while
//! `Playing`. Retry, next-stage, pause and resume are explicit transitions.

use glam::Vec2;

use super::director::MAX_STAGE;
use super::state::{GameState, Mode, Player};
use super::tick::tick;
use super::weapons::CombatState;
use crate::settings::HpCarry;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Absolute player position target (pointer / touch)
    pub target: Option<Vec2>,
    /// Relative drag delta, applied after `target`
    pub drag: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Run one host frame
pub fn frame(state: &mut GameState, input: &FrameInput, dt: f32) {
    if input.pause {
        toggle_pause(state);
    }

    // Clock anomalies are no-op frames
    if dt.is_nan() || dt <= 0.0 {
        return;
    }
    let dt = dt.min(state.rules.max_frame_dt);

    match state.mode {
        Mode::Chapter => {
            steer(state, input);
            state.banner_timer = (state.banner_timer - dt).max(0.0);
            if state.banner_timer <= 0.0 {
                log::info!("Stage {} started", state.stage);
                state.mode = Mode::Playing;
            }
        }
        Mode::Playing => {
            steer(state, input);
            tick(state, dt);
        }
        Mode::Paused | Mode::Cleared | Mode::GameOver => {}
    }
}

fn steer(state: &mut GameState, input: &FrameInput) {
    if let Some(target) = input.target {
        state.player.move_to(target);
    }
    if let Some(drag) = input.drag {
        let target = state.player.pos + drag;
        state.player.move_to(target);
    }
}

/// Enter `Paused` from `Playing`; returns whether the mode changed
pub fn pause(state: &mut GameState) -> bool {
    if state.mode != Mode::Playing {
        return false;
    }
    state.mode = Mode::Paused;
    true
}

/// Leave `Paused` back to `Playing`; returns whether the mode changed
pub fn resume(state: &mut GameState) -> bool {
    if state.mode != Mode::Paused {
        return false;
    }
    state.mode = Mode::Playing;
    true
}

fn toggle_pause(state: &mut GameState) {
    match state.mode {
        Mode::Playing => {
            pause(state);
        }
        Mode::Paused => {
            resume(state);
        }
        _ => {}
    }
}

/// Restart the run from stage 1, discarding all progression
pub fn retry(state: &mut GameState) {
    state.clear_stage_state();
    state.stage = 1;
    state.total_score = 0;
    state.player = Player::default();
    state.combat = CombatState::default();
    state.clones.clear();
    state.frames = 0;
    state.mode = Mode::Chapter;
    log::info!("Run restarted");
}

/// Advance from a cleared stage to the next one
///
/// Keeps total score, weapon progression and clones. HP carries over or
/// refills according to the run's `HpCarry` rule. Returns false (and changes
/// nothing) unless the stage is cleared and below `MAX_STAGE`.
pub fn next_stage(state: &mut GameState) -> bool {
    if state.mode != Mode::Cleared {
        log::warn!("Next stage requested while {:?}", state.mode);
        return false;
    }
    if state.stage >= MAX_STAGE {
        log::info!("Final stage already cleared");
        return false;
    }

    state.clear_stage_state();
    state.stage += 1;
    if state.rules.hp_carry == HpCarry::Refill {
        state.player.hp = state.player.max_hp;
    }
    state.mode = Mode::Chapter;
    log::info!("Advancing to stage {}", state.stage);
    true
}

/// Whether the final (boss) stage has been cleared
pub fn run_complete(state: &GameState) -> bool {
    state.mode == Mode::Cleared && state.stage >= MAX_STAGE
}
