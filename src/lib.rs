//! Lane Strike - a lane-based vertical shooter core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, director, collisions, game modes)
//! - `settings`: Run configuration loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{HpCarry, Settings};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Number of lanes spanning the play width (x is measured in lanes)
    pub const LANE_COUNT: f32 = 5.0;

    /// Largest frame delta integrated in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Longest single simulation substep; a bullet and an enemy never close
    /// more than the hit window's height within one substep
    pub const SIM_STEP_DT: f32 = 1.0 / 60.0;
    /// Substep budget per frame (covers the largest configurable frame cap)
    pub const MAX_SUBSTEPS: u32 = 16;
    /// Chapter banner display time before play starts
    pub const BANNER_SECONDS: f32 = 1.5;

    /// Player defaults
    pub const PLAYER_MAX_HP: u32 = 12;
    pub const PLAYER_HALF_WIDTH: f32 = 0.3;
    pub const PLAYER_HIT_RADIUS: f32 = 0.05;
    pub const PLAYER_START_Y: f32 = 0.86;
    pub const PLAYER_Y_MIN: f32 = 0.82;
    pub const PLAYER_Y_MAX: f32 = 0.92;
    /// Uninjured window after taking damage (seconds)
    pub const HURT_WINDOW: f32 = 1.0;

    /// Player bullets
    pub const BULLET_SPEED: f32 = 1.6;
    pub const BULLET_RADIUS: f32 = 0.06;
    pub const BULLET_HIT_EPS_Y: f32 = 0.035;
    /// Horizontal speed per unit of lateral pellet offset
    pub const PELLET_VX_GAIN: f32 = 1.2;

    /// Weapon limits
    pub const MIN_FIRE_INTERVAL: f32 = 0.06;
    pub const FIRE_MUL_FLOOR: f32 = 0.35;

    /// Enemy bullets
    pub const ENEMY_BULLET_SPEED: f32 = 0.45;
    pub const ENEMY_BULLET_RADIUS: f32 = 0.04;
    pub const ENEMY_BULLET_DAMAGE: u32 = 1;
    pub const BOSS_BULLET_DAMAGE: u32 = 2;
    /// Angle between the boss aim line and its side shots (radians)
    pub const BOSS_SPREAD_ANGLE: f32 = 0.28;
    /// Enemies only fire while inside this y band
    pub const ENEMY_FIRE_Y_MIN: f32 = 0.02;
    pub const ENEMY_FIRE_Y_MAX: f32 = 0.7;

    /// Enemies
    pub const ENEMY_EXIT_Y: f32 = 1.1;
    pub const BOSS_SPAWN_Y: f32 = -0.3;
    pub const HIT_FLASH: f32 = 0.12;

    /// Drops
    pub const ENEMY_DROP_CHANCE: f32 = 0.12;
    pub const STAT_BUFF_DURATION: f32 = 12.0;
    pub const FIRE_RATE_DROP_MUL: f32 = 0.7;
    pub const DAMAGE_DROP_BONUS: i32 = 1;
    pub const ITEM_FALL_SPEED: f32 = 0.18;
    pub const ITEM_PICKUP_DX: f32 = 0.45;
    pub const ITEM_PICKUP_DY: f32 = 0.08;

    /// Clones
    pub const MAX_CLONES: usize = 4;

    /// Off-screen margins before culling
    pub const CULL_MARGIN_X: f32 = 0.5;
    pub const CULL_TOP_Y: f32 = -0.4;
    pub const CULL_BOTTOM_Y: f32 = 1.2;
    pub const BULLET_CULL_Y: f32 = -0.1;

    /// Stage quotas
    pub const FIRST_STAGE_TARGET: u32 = 20;
    pub const NEXT_STAGE_STEP: u32 = 5;
}

/// Clamp a horizontal position so a body of `half_width` stays inside the lanes
#[inline]
pub fn clamp_lane_x(x: f32, half_width: f32) -> f32 {
    let half = half_width.clamp(0.0, consts::LANE_COUNT / 2.0);
    x.clamp(half, consts::LANE_COUNT - half)
}

/// Uniform sample in `[lo, hi)`; returns `lo` for an empty range
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    lo + (hi - lo) * rng.random::<f32>()
}

/// Pick an index proportionally to `weights`.
///
/// Negative and non-finite weights count as zero. If nothing has positive
/// weight the first index is returned, so callers always get an entry.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f32]) -> usize {
    let usable = |w: f32| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f32 = weights.iter().copied().map(usable).sum();
    if total <= 0.0 {
        return 0;
    }

    let mut roll = rng.random::<f32>() * total;
    let mut last_positive = 0;
    for (i, w) in weights.iter().copied().map(usable).enumerate() {
        if w <= 0.0 {
            continue;
        }
        if roll < w {
            return i;
        }
        roll -= w;
        last_positive = i;
    }
    // Float rounding can leave a sliver past the end
    last_positive
}
