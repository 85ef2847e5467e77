//! Shooter simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Elapsed time is capped per frame
//! - Randomness comes from the run's seeded RNG (or an injected one)
//! - Stable iteration order (by entity ID)

pub mod collision;
pub mod director;
pub mod factory;
pub mod mode;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{bullet_overlaps_enemy, segment_hits_circle};
pub use director::{MAX_STAGE, StageRule, rule_for_stage, stage_target};
pub use factory::{apply_item, pick_kind, roll_drop, spawn_enemy};
pub use mode::{FrameInput, frame, next_stage, pause, resume, retry, run_complete};
pub use snapshot::Snapshot;
pub use state::{
    Bullet, CloneUnit, Enemy, EnemyBullet, EnemyKind, GameState, Item, ItemKind, Mode, Pattern,
    Player, RunRules,
};
pub use tick::{HitReport, resolve_bullet_hits, tick};
pub use weapons::{CombatState, EffectiveWeapon, WeaponId, resolve};
