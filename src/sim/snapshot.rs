//! Read-only per-frame view for presentation layers

use glam::Vec2;
use serde::Serialize;

use super::director::stage_target;
use super::state::{Bullet, CloneUnit, Enemy, EnemyBullet, GameState, Item, Mode, Player};
use super::weapons::{EffectiveWeapon, resolve};

/// Everything a renderer or HUD needs, borrowed from the state
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub mode: Mode,
    pub stage: u32,
    pub score: u32,
    pub total_score: u64,
    pub stage_target: u32,
    pub hp_fraction: f32,
    /// Uninjured window is running (for blinking the ship)
    pub hurt: bool,
    pub weapon: EffectiveWeapon,
    pub player: &'a Player,
    /// World positions of clones this frame
    pub clone_positions: Vec<Vec2>,
    pub clones: &'a [CloneUnit],
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub enemy_bullets: &'a [EnemyBullet],
    pub items: &'a [Item],
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            mode: state.mode,
            stage: state.stage,
            score: state.score,
            total_score: state.total_score,
            stage_target: stage_target(state.stage),
            hp_fraction: state.player.hp_fraction(),
            hurt: state.hurt_timer > 0.0,
            weapon: resolve(&state.combat),
            player: &state.player,
            clone_positions: state
                .clones
                .iter()
                .map(|c| state.player.pos + c.offset)
                .collect(),
            clones: &state.clones,
            enemies: &state.enemies,
            bullets: &state.bullets,
            enemy_bullets: &state.enemy_bullets,
            items: &state.items,
        }
    }

    /// Fraction of the stage quota reached, in [0, 1]
    pub fn stage_progress(&self) -> f32 {
        if self.stage_target == 0 {
            return 1.0;
        }
        (self.score as f32 / self.stage_target as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(3);
        state.player.hp = 6;
        state.score = 10;
        state.add_clones(1);

        let snap = Snapshot::of(&state);
        assert_eq!(snap.stage, 1);
        assert!((snap.hp_fraction - 0.5).abs() < 1e-6);
        assert!((snap.stage_progress() - 0.5).abs() < 1e-6);
        assert_eq!(snap.clone_positions.len(), 1);
        assert_eq!(snap.clone_positions[0], state.player.pos + state.clones[0].offset);
        assert!(!snap.hurt);
        assert_eq!(snap.stage_target, FIRST_STAGE_TARGET);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3);
        let json = serde_json::to_value(Snapshot::of(&state)).expect("serialize");
        assert_eq!(json["mode"], "Chapter");
        assert_eq!(json["stage"], 1);
        assert_eq!(json["weapon"]["weapon"], "Pistol");
    }
}
