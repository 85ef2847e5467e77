//! Entity factory: enemy construction, drop rolls and item effects
//!
//! All randomness comes through the injected `rng` so tests can drive the
//! rolls directly.

use glam::Vec2;
use rand::Rng;

use super::director::StageRule;
use super::state::{Enemy, EnemyKind, GameState, Item, ItemKind, Pattern};
use super::weapons::{BuffKind, WeaponId};
use crate::consts::*;
use crate::{rand_range, weighted_index};

/// Per-kind base stats before stage scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStats {
    pub hp: u32,
    pub speed: f32,
    pub width: f32,
    pub contact_damage: u32,
    pub pattern: Pattern,
    pub amplitude: f32,
    pub frequency: f32,
    pub fire_interval: f32,
}

pub fn kind_stats(kind: EnemyKind) -> KindStats {
    match kind {
        EnemyKind::Scout => KindStats {
            hp: 2,
            speed: 0.28,
            width: 0.6,
            contact_damage: 1,
            pattern: Pattern::Straight,
            amplitude: 0.0,
            frequency: 0.0,
            fire_interval: 0.0,
        },
        EnemyKind::Fighter => KindStats {
            hp: 4,
            speed: 0.24,
            width: 0.7,
            contact_damage: 1,
            pattern: Pattern::Zigzag,
            amplitude: 0.35,
            frequency: 2.2,
            fire_interval: 2.4,
        },
        EnemyKind::Bomber => KindStats {
            hp: 8,
            speed: 0.16,
            width: 0.9,
            contact_damage: 2,
            pattern: Pattern::Straight,
            amplitude: 0.0,
            frequency: 0.0,
            fire_interval: 3.0,
        },
        EnemyKind::Carrier => KindStats {
            hp: 14,
            speed: 0.12,
            width: 1.2,
            contact_damage: 2,
            pattern: Pattern::Hover { depth: 0.3 },
            amplitude: 0.0,
            frequency: 0.0,
            fire_interval: 2.2,
        },
        EnemyKind::Elite => KindStats {
            hp: 10,
            speed: 0.20,
            width: 0.8,
            contact_damage: 2,
            pattern: Pattern::Swoop,
            amplitude: 0.6,
            frequency: 1.4,
            fire_interval: 1.6,
        },
        EnemyKind::Boss => KindStats {
            hp: 240,
            speed: 0.10,
            width: 2.2,
            contact_damage: 3,
            pattern: Pattern::Hover { depth: 0.22 },
            amplitude: 0.0,
            frequency: 0.0,
            fire_interval: 1.1,
        },
    }
}

/// Build an enemy of `kind` scaled by the stage rule
pub fn spawn_enemy<R: Rng + ?Sized>(
    rng: &mut R,
    kind: EnemyKind,
    rule: &StageRule,
    id: u32,
) -> Enemy {
    let stats = kind_stats(kind);
    let half = (stats.width / 2.0).min(LANE_COUNT / 2.0);

    let x = rand_range(rng, half, LANE_COUNT - half);
    let y = if kind.is_boss() {
        BOSS_SPAWN_Y
    } else {
        rand_range(rng, -0.12, -0.02)
    };

    let hp = ((stats.hp as f32) * rule.hp_mul).ceil().max(1.0) as u32;
    let phase = if stats.amplitude > 0.0 {
        rand_range(rng, 0.0, std::f32::consts::TAU)
    } else {
        0.0
    };

    Enemy {
        id,
        kind,
        pos: Vec2::new(x, y),
        anchor_x: x,
        hp,
        max_hp: hp,
        speed: stats.speed * rule.speed_mul,
        width: stats.width,
        contact_damage: stats.contact_damage,
        hit_flash: 0.0,
        pattern: stats.pattern,
        phase,
        amplitude: stats.amplitude,
        frequency: stats.frequency,
        fire_timer: 0.0,
        fire_interval: stats.fire_interval,
    }
}

/// Weighted draw over the rule's kind table
///
/// An empty or all-zero table falls back to its first declared kind (or
/// scouts when there is none).
pub fn pick_kind<R: Rng + ?Sized>(rng: &mut R, rule: &StageRule) -> EnemyKind {
    let weights: Vec<f32> = rule.weights.iter().map(|(_, w)| *w).collect();
    let index = weighted_index(rng, &weights);
    rule.weights
        .get(index)
        .map(|(kind, _)| *kind)
        .unwrap_or(EnemyKind::Scout)
}

/// Drop categories and their relative weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropCategory {
    Weapon,
    FireRate,
    Damage,
    Pierce,
    Clone,
}

const DROP_TABLE: [(DropCategory, f32); 5] = [
    (DropCategory::Weapon, 40.0),
    (DropCategory::FireRate, 25.0),
    (DropCategory::Damage, 20.0),
    (DropCategory::Pierce, 10.0),
    (DropCategory::Clone, 5.0),
];

/// Roll for a pickup where an enemy died
pub fn roll_drop<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, id: u32) -> Option<Item> {
    if rng.random::<f32>() >= ENEMY_DROP_CHANCE {
        return None;
    }

    let weights = DROP_TABLE.map(|(_, w)| w);
    let category = DROP_TABLE[weighted_index(rng, &weights)].0;

    let kind = match category {
        DropCategory::Weapon => {
            let weapon = WeaponId::GRANTS[rng.random_range(0..WeaponId::GRANTS.len())];
            ItemKind::Weapon {
                weapon,
                duration: weapon.def().duration,
            }
        }
        DropCategory::FireRate => ItemKind::FireRate {
            mul: FIRE_RATE_DROP_MUL,
        },
        DropCategory::Damage => ItemKind::DamageBonus {
            amount: DAMAGE_DROP_BONUS,
        },
        DropCategory::Pierce => ItemKind::Pierce {
            duration: STAT_BUFF_DURATION,
        },
        DropCategory::Clone => ItemKind::AddClone { count: 1 },
    };

    Some(Item { id, pos, kind })
}

/// Apply a picked-up item to the run
pub fn apply_item(state: &mut GameState, kind: ItemKind) {
    match kind {
        ItemKind::Weapon { weapon, duration } => state.combat.grant_weapon(weapon, duration),
        ItemKind::FireRate { mul } => state.combat.stack_fire_mul(mul),
        ItemKind::DamageBonus { amount } => {
            state.combat.perm_damage_bonus = state.combat.perm_damage_bonus.saturating_add(amount);
        }
        ItemKind::Pierce { duration } => state.combat.add_buff(BuffKind::Pierce, duration),
        ItemKind::AddClone { count } => {
            let added = state.add_clones(count);
            if added < count {
                log::debug!("Clone cap reached, {} of {} added", added, count);
            }
        }
    }
}
