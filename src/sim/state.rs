//! Game state and core simulation types
//!
//! Every mutable timer and entity population lives on `GameState`, so a run
//! can be cloned, serialized, reset and tested without hidden globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::weapons::{CombatState, WeaponId};
use crate::consts::*;
use crate::settings::{HpCarry, Settings};

/// Current mode of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Stage banner, counts down into `Playing`
    Chapter,
    /// Simulation runs every frame
    Playing,
    /// Frozen by an explicit pause request
    Paused,
    /// Stage quota reached, waiting for next-stage or retry
    Cleared,
    /// Player HP reached zero
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub half_width: f32,
    pub hp: u32,
    pub max_hp: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(LANE_COUNT / 2.0, PLAYER_START_Y),
            half_width: PLAYER_HALF_WIDTH,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
        }
    }
}

impl Player {
    /// Move to a target, clamped to the lanes and the player band
    pub fn move_to(&mut self, target: Vec2) {
        self.pos = Vec2::new(
            crate::clamp_lane_x(target.x, self.half_width),
            target.y.clamp(PLAYER_Y_MIN, PLAYER_Y_MAX),
        );
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Fighter,
    Bomber,
    Carrier,
    Elite,
    Boss,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// Movement pattern tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Straight,
    /// Sinusoidal sideways weave around the spawn column
    Zigzag,
    /// Wide weave with a surging descent
    Swoop,
    /// Descends to `depth` and holds there
    Hover { depth: f32 },
}

/// An enemy ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Column the lateral pattern oscillates around
    pub anchor_x: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: f32,
    pub width: f32,
    /// Ramming damage; carried for hosts, the shooter step never applies it
    pub contact_damage: u32,
    /// Seconds of hit flash remaining
    pub hit_flash: f32,
    pub pattern: Pattern,
    pub phase: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub fire_timer: f32,
    /// Seconds between shots (0 = never fires)
    pub fire_interval: f32,
}

impl Enemy {
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }
}

/// A player-owned bullet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: u32,
    pub pierce: bool,
    pub weapon: WeaponId,
}

/// An enemy bullet; `prev` is kept for the swept player test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub id: u32,
    pub pos: Vec2,
    pub prev: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
}

/// Pickup payloads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Temporary weapon override
    Weapon { weapon: WeaponId, duration: f32 },
    /// Permanent fire interval multiplier
    FireRate { mul: f32 },
    /// Permanent flat damage bonus
    DamageBonus { amount: i32 },
    /// Timed pierce buff
    Pierce { duration: f32 },
    /// Extra clone units, up to the cap
    AddClone { count: u32 },
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub pos: Vec2,
    pub kind: ItemKind,
}

/// Formation slots for clones, relative to the player
pub const CLONE_SLOTS: [Vec2; MAX_CLONES] = [
    Vec2::new(-0.6, 0.03),
    Vec2::new(0.6, 0.03),
    Vec2::new(-1.1, 0.06),
    Vec2::new(1.1, 0.06),
];

/// An auxiliary firing position that follows the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneUnit {
    pub id: u32,
    pub slot: usize,
    pub offset: Vec2,
}

/// Tunables copied from `Settings` when a run starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRules {
    pub banner_seconds: f32,
    pub max_frame_dt: f32,
    pub hurt_window: f32,
    pub hp_carry: HpCarry,
}

impl Default for RunRules {
    fn default() -> Self {
        Settings::default().rules()
    }
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub rules: RunRules,
    pub mode: Mode,
    /// 1-based stage number
    pub stage: u32,
    /// Kills this stage
    pub score: u32,
    /// Kills across the run
    pub total_score: u64,
    /// Seconds left on the chapter banner
    pub banner_timer: f32,
    /// Accumulates toward the next player volley
    pub fire_timer: f32,
    /// Accumulates toward the next spawn batch
    pub spawn_timer: f32,
    /// Remaining uninjured window after a hit
    pub hurt_timer: f32,
    /// Set once the boss stage has produced its boss
    pub boss_spawned: bool,
    /// Set when the boss dies on the boss stage
    pub boss_defeated: bool,
    pub player: Player,
    pub combat: CombatState,
    /// Active entities, in spawn (id) order
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub items: Vec<Item>,
    pub clones: Vec<CloneUnit>,
    /// Simulation frames run while playing
    pub frames: u64,
    next_id: u32,
}

impl GameState {
    /// Create a new run with default rules
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, RunRules::default())
    }

    /// Create a new run from settings; a configured seed wins over `fallback_seed`
    pub fn from_settings(settings: &Settings, fallback_seed: u64) -> Self {
        Self::with_rules(settings.seed.unwrap_or(fallback_seed), settings.rules())
    }

    pub fn with_rules(seed: u64, rules: RunRules) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            mode: Mode::Chapter,
            stage: 1,
            score: 0,
            total_score: 0,
            banner_timer: rules.banner_seconds,
            fire_timer: 0.0,
            spawn_timer: 0.0,
            hurt_timer: 0.0,
            boss_spawned: false,
            boss_defeated: false,
            player: Player::default(),
            combat: CombatState::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            items: Vec::new(),
            clones: Vec::new(),
            frames: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Add clones into free formation slots; returns how many were added
    pub fn add_clones(&mut self, count: u32) -> u32 {
        let mut added = 0;
        for _ in 0..count {
            let Some(slot) = (0..MAX_CLONES).find(|s| !self.clones.iter().any(|c| c.slot == *s))
            else {
                break;
            };
            let id = self.next_entity_id();
            self.clones.push(CloneUnit {
                id,
                slot,
                offset: CLONE_SLOTS[slot],
            });
            added += 1;
        }
        added
    }

    /// Clear per-stage populations and timers, keeping progression
    pub fn clear_stage_state(&mut self) {
        self.score = 0;
        self.fire_timer = 0.0;
        self.spawn_timer = 0.0;
        self.hurt_timer = 0.0;
        self.boss_spawned = false;
        self.boss_defeated = false;
        self.banner_timer = self.rules.banner_seconds;
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42);
        assert_eq!(state.mode, Mode::Chapter);
        assert_eq!(state.stage, 1);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
        assert_eq!(state.combat.base_weapon, WeaponId::Pistol);
        assert!(state.enemies.is_empty());
        assert!((state.banner_timer - BANNER_SECONDS).abs() < 1e-6);
    }

    #[test]
    fn test_player_move_is_clamped() {
        let mut player = Player::default();
        player.move_to(Vec2::new(-3.0, 0.1));
        assert_eq!(player.pos, Vec2::new(PLAYER_HALF_WIDTH, PLAYER_Y_MIN));
        player.move_to(Vec2::new(99.0, 2.0));
        assert_eq!(player.pos, Vec2::new(LANE_COUNT - PLAYER_HALF_WIDTH, PLAYER_Y_MAX));
    }

    #[test]
    fn test_add_clones_respects_cap() {
        let mut state = GameState::new(1);
        assert_eq!(state.add_clones(3), 3);
        assert_eq!(state.add_clones(3), 1);
        assert_eq!(state.add_clones(1), 0);
        assert_eq!(state.clones.len(), MAX_CLONES);

        let mut slots: Vec<usize> = state.clones.iter().map(|c| c.slot).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = GameState::new(7);
        state.add_clones(2);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.clones, state.clones);
        assert_eq!(back.seed, 7);
        assert_eq!(back.mode, Mode::Chapter);
    }
}
