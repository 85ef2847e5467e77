//! Weapon table and the effective-weapon resolver
//!
//! The weapon actually fired each frame is derived from `CombatState`: a
//! temporary override (if any) replaces the base weapon, permanent pickups
//! scale fire rate and damage, and timed buffs can add pierce.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Weapon identifiers, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponId {
    #[default]
    Pistol,
    Twin,
    Spread,
    Rapid,
    Laser,
}

impl WeaponId {
    pub const ALL: [WeaponId; 5] = [
        WeaponId::Pistol,
        WeaponId::Twin,
        WeaponId::Spread,
        WeaponId::Rapid,
        WeaponId::Laser,
    ];

    /// Weapons that can drop as temporary grants
    pub const GRANTS: [WeaponId; 4] = [
        WeaponId::Twin,
        WeaponId::Spread,
        WeaponId::Rapid,
        WeaponId::Laser,
    ];

    /// Table lookup; out-of-range indices clamp to the last weapon
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn def(self) -> WeaponDef {
        match self {
            WeaponId::Pistol => WeaponDef {
                interval: 0.32,
                damage: 1,
                pellets: 1,
                spread: 0.0,
                pierce: false,
                duration: 0.0,
            },
            WeaponId::Twin => WeaponDef {
                interval: 0.28,
                damage: 1,
                pellets: 2,
                spread: 0.25,
                pierce: false,
                duration: 10.0,
            },
            WeaponId::Spread => WeaponDef {
                interval: 0.40,
                damage: 1,
                pellets: 3,
                spread: 0.6,
                pierce: false,
                duration: 10.0,
            },
            WeaponId::Rapid => WeaponDef {
                interval: 0.12,
                damage: 1,
                pellets: 1,
                spread: 0.0,
                pierce: false,
                duration: 8.0,
            },
            WeaponId::Laser => WeaponDef {
                interval: 0.45,
                damage: 3,
                pellets: 1,
                spread: 0.0,
                pierce: true,
                duration: 8.0,
            },
        }
    }
}

/// Static weapon definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDef {
    /// Seconds between volleys
    pub interval: f32,
    pub damage: u32,
    pub pellets: u32,
    /// Total lateral fan width of a multi-pellet volley
    pub spread: f32,
    pub pierce: bool,
    /// How long a temporary grant of this weapon lasts
    pub duration: f32,
}

/// A temporary weapon override
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempWeapon {
    pub weapon: WeaponId,
    pub time_left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    Pierce,
}

/// A timed buff; several of the same kind may run side by side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    pub time_left: f32,
}

/// Weapon progression for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub base_weapon: WeaponId,
    pub temp_weapon: Option<TempWeapon>,
    /// Multiplies the fire interval; below 1 fires faster
    pub perm_fire_mul: f32,
    pub perm_damage_bonus: i32,
    pub buffs: Vec<Buff>,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            base_weapon: WeaponId::Pistol,
            temp_weapon: None,
            perm_fire_mul: 1.0,
            perm_damage_bonus: 0,
            buffs: Vec::new(),
        }
    }
}

impl CombatState {
    /// The weapon whose definition is used this frame
    pub fn active_weapon(&self) -> WeaponId {
        match self.temp_weapon {
            Some(temp) if temp.time_left > 0.0 => temp.weapon,
            _ => self.base_weapon,
        }
    }

    /// Install a temporary weapon, replacing any current override
    pub fn grant_weapon(&mut self, weapon: WeaponId, duration: f32) {
        self.temp_weapon = Some(TempWeapon {
            weapon,
            time_left: duration.max(0.0),
        });
    }

    /// Stack a fire-rate multiplier, never dropping below the floor
    pub fn stack_fire_mul(&mut self, mul: f32) {
        self.perm_fire_mul = (self.perm_fire_mul * mul).max(FIRE_MUL_FLOOR);
    }

    pub fn add_buff(&mut self, kind: BuffKind, duration: f32) {
        self.buffs.push(Buff {
            kind,
            time_left: duration.max(0.0),
        });
    }

    pub fn has_buff(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind && b.time_left > 0.0)
    }

    /// Count down the override and buffs, dropping whatever expires
    pub fn tick_timers(&mut self, dt: f32) {
        if let Some(temp) = &mut self.temp_weapon {
            temp.time_left = (temp.time_left - dt).max(0.0);
            if temp.time_left <= 0.0 {
                log::debug!("Temporary {:?} expired", temp.weapon);
                self.temp_weapon = None;
            }
        }

        for buff in &mut self.buffs {
            buff.time_left = (buff.time_left - dt).max(0.0);
        }
        self.buffs.retain(|b| b.time_left > 0.0);
    }
}

/// The weapon as it fires this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveWeapon {
    pub weapon: WeaponId,
    pub fire_interval: f32,
    pub damage: u32,
    pub pellets: u32,
    pub spread: f32,
    pub pierce: bool,
}

/// Resolve the effective weapon from combat state (pure)
pub fn resolve(combat: &CombatState) -> EffectiveWeapon {
    let weapon = combat.active_weapon();
    let def = weapon.def();

    let fire_interval = (def.interval * combat.perm_fire_mul).max(MIN_FIRE_INTERVAL);
    let damage = (i64::from(def.damage) + i64::from(combat.perm_damage_bonus)).max(1);

    EffectiveWeapon {
        weapon,
        fire_interval,
        damage: u32::try_from(damage).unwrap_or(u32::MAX),
        pellets: def.pellets.max(1),
        spread: def.spread,
        pierce: def.pierce || combat.has_buff(BuffKind::Pierce),
    }
}
