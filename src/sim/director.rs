//! Stage director: per-stage difficulty table and kill quotas

use super::state::EnemyKind;
use super::state::EnemyKind::{Bomber, Carrier, Elite, Fighter, Scout};
use crate::consts::{FIRST_STAGE_TARGET, NEXT_STAGE_STEP};

/// Difficulty rule for one stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRule {
    /// Seconds between spawn ticks
    pub spawn_interval: f32,
    /// Max enemies alive at once
    pub max_alive: usize,
    pub batch_min: usize,
    pub batch_max: usize,
    /// Relative spawn weights; never contains the boss
    pub weights: &'static [(EnemyKind, f32)],
    pub hp_mul: f32,
    pub speed_mul: f32,
    /// Stage ends with a boss encounter
    pub boss: bool,
}

const STAGE_RULES: [StageRule; 10] = [
    StageRule {
        spawn_interval: 1.4,
        max_alive: 4,
        batch_min: 1,
        batch_max: 2,
        weights: &[(Scout, 1.0)],
        hp_mul: 1.0,
        speed_mul: 1.0,
        boss: false,
    },
    StageRule {
        spawn_interval: 1.3,
        max_alive: 5,
        batch_min: 1,
        batch_max: 2,
        weights: &[(Scout, 0.75), (Fighter, 0.25)],
        hp_mul: 1.0,
        speed_mul: 1.05,
        boss: false,
    },
    StageRule {
        spawn_interval: 1.2,
        max_alive: 6,
        batch_min: 1,
        batch_max: 3,
        weights: &[(Scout, 0.6), (Fighter, 0.3), (Bomber, 0.1)],
        hp_mul: 1.1,
        speed_mul: 1.05,
        boss: false,
    },
    StageRule {
        spawn_interval: 1.15,
        max_alive: 6,
        batch_min: 2,
        batch_max: 3,
        weights: &[(Scout, 0.5), (Fighter, 0.3), (Bomber, 0.2)],
        hp_mul: 1.2,
        speed_mul: 1.1,
        boss: false,
    },
    StageRule {
        spawn_interval: 1.1,
        max_alive: 7,
        batch_min: 2,
        batch_max: 3,
        weights: &[(Scout, 0.4), (Fighter, 0.3), (Bomber, 0.2), (Carrier, 0.1)],
        hp_mul: 1.3,
        speed_mul: 1.1,
        boss: false,
    },
    StageRule {
        spawn_interval: 1.0,
        max_alive: 8,
        batch_min: 2,
        batch_max: 3,
        weights: &[(Scout, 0.35), (Fighter, 0.3), (Bomber, 0.2), (Carrier, 0.15)],
        hp_mul: 1.45,
        speed_mul: 1.15,
        boss: false,
    },
    StageRule {
        spawn_interval: 0.95,
        max_alive: 8,
        batch_min: 2,
        batch_max: 4,
        weights: &[
            (Scout, 0.3),
            (Fighter, 0.3),
            (Bomber, 0.15),
            (Carrier, 0.15),
            (Elite, 0.1),
        ],
        hp_mul: 1.6,
        speed_mul: 1.2,
        boss: false,
    },
    StageRule {
        spawn_interval: 0.9,
        max_alive: 9,
        batch_min: 2,
        batch_max: 4,
        weights: &[
            (Scout, 0.25),
            (Fighter, 0.3),
            (Bomber, 0.15),
            (Carrier, 0.15),
            (Elite, 0.15),
        ],
        hp_mul: 1.8,
        speed_mul: 1.2,
        boss: false,
    },
    StageRule {
        spawn_interval: 0.8,
        max_alive: 10,
        batch_min: 3,
        batch_max: 4,
        weights: &[
            (Scout, 0.2),
            (Fighter, 0.3),
            (Bomber, 0.15),
            (Carrier, 0.15),
            (Elite, 0.2),
        ],
        hp_mul: 2.0,
        speed_mul: 1.25,
        boss: false,
    },
    StageRule {
        spawn_interval: 1.6,
        max_alive: 6,
        batch_min: 1,
        batch_max: 2,
        weights: &[(Scout, 0.5), (Fighter, 0.3), (Elite, 0.2)],
        hp_mul: 2.2,
        speed_mul: 1.3,
        boss: true,
    },
];

/// Highest stage number; the boss stage
pub const MAX_STAGE: u32 = STAGE_RULES.len() as u32;

/// Rule for a 1-based stage number, clamped to the table
pub fn rule_for_stage(stage: u32) -> &'static StageRule {
    let index = (stage.max(1) as usize - 1).min(STAGE_RULES.len() - 1);
    &STAGE_RULES[index]
}

/// Kills needed to clear a 1-based stage
pub fn stage_target(stage: u32) -> u32 {
    let stage = stage.clamp(1, MAX_STAGE);
    FIRST_STAGE_TARGET + ((stage - 1) % 10) * NEXT_STAGE_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_stage_target() {
        assert_eq!(stage_target(1), FIRST_STAGE_TARGET);
        assert_eq!(stage_target(2), FIRST_STAGE_TARGET + NEXT_STAGE_STEP);
    }

    #[test]
    fn test_stage_lookup_clamps() {
        assert_eq!(rule_for_stage(0), rule_for_stage(1));
        assert_eq!(rule_for_stage(MAX_STAGE + 5), rule_for_stage(MAX_STAGE));
        assert_eq!(stage_target(MAX_STAGE + 5), stage_target(MAX_STAGE));
    }

    #[test]
    fn test_only_last_stage_is_boss() {
        for stage in 1..MAX_STAGE {
            assert!(!rule_for_stage(stage).boss, "stage {stage}");
        }
        assert!(rule_for_stage(MAX_STAGE).boss);
    }

    #[test]
    fn test_rules_are_well_formed() {
        for stage in 1..=MAX_STAGE {
            let rule = rule_for_stage(stage);
            assert!(rule.spawn_interval > 0.0);
            assert!(rule.batch_min >= 1 && rule.batch_min <= rule.batch_max);
            assert!(rule.max_alive >= rule.batch_max);
            assert!(rule.weights.iter().all(|(kind, _)| !kind.is_boss()));
            assert!(rule.weights.iter().map(|(_, w)| w).sum::<f32>() > 0.0);
        }
    }

    #[test]
    fn test_stage_quotas() {
        let quotas: Vec<u32> = (1..=MAX_STAGE).map(stage_target).collect();
        assert_eq!(quotas, vec![20, 25, 30, 35, 40, 45, 50, 55, 60, 65]);
    }

    proptest! {
        #[test]
        fn stage_lookup_never_panics(stage in any::<u32>()) {
            let rule = rule_for_stage(stage);
            prop_assert_eq!(rule.boss, stage >= MAX_STAGE);
            prop_assert!((20..=65).contains(&stage_target(stage)));
        }
    }
}
