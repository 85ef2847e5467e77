//! Per-frame simulation step
//!
//! Advances one `Playing` frame in a fixed phase order: auto-fire, spawn,
//! enemy movement and fire, kinematics, bullet hits, player hits, pickups,
//! buff timers, stage clear. Spawning and firing happen before collisions so
//! a kill and a respawn are never judged against stale positions.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    bullet_overlaps_enemy, in_bounds, segment_hits_circle, within_pickup_range,
};
use super::director::{rule_for_stage, stage_target};
use super::factory::{apply_item, pick_kind, roll_drop, spawn_enemy};
use super::state::{Bullet, Enemy, EnemyBullet, EnemyKind, GameState, Mode, Pattern};
use super::weapons::{EffectiveWeapon, resolve};
use crate::clamp_lane_x;
use crate::consts::*;

/// Advance a playing run by `dt` seconds
///
/// Does nothing outside `Mode::Playing` or for a non-positive `dt`. `dt` is
/// capped at the run's `max_frame_dt` and integrated in equal substeps no
/// longer than `SIM_STEP_DT`, so fast bullets cannot skip over a hit-box.
/// Substepping stops as soon as the run leaves `Playing`.
pub fn tick(state: &mut GameState, dt: f32) {
    if state.mode != Mode::Playing || dt.is_nan() || dt <= 0.0 {
        return;
    }
    let dt = dt
        .min(state.rules.max_frame_dt)
        .min(SIM_STEP_DT * MAX_SUBSTEPS as f32);
    state.frames += 1;

    // Tolerance keeps an exact multiple of the step from rounding up
    let substeps = (dt / SIM_STEP_DT - 1e-3).ceil().clamp(1.0, MAX_SUBSTEPS as f32) as u32;
    let step_dt = dt / substeps as f32;
    for _ in 0..substeps {
        step(state, step_dt);
        if state.mode != Mode::Playing {
            break;
        }
    }
}

/// One fixed-order pass over every phase
fn step(state: &mut GameState, dt: f32) {
    let weapon = resolve(&state.combat);
    auto_fire(state, &weapon, dt);
    spawn_tick(state, dt);
    update_enemies(state, dt);
    integrate(state, dt);

    let report = resolve_bullet_hits(&state.bullets, &state.enemies);
    commit_hits(state, &report);

    hit_player(state, dt);
    if state.mode != Mode::Playing {
        return;
    }

    collect_items(state);
    state.combat.tick_timers(dt);
    check_stage_clear(state);
}

/// Phase 1: fire a volley from the player and every clone when due
fn auto_fire(state: &mut GameState, weapon: &EffectiveWeapon, dt: f32) {
    state.fire_timer += dt;
    if state.fire_timer < weapon.fire_interval {
        return;
    }
    state.fire_timer = 0.0;

    let player = state.player.pos;
    let origins: Vec<Vec2> = std::iter::once(player)
        .chain(state.clones.iter().map(|c| player + c.offset))
        .collect();

    for origin in origins {
        for (offset, vel) in volley_pattern(weapon) {
            let id = state.next_entity_id();
            state.bullets.push(Bullet {
                id,
                pos: Vec2::new(origin.x + offset, origin.y - 0.03),
                vel,
                damage: weapon.damage,
                pierce: weapon.pierce,
                weapon: weapon.weapon,
            });
        }
    }
}

/// Lateral offset and velocity of each pellet in one volley
///
/// One pellet flies straight up. Several pellets fan out symmetrically
/// across `spread`, each drifting sideways in proportion to its offset.
pub fn volley_pattern(weapon: &EffectiveWeapon) -> Vec<(f32, Vec2)> {
    let n = weapon.pellets.max(1);
    if n == 1 {
        return vec![(0.0, Vec2::new(0.0, -BULLET_SPEED))];
    }

    (0..n)
        .map(|i| {
            let lateral = (i as f32 / (n - 1) as f32 - 0.5) * weapon.spread;
            (lateral * 0.5, Vec2::new(lateral * PELLET_VX_GAIN, -BULLET_SPEED))
        })
        .collect()
}

/// Phase 2: spawn a batch when the stage's spawn timer fires
fn spawn_tick(state: &mut GameState, dt: f32) {
    let rule = rule_for_stage(state.stage);
    state.spawn_timer += dt;
    if state.spawn_timer < rule.spawn_interval {
        return;
    }
    state.spawn_timer = 0.0;

    let alive = state.enemies.len();
    if alive >= rule.max_alive {
        return;
    }

    if rule.boss && !state.boss_spawned {
        let id = state.next_entity_id();
        let boss = spawn_enemy(&mut state.rng, EnemyKind::Boss, rule, id);
        log::debug!("Boss {} entering with {} hp", id, boss.hp);
        state.enemies.push(boss);
        state.boss_spawned = true;
        return;
    }

    let room = rule.max_alive - alive;
    let batch = state
        .rng
        .random_range(rule.batch_min..=rule.batch_max.max(rule.batch_min))
        .min(room);
    for _ in 0..batch {
        let kind = pick_kind(&mut state.rng, rule);
        let id = state.next_entity_id();
        let enemy = spawn_enemy(&mut state.rng, kind, rule, id);
        state.enemies.push(enemy);
    }
}

/// Phase 3: move enemies, run their fire timers, drop the ones that left
fn update_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let mut shooters: Vec<(Vec2, EnemyKind)> = Vec::new();

    for enemy in &mut state.enemies {
        move_enemy(enemy, dt);

        if enemy.fire_interval > 0.0 {
            enemy.fire_timer += dt;
            if enemy.fire_timer >= enemy.fire_interval {
                enemy.fire_timer = 0.0;
                if (ENEMY_FIRE_Y_MIN..=ENEMY_FIRE_Y_MAX).contains(&enemy.pos.y) {
                    shooters.push((enemy.pos, enemy.kind));
                }
            }
        }
    }

    for (origin, kind) in shooters {
        fire_at(state, origin, kind, target);
    }

    state.enemies.retain(|e| e.pos.y <= ENEMY_EXIT_Y);
}

fn move_enemy(enemy: &mut Enemy, dt: f32) {
    enemy.phase += enemy.frequency * dt;
    enemy.hit_flash = (enemy.hit_flash - dt).max(0.0);

    let step = enemy.speed * dt;
    match enemy.pattern {
        Pattern::Straight => enemy.pos.y += step,
        Pattern::Zigzag => {
            enemy.pos.y += step;
            enemy.pos.x = enemy.anchor_x + enemy.amplitude * enemy.phase.sin();
        }
        Pattern::Swoop => {
            enemy.pos.y += step * (1.0 + 0.5 * enemy.phase.cos());
            enemy.pos.x = enemy.anchor_x + enemy.amplitude * enemy.phase.sin();
        }
        Pattern::Hover { depth } => {
            if enemy.pos.y < depth {
                enemy.pos.y = (enemy.pos.y + step).min(depth);
            }
        }
    }

    enemy.pos.x = clamp_lane_x(enemy.pos.x, enemy.half_width());
}

/// Emit an aimed shot; the boss adds two side shots for a 3-way spread
fn fire_at(state: &mut GameState, origin: Vec2, kind: EnemyKind, target: Vec2) {
    let aim = (target - origin).try_normalize().unwrap_or(Vec2::Y);
    let damage = if kind.is_boss() {
        BOSS_BULLET_DAMAGE
    } else {
        ENEMY_BULLET_DAMAGE
    };

    let mut dirs = vec![aim];
    if kind.is_boss() {
        dirs.push(Vec2::from_angle(-BOSS_SPREAD_ANGLE).rotate(aim));
        dirs.push(Vec2::from_angle(BOSS_SPREAD_ANGLE).rotate(aim));
    }

    for dir in dirs {
        let id = state.next_entity_id();
        state.enemy_bullets.push(EnemyBullet {
            id,
            pos: origin,
            prev: origin,
            vel: dir * ENEMY_BULLET_SPEED,
            radius: ENEMY_BULLET_RADIUS,
            damage,
        });
    }
}

/// Phase 4: integrate bullets, enemy bullets and items, culling strays
fn integrate(state: &mut GameState, dt: f32) {
    let min = Vec2::new(-CULL_MARGIN_X, CULL_TOP_Y);
    let max = Vec2::new(LANE_COUNT + CULL_MARGIN_X, CULL_BOTTOM_Y);

    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
    }
    state
        .bullets
        .retain(|b| b.pos.y >= BULLET_CULL_Y && b.pos.x >= min.x && b.pos.x <= max.x);

    for bullet in &mut state.enemy_bullets {
        bullet.prev = bullet.pos;
        bullet.pos += bullet.vel * dt;
    }
    state.enemy_bullets.retain(|b| in_bounds(b.pos, min, max));

    for item in &mut state.items {
        item.pos.y += ITEM_FALL_SPEED * dt;
    }
    state.items.retain(|i| in_bounds(i.pos, min, max));
}

/// Outcome of the bullet-vs-enemy pass, computed before anything is mutated
#[derive(Debug, Clone, PartialEq)]
pub struct HitReport {
    /// HP each enemy is left with, by enemy index
    pub remaining: Vec<u32>,
    /// Whether each enemy took at least one hit
    pub hit: Vec<bool>,
    /// Whether each bullet was consumed, by bullet index
    pub spent: Vec<bool>,
}

/// Phase 5a: work out every bullet hit against a frozen view of both sets
///
/// A bullet touches each enemy at most once per frame. Non-piercing bullets
/// stop at their first hit; piercing ones keep going but skip enemies that
/// are already dead this frame.
pub fn resolve_bullet_hits(bullets: &[Bullet], enemies: &[Enemy]) -> HitReport {
    let mut remaining: Vec<u32> = enemies.iter().map(|e| e.hp).collect();
    let mut hit = vec![false; enemies.len()];
    let mut spent = vec![false; bullets.len()];

    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter().enumerate() {
            if remaining[ei] == 0 {
                continue;
            }
            if !bullet_overlaps_enemy(
                bullet.pos,
                BULLET_RADIUS,
                enemy.pos,
                enemy.half_width(),
                BULLET_HIT_EPS_Y,
            ) {
                continue;
            }

            remaining[ei] = remaining[ei].saturating_sub(bullet.damage);
            hit[ei] = true;
            if !bullet.pierce {
                spent[bi] = true;
                break;
            }
        }
    }

    HitReport {
        remaining,
        hit,
        spent,
    }
}

/// Phase 5b: apply a hit report to enemies and bullets together
fn commit_hits(state: &mut GameState, report: &HitReport) {
    let mut kills: Vec<(Vec2, EnemyKind)> = Vec::new();

    for (i, enemy) in state.enemies.iter_mut().enumerate() {
        if !report.hit.get(i).copied().unwrap_or(false) {
            continue;
        }
        let was_alive = enemy.hp > 0;
        enemy.hp = report.remaining[i];
        enemy.hit_flash = HIT_FLASH;
        if was_alive && enemy.hp == 0 {
            kills.push((enemy.pos, enemy.kind));
        }
    }

    let boss_stage = rule_for_stage(state.stage).boss;
    for (pos, kind) in kills {
        state.score += 1;
        state.total_score += 1;
        if kind.is_boss() && boss_stage {
            log::info!("Boss destroyed on stage {}", state.stage);
            state.boss_defeated = true;
        }
        let id = state.next_entity_id();
        if let Some(item) = roll_drop(&mut state.rng, pos, id) {
            state.items.push(item);
        }
    }
    state.enemies.retain(|e| e.hp > 0);

    let bullets = std::mem::take(&mut state.bullets);
    state.bullets = bullets
        .into_iter()
        .zip(report.spent.iter().copied().chain(std::iter::repeat(false)))
        .filter_map(|(bullet, spent)| (!spent).then_some(bullet))
        .collect();
}

/// Phase 6: swept enemy-bullet hits on the player
///
/// The hurt window counts down first, so the frame it runs out on is already
/// vulnerable.
fn hit_player(state: &mut GameState, dt: f32) {
    if state.hurt_timer > 0.0 {
        state.hurt_timer = (state.hurt_timer - dt).max(0.0);
        if state.hurt_timer > 0.0 {
            return;
        }
    }

    let center = state.player.pos;
    let mut total: u32 = 0;
    state.enemy_bullets.retain(|b| {
        let hit = segment_hits_circle(b.prev, b.pos, center, PLAYER_HIT_RADIUS + b.radius);
        if hit {
            total = total.saturating_add(b.damage);
        }
        !hit
    });

    if total == 0 {
        return;
    }

    state.hurt_timer = state.rules.hurt_window;
    state.player.hp = state.player.hp.saturating_sub(total);
    if state.player.hp == 0 {
        log::info!(
            "Game over on stage {} with {} total kills",
            state.stage,
            state.total_score
        );
        state.mode = Mode::GameOver;
    }
}

/// Phase 7: pick up items near the player
fn collect_items(state: &mut GameState) {
    let player = state.player.pos;
    let mut picked = Vec::new();
    state.items.retain(|item| {
        if within_pickup_range(item.pos, player, ITEM_PICKUP_DX, ITEM_PICKUP_DY) {
            picked.push(item.kind);
            false
        } else {
            true
        }
    });

    for kind in picked {
        log::debug!("Picked up {:?}", kind);
        apply_item(state, kind);
    }
}

/// Phase 9: quota reached (or boss down on the boss stage) clears the stage
fn check_stage_clear(state: &mut GameState) {
    if state.mode != Mode::Playing {
        return;
    }
    let boss_down = rule_for_stage(state.stage).boss && state.boss_defeated;
    if state.score >= stage_target(state.stage) || boss_down {
        log::info!("Stage {} cleared with {} kills", state.stage, state.score);
        state.mode = Mode::Cleared;
    }
}
