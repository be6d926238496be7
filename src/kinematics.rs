//! Per-tick movement for every entity category.

use glam::Vec2;

use crate::arena::Arena;
use crate::compute::PlayerInput;
use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{AttackMode, Boss, EnemyShip, Explosion, Hazard, Pickup, Player, Projectile};
use crate::rng::{choose, RandomSource};
use crate::spawn::recycle_hazard;

// ── Players ───────────────────────────────────────────────────────────────────

/// Keyboard directions add up; pointer mode eases toward the pointer.  The
/// hitbox always ends inside the field.  Dead players only advance their
/// blink animation.
pub fn move_player(player: &mut Player, input: &PlayerInput, config: &GameConfig) {
    if !player.alive {
        player.blink_phase += BLINK_STEP;
        return;
    }

    match input.pointer {
        Some(target) if player.mouse_control => {
            player.pos += (target - player.pos) * POINTER_FOLLOW_FRACTION;
        }
        _ => {
            let mut step = Vec2::ZERO;
            if input.left {
                step.x -= config.player_speed;
            }
            if input.right {
                step.x += config.player_speed;
            }
            if input.up {
                step.y -= config.player_speed;
            }
            if input.down {
                step.y += config.player_speed;
            }
            player.pos += step;
        }
    }

    player.pos = player
        .hitbox()
        .clamp_into(config.width, config.height)
        .centre();
}

// ── Projectiles ───────────────────────────────────────────────────────────────

pub fn advance_projectiles(projectiles: &mut Arena<Projectile>, config: &GameConfig) {
    for (_, projectile) in projectiles.iter_mut() {
        projectile.pos += projectile.vel;
    }
    projectiles.retain(|p| !p.hitbox().is_outside(config.width, config.height));
}

// ── Hazards ───────────────────────────────────────────────────────────────────

fn hazard_left_field(hazard: &Hazard, width: f32, height: f32) -> bool {
    let hitbox = hazard.hitbox();
    hitbox.min.y > height || hitbox.max.x < 0.0 || hitbox.min.x > width
}

/// Falls, drifts and spins every hazard.  Ones that leave the field are
/// recycled above it, never removed.
pub fn advance_hazards(
    hazards: &mut Arena<Hazard>,
    speed_multiplier: f32,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) {
    for (_, hazard) in hazards.iter_mut() {
        hazard.pos.y += hazard.vel.y * speed_multiplier;
        hazard.pos.x += hazard.vel.x;
        hazard.rotation = (hazard.rotation + hazard.rotation_rate).rem_euclid(360.0);
        if hazard_left_field(hazard, config.width, config.height) {
            recycle_hazard(hazard, rng, config.width);
        }
    }
}

// ── Enemies & boss ────────────────────────────────────────────────────────────

pub fn advance_enemies(
    enemies: &mut Arena<EnemyShip>,
    now_ms: u64,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) {
    for (_, enemy) in enemies.iter_mut() {
        if now_ms < enemy.next_jitter_ms {
            continue;
        }
        enemy.next_jitter_ms = now_ms + ENEMY_JITTER_PERIOD_MS;
        let step = choose(rng, &ENEMY_JITTER_STEPS, None).copied().unwrap_or(0.0);
        enemy.pos.x += step;
        enemy.pos = enemy
            .hitbox()
            .clamp_into(config.width, config.height)
            .centre();
    }
}

/// Patrols between the side margins and rerolls the attack mode on its
/// period.
pub fn advance_boss(boss: &mut Boss, now_ms: u64, config: &GameConfig, rng: &mut impl RandomSource) {
    boss.pos.x += BOSS_SPEED * boss.direction;
    let hitbox = boss.hitbox();
    if hitbox.max.x > config.width - BOSS_PATROL_MARGIN {
        boss.direction = -1.0;
    } else if hitbox.min.x < BOSS_PATROL_MARGIN {
        boss.direction = 1.0;
    }

    if now_ms >= boss.next_mode_ms {
        boss.next_mode_ms = now_ms + BOSS_MODE_PERIOD_MS;
        boss.mode = choose(rng, &AttackMode::ALL, None)
            .copied()
            .unwrap_or(AttackMode::Normal);
        tracing::debug!("boss switches to {:?}", boss.mode);
    }
}

// ── Pickups & explosions ──────────────────────────────────────────────────────

pub fn advance_pickups(pickups: &mut Arena<Pickup>, now_ms: u64, config: &GameConfig) {
    for (_, pickup) in pickups.iter_mut() {
        let bob = (now_ms as f32 * PICKUP_FLOAT_RATE + pickup.float_offset).sin();
        pickup.pos.y += PICKUP_FALL_SPEED + bob;
    }
    pickups.retain(|p| p.hitbox().min.y <= config.height);
}

pub fn new_explosion(at: Vec2, now_ms: u64) -> Explosion {
    Explosion {
        pos: at,
        frame: 0,
        next_frame_ms: now_ms + EXPLOSION_FRAME_MS,
    }
}

pub fn advance_explosions(explosions: &mut Arena<Explosion>, now_ms: u64) {
    for (_, explosion) in explosions.iter_mut() {
        if now_ms >= explosion.next_frame_ms {
            explosion.frame += 1;
            explosion.next_frame_ms = now_ms + EXPLOSION_FRAME_MS;
        }
    }
    explosions.retain(|e| e.frame < EXPLOSION_FRAMES);
}
