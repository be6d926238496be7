//! Spawn and respawn policy: hazard population, enemy waves, the boss and
//! its minions, and pickup drops.
//!
//! All randomness goes through the injected [`RandomSource`].

use glam::Vec2;

use crate::constants::*;
use crate::entities::{
    AttackMode, Boss, EnemyShip, Hazard, HazardKind, Pickup, PickupKind, SimulationState,
};
use crate::rng::{choose, RandomSource};

// ── Hazards ───────────────────────────────────────────────────────────────────

/// Kinds for the opening hazard field.
const INITIAL_HAZARD_KINDS: [HazardKind; 2] = [HazardKind::Default, HazardKind::Evil];
const INITIAL_HAZARD_WEIGHTS: [u32; 2] = [2, 1];

/// Weights for topping the field back up, in [`HazardKind::ALL`] order.
const TOP_UP_HAZARD_WEIGHTS: [u32; 8] = [35, 15, 12, 10, 15, 10, 5, 3];

fn roll_range(rng: &mut impl RandomSource, range: (i32, i32)) -> f32 {
    rng.int_inclusive(range.0, range.1) as f32
}

fn roll_hazard_motion(hazard: &mut Hazard, rng: &mut impl RandomSource) {
    hazard.vel = Vec2::new(
        roll_range(rng, HAZARD_DRIFT_RANGE),
        roll_range(rng, hazard.kind.speed_range()),
    );
    hazard.rotation_rate = roll_range(rng, HAZARD_SPIN_RANGE);
}

/// A fresh hazard somewhere above the top edge.
pub fn new_hazard(kind: HazardKind, rng: &mut impl RandomSource, width: f32) -> Hazard {
    let inset = HAZARD_RECYCLE_INSET as i32;
    let x = rng.int_inclusive(inset, width as i32 - inset) as f32;
    let y = roll_range(rng, HAZARD_SPAWN_CENTRE_Y);
    let mut hazard = Hazard {
        pos: Vec2::new(x, y),
        vel: Vec2::ZERO,
        rotation: 0.0,
        rotation_rate: 0.0,
        kind,
    };
    roll_hazard_motion(&mut hazard, rng);
    hazard
}

/// Moves a hazard back above the field with fresh velocities, keeping its
/// kind.
pub fn recycle_hazard(hazard: &mut Hazard, rng: &mut impl RandomSource, width: f32) {
    let left = rng.int_inclusive(0, (width - HAZARD_RECYCLE_INSET) as i32) as f32;
    let top = roll_range(rng, HAZARD_RECYCLE_TOP);
    hazard.pos = Vec2::new(left + HAZARD_SIZE.0 / 2.0, top + HAZARD_SIZE.1 / 2.0);
    roll_hazard_motion(hazard, rng);
}

/// Seeds the opening field up to the configured floor.
pub fn spawn_initial_hazards(state: &mut SimulationState, rng: &mut impl RandomSource) {
    let width = state.config.width;
    for _ in 0..state.config.hazard_floor {
        let kind = choose(rng, &INITIAL_HAZARD_KINDS, Some(&INITIAL_HAZARD_WEIGHTS))
            .copied()
            .unwrap_or(HazardKind::Default);
        state.hazards.insert(new_hazard(kind, rng, width));
    }
    tracing::debug!("seeded {} hazards", state.hazards.len());
}

/// Spawns hazards until the floor is met.  Returns how many were added.
pub fn top_up_hazards(state: &mut SimulationState, rng: &mut impl RandomSource) -> usize {
    let width = state.config.width;
    let mut added = 0;
    while state.hazards.len() < state.config.hazard_floor {
        let kind = choose(rng, &HazardKind::ALL, Some(&TOP_UP_HAZARD_WEIGHTS))
            .copied()
            .unwrap_or(HazardKind::Default);
        state.hazards.insert(new_hazard(kind, rng, width));
        added += 1;
    }
    added
}

// ── Enemy waves ───────────────────────────────────────────────────────────────

/// Ships in the next wave: the configured wave size, capped by what is left
/// of the kill quota.
pub fn wave_size(enemies_killed: u32, wave_size: u32, kill_quota: u32) -> u32 {
    wave_size.min(kill_quota.saturating_sub(enemies_killed))
}

/// Horizontal centres for `count` ships spread across the field.
pub fn wave_layout(count: u32, width: f32) -> Vec<f32> {
    if count == 1 {
        return vec![width / 2.0];
    }
    let gaps = count.saturating_sub(1).max(1) as f32;
    let spacing = ((width - 2.0 * WAVE_MARGIN) / gaps).max(1.0);
    (0..count)
        .map(|i| WAVE_MARGIN + i as f32 * spacing)
        .collect()
}

fn new_enemy(pos: Vec2, minion: bool, now_ms: u64, rng: &mut impl RandomSource) -> EnemyShip {
    let jitter = rng.int_inclusive(-ENEMY_FIRE_JITTER_MS, ENEMY_FIRE_JITTER_MS);
    let fire_delay_ms = (ENEMY_FIRE_DELAY_MS as i64 + jitter as i64).max(0) as u64;
    EnemyShip {
        pos,
        health: ENEMY_HEALTH,
        fire_delay_ms,
        next_shot_ms: now_ms + fire_delay_ms,
        next_jitter_ms: now_ms + ENEMY_JITTER_PERIOD_MS,
        minion,
    }
}

/// Spawns the next wave when the field is empty and the quota is unmet.
/// Returns the number of ships spawned.
pub fn spawn_wave(state: &mut SimulationState, rng: &mut impl RandomSource) -> u32 {
    if !state.enemies.is_empty() {
        return 0;
    }
    let count = wave_size(
        state.phase.enemies_killed,
        state.config.enemy_wave_size,
        state.config.enemy_kill_quota,
    );
    let now = state.clock_ms;
    for x in wave_layout(count, state.config.width) {
        let y = WAVE_ROW_Y + rng.int_inclusive(-WAVE_ROW_JITTER, WAVE_ROW_JITTER) as f32;
        state.enemies.insert(new_enemy(Vec2::new(x, y), false, now, rng));
    }
    if count > 0 {
        tracing::debug!("spawned wave of {count} ships");
    }
    count
}

// ── Boss ──────────────────────────────────────────────────────────────────────

pub fn new_boss(health: i32, now_ms: u64, width: f32, rng: &mut impl RandomSource) -> Boss {
    let (lo, hi) = MINION_PERIOD_MS;
    Boss {
        pos: Vec2::new(width / 2.0, BOSS_SPAWN_Y),
        health,
        direction: 1.0,
        mode: AttackMode::Normal,
        next_shot_ms: now_ms + BOSS_FIRE_COOLDOWN_MS,
        next_mode_ms: now_ms + BOSS_MODE_PERIOD_MS,
        next_minion_ms: now_ms + rng.int_inclusive(lo as i32, hi as i32) as u64,
    }
}

/// Boss-fight reinforcements.  Returns true when a minion spawned.
pub fn spawn_minion_if_due(state: &mut SimulationState, rng: &mut impl RandomSource) -> bool {
    let now = state.clock_ms;
    let width = state.config.width;
    let Some(boss) = state.boss.as_mut() else {
        return false;
    };
    if now < boss.next_minion_ms {
        return false;
    }
    let (lo, hi) = MINION_PERIOD_MS;
    boss.next_minion_ms = now + rng.int_inclusive(lo as i32, hi as i32) as u64;
    let y = boss.hitbox().max.y + MINION_DROP_OFFSET;
    let x = rng.int_inclusive(MINION_MARGIN as i32, (width - MINION_MARGIN) as i32) as f32;
    state.enemies.insert(new_enemy(Vec2::new(x, y), true, now, rng));
    true
}

// ── Pickup drops ──────────────────────────────────────────────────────────────

/// Which kill produced a drop roll; each has its own pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropSource {
    Hazard,
    Enemy,
    Minion,
    Boss,
}

const ENEMY_POOL: [PickupKind; 4] = [
    PickupKind::WeaponUpgrade,
    PickupKind::ExtraLife,
    PickupKind::Shield,
    PickupKind::InvulnerabilityGift,
];
const ENEMY_WEIGHTS: [u32; 4] = [30, 25, 25, 20];

const BOSS_POOL: [PickupKind; 3] = [
    PickupKind::Shield,
    PickupKind::ExtraLife,
    PickupKind::WeaponUpgrade,
];
const BOSS_WEIGHTS: [u32; 3] = [40, 35, 25];

/// Picks a pickup kind from the pool of `source`, without a chance roll.
pub fn pick_drop_kind(
    source: DropSource,
    two_player: bool,
    rng: &mut impl RandomSource,
) -> Option<PickupKind> {
    match source {
        DropSource::Hazard => {
            let mut pool = vec![
                PickupKind::InvulnerabilityGift,
                PickupKind::WeaponUpgrade,
                PickupKind::ExtraLife,
                PickupKind::TeleportCharge,
                PickupKind::Shield,
            ];
            if two_player {
                pool.push(PickupKind::Revive);
            }
            choose(rng, &pool, None).copied()
        }
        DropSource::Enemy => choose(rng, &ENEMY_POOL, Some(&ENEMY_WEIGHTS)).copied(),
        DropSource::Minion | DropSource::Boss => {
            choose(rng, &BOSS_POOL, Some(&BOSS_WEIGHTS)).copied()
        }
    }
}

/// Chance that a kill drops anything at all.  `kills` is the wave kill
/// count after this kill, used for the guaranteed every-third drop.
pub fn drop_chance(source: DropSource, kills: u32) -> f64 {
    match source {
        DropSource::Hazard => HAZARD_DROP_CHANCE,
        DropSource::Enemy if kills % ENEMY_GUARANTEED_DROP_EVERY == 0 => 1.0,
        DropSource::Enemy => ENEMY_DROP_CHANCE,
        DropSource::Minion => MINION_DROP_CHANCE,
        DropSource::Boss => 1.0,
    }
}

pub fn place_pickup(
    state: &mut SimulationState,
    kind: PickupKind,
    at: Vec2,
    rng: &mut impl RandomSource,
) {
    let float_offset = (rng.roll() * std::f64::consts::PI) as f32;
    state.pickups.insert(Pickup {
        pos: at,
        kind,
        float_offset,
    });
}

/// Rolls the drop chance for a kill and places the pickup if it hits.
pub fn roll_drop(
    state: &mut SimulationState,
    source: DropSource,
    at: Vec2,
    rng: &mut impl RandomSource,
) -> Option<PickupKind> {
    let chance = drop_chance(source, state.phase.enemies_killed);
    if !rng.chance(chance) {
        return None;
    }
    let kind = pick_drop_kind(source, state.two_player, rng)?;
    place_pickup(state, kind, at, rng);
    Some(kind)
}

/// Guaranteed boss drops scattered around `centre`.
pub fn scatter_boss_drops(
    state: &mut SimulationState,
    centre: Vec2,
    count: usize,
    scatter: i32,
    rng: &mut impl RandomSource,
) {
    for _ in 0..count {
        let offset = Vec2::new(
            rng.int_inclusive(-scatter, scatter) as f32,
            rng.int_inclusive(-scatter, scatter) as f32,
        );
        if let Some(kind) = pick_drop_kind(DropSource::Boss, state.two_player, rng) {
            place_pickup(state, kind, centre + offset, rng);
        }
    }
}
