//! Compile-time gameplay defaults.
//!
//! These are the authoritative defaults behind [`crate::config::GameConfig`].
//! All durations are milliseconds of game clock; all speeds are pixels per
//! tick at the nominal 60 Hz.

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const PLAYFIELD_WIDTH: f32 = 1280.0;
pub const PLAYFIELD_HEIGHT: f32 = 720.0;

/// Nominal tick length used by the terminal loop.
pub const TICK_MS: u64 = 16;

// ── Hitboxes (width, height) ─────────────────────────────────────────────────

pub const PLAYER_SIZE: (f32, f32) = (100.0, 70.0);
pub const PROJECTILE_SIZE: (f32, f32) = (12.0, 20.0);
pub const HAZARD_SIZE: (f32, f32) = (64.0, 64.0);
pub const ENEMY_SIZE: (f32, f32) = (64.0, 64.0);
pub const BOSS_SIZE: (f32, f32) = (220.0, 220.0);
pub const PICKUP_SIZE: (f32, f32) = (32.0, 32.0);

// ── Player ────────────────────────────────────────────────────────────────────

pub const MAX_HEALTH: i32 = 100;
pub const INITIAL_LIVES: u32 = 3;
pub const PLAYER_SPEED: f32 = 6.0;
pub const POINTER_FOLLOW_FRACTION: f32 = 0.35;
pub const PLAYER_SHOOT_COOLDOWN_MS: u64 = 300;
pub const PLAYER_BULLET_SPEED: f32 = -12.0;
/// Side guns sit this far in from the hitbox edges.
pub const SIDE_GUN_INSET: f32 = 10.0;
/// Players spawn this far above the bottom edge.
pub const PLAYER_SPAWN_LIFT: f32 = 120.0;
pub const BLINK_STEP: f32 = 0.1;
pub const DEAD_IDLE_ALPHA: u8 = 180;

// ── Abilities ─────────────────────────────────────────────────────────────────

pub const UPGRADE_DURATION_MS: u64 = 15_000;
pub const SHIELD_DURATION_MS: u64 = 8_000;
pub const INVULNERABILITY_GIFT_MS: u64 = 5_000;
pub const GRACE_DURATION_MS: u64 = 3_000;
pub const RESPAWN_DEADLINE_MS: u64 = 5_000;
pub const REVIVE_HEALTH: i32 = 50;
pub const REVIVE_HEAL: i32 = 50;
pub const EXTRA_LIFE_HEAL: i32 = 30;
pub const TELEPORT_MARGIN: f32 = 80.0;
pub const TELEPORT_BOTTOM_MARGIN: f32 = 160.0;

// ── Damage & score ────────────────────────────────────────────────────────────

pub const ENEMY_BULLET_DAMAGE: i32 = 15;
pub const HAZARD_DAMAGE: i32 = 20;
pub const EVIL_HAZARD_DAMAGE: i32 = 40;
pub const HAZARD_SCORE: u32 = 10;
pub const ENEMY_SCORE: u32 = 50;
pub const BOSS_KILLER_BONUS: u32 = 500;
pub const BOSS_PARTNER_BONUS: u32 = 300;

// ── Hazards ───────────────────────────────────────────────────────────────────

pub const HAZARD_FLOOR: usize = 8;
/// Left-edge range of a recycled hazard is `[0, width - HAZARD_RECYCLE_INSET]`.
pub const HAZARD_RECYCLE_INSET: f32 = 40.0;
pub const HAZARD_RECYCLE_TOP: (i32, i32) = (-220, -40);
pub const HAZARD_SPAWN_CENTRE_Y: (i32, i32) = (-300, -40);
pub const HAZARD_SPEED_RANGE: (i32, i32) = (1, 2);
pub const EVIL_HAZARD_SPEED_RANGE: (i32, i32) = (1, 3);
pub const HAZARD_DRIFT_RANGE: (i32, i32) = (-2, 2);
pub const HAZARD_SPIN_RANGE: (i32, i32) = (-5, 5);

// ── Enemy waves ───────────────────────────────────────────────────────────────

pub const ENEMY_HEALTH: i32 = 3;
pub const ENEMY_WAVE_SIZE: u32 = 5;
pub const ENEMY_KILL_QUOTA: u32 = 15;
pub const ENEMY_FIRE_DELAY_MS: u64 = 900;
pub const ENEMY_FIRE_JITTER_MS: i32 = 200;
pub const ENEMY_BULLET_SPEED: f32 = 6.0;
pub const ENEMY_JITTER_PERIOD_MS: u64 = 1_200;
pub const ENEMY_JITTER_STEPS: [f32; 5] = [-40.0, -20.0, 0.0, 20.0, 40.0];
pub const WAVE_MARGIN: f32 = 120.0;
pub const WAVE_ROW_Y: f32 = 120.0;
pub const WAVE_ROW_JITTER: i32 = 20;

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_HEALTH: i32 = 80;
pub const BOSS_SPAWN_Y: f32 = 150.0;
pub const BOSS_SPEED: f32 = 2.0;
pub const BOSS_PATROL_MARGIN: f32 = 100.0;
pub const BOSS_FIRE_COOLDOWN_MS: u64 = 1_500;
pub const BOSS_RAPID_COOLDOWN_MS: u64 = 300;
pub const BOSS_MODE_PERIOD_MS: u64 = 5_000;
pub const BOSS_NORMAL_OFFSETS: [f32; 3] = [-40.0, 0.0, 40.0];
pub const BOSS_SPREAD_ANGLES: [f32; 5] = [-30.0, -15.0, 0.0, 15.0, 30.0];
pub const BOSS_SPREAD_DRIFT_PER_DEGREE: f32 = 0.2;
pub const BOSS_BULLET_SPEED: f32 = 8.0;
pub const BOSS_RAPID_BULLET_SPEED: f32 = 10.0;
pub const BOSS_MILESTONE_HP: i32 = 10;
pub const BOSS_MILESTONE_SCATTER: i32 = 50;
pub const BOSS_DEFEAT_DROPS: usize = 3;
pub const BOSS_DEFEAT_SCATTER: i32 = 100;
pub const MINION_PERIOD_MS: (u64, u64) = (5_000, 6_000);
pub const MINION_MARGIN: f32 = 150.0;
pub const MINION_DROP_OFFSET: f32 = 60.0;

// ── Pickups & effects ─────────────────────────────────────────────────────────

pub const PICKUP_FALL_SPEED: f32 = 2.0;
pub const PICKUP_FLOAT_RATE: f32 = 0.005;
pub const HAZARD_DROP_CHANCE: f64 = 0.5;
pub const ENEMY_DROP_CHANCE: f64 = 0.6;
pub const ENEMY_GUARANTEED_DROP_EVERY: u32 = 3;
pub const MINION_DROP_CHANCE: f64 = 0.4;
pub const EXPLOSION_FRAMES: u8 = 6;
pub const EXPLOSION_FRAME_MS: u64 = 60;

// ── Phase progression ─────────────────────────────────────────────────────────

pub const PHASE_SCORE_THRESHOLD: u32 = 1_500;
pub const TRANSITION_MS: u64 = 3_000;
pub const SPEED_STEP_INTERVAL: u32 = 500;
pub const SPEED_STEP: f32 = 0.3;

// ── High scores ───────────────────────────────────────────────────────────────

pub const HIGH_SCORE_CAPACITY: usize = 10;
