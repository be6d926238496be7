//! Runtime-tunable game configuration.
//!
//! [`GameConfig`] mirrors the tunables in [`crate::constants`].  The terminal
//! binary optionally reads a TOML file and overwrites the defaults with any
//! keys present; missing keys fall back to the compile-time defaults, so a
//! file can override just the values you care about:
//!
//! ```toml
//! hazard_floor = 12
//! hazard_policy = "replenish"
//! phase_score_threshold = 800
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{GameError, GameResult};

/// What happens to a hazard destroyed by a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardPolicy {
    /// The hazard is recycled in place: the population is permanent.
    #[default]
    Recycle,
    /// The hazard is removed; the spawn floor tops the field back up.
    Replenish,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Playfield ────────────────────────────────────────────────────────────
    pub width: f32,
    pub height: f32,

    // ── Players ──────────────────────────────────────────────────────────────
    pub initial_lives: u32,
    pub player_speed: f32,
    pub shoot_cooldown_ms: u64,
    pub respawn_deadline_ms: u64,

    // ── Abilities ────────────────────────────────────────────────────────────
    pub upgrade_ms: u64,
    pub shield_ms: u64,
    pub invulnerability_gift_ms: u64,
    pub grace_ms: u64,

    // ── Hazards ──────────────────────────────────────────────────────────────
    pub hazard_floor: usize,
    pub hazard_policy: HazardPolicy,

    // ── Progression ──────────────────────────────────────────────────────────
    pub phase_score_threshold: u32,
    pub enemy_wave_size: u32,
    pub enemy_kill_quota: u32,
    pub boss_health: i32,
    pub transition_ms: u64,
    pub speed_step_interval: u32,
    pub speed_step: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            initial_lives: INITIAL_LIVES,
            player_speed: PLAYER_SPEED,
            shoot_cooldown_ms: PLAYER_SHOOT_COOLDOWN_MS,
            respawn_deadline_ms: RESPAWN_DEADLINE_MS,
            upgrade_ms: UPGRADE_DURATION_MS,
            shield_ms: SHIELD_DURATION_MS,
            invulnerability_gift_ms: INVULNERABILITY_GIFT_MS,
            grace_ms: GRACE_DURATION_MS,
            hazard_floor: HAZARD_FLOOR,
            hazard_policy: HazardPolicy::Recycle,
            phase_score_threshold: PHASE_SCORE_THRESHOLD,
            enemy_wave_size: ENEMY_WAVE_SIZE,
            enemy_kill_quota: ENEMY_KILL_QUOTA,
            boss_health: BOSS_HEALTH,
            transition_ms: TRANSITION_MS,
            speed_step_interval: SPEED_STEP_INTERVAL,
            speed_step: SPEED_STEP,
        }
    }
}

impl GameConfig {
    /// Parses a TOML document on top of the defaults and validates it.
    pub fn from_toml_str(contents: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(contents)
            .map_err(|err| GameError::Config(format!("failed to parse TOML: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> GameResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(GameError::Config(format!(
                "playfield must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.hazard_floor == 0 {
            return Err(GameError::Config("hazard_floor must be at least 1".into()));
        }
        if self.enemy_wave_size == 0 {
            return Err(GameError::Config("enemy_wave_size must be at least 1".into()));
        }
        if self.boss_health <= 0 {
            return Err(GameError::Config("boss_health must be positive".into()));
        }
        if self.speed_step_interval == 0 {
            return Err(GameError::Config(
                "speed_step_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
