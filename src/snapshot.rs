//! Save-game snapshot.
//!
//! A [`Snapshot`] keeps only what a player would expect to survive a
//! save/load: stage and phase, both players' stats and positions, the hazard
//! field and the wave counters.  Projectiles, enemy ships, pickups and
//! explosions are transient and are not saved.  Every field has a default,
//! so older or hand-edited save files still load.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::abilities;
use crate::arena::Arena;
use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{spawn_position, Hazard, HazardKind, Player, PlayerId, SimulationState};
use crate::error::{GameError, GameResult};
use crate::phase::{Phase, PhaseState, Stage};
use crate::rng::RandomSource;
use crate::spawn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSnapshot {
    /// `None` means the player's spawn point.
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub health: i32,
    pub score: u32,
    pub extra_guns: u32,
    pub teleport_charge: bool,
    pub lives: u32,
    pub alive: bool,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            health: MAX_HEALTH,
            score: 0,
            extra_guns: 0,
            teleport_charge: false,
            lives: INITIAL_LIVES,
            alive: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardSnapshot {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_hazard_kind")]
    pub kind: HazardKind,
    #[serde(default = "default_hazard_speed")]
    pub velocity_y: f32,
    #[serde(default)]
    pub velocity_x: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub rotation_rate: f32,
}

fn default_hazard_kind() -> HazardKind {
    HazardKind::Default
}

fn default_hazard_speed() -> f32 {
    HAZARD_SPEED_RANGE.0 as f32
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub stage: Stage,
    pub phase: Phase,
    pub two_player: bool,
    pub player1: PlayerSnapshot,
    pub player2: Option<PlayerSnapshot>,
    pub hazards: Vec<HazardSnapshot>,
    pub global_speed_multiplier: f32,
    pub enemies_killed: u32,
    pub current_wave: u32,
    /// Only present when saved mid boss fight.
    pub boss_health: Option<i32>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            stage: Stage::Asteroids,
            phase: Phase::AsteroidField,
            two_player: false,
            player1: PlayerSnapshot::default(),
            player2: None,
            hazards: Vec::new(),
            global_speed_multiplier: 1.0,
            enemies_killed: 0,
            current_wave: 0,
            boss_health: None,
        }
    }
}

// ── Capture ───────────────────────────────────────────────────────────────────

fn capture_player(player: &Player) -> PlayerSnapshot {
    PlayerSnapshot {
        x: Some(player.pos.x),
        y: Some(player.pos.y),
        health: player.health,
        score: player.score,
        extra_guns: player.extra_guns,
        teleport_charge: player.teleport_charge,
        lives: player.lives,
        alive: player.alive,
    }
}

pub fn capture(state: &SimulationState) -> Snapshot {
    let player1 = state
        .player(PlayerId::One)
        .map(capture_player)
        .unwrap_or_default();
    let player2 = if state.two_player {
        state.player(PlayerId::Two).map(capture_player)
    } else {
        None
    };
    let hazards = state
        .hazards
        .values()
        .map(|h| HazardSnapshot {
            x: h.pos.x,
            y: h.pos.y,
            kind: h.kind,
            velocity_y: h.vel.y,
            velocity_x: h.vel.x,
            rotation: h.rotation,
            rotation_rate: h.rotation_rate,
        })
        .collect();

    Snapshot {
        stage: state.phase.stage,
        phase: state.phase.phase,
        two_player: state.two_player,
        player1,
        player2,
        hazards,
        global_speed_multiplier: state.phase.speed_multiplier,
        enemies_killed: state.phase.enemies_killed,
        current_wave: state.phase.current_wave,
        boss_health: state.boss.as_ref().map(|b| b.health),
    }
}

// ── Restore ───────────────────────────────────────────────────────────────────

fn finite(values: &[f32], what: &str) -> GameResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GameError::InvalidSnapshot(format!("{what} is not a finite number")))
    }
}

fn restore_player(
    id: PlayerId,
    saved: &PlayerSnapshot,
    config: &GameConfig,
) -> GameResult<Player> {
    let spawn = spawn_position(id, config);
    let pos = Vec2::new(saved.x.unwrap_or(spawn.x), saved.y.unwrap_or(spawn.y));
    finite(&[pos.x, pos.y], "player position")?;

    let mut player = Player::new(id, pos, saved.lives);
    player.health = saved.health.clamp(0, MAX_HEALTH);
    player.alive = player.health > 0;
    player.score = saved.score;
    player.teleport_charge = player.alive && saved.teleport_charge;
    if saved.extra_guns > 0 {
        abilities::activate_upgrade(&mut player, 0, config);
    }
    Ok(player)
}

/// Builds a fresh simulation from a snapshot.  Health is clamped and the
/// alive flag follows it; an upgrade that was active gets its full duration
/// back; an asteroid field saved with no hazards is re-seeded; a boss fight
/// gets its boss back.
pub fn restore(
    snapshot: &Snapshot,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> GameResult<SimulationState> {
    if !(snapshot.global_speed_multiplier.is_finite() && snapshot.global_speed_multiplier > 0.0) {
        return Err(GameError::InvalidSnapshot(format!(
            "speed multiplier {} must be positive",
            snapshot.global_speed_multiplier
        )));
    }

    let mut players = vec![restore_player(PlayerId::One, &snapshot.player1, config)?];
    if snapshot.two_player {
        let saved = snapshot.player2.clone().unwrap_or_default();
        players.push(restore_player(PlayerId::Two, &saved, config)?);
    }

    let mut hazards = Arena::new();
    for saved in &snapshot.hazards {
        finite(
            &[
                saved.x,
                saved.y,
                saved.velocity_x,
                saved.velocity_y,
                saved.rotation,
                saved.rotation_rate,
            ],
            "hazard field",
        )?;
        hazards.insert(Hazard {
            pos: Vec2::new(saved.x, saved.y),
            vel: Vec2::new(saved.velocity_x, saved.velocity_y),
            rotation: saved.rotation,
            rotation_rate: saved.rotation_rate,
            kind: saved.kind,
        });
    }

    let stage = snapshot
        .phase
        .stage()
        .map_or(snapshot.stage, |s| s.max(snapshot.stage));
    let phase = PhaseState {
        phase: snapshot.phase,
        stage,
        paused: false,
        enemies_killed: snapshot.enemies_killed,
        current_wave: snapshot.current_wave,
        speed_multiplier: snapshot.global_speed_multiplier,
        transition_started_ms: 0,
    };

    let mut state = SimulationState {
        config: config.clone(),
        clock_ms: 0,
        two_player: snapshot.two_player,
        players,
        projectiles: Default::default(),
        hazards,
        enemies: Default::default(),
        pickups: Default::default(),
        explosions: Default::default(),
        boss: None,
        phase,
        events: Vec::new(),
    };

    if state.phase.phase == Phase::AsteroidField && state.hazards.is_empty() {
        spawn::spawn_initial_hazards(&mut state, rng);
    }

    if state.phase.phase == Phase::BossFight {
        let health = snapshot.boss_health.unwrap_or(config.boss_health);
        if health <= 0 {
            return Err(GameError::InvalidSnapshot(format!(
                "boss health {health} in a boss fight"
            )));
        }
        state.boss = Some(spawn::new_boss(health, 0, config.width, rng));
    }

    tracing::info!(
        phase = ?state.phase.phase,
        hazards = state.hazards.len(),
        "restored snapshot"
    );
    Ok(state)
}
