//! Pure game-logic entry points.
//!
//! Every public function takes an immutable reference to the current
//! [`SimulationState`] (and, where needed, an RNG handle) and returns a
//! brand-new state.  Side effects are limited to the injected RNG.

use glam::Vec2;

use crate::abilities;
use crate::collision::resolve_collisions;
use crate::combat;
use crate::config::GameConfig;
use crate::entities::{spawn_position, Player, PlayerId, SimulationState};
use crate::error::GameResult;
use crate::events::GameEvent;
use crate::kinematics;
use crate::phase::{self, Phase, PhaseEffect, PhaseEvent, PhaseRules, PhaseState, Stage};
use crate::rng::RandomSource;
use crate::snapshot::{self, Snapshot};
use crate::spawn;

// ── Inputs & outcomes ─────────────────────────────────────────────────────────

/// One player's controls for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Pointer position in playfield pixels; followed when the player has
    /// mouse control switched on.
    pub pointer: Option<Vec2>,
}

/// Everything the outside world feeds into one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub players: [PlayerInput; 2],
}

impl TickInput {
    pub fn for_player(&self, id: PlayerId) -> &PlayerInput {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerInput {
        &mut self.players[id.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// No such player in this game (player two in single-player).
    UnknownPlayer,
    PlayerDead,
    OnCooldown,
    NoTeleportCharge,
    /// Paused, between phases, or the game is over.
    NotRunning,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub fn is_accepted(self) -> bool {
        self == CommandOutcome::Accepted
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build the opening state: players at their spawn points and a seeded
/// hazard field.
pub fn new_game(
    two_player: bool,
    config: GameConfig,
    rng: &mut impl RandomSource,
) -> SimulationState {
    let ids: &[PlayerId] = if two_player {
        &PlayerId::ALL
    } else {
        &[PlayerId::One]
    };
    let players = ids
        .iter()
        .map(|&id| Player::new(id, spawn_position(id, &config), config.initial_lives))
        .collect();

    let mut state = SimulationState {
        config,
        clock_ms: 0,
        two_player,
        players,
        projectiles: Default::default(),
        hazards: Default::default(),
        enemies: Default::default(),
        pickups: Default::default(),
        explosions: Default::default(),
        boss: None,
        phase: PhaseState::default(),
        events: Vec::new(),
    };
    spawn::spawn_initial_hazards(&mut state, rng);
    tracing::info!(two_player, "new game");
    state
}

/// Same players and config, everything else back to the start.
pub fn restart(state: &SimulationState, rng: &mut impl RandomSource) -> SimulationState {
    let mut next = new_game(state.two_player, state.config.clone(), rng);
    let (phase, _) = phase::advance(
        &state.phase,
        PhaseEvent::Reset,
        state.clock_ms,
        &PhaseRules::from(&state.config),
    );
    next.phase = phase;
    next
}

pub fn save_game(state: &SimulationState) -> Snapshot {
    snapshot::capture(state)
}

pub fn load_game(
    snapshot: &Snapshot,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> GameResult<SimulationState> {
    snapshot::restore(snapshot, config, rng)
}

// ── Phase plumbing ────────────────────────────────────────────────────────────

fn milestone_name(two_player: bool) -> &'static str {
    if two_player {
        "DUO"
    } else {
        "PLAYER1"
    }
}

fn push_milestone(state: &mut SimulationState, phases_completed: u32, victory: bool) {
    state.events.push(GameEvent::ScoreMilestone {
        name: milestone_name(state.two_player).to_string(),
        score: state.combined_score(),
        phases_completed,
        victory,
    });
}

/// Spawns the next enemy wave if the field is clear and the quota unmet.
pub(crate) fn spawn_next_wave(state: &mut SimulationState, rng: &mut impl RandomSource) {
    let size = spawn::spawn_wave(state, rng);
    if size == 0 {
        return;
    }
    apply_phase_event(state, PhaseEvent::WaveSpawned, rng);
    state.events.push(GameEvent::WaveSpawned {
        wave: state.phase.current_wave,
        size,
    });
}

/// Feeds one event through the phase machine and carries out whatever the
/// transition asks of the world.
pub(crate) fn apply_phase_event(
    state: &mut SimulationState,
    event: PhaseEvent,
    rng: &mut impl RandomSource,
) -> PhaseEffect {
    let rules = PhaseRules::from(&state.config);
    let (next, effect) = phase::advance(&state.phase, event, state.clock_ms, &rules);
    state.phase = next;

    match effect {
        PhaseEffect::None | PhaseEffect::Reset => {}
        PhaseEffect::PauseToggled(paused) => state.events.push(GameEvent::Paused(paused)),
        PhaseEffect::Entered { from, to } => {
            state.events.push(GameEvent::PhaseChanged { from, to });
            match to {
                Phase::Victory => push_milestone(state, Stage::Boss.number(), true),
                Phase::Defeat => {
                    let reached = state.phase.stage.number();
                    push_milestone(state, reached, false);
                }
                _ => {}
            }
        }
        PhaseEffect::BeginWaves => {
            state.hazards.clear();
            state.projectiles.clear();
            state.pickups.clear();
            state.explosions.clear();
            state.events.push(GameEvent::PhaseChanged {
                from: Phase::Transition,
                to: Phase::EnemyWaves,
            });
            push_milestone(state, Stage::Asteroids.number(), false);
            spawn_next_wave(state, rng);
        }
        PhaseEffect::BeginBossFight => {
            state.projectiles.clear();
            state.pickups.clear();
            state.explosions.clear();
            state.enemies.clear();
            state.events.push(GameEvent::PhaseChanged {
                from: Phase::BossTransition,
                to: Phase::BossFight,
            });
            push_milestone(state, Stage::Enemies.number(), false);
            state.boss = Some(spawn::new_boss(
                state.config.boss_health,
                state.clock_ms,
                state.config.width,
                rng,
            ));
        }
    }
    effect
}

// ── Player commands (pure) ────────────────────────────────────────────────────

fn shoot_in_place(state: &mut SimulationState, id: PlayerId) -> CommandOutcome {
    if !state.phase.is_running() {
        return CommandOutcome::Rejected(RejectReason::NotRunning);
    }
    let now = state.clock_ms;
    let config = state.config.clone();
    let Some(player) = state.player_mut(id) else {
        return CommandOutcome::Rejected(RejectReason::UnknownPlayer);
    };
    if !player.alive {
        return CommandOutcome::Rejected(RejectReason::PlayerDead);
    }
    let Some(shots) = combat::fire_player(player, now, &config) else {
        return CommandOutcome::Rejected(RejectReason::OnCooldown);
    };
    let count = shots.len();
    for shot in shots {
        state.projectiles.insert(shot);
    }
    state.events.push(GameEvent::ShotFired {
        by: Some(id),
        count,
    });
    CommandOutcome::Accepted
}

/// Fire `id`'s guns now, subject to the shot cooldown.
pub fn player_shoot(state: &SimulationState, id: PlayerId) -> (SimulationState, CommandOutcome) {
    let mut next = state.clone();
    next.events.clear();
    match shoot_in_place(&mut next, id) {
        CommandOutcome::Accepted => (next, CommandOutcome::Accepted),
        rejected => (state.clone(), rejected),
    }
}

/// Spend `id`'s teleport charge.
pub fn player_teleport(
    state: &SimulationState,
    id: PlayerId,
    rng: &mut impl RandomSource,
) -> (SimulationState, CommandOutcome) {
    let reject = |reason| (state.clone(), CommandOutcome::Rejected(reason));
    if !state.phase.is_running() {
        return reject(RejectReason::NotRunning);
    }
    let Some(player) = state.player(id) else {
        return reject(RejectReason::UnknownPlayer);
    };
    if !player.alive {
        return reject(RejectReason::PlayerDead);
    }
    if !player.teleport_charge {
        return reject(RejectReason::NoTeleportCharge);
    }

    let mut next = state.clone();
    next.events.clear();
    let now = next.clock_ms;
    let config = next.config.clone();
    let Some(player) = next.player_mut(id) else {
        return reject(RejectReason::UnknownPlayer);
    };
    abilities::teleport(player, rng, now, &config);
    let to = player.pos;
    next.events.push(GameEvent::PlayerTeleported { id, to });
    (next, CommandOutcome::Accepted)
}

/// Flip the pause overlay.  Has no effect once the game is over.
pub fn toggle_pause(state: &SimulationState) -> (SimulationState, CommandOutcome) {
    let rules = PhaseRules::from(&state.config);
    let (phase, effect) = phase::advance(&state.phase, PhaseEvent::TogglePause, state.clock_ms, &rules);
    let PhaseEffect::PauseToggled(paused) = effect else {
        return (state.clone(), CommandOutcome::Rejected(RejectReason::GameOver));
    };
    let mut next = state.clone();
    next.events.clear();
    next.phase = phase;
    next.events.push(GameEvent::Paused(paused));
    tracing::debug!(paused, "pause toggled");
    (next, CommandOutcome::Accepted)
}

pub fn set_mouse_control(
    state: &SimulationState,
    id: PlayerId,
    enabled: bool,
) -> (SimulationState, CommandOutcome) {
    let mut next = state.clone();
    match next.player_mut(id) {
        Some(player) => {
            player.mouse_control = enabled;
            (next, CommandOutcome::Accepted)
        }
        None => (
            state.clone(),
            CommandOutcome::Rejected(RejectReason::UnknownPlayer),
        ),
    }
}

// ── Per-tick update (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by `dt_ms` of game time.  All randomness comes
/// through `rng` so callers control determinism.
pub fn tick(
    state: &SimulationState,
    input: &TickInput,
    dt_ms: u64,
    rng: &mut impl RandomSource,
) -> SimulationState {
    let mut next = state.clone();
    next.events.clear();

    if !next.phase.clock_runs() {
        return next;
    }
    next.clock_ms += dt_ms;
    let now = next.clock_ms;

    // ── 1. Phase gate ────────────────────────────────────────────────────────
    if next.phase.phase.is_transition() {
        apply_phase_event(&mut next, PhaseEvent::Clock, rng);
        return next;
    }

    // ── 2. Players: timers, movement, shooting ───────────────────────────────
    let config = next.config.clone();
    for player in next.players.iter_mut() {
        abilities::expire_abilities(player, now);
        kinematics::move_player(player, input.for_player(player.id), &config);
    }
    for id in PlayerId::ALL {
        if input.for_player(id).fire && next.player(id).is_some_and(|p| p.alive) {
            shoot_in_place(&mut next, id);
        }
    }

    // ── 3. Enemy AI ──────────────────────────────────────────────────────────
    let enemy_shots = combat::enemy_fire(&mut next);
    let boss_shots = if next.phase.phase == Phase::BossFight {
        spawn::spawn_minion_if_due(&mut next, rng);
        combat::boss_fire(&mut next)
    } else {
        0
    };
    if enemy_shots + boss_shots > 0 {
        next.events.push(GameEvent::ShotFired {
            by: None,
            count: enemy_shots + boss_shots,
        });
    }

    // ── 4. Movement ──────────────────────────────────────────────────────────
    kinematics::advance_projectiles(&mut next.projectiles, &config);
    kinematics::advance_hazards(
        &mut next.hazards,
        next.phase.speed_multiplier,
        &config,
        rng,
    );
    kinematics::advance_enemies(&mut next.enemies, now, &config, rng);
    if let Some(boss) = next.boss.as_mut() {
        kinematics::advance_boss(boss, now, &config, rng);
    }
    kinematics::advance_pickups(&mut next.pickups, now, &config);
    kinematics::advance_explosions(&mut next.explosions, now);

    // ── 5. Collisions ────────────────────────────────────────────────────────
    if next.phase.is_running() {
        resolve_collisions(&mut next, rng);
    }

    // ── 6. Spawn policy ──────────────────────────────────────────────────────
    match next.phase.phase {
        Phase::AsteroidField => {
            spawn::top_up_hazards(&mut next, rng);
        }
        Phase::EnemyWaves => {
            spawn_next_wave(&mut next, rng);
            let live_enemies = next.enemies.len();
            apply_phase_event(&mut next, PhaseEvent::WavesCleared { live_enemies }, rng);
        }
        _ => {}
    }

    // ── 7. Defeat check ──────────────────────────────────────────────────────
    if !next.any_player_alive() {
        apply_phase_event(&mut next, PhaseEvent::AllPlayersDown, rng);
    }

    next
}
