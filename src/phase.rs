//! Game phase progression.
//!
//! [`advance`] is a pure transition function: it never touches entities.
//! Anything the world has to do because of a phase change (clearing the
//! field, spawning the first wave or the boss) comes back as a
//! [`PhaseEffect`] for the caller to carry out exactly once.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AsteroidField,
    Transition,
    EnemyWaves,
    BossTransition,
    BossFight,
    Victory,
    Defeat,
}

impl Phase {
    /// Phases in which entities move, collide and shoot.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::AsteroidField | Phase::EnemyWaves | Phase::BossFight)
    }

    pub fn is_transition(self) -> bool {
        matches!(self, Phase::Transition | Phase::BossTransition)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }

    /// Stage a non-terminal phase belongs to.
    pub fn stage(self) -> Option<Stage> {
        match self {
            Phase::AsteroidField | Phase::Transition => Some(Stage::Asteroids),
            Phase::EnemyWaves | Phase::BossTransition => Some(Stage::Enemies),
            Phase::BossFight => Some(Stage::Boss),
            Phase::Victory | Phase::Defeat => None,
        }
    }
}

/// Coarse progress marker: which of the three fights the run has reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Asteroids,
    Enemies,
    Boss,
}

impl Stage {
    pub fn number(self) -> u32 {
        match self {
            Stage::Asteroids => 1,
            Stage::Enemies => 2,
            Stage::Boss => 3,
        }
    }
}

/// The thresholds [`advance`] needs, lifted out of [`GameConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseRules {
    pub score_threshold: u32,
    pub transition_ms: u64,
    pub kill_quota: u32,
    pub speed_step_interval: u32,
    pub speed_step: f32,
}

impl From<&GameConfig> for PhaseRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            score_threshold: config.phase_score_threshold,
            transition_ms: config.transition_ms,
            kill_quota: config.enemy_kill_quota,
            speed_step_interval: config.speed_step_interval.max(1),
            speed_step: config.speed_step,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseState {
    pub phase: Phase,
    /// Furthest stage reached; survives the jump to a terminal phase.
    pub stage: Stage,
    /// Overlay on top of `phase`: resuming returns to exactly where play was.
    pub paused: bool,
    /// Wave kills only.  Boss minions do not count.
    pub enemies_killed: u32,
    pub current_wave: u32,
    pub speed_multiplier: f32,
    pub transition_started_ms: u64,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self {
            phase: Phase::AsteroidField,
            stage: Stage::Asteroids,
            paused: false,
            enemies_killed: 0,
            current_wave: 0,
            speed_multiplier: 1.0,
            transition_started_ms: 0,
        }
    }
}

impl PhaseState {
    /// Play is running: not paused and in an active phase.
    pub fn is_running(&self) -> bool {
        !self.paused && self.phase.is_active()
    }

    /// The game clock advances: not paused and not over.
    pub fn clock_runs(&self) -> bool {
        !self.paused && !self.phase.is_terminal()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Combined score moved from `previous` to `total`.
    ScoreChanged { previous: u32, total: u32 },
    /// A wave ship died.
    EnemyKilled,
    WaveSpawned,
    /// Periodic check of the wave quota against the live ship count.
    WavesCleared { live_enemies: usize },
    BossDefeated,
    AllPlayersDown,
    /// Time passed; ends transitions whose delay has run out.
    Clock,
    TogglePause,
    Reset,
}

/// World-side work a transition asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEffect {
    None,
    /// The phase changed and nothing needs clearing.
    Entered { from: Phase, to: Phase },
    /// Transition ended: clear hazards, projectiles, pickups and explosions,
    /// then spawn the first wave.
    BeginWaves,
    /// Boss transition ended: clear projectiles, pickups, explosions and
    /// enemies, then spawn the boss.
    BeginBossFight,
    PauseToggled(bool),
    Reset,
}

fn enter(state: &PhaseState, to: Phase, now_ms: u64) -> PhaseState {
    let mut next = state.clone();
    next.phase = to;
    if let Some(stage) = to.stage() {
        next.stage = next.stage.max(stage);
    }
    if to.is_transition() {
        next.transition_started_ms = now_ms;
    }
    tracing::debug!("phase {:?} -> {:?} at {now_ms}ms", state.phase, to);
    next
}

fn speed_for(previous: u32, total: u32, current: f32, rules: &PhaseRules) -> f32 {
    let before = previous / rules.speed_step_interval;
    let after = total / rules.speed_step_interval;
    if after > before {
        current + rules.speed_step * (after - before) as f32
    } else {
        current
    }
}

/// Applies one event.  Events that make no sense in the current phase leave
/// the state unchanged and yield [`PhaseEffect::None`].
pub fn advance(
    state: &PhaseState,
    event: PhaseEvent,
    now_ms: u64,
    rules: &PhaseRules,
) -> (PhaseState, PhaseEffect) {
    let unchanged = (state.clone(), PhaseEffect::None);

    match event {
        PhaseEvent::Reset => return (PhaseState::default(), PhaseEffect::Reset),
        PhaseEvent::TogglePause => {
            if state.phase.is_terminal() {
                return unchanged;
            }
            let paused = !state.paused;
            let mut next = state.clone();
            next.paused = paused;
            return (next, PhaseEffect::PauseToggled(paused));
        }
        _ if state.paused => return unchanged,
        _ => {}
    }

    match (state.phase, event) {
        (phase, PhaseEvent::AllPlayersDown) if !phase.is_terminal() => (
            enter(state, Phase::Defeat, now_ms),
            PhaseEffect::Entered {
                from: phase,
                to: Phase::Defeat,
            },
        ),

        (phase, PhaseEvent::ScoreChanged { previous, total }) if phase.is_active() => {
            let mut next = state.clone();
            next.speed_multiplier = speed_for(previous, total, state.speed_multiplier, rules);
            if phase == Phase::AsteroidField && total >= rules.score_threshold {
                return (
                    enter(&next, Phase::Transition, now_ms),
                    PhaseEffect::Entered {
                        from: phase,
                        to: Phase::Transition,
                    },
                );
            }
            (next, PhaseEffect::None)
        }

        (Phase::EnemyWaves, PhaseEvent::EnemyKilled) => {
            let mut next = state.clone();
            next.enemies_killed += 1;
            (next, PhaseEffect::None)
        }

        (Phase::EnemyWaves, PhaseEvent::WaveSpawned) => {
            let mut next = state.clone();
            next.current_wave += 1;
            (next, PhaseEffect::None)
        }

        (Phase::EnemyWaves, PhaseEvent::WavesCleared { live_enemies })
            if state.enemies_killed >= rules.kill_quota && live_enemies == 0 =>
        {
            (
                enter(state, Phase::BossTransition, now_ms),
                PhaseEffect::Entered {
                    from: Phase::EnemyWaves,
                    to: Phase::BossTransition,
                },
            )
        }

        (Phase::BossFight, PhaseEvent::BossDefeated) => (
            enter(state, Phase::Victory, now_ms),
            PhaseEffect::Entered {
                from: Phase::BossFight,
                to: Phase::Victory,
            },
        ),

        (Phase::Transition, PhaseEvent::Clock)
            if now_ms.saturating_sub(state.transition_started_ms) >= rules.transition_ms =>
        {
            (enter(state, Phase::EnemyWaves, now_ms), PhaseEffect::BeginWaves)
        }

        (Phase::BossTransition, PhaseEvent::Clock)
            if now_ms.saturating_sub(state.transition_started_ms) >= rules.transition_ms =>
        {
            (enter(state, Phase::BossFight, now_ms), PhaseEffect::BeginBossFight)
        }

        _ => unchanged,
    }
}
