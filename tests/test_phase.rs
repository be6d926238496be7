use nova_descent::phase::*;
use nova_descent::GameConfig;

fn rules() -> PhaseRules {
    PhaseRules::from(&GameConfig::default())
}

fn in_phase(phase: Phase) -> PhaseState {
    PhaseState {
        phase,
        stage: phase.stage().unwrap_or(Stage::Boss),
        ..PhaseState::default()
    }
}

// ── Score threshold ───────────────────────────────────────────────────────────

#[test]
fn crossing_threshold_enters_transition() {
    let state = PhaseState::default();
    let (next, effect) = advance(
        &state,
        PhaseEvent::ScoreChanged {
            previous: 1_490,
            total: 1_500,
        },
        4_000,
        &rules(),
    );
    assert_eq!(next.phase, Phase::Transition);
    assert_eq!(next.transition_started_ms, 4_000);
    assert_eq!(
        effect,
        PhaseEffect::Entered {
            from: Phase::AsteroidField,
            to: Phase::Transition
        }
    );
}

#[test]
fn below_threshold_stays_in_field() {
    let (next, effect) = advance(
        &PhaseState::default(),
        PhaseEvent::ScoreChanged {
            previous: 1_480,
            total: 1_490,
        },
        0,
        &rules(),
    );
    assert_eq!(next.phase, Phase::AsteroidField);
    assert_eq!(effect, PhaseEffect::None);
}

#[test]
fn score_during_transition_changes_nothing() {
    let state = in_phase(Phase::Transition);
    let (next, effect) = advance(
        &state,
        PhaseEvent::ScoreChanged {
            previous: 1_500,
            total: 2_000,
        },
        10,
        &rules(),
    );
    assert_eq!(next, state);
    assert_eq!(effect, PhaseEffect::None);
}

#[test]
fn speed_multiplier_steps_per_boundary() {
    let (next, _) = advance(
        &in_phase(Phase::EnemyWaves),
        PhaseEvent::ScoreChanged {
            previous: 400,
            total: 1_100,
        },
        0,
        &rules(),
    );
    assert!((next.speed_multiplier - 1.6).abs() < 1e-5);

    let (same, _) = advance(
        &next,
        PhaseEvent::ScoreChanged {
            previous: 1_100,
            total: 1_150,
        },
        0,
        &rules(),
    );
    assert_eq!(same.speed_multiplier, next.speed_multiplier);
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[test]
fn transition_exits_after_delay_exactly_once() {
    let mut state = in_phase(Phase::Transition);
    state.transition_started_ms = 1_000;

    let (early, effect) = advance(&state, PhaseEvent::Clock, 3_999, &rules());
    assert_eq!(early.phase, Phase::Transition);
    assert_eq!(effect, PhaseEffect::None);

    let (waves, effect) = advance(&state, PhaseEvent::Clock, 4_000, &rules());
    assert_eq!(waves.phase, Phase::EnemyWaves);
    assert_eq!(waves.stage, Stage::Enemies);
    assert_eq!(effect, PhaseEffect::BeginWaves);

    let (again, effect) = advance(&waves, PhaseEvent::Clock, 9_000, &rules());
    assert_eq!(again, waves);
    assert_eq!(effect, PhaseEffect::None);
}

#[test]
fn waves_cleared_needs_quota_and_empty_field() {
    let mut state = in_phase(Phase::EnemyWaves);
    state.enemies_killed = 14;
    let (next, _) = advance(&state, PhaseEvent::WavesCleared { live_enemies: 0 }, 0, &rules());
    assert_eq!(next.phase, Phase::EnemyWaves);

    state.enemies_killed = 15;
    let (next, _) = advance(&state, PhaseEvent::WavesCleared { live_enemies: 1 }, 0, &rules());
    assert_eq!(next.phase, Phase::EnemyWaves);

    let (next, effect) =
        advance(&state, PhaseEvent::WavesCleared { live_enemies: 0 }, 500, &rules());
    assert_eq!(next.phase, Phase::BossTransition);
    assert_eq!(next.transition_started_ms, 500);
    assert!(matches!(effect, PhaseEffect::Entered { .. }));
}

#[test]
fn boss_transition_begins_fight() {
    let mut state = in_phase(Phase::BossTransition);
    state.transition_started_ms = 0;
    let (next, effect) = advance(&state, PhaseEvent::Clock, 3_000, &rules());
    assert_eq!(next.phase, Phase::BossFight);
    assert_eq!(next.stage, Stage::Boss);
    assert_eq!(effect, PhaseEffect::BeginBossFight);
}

#[test]
fn kill_and_wave_counters_only_in_waves() {
    let (next, _) = advance(&in_phase(Phase::EnemyWaves), PhaseEvent::EnemyKilled, 0, &rules());
    assert_eq!(next.enemies_killed, 1);
    let (next, _) = advance(&next, PhaseEvent::WaveSpawned, 0, &rules());
    assert_eq!(next.current_wave, 1);

    let fight = in_phase(Phase::BossFight);
    let (after, _) = advance(&fight, PhaseEvent::EnemyKilled, 0, &rules());
    assert_eq!(after.enemies_killed, 0);
}

// ── Terminal phases ───────────────────────────────────────────────────────────

#[test]
fn boss_defeat_only_counts_in_fight() {
    let (next, _) = advance(&in_phase(Phase::BossFight), PhaseEvent::BossDefeated, 0, &rules());
    assert_eq!(next.phase, Phase::Victory);
    assert_eq!(next.stage, Stage::Boss);

    let (next, effect) =
        advance(&in_phase(Phase::EnemyWaves), PhaseEvent::BossDefeated, 0, &rules());
    assert_eq!(next.phase, Phase::EnemyWaves);
    assert_eq!(effect, PhaseEffect::None);
}

#[test]
fn all_players_down_defeats_from_any_live_phase() {
    for phase in [
        Phase::AsteroidField,
        Phase::Transition,
        Phase::EnemyWaves,
        Phase::BossTransition,
        Phase::BossFight,
    ] {
        let (next, _) = advance(&in_phase(phase), PhaseEvent::AllPlayersDown, 0, &rules());
        assert_eq!(next.phase, Phase::Defeat, "from {phase:?}");
        assert_eq!(Some(next.stage), phase.stage());
    }

    let victory = in_phase(Phase::Victory);
    let (next, effect) = advance(&victory, PhaseEvent::AllPlayersDown, 0, &rules());
    assert_eq!(next, victory);
    assert_eq!(effect, PhaseEffect::None);
}

// ── Pause & reset ─────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_and_resume_restores() {
    let mut state = in_phase(Phase::EnemyWaves);
    state.enemies_killed = 7;

    let (paused, effect) = advance(&state, PhaseEvent::TogglePause, 0, &rules());
    assert!(paused.paused);
    assert_eq!(effect, PhaseEffect::PauseToggled(true));
    assert!(!paused.is_running());
    assert!(!paused.clock_runs());

    let (ignored, effect) = advance(&paused, PhaseEvent::EnemyKilled, 0, &rules());
    assert_eq!(ignored, paused);
    assert_eq!(effect, PhaseEffect::None);

    let (resumed, effect) = advance(&paused, PhaseEvent::TogglePause, 0, &rules());
    assert_eq!(resumed, state);
    assert_eq!(effect, PhaseEffect::PauseToggled(false));
}

#[test]
fn pause_ignored_once_game_is_over() {
    let defeat = in_phase(Phase::Defeat);
    let (next, effect) = advance(&defeat, PhaseEvent::TogglePause, 0, &rules());
    assert!(!next.paused);
    assert_eq!(effect, PhaseEffect::None);
}

#[test]
fn reset_from_anywhere() {
    let mut state = in_phase(Phase::Victory);
    state.enemies_killed = 15;
    state.speed_multiplier = 2.5;
    let (next, effect) = advance(&state, PhaseEvent::Reset, 0, &rules());
    assert_eq!(next, PhaseState::default());
    assert_eq!(effect, PhaseEffect::Reset);
}

#[test]
fn phase_predicates() {
    assert!(Phase::AsteroidField.is_active());
    assert!(!Phase::Transition.is_active());
    assert!(Phase::BossTransition.is_transition());
    assert!(Phase::Victory.is_terminal() && Phase::Defeat.is_terminal());
    assert_eq!(Phase::Defeat.stage(), None);
    assert_eq!(Stage::Boss.number(), 3);
}
