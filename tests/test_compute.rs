use glam::Vec2;
use nova_descent::abilities::{activate_upgrade, die};
use nova_descent::combat::{boss_cooldown, boss_volley, enemy_fire};
use nova_descent::compute::*;
use nova_descent::entities::*;
use nova_descent::events::GameEvent;
use nova_descent::kinematics::*;
use nova_descent::{GameConfig, Phase, ScriptedRandom};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state(two_player: bool) -> SimulationState {
    let mut rng = seeded_rng();
    new_game(two_player, GameConfig::default(), &mut rng)
}

/// A fresh game with the opening hazard field removed.
fn quiet_state(two_player: bool) -> SimulationState {
    let mut state = make_state(two_player);
    state.hazards.clear();
    state
}

fn idle() -> TickInput {
    TickInput::default()
}

// ── new_game ──────────────────────────────────────────────────────────────────

#[test]
fn new_game_single_player() {
    let state = make_state(false);
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].pos, Vec2::new(640.0, 600.0));
    assert_eq!(state.hazards.len(), 8);
    assert_eq!(state.phase.phase, Phase::AsteroidField);
    assert_eq!(state.clock_ms, 0);
    assert!(state.projectiles.is_empty());
    assert!(state.boss.is_none());
}

#[test]
fn new_game_two_player() {
    let state = make_state(true);
    assert_eq!(state.players.len(), 2);
    assert_eq!(state.players[1].pos, Vec2::new(320.0, 600.0));
    assert_eq!(state.players[1].lives, 3);
}

#[test]
fn restart_keeps_mode_and_resets_progress() {
    let mut state = make_state(true);
    state.players[0].score = 900;
    state.phase.phase = Phase::Defeat;
    state.clock_ms = 50_000;

    let mut rng = seeded_rng();
    let fresh = restart(&state, &mut rng);
    assert!(fresh.two_player);
    assert_eq!(fresh.phase.phase, Phase::AsteroidField);
    assert_eq!(fresh.combined_score(), 0);
    assert_eq!(fresh.clock_ms, 0);
}

// ── Player commands ───────────────────────────────────────────────────────────

#[test]
fn shoot_respects_cooldown() {
    let state = quiet_state(false);
    let (fired, outcome) = player_shoot(&state, PlayerId::One);
    assert!(outcome.is_accepted());
    assert_eq!(fired.projectiles.len(), 1);
    let bullet = fired.projectiles.values().next().cloned();
    assert_eq!(bullet.map(|b| b.pos), Some(Vec2::new(640.0, 565.0)));

    let (again, outcome) = player_shoot(&fired, PlayerId::One);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::OnCooldown));
    assert_eq!(again.projectiles.len(), 1);

    let mut later = fired.clone();
    later.clock_ms = 300;
    let (_, outcome) = player_shoot(&later, PlayerId::One);
    assert!(outcome.is_accepted());
}

#[test]
fn upgraded_player_fires_three_shots() {
    let mut state = quiet_state(false);
    let config = state.config.clone();
    activate_upgrade(&mut state.players[0], 0, &config);

    let (fired, outcome) = player_shoot(&state, PlayerId::One);
    assert!(outcome.is_accepted());
    let mut xs: Vec<f32> = fired.projectiles.values().map(|p| p.pos.x).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(xs, vec![600.0, 640.0, 680.0]);
    assert!(fired
        .events
        .contains(&GameEvent::ShotFired {
            by: Some(PlayerId::One),
            count: 3
        }));
}

#[test]
fn shoot_rejections_leave_state_untouched() {
    let mut state = quiet_state(false);
    let (_, outcome) = player_shoot(&state, PlayerId::Two);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::UnknownPlayer));

    let config = state.config.clone();
    die(&mut state.players[0], 0, &config);
    let (after, outcome) = player_shoot(&state, PlayerId::One);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::PlayerDead));
    assert!(after.projectiles.is_empty());

    let mut paused = quiet_state(false);
    paused.phase.paused = true;
    let (_, outcome) = player_shoot(&paused, PlayerId::One);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::NotRunning));
}

#[test]
fn teleport_command() {
    let state = quiet_state(false);
    let mut rng = ScriptedRandom::constant(0.0);
    let (_, outcome) = player_teleport(&state, PlayerId::One, &mut rng);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::NoTeleportCharge));

    let mut charged = state.clone();
    charged.players[0].teleport_charge = true;
    let (moved, outcome) = player_teleport(&charged, PlayerId::One, &mut rng);
    assert!(outcome.is_accepted());
    assert_eq!(moved.players[0].pos, Vec2::new(80.0, 80.0));
    assert!(!moved.players[0].teleport_charge);
    assert!(moved.events.contains(&GameEvent::PlayerTeleported {
        id: PlayerId::One,
        to: Vec2::new(80.0, 80.0),
    }));
}

#[test]
fn pause_toggles_and_is_rejected_when_over() {
    let state = quiet_state(false);
    let (paused, outcome) = toggle_pause(&state);
    assert!(outcome.is_accepted());
    assert!(paused.phase.paused);
    let (resumed, _) = toggle_pause(&paused);
    assert!(!resumed.phase.paused);
    assert_eq!(resumed.phase.phase, Phase::AsteroidField);

    let mut over = state.clone();
    over.phase.phase = Phase::Defeat;
    let (_, outcome) = toggle_pause(&over);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::GameOver));
}

#[test]
fn mouse_control_for_known_players_only() {
    let state = quiet_state(false);
    let (next, outcome) = set_mouse_control(&state, PlayerId::One, true);
    assert!(outcome.is_accepted());
    assert!(next.players[0].mouse_control);
    let (_, outcome) = set_mouse_control(&state, PlayerId::Two, true);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::UnknownPlayer));
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn keys_add_up_and_cancel() {
    let config = GameConfig::default();
    let mut p = Player::new(PlayerId::One, Vec2::new(640.0, 600.0), 3);
    let input = PlayerInput {
        left: true,
        up: true,
        ..Default::default()
    };
    move_player(&mut p, &input, &config);
    assert_eq!(p.pos, Vec2::new(634.0, 594.0));

    let both = PlayerInput {
        left: true,
        right: true,
        ..Default::default()
    };
    move_player(&mut p, &both, &config);
    assert_eq!(p.pos, Vec2::new(634.0, 594.0));
}

#[test]
fn movement_clamps_to_field() {
    let config = GameConfig::default();
    let mut p = Player::new(PlayerId::One, Vec2::new(50.0, 684.0), 3);
    let input = PlayerInput {
        left: true,
        down: true,
        ..Default::default()
    };
    move_player(&mut p, &input, &config);
    assert_eq!(p.pos, Vec2::new(50.0, 685.0));
}

#[test]
fn pointer_follow_eases_toward_target() {
    let config = GameConfig::default();
    let mut p = Player::new(PlayerId::One, Vec2::new(640.0, 600.0), 3);
    let input = PlayerInput {
        pointer: Some(Vec2::new(740.0, 600.0)),
        ..Default::default()
    };
    move_player(&mut p, &input, &config);
    assert_eq!(p.pos, Vec2::new(640.0, 600.0), "pointer ignored without mouse control");

    p.mouse_control = true;
    move_player(&mut p, &input, &config);
    assert!((p.pos.x - 675.0).abs() < 1e-3);
}

#[test]
fn dead_player_only_blinks() {
    let config = GameConfig::default();
    let mut p = Player::new(PlayerId::One, Vec2::new(640.0, 600.0), 3);
    die(&mut p, 0, &config);
    let input = PlayerInput {
        left: true,
        ..Default::default()
    };
    move_player(&mut p, &input, &config);
    assert_eq!(p.pos, Vec2::new(640.0, 600.0));
    assert!(p.blink_phase > 0.0);
}

#[test]
fn explosions_run_six_frames() {
    let mut arena = nova_descent::Arena::new();
    arena.insert(new_explosion(Vec2::ZERO, 0));
    for step in 1..=5 {
        advance_explosions(&mut arena, step * 60);
        assert_eq!(arena.len(), 1);
    }
    advance_explosions(&mut arena, 360);
    assert!(arena.is_empty());
}

#[test]
fn boss_turns_at_patrol_margin() {
    let config = GameConfig::default();
    let mut rng = ScriptedRandom::constant(0.99);
    let mut boss = nova_descent::spawn::new_boss(80, 0, 1280.0, &mut rng);
    boss.pos.x = 1070.0;
    advance_boss(&mut boss, 100, &config, &mut rng);
    assert_eq!(boss.direction, -1.0);

    advance_boss(&mut boss, 5_000, &config, &mut rng);
    assert_eq!(boss.mode, AttackMode::Rapid);
    assert_eq!(boss.next_mode_ms, 10_000);
}

// ── Combat ────────────────────────────────────────────────────────────────────

#[test]
fn boss_cooldown_by_mode() {
    assert_eq!(boss_cooldown(AttackMode::Rapid), 300);
    assert_eq!(boss_cooldown(AttackMode::Normal), 1_500);
    assert_eq!(boss_cooldown(AttackMode::Spread), 1_500);
}

#[test]
fn boss_volley_shapes() {
    let muzzle = Vec2::new(640.0, 260.0);
    let normal = boss_volley(AttackMode::Normal, muzzle);
    assert_eq!(normal.len(), 3);
    assert!(normal.iter().all(|p| p.vel == Vec2::new(0.0, 8.0)));

    let spread = boss_volley(AttackMode::Spread, muzzle);
    let drifts: Vec<f32> = spread.iter().map(|p| p.vel.x).collect();
    for (got, want) in drifts.iter().zip([-6.0, -3.0, 0.0, 3.0, 6.0]) {
        assert!((got - want).abs() < 1e-4, "{got} vs {want}");
    }
    assert_eq!(drifts.len(), 5);

    let rapid = boss_volley(AttackMode::Rapid, muzzle);
    assert_eq!(rapid.len(), 1);
    assert_eq!(rapid[0].vel.y, 10.0);
    assert!(rapid.iter().all(|p| p.owner == Owner::Enemy));
}

#[test]
fn enemies_hold_fire_with_nobody_alive() {
    let mut state = quiet_state(false);
    state.enemies.insert(EnemyShip {
        pos: Vec2::new(300.0, 120.0),
        health: 3,
        fire_delay_ms: 900,
        next_shot_ms: 0,
        next_jitter_ms: 10_000,
        minion: false,
    });
    let config = state.config.clone();

    let mut nobody = state.clone();
    die(&mut nobody.players[0], 0, &config);
    assert_eq!(enemy_fire(&mut nobody), 0);

    assert_eq!(enemy_fire(&mut state), 1);
    assert_eq!(enemy_fire(&mut state), 0, "waits for its delay");
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_advances_clock_and_is_pure() {
    let state = make_state(false);
    let mut rng = seeded_rng();
    let next = tick(&state, &idle(), 16, &mut rng);
    assert_eq!(next.clock_ms, 16);
    assert_eq!(state.clock_ms, 0);
}

#[test]
fn paused_and_finished_games_freeze_clock() {
    let mut rng = seeded_rng();
    let (paused, _) = toggle_pause(&make_state(false));
    let next = tick(&paused, &idle(), 16, &mut rng);
    assert_eq!(next.clock_ms, 0);
    assert_eq!(next.players, paused.players);

    let mut over = make_state(false);
    over.phase.phase = Phase::Victory;
    let next = tick(&over, &idle(), 16, &mut rng);
    assert_eq!(next.clock_ms, 0);
}

#[test]
fn hazard_floor_holds_every_tick() {
    let mut state = make_state(false);
    let mut rng = seeded_rng();
    let mut input = idle();
    input.players[0].fire = true;
    for i in 0..600 {
        input.players[0].left = i % 120 < 60;
        input.players[0].right = i % 120 >= 60;
        state = tick(&state, &input, 16, &mut rng);
        if state.phase.phase == Phase::AsteroidField {
            assert!(state.hazards.len() >= state.config.hazard_floor);
        }
    }
}

#[test]
fn replenish_policy_keeps_floor() {
    let mut config = GameConfig::default();
    config.hazard_policy = nova_descent::config::HazardPolicy::Replenish;
    let mut rng = seeded_rng();
    let mut state = new_game(true, config, &mut rng);
    let mut input = idle();
    input.players[0].fire = true;
    input.players[1].fire = true;
    for _ in 0..600 {
        state = tick(&state, &input, 16, &mut rng);
        if state.phase.phase == Phase::AsteroidField {
            assert!(state.hazards.len() >= state.config.hazard_floor);
        }
    }
}

#[test]
fn health_and_alive_stay_consistent() {
    let mut state = make_state(true);
    let mut rng = seeded_rng();
    let mut input = idle();
    input.players[0].fire = true;
    input.players[1].fire = true;
    for i in 0..1_500 {
        input.players[0].up = i % 200 < 100;
        input.players[0].down = i % 200 >= 100;
        input.players[1].left = i % 90 < 45;
        input.players[1].right = i % 90 >= 45;
        state = tick(&state, &input, 16, &mut rng);
        for p in &state.players {
            assert!((0..=100).contains(&p.health));
            assert_eq!(p.alive, p.health > 0);
            let hitbox = p.hitbox();
            assert!(hitbox.min.x >= 0.0 && hitbox.max.x <= 1280.0);
            assert!(hitbox.min.y >= 0.0 && hitbox.max.y <= 720.0);
        }
    }
}

#[test]
fn transition_exit_clears_field_and_spawns_first_wave_once() {
    let mut state = make_state(false);
    state.phase.phase = Phase::Transition;
    state.phase.transition_started_ms = 0;
    state.clock_ms = 2_990;
    let mut rng = seeded_rng();

    let next = tick(&state, &idle(), 16, &mut rng);
    assert_eq!(next.phase.phase, Phase::EnemyWaves);
    assert!(next.hazards.is_empty());
    assert_eq!(next.enemies.len(), 5);
    assert_eq!(next.phase.current_wave, 1);
    assert!(next
        .events
        .contains(&GameEvent::WaveSpawned { wave: 1, size: 5 }));
    assert!(next.events.iter().any(|e| matches!(
        e,
        GameEvent::ScoreMilestone {
            phases_completed: 1,
            victory: false,
            ..
        }
    )));

    let after = tick(&next, &idle(), 16, &mut rng);
    assert_eq!(after.enemies.len(), 5);
    assert_eq!(after.phase.current_wave, 1);
}

#[test]
fn transition_waits_for_delay() {
    let mut state = make_state(false);
    state.phase.phase = Phase::Transition;
    state.phase.transition_started_ms = 1_000;
    state.clock_ms = 1_000;
    let mut rng = seeded_rng();
    let next = tick(&state, &idle(), 16, &mut rng);
    assert_eq!(next.phase.phase, Phase::Transition);
    assert_eq!(next.hazards.len(), state.hazards.len());
}

#[test]
fn quota_met_moves_to_boss_and_boss_spawns() {
    let mut state = quiet_state(false);
    state.phase.phase = Phase::EnemyWaves;
    state.phase.enemies_killed = 15;
    let mut rng = seeded_rng();

    let next = tick(&state, &idle(), 16, &mut rng);
    assert_eq!(next.phase.phase, Phase::BossTransition);
    assert!(next.enemies.is_empty());

    let mut waiting = next;
    waiting.clock_ms = waiting.phase.transition_started_ms + 2_990;
    let fight = tick(&waiting, &idle(), 16, &mut rng);
    assert_eq!(fight.phase.phase, Phase::BossFight);
    let boss = fight.boss.as_ref().map(|b| (b.pos, b.health));
    assert_eq!(boss, Some((Vec2::new(640.0, 150.0), 80)));
}

#[test]
fn last_death_ends_in_defeat() {
    let mut state = quiet_state(false);
    state.phase.phase = Phase::EnemyWaves;
    state.phase.stage = nova_descent::phase::Stage::Enemies;
    state.phase.enemies_killed = 15;
    let config = state.config.clone();
    die(&mut state.players[0], 0, &config);
    let mut rng = seeded_rng();

    let next = tick(&state, &idle(), 16, &mut rng);
    assert_eq!(next.phase.phase, Phase::Defeat);
    assert!(next.events.iter().any(|e| matches!(
        e,
        GameEvent::ScoreMilestone {
            phases_completed: 2,
            victory: false,
            ..
        }
    )));

    let frozen = tick(&next, &idle(), 16, &mut rng);
    assert_eq!(frozen.clock_ms, next.clock_ms);
}

#[test]
fn one_survivor_keeps_the_game_going() {
    let mut state = quiet_state(true);
    let config = state.config.clone();
    die(&mut state.players[0], 0, &config);
    let mut rng = seeded_rng();
    let next = tick(&state, &idle(), 16, &mut rng);
    assert_eq!(next.phase.phase, Phase::AsteroidField);
}

#[test]
fn upgrade_lapses_during_tick() {
    let mut state = quiet_state(false);
    let config = state.config.clone();
    activate_upgrade(&mut state.players[0], 0, &config);
    state.clock_ms = 15_000;
    let mut rng = seeded_rng();
    let next = tick(&state, &idle(), 16, &mut rng);
    assert!(next.players[0].upgrade.is_none());
    assert_eq!(next.players[0].extra_guns, 0);
}
