use glam::Vec2;
use nova_descent::compute::new_game;
use nova_descent::constants::*;
use nova_descent::entities::*;
use nova_descent::{GameConfig, ScriptedRandom};

fn quiet_state(two_player: bool) -> SimulationState {
    let mut rng = ScriptedRandom::constant(0.0);
    let mut state = new_game(two_player, GameConfig::default(), &mut rng);
    state.hazards.clear();
    state
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn aabb_overlap_is_strict() {
    let a = Aabb::centred(Vec2::new(0.0, 0.0), (10.0, 10.0));
    let b = Aabb::centred(Vec2::new(9.0, 0.0), (10.0, 10.0));
    let touching = Aabb::centred(Vec2::new(10.0, 0.0), (10.0, 10.0));
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert!(!a.overlaps(&touching));
}

#[test]
fn aabb_clamp_into_field() {
    let hitbox = Aabb::centred(Vec2::new(10.0, 700.0), PLAYER_SIZE);
    let clamped = hitbox.clamp_into(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    assert_eq!(clamped.min.x, 0.0);
    assert_eq!(clamped.max.y, PLAYFIELD_HEIGHT);
    assert_eq!(clamped.max - clamped.min, Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1));
}

#[test]
fn aabb_outside_field() {
    let above = Aabb::centred(Vec2::new(100.0, -20.0), PROJECTILE_SIZE);
    let peeking = Aabb::centred(Vec2::new(100.0, -5.0), PROJECTILE_SIZE);
    assert!(above.is_outside(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT));
    assert!(!peeking.is_outside(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT));
}

// ── Expiry ────────────────────────────────────────────────────────────────────

#[test]
fn expiry_active_and_lapsed() {
    let e = Expiry::after(1_000, 500);
    assert_eq!(e.at_ms, 1_500);
    assert!(e.is_active(1_499));
    assert!(!e.is_active(1_500));
    assert!(!e.has_lapsed(1_500));
    assert!(e.has_lapsed(1_501));
    assert_eq!(e.remaining_ms(1_200), 300);
    assert_eq!(e.remaining_ms(2_000), 0);
}

// ── Players ───────────────────────────────────────────────────────────────────

#[test]
fn spawn_points() {
    let config = GameConfig::default();
    assert_eq!(spawn_position(PlayerId::One, &config), Vec2::new(640.0, 600.0));
    assert_eq!(spawn_position(PlayerId::Two, &config), Vec2::new(320.0, 600.0));
}

#[test]
fn new_player_defaults() {
    let p = Player::new(PlayerId::One, Vec2::ZERO, 3);
    assert!(p.alive);
    assert_eq!(p.health, MAX_HEALTH);
    assert_eq!(p.lives, 3);
    assert!(p.upgrade.is_none() && p.shield.is_none() && p.invulnerable.is_none());
    assert!(!p.teleport_charge);
}

#[test]
fn blink_alpha_states() {
    let mut p = Player::new(PlayerId::Two, Vec2::ZERO, 3);
    assert_eq!(p.blink_alpha(0), 255);

    p.alive = false;
    p.health = 0;
    p.respawn_deadline = Some(Expiry::after(0, RESPAWN_DEADLINE_MS));
    p.blink_phase = std::f32::consts::FRAC_PI_2; // sin = 1
    assert_eq!(p.blink_alpha(100), 255);
    assert!(!p.respawn_deadline_elapsed(100));

    p.blink_phase = -std::f32::consts::FRAC_PI_2; // sin = -1
    assert_eq!(p.blink_alpha(100), 0);

    assert!(p.respawn_deadline_elapsed(RESPAWN_DEADLINE_MS));
    assert_eq!(p.blink_alpha(RESPAWN_DEADLINE_MS), DEAD_IDLE_ALPHA);
}

#[test]
fn partner_and_index() {
    assert_eq!(PlayerId::One.partner(), PlayerId::Two);
    assert_eq!(PlayerId::Two.partner(), PlayerId::One);
    assert_eq!(PlayerId::One.index(), 0);
    assert_eq!(PlayerId::Two.index(), 1);
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[test]
fn hazard_damage_and_speed_by_kind() {
    assert_eq!(HazardKind::Evil.contact_damage(), 40);
    assert_eq!(HazardKind::Default.contact_damage(), 20);
    assert_eq!(HazardKind::Shield.contact_damage(), 20);
    assert_eq!(HazardKind::Evil.speed_range(), (1, 3));
    assert_eq!(HazardKind::Teleporter.speed_range(), (1, 2));
}

// ── Master state ──────────────────────────────────────────────────────────────

#[test]
fn game_state_clone_is_independent() {
    let original = quiet_state(false);
    let mut cloned = original.clone();

    cloned.players[0].pos.x = 99.0;
    cloned.players[0].score = 999;
    cloned.hazards.insert(Hazard {
        pos: Vec2::new(5.0, 5.0),
        vel: Vec2::ZERO,
        rotation: 0.0,
        rotation_rate: 0.0,
        kind: HazardKind::Default,
    });

    assert_eq!(original.players[0].pos.x, 640.0);
    assert_eq!(original.players[0].score, 0);
    assert!(original.hazards.is_empty());
}

#[test]
fn entity_refs_go_stale_after_removal() {
    let mut state = quiet_state(false);
    let h = state.pickups.insert(Pickup {
        pos: Vec2::new(10.0, 20.0),
        kind: PickupKind::Shield,
        float_offset: 0.0,
    });
    let entity = EntityRef::Pickup(h);
    assert_eq!(state.position_of(entity), Some(Vec2::new(10.0, 20.0)));

    state.pickups.remove(h);
    state.pickups.insert(Pickup {
        pos: Vec2::new(1.0, 1.0),
        kind: PickupKind::ExtraLife,
        float_offset: 0.0,
    });
    assert!(!state.exists(entity));
    assert!(!state.exists(EntityRef::Boss));
    assert!(!state.exists(EntityRef::Player(PlayerId::Two)));
    assert!(state.exists(EntityRef::Player(PlayerId::One)));
}

#[test]
fn combined_score_and_alive() {
    let mut state = quiet_state(true);
    state.players[0].score = 120;
    state.players[1].score = 30;
    assert_eq!(state.combined_score(), 150);

    state.players[0].alive = false;
    assert!(state.any_player_alive());
    state.players[1].alive = false;
    assert!(!state.any_player_alive());
}
