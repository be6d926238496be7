//! Shooting rules for players, enemy ships and the boss.

use glam::Vec2;

use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{AttackMode, Owner, Player, Projectile, SimulationState};

/// Time between boss volleys in a given attack mode.
pub fn boss_cooldown(mode: AttackMode) -> u64 {
    match mode {
        AttackMode::Rapid => BOSS_RAPID_COOLDOWN_MS,
        AttackMode::Normal | AttackMode::Spread => BOSS_FIRE_COOLDOWN_MS,
    }
}

/// Projectiles for one volley of `mode`, fired from `muzzle`.
pub fn boss_volley(mode: AttackMode, muzzle: Vec2) -> Vec<Projectile> {
    let shot = |pos: Vec2, vel: Vec2| Projectile {
        pos,
        vel,
        owner: Owner::Enemy,
    };
    match mode {
        AttackMode::Normal => BOSS_NORMAL_OFFSETS
            .iter()
            .map(|&dx| shot(muzzle + Vec2::new(dx, 0.0), Vec2::new(0.0, BOSS_BULLET_SPEED)))
            .collect(),
        AttackMode::Spread => BOSS_SPREAD_ANGLES
            .iter()
            .map(|&deg| {
                shot(
                    muzzle,
                    Vec2::new(deg * BOSS_SPREAD_DRIFT_PER_DEGREE, BOSS_BULLET_SPEED),
                )
            })
            .collect(),
        AttackMode::Rapid => vec![shot(muzzle, Vec2::new(0.0, BOSS_RAPID_BULLET_SPEED))],
    }
}

/// Whether `player` may fire right now.
pub fn can_shoot(player: &Player, now_ms: u64) -> bool {
    player.alive && now_ms >= player.next_shot_ms
}

/// Fires the player's guns if the cooldown allows.  The main shot leaves the
/// nose; an active upgrade adds a shot from each side at mid-height.
pub fn fire_player(player: &mut Player, now_ms: u64, config: &GameConfig) -> Option<Vec<Projectile>> {
    if !can_shoot(player, now_ms) {
        return None;
    }
    player.next_shot_ms = now_ms + config.shoot_cooldown_ms;

    let owner = Owner::Player(player.id);
    let vel = Vec2::new(0.0, PLAYER_BULLET_SPEED);
    let hitbox = player.hitbox();
    let mut shots = vec![Projectile {
        pos: Vec2::new(player.pos.x, hitbox.min.y),
        vel,
        owner,
    }];
    if player.is_upgraded(now_ms) {
        for x in [hitbox.min.x + SIDE_GUN_INSET, hitbox.max.x - SIDE_GUN_INSET] {
            shots.push(Projectile {
                pos: Vec2::new(x, player.pos.y),
                vel,
                owner,
            });
        }
    }
    Some(shots)
}

/// Wave ships and minions fire straight down on their own delays, but only
/// while someone is alive to shoot at.  Returns the number of shots.
pub fn enemy_fire(state: &mut SimulationState) -> usize {
    if !state.any_player_alive() {
        return 0;
    }
    let now = state.clock_ms;
    let mut shots = Vec::new();
    for (_, enemy) in state.enemies.iter_mut() {
        if now < enemy.next_shot_ms {
            continue;
        }
        enemy.next_shot_ms = now + enemy.fire_delay_ms;
        shots.push(Projectile {
            pos: Vec2::new(enemy.pos.x, enemy.hitbox().max.y),
            vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
            owner: Owner::Enemy,
        });
    }
    let fired = shots.len();
    for shot in shots {
        state.projectiles.insert(shot);
    }
    fired
}

/// Boss volley if its mode's cooldown has run out.  Returns the number of
/// shots.
pub fn boss_fire(state: &mut SimulationState) -> usize {
    let now = state.clock_ms;
    let Some(boss) = state.boss.as_mut() else {
        return 0;
    };
    if now < boss.next_shot_ms {
        return 0;
    }
    boss.next_shot_ms = now + boss_cooldown(boss.mode);
    let muzzle = Vec2::new(boss.pos.x, boss.hitbox().max.y);
    let volley = boss_volley(boss.mode, muzzle);
    let fired = volley.len();
    for shot in volley {
        state.projectiles.insert(shot);
    }
    fired
}
