//! Collision resolution between entity categories.
//!
//! Every pass first collects the overlapping pairs from an unmodified view
//! of the world, then applies consequences by handle.  A projectile is
//! consumed by the first thing it hits and never counts twice.

use std::collections::HashSet;

use glam::Vec2;

use crate::abilities::{self, DamageOutcome, PickupEffect};
use crate::arena::Handle;
use crate::compute::apply_phase_event;
use crate::config::HazardPolicy;
use crate::constants::*;
use crate::entities::{spawn_position, Aabb, EntityRef, Owner, Player, PlayerId, SimulationState};
use crate::events::GameEvent;
use crate::kinematics::new_explosion;
use crate::phase::{Phase, PhaseEvent};
use crate::rng::RandomSource;
use crate::spawn::{recycle_hazard, roll_drop, scatter_boss_drops, DropSource};

/// Runs every collision pass in a fixed order.  A pass that moves the game
/// out of active play (into a transition or an ending) stops the rest.
pub fn resolve_collisions(state: &mut SimulationState, rng: &mut impl RandomSource) {
    let mut consumed = HashSet::new();
    if state.phase.phase == Phase::AsteroidField {
        projectiles_vs_hazards(state, &mut consumed, rng);
    }
    if state.phase.is_running() {
        player_shots_vs_enemies(state, &mut consumed, rng);
    }
    if state.phase.is_running() {
        player_shots_vs_boss(state, &mut consumed, rng);
    }
    if state.phase.is_running() {
        enemy_shots_vs_players(state, &mut consumed);
    }
    if state.phase.is_running() {
        hazards_vs_players(state, rng);
    }
    if state.phase.is_running() {
        players_vs_pickups(state);
    }
}

// ── Credit & score ────────────────────────────────────────────────────────────

/// Who gets the points when no player projectile was involved.  Player one
/// alone; in co-op the player strictly behind on score, ties to player one.
pub fn fallback_credit(state: &SimulationState) -> PlayerId {
    if !state.two_player {
        return PlayerId::One;
    }
    let score = |id| state.player(id).map(|p| p.score).unwrap_or(0);
    if score(PlayerId::Two) < score(PlayerId::One) {
        PlayerId::Two
    } else {
        PlayerId::One
    }
}

/// Owner of the first player projectile among `hits`, in arena order, or
/// the fallback.
pub fn credit_for(state: &SimulationState, hits: &[Handle]) -> PlayerId {
    hits.iter()
        .filter_map(|&h| state.projectiles.get(h))
        .find_map(|p| p.player_owner())
        .unwrap_or_else(|| fallback_credit(state))
}

/// Adds points and lets the phase machine react to the new combined score.
pub fn award_score(
    state: &mut SimulationState,
    id: PlayerId,
    points: u32,
    rng: &mut impl RandomSource,
) {
    let previous = state.combined_score();
    let Some(player) = state.player_mut(id) else {
        return;
    };
    player.score += points;
    let total = state.combined_score();
    apply_phase_event(state, PhaseEvent::ScoreChanged { previous, total }, rng);
}

fn spawn_explosion(state: &mut SimulationState, source: EntityRef, at: Vec2) {
    state.explosions.insert(new_explosion(at, state.clock_ms));
    state.events.push(GameEvent::ExplosionSpawned { source, at });
}

// ── Projectile × hazard ───────────────────────────────────────────────────────

fn projectiles_vs_hazards(
    state: &mut SimulationState,
    consumed: &mut HashSet<Handle>,
    rng: &mut impl RandomSource,
) {
    let mut hits: Vec<(Handle, Vec<Handle>)> = Vec::new();
    for (hazard_handle, hazard) in state.hazards.iter() {
        let hitbox = hazard.hitbox();
        let shots: Vec<Handle> = state
            .projectiles
            .iter()
            .filter(|(h, p)| !consumed.contains(h) && p.hitbox().overlaps(&hitbox))
            .map(|(h, _)| h)
            .collect();
        if !shots.is_empty() {
            consumed.extend(shots.iter().copied());
            hits.push((hazard_handle, shots));
        }
    }

    for (hazard_handle, shots) in hits {
        // Crossing the score threshold ends the field; later hits never land.
        if state.phase.phase != Phase::AsteroidField {
            break;
        }
        let credited = credit_for(state, &shots);
        for shot in &shots {
            state.projectiles.remove(*shot);
        }
        let Some(at) = state.hazards.get(hazard_handle).map(|h| h.pos) else {
            continue;
        };
        spawn_explosion(state, EntityRef::Hazard(hazard_handle), at);
        roll_drop(state, DropSource::Hazard, at, rng);
        match state.config.hazard_policy {
            HazardPolicy::Recycle => {
                let width = state.config.width;
                if let Some(hazard) = state.hazards.get_mut(hazard_handle) {
                    recycle_hazard(hazard, rng, width);
                }
            }
            HazardPolicy::Replenish => {
                state.hazards.remove(hazard_handle);
            }
        }
        state.events.push(GameEvent::HazardDestroyed { credited, at });
        award_score(state, credited, HAZARD_SCORE, rng);
    }
}

// ── Player projectile × enemy / boss ──────────────────────────────────────────

fn player_shots_overlapping(
    state: &SimulationState,
    consumed: &HashSet<Handle>,
    target: &Aabb,
) -> Vec<(Handle, PlayerId)> {
    state
        .projectiles
        .iter()
        .filter(|(h, p)| !consumed.contains(h) && p.hitbox().overlaps(target))
        .filter_map(|(h, p)| p.player_owner().map(|id| (h, id)))
        .collect()
}

fn player_shots_vs_enemies(
    state: &mut SimulationState,
    consumed: &mut HashSet<Handle>,
    rng: &mut impl RandomSource,
) {
    let mut hits: Vec<(Handle, Vec<(Handle, PlayerId)>)> = Vec::new();
    for (enemy_handle, enemy) in state.enemies.iter() {
        let shots = player_shots_overlapping(state, consumed, &enemy.hitbox());
        if !shots.is_empty() {
            consumed.extend(shots.iter().map(|(h, _)| *h));
            hits.push((enemy_handle, shots));
        }
    }

    for (enemy_handle, shots) in hits {
        let mut killer = None;
        for (shot, owner) in shots {
            state.projectiles.remove(shot);
            if killer.is_some() {
                continue;
            }
            let Some(enemy) = state.enemies.get_mut(enemy_handle) else {
                continue;
            };
            enemy.health -= 1;
            if enemy.health <= 0 {
                killer = Some(owner);
            }
        }
        let Some(killer) = killer else {
            continue;
        };
        let Some(enemy) = state.enemies.remove(enemy_handle) else {
            continue;
        };
        spawn_explosion(state, EntityRef::Enemy(enemy_handle), enemy.pos);
        let source = if enemy.minion {
            DropSource::Minion
        } else {
            apply_phase_event(state, PhaseEvent::EnemyKilled, rng);
            DropSource::Enemy
        };
        roll_drop(state, source, enemy.pos, rng);
        state.events.push(GameEvent::EnemyDestroyed {
            credited: killer,
            at: enemy.pos,
            minion: enemy.minion,
        });
        award_score(state, killer, ENEMY_SCORE, rng);
    }
}

fn player_shots_vs_boss(
    state: &mut SimulationState,
    consumed: &mut HashSet<Handle>,
    rng: &mut impl RandomSource,
) {
    let Some(hitbox) = state.boss.as_ref().map(|b| b.hitbox()) else {
        return;
    };
    let shots = player_shots_overlapping(state, consumed, &hitbox);
    consumed.extend(shots.iter().map(|(h, _)| *h));

    let full_health = state.config.boss_health;
    for (shot, owner) in shots {
        state.projectiles.remove(shot);
        let Some(boss) = state.boss.as_mut() else {
            continue;
        };
        boss.health -= 1;
        let (health, pos) = (boss.health, boss.pos);
        state.events.push(GameEvent::BossDamaged { health });

        if health > 0 {
            if (full_health - health) % BOSS_MILESTONE_HP == 0 {
                scatter_boss_drops(state, pos, 1, BOSS_MILESTONE_SCATTER, rng);
            }
            continue;
        }

        spawn_explosion(state, EntityRef::Boss, pos);
        scatter_boss_drops(state, pos, BOSS_DEFEAT_DROPS, BOSS_DEFEAT_SCATTER, rng);
        state.boss = None;
        state.events.push(GameEvent::BossDefeated { credited: owner });
        award_score(state, owner, BOSS_KILLER_BONUS, rng);
        if state.two_player {
            award_score(state, owner.partner(), BOSS_PARTNER_BONUS, rng);
        }
        apply_phase_event(state, PhaseEvent::BossDefeated, rng);
    }
}

// ── Damage to players ─────────────────────────────────────────────────────────

fn report_damage(state: &mut SimulationState, id: PlayerId, amount: i32, outcome: DamageOutcome) {
    let Some(player) = state.player(id) else {
        return;
    };
    let (pos, health, lives) = (player.pos, player.health, player.lives);
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Absorbed { shield_consumed } => {
            state
                .events
                .push(GameEvent::HitAbsorbed { id, shield_consumed });
        }
        DamageOutcome::Applied | DamageOutcome::Lethal => {
            spawn_explosion(state, EntityRef::Player(id), pos);
            state.events.push(GameEvent::PlayerDamaged { id, amount, health });
            if outcome == DamageOutcome::Lethal {
                tracing::debug!("{id:?} died, {lives} lives left");
                state.events.push(GameEvent::PlayerDied {
                    id,
                    lives_left: lives,
                });
            }
        }
    }
}

fn damage_player(state: &mut SimulationState, id: PlayerId, amount: i32) -> DamageOutcome {
    let now = state.clock_ms;
    let config = state.config.clone();
    let outcome = match state.player_mut(id) {
        Some(player) => abilities::take_damage(player, amount, now, &config),
        None => DamageOutcome::Ignored,
    };
    report_damage(state, id, amount, outcome);
    outcome
}

fn is_alive(state: &SimulationState, id: PlayerId) -> bool {
    state.player(id).is_some_and(|p| p.alive)
}

fn enemy_shots_vs_players(state: &mut SimulationState, consumed: &mut HashSet<Handle>) {
    let mut hits: Vec<(PlayerId, Handle)> = Vec::new();
    for player in state.players.iter().filter(|p| p.alive) {
        let hitbox = player.hitbox();
        for (h, p) in state.projectiles.iter() {
            if p.owner == Owner::Enemy && !consumed.contains(&h) && p.hitbox().overlaps(&hitbox) {
                consumed.insert(h);
                hits.push((player.id, h));
            }
        }
    }

    for (id, shot) in hits {
        if !is_alive(state, id) {
            consumed.remove(&shot);
            continue;
        }
        state.projectiles.remove(shot);
        damage_player(state, id, ENEMY_BULLET_DAMAGE);
    }
}

fn hazards_vs_players(state: &mut SimulationState, rng: &mut impl RandomSource) {
    let mut hits: Vec<(PlayerId, Handle)> = Vec::new();
    for player in state.players.iter().filter(|p| p.alive) {
        let hitbox = player.hitbox();
        for (h, hazard) in state.hazards.iter() {
            if hazard.hitbox().overlaps(&hitbox) {
                hits.push((player.id, h));
            }
        }
    }

    let mut recycled = HashSet::new();
    for (id, hazard_handle) in hits {
        if recycled.contains(&hazard_handle) || !is_alive(state, id) {
            continue;
        }
        let Some(damage) = state.hazards.get(hazard_handle).map(|h| h.kind.contact_damage()) else {
            continue;
        };
        damage_player(state, id, damage);
        let width = state.config.width;
        if let Some(hazard) = state.hazards.get_mut(hazard_handle) {
            recycle_hazard(hazard, rng, width);
        }
        recycled.insert(hazard_handle);
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

/// Mutable access to a player and, if present, the other one.
fn player_and_partner(
    players: &mut [Player],
    id: PlayerId,
) -> (Option<&mut Player>, Option<&mut Player>) {
    if players.is_empty() {
        return (None, None);
    }
    let (left, right) = players.split_at_mut(1);
    let (one, two) = (left.first_mut(), right.first_mut());
    match id {
        PlayerId::One => (one, two),
        PlayerId::Two => (two, one),
    }
}

fn players_vs_pickups(state: &mut SimulationState) {
    let mut hits: Vec<(PlayerId, Handle)> = Vec::new();
    let mut taken = HashSet::new();
    for player in state.players.iter().filter(|p| p.alive) {
        let hitbox = player.hitbox();
        for (h, pickup) in state.pickups.iter() {
            if !taken.contains(&h) && pickup.hitbox().overlaps(&hitbox) {
                taken.insert(h);
                hits.push((player.id, h));
            }
        }
    }

    let now = state.clock_ms;
    for (id, pickup_handle) in hits {
        let Some(pickup) = state.pickups.remove(pickup_handle) else {
            continue;
        };
        let partner_spawn = spawn_position(id.partner(), &state.config);
        let config = &state.config;
        let (collector, partner) = player_and_partner(&mut state.players, id);
        let Some(collector) = collector else {
            continue;
        };
        let partner = if state.two_player { partner } else { None };
        let effect = abilities::apply_pickup(collector, partner, pickup.kind, partner_spawn, now, config);
        state.events.push(GameEvent::PickupCollected {
            id,
            kind: pickup.kind,
        });
        if effect == PickupEffect::PartnerRevived {
            state.events.push(GameEvent::PlayerRespawned { id: id.partner() });
        }
    }
}
