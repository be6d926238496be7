//! Player ability timers, damage intake and life-cycle transitions.
//!
//! Everything here mutates a single [`Player`] in place; callers clone the
//! state first, so the tick as a whole stays pure.

use glam::Vec2;

use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{Expiry, PickupKind, Player};
use crate::rng::RandomSource;

/// Result of offering damage to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The player was already dead.
    Ignored,
    /// Invulnerability or a shield ate the hit.  `shield_consumed` tells
    /// which.
    Absorbed { shield_consumed: bool },
    /// Health went down but stayed positive.
    Applied,
    /// The hit killed the player.
    Lethal,
}

impl DamageOutcome {
    /// Whether health actually changed.
    pub fn landed(self) -> bool {
        matches!(self, DamageOutcome::Applied | DamageOutcome::Lethal)
    }
}

/// Clears every timed ability whose expiry has passed.  Running it twice at
/// the same clock changes nothing.
pub fn expire_abilities(player: &mut Player, now_ms: u64) {
    if player.upgrade.is_some_and(|e| e.has_lapsed(now_ms)) {
        player.upgrade = None;
        player.extra_guns = 0;
    }
    if player.shield.is_some_and(|e| e.has_lapsed(now_ms)) {
        player.shield = None;
    }
    if player.invulnerable.is_some_and(|e| e.has_lapsed(now_ms)) {
        player.invulnerable = None;
    }
}

pub fn activate_upgrade(player: &mut Player, now_ms: u64, config: &GameConfig) -> bool {
    if !player.alive {
        return false;
    }
    player.extra_guns = 1;
    player.upgrade = Some(Expiry::after(now_ms, config.upgrade_ms));
    true
}

pub fn activate_shield(player: &mut Player, now_ms: u64, config: &GameConfig) -> bool {
    if !player.alive {
        return false;
    }
    player.shield = Some(Expiry::after(now_ms, config.shield_ms));
    true
}

pub fn activate_invulnerability(player: &mut Player, now_ms: u64, duration_ms: u64) -> bool {
    if !player.alive {
        return false;
    }
    player.invulnerable = Some(Expiry::after(now_ms, duration_ms));
    true
}

pub fn heal(player: &mut Player, amount: i32) {
    if player.alive {
        player.health = (player.health + amount).min(MAX_HEALTH);
    }
}

/// Damage-intake contract.  Invulnerability is checked before the shield,
/// so an invulnerable player never burns a shield charge.
pub fn take_damage(
    player: &mut Player,
    amount: i32,
    now_ms: u64,
    config: &GameConfig,
) -> DamageOutcome {
    if !player.alive {
        return DamageOutcome::Ignored;
    }
    if player.is_invulnerable(now_ms) {
        return DamageOutcome::Absorbed {
            shield_consumed: false,
        };
    }
    if player.has_shield(now_ms) {
        player.shield = None;
        return DamageOutcome::Absorbed {
            shield_consumed: true,
        };
    }
    player.health -= amount;
    if player.health <= 0 {
        die(player, now_ms, config);
        return DamageOutcome::Lethal;
    }
    DamageOutcome::Applied
}

/// The lethal-hit transition: one life gone, every temporary ability lost.
pub fn die(player: &mut Player, now_ms: u64, config: &GameConfig) {
    player.health = 0;
    player.alive = false;
    player.lives = player.lives.saturating_sub(1);
    player.upgrade = None;
    player.extra_guns = 0;
    player.shield = None;
    player.invulnerable = None;
    player.teleport_charge = false;
    player.blink_phase = 0.0;
    player.respawn_deadline = Some(Expiry::after(now_ms, config.respawn_deadline_ms));
}

/// Brings a dead player back at half health with a grace period.
pub fn respawn(player: &mut Player, spawn: Vec2, now_ms: u64, config: &GameConfig) {
    player.alive = true;
    player.health = REVIVE_HEALTH;
    player.respawn_deadline = None;
    player.pos = spawn;
    player.invulnerable = Some(Expiry::after(now_ms, config.grace_ms));
}

/// Jumps to a random spot.  Needs a live player holding a charge.
pub fn teleport(
    player: &mut Player,
    rng: &mut impl RandomSource,
    now_ms: u64,
    config: &GameConfig,
) -> bool {
    if !player.alive || !player.teleport_charge {
        return false;
    }
    let x = rng.int_inclusive(
        TELEPORT_MARGIN as i32,
        (config.width - TELEPORT_MARGIN) as i32,
    );
    let y = rng.int_inclusive(
        TELEPORT_MARGIN as i32,
        (config.height - TELEPORT_BOTTOM_MARGIN) as i32,
    );
    player.pos = Vec2::new(x as f32, y as f32);
    player.invulnerable = Some(Expiry::after(now_ms, config.grace_ms));
    player.teleport_charge = false;
    true
}

/// What collecting a pickup did, beyond the collector's own stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupEffect {
    Applied,
    /// A revive pickup brought the partner back.
    PartnerRevived,
}

/// Applies a pickup to its collector.  A `Revive` goes to `partner` when one
/// is passed in, dead, and still holding lives; otherwise it heals the
/// collector.
pub fn apply_pickup(
    collector: &mut Player,
    partner: Option<&mut Player>,
    kind: PickupKind,
    partner_spawn: Vec2,
    now_ms: u64,
    config: &GameConfig,
) -> PickupEffect {
    match kind {
        PickupKind::Revive => match partner {
            Some(partner) if !partner.alive && partner.lives > 0 => {
                respawn(partner, partner_spawn, now_ms, config);
                PickupEffect::PartnerRevived
            }
            _ => {
                heal(collector, REVIVE_HEAL);
                PickupEffect::Applied
            }
        },
        PickupKind::InvulnerabilityGift => {
            activate_invulnerability(collector, now_ms, config.invulnerability_gift_ms);
            PickupEffect::Applied
        }
        PickupKind::WeaponUpgrade => {
            activate_upgrade(collector, now_ms, config);
            PickupEffect::Applied
        }
        PickupKind::ExtraLife => {
            heal(collector, EXTRA_LIFE_HEAL);
            collector.lives += 1;
            PickupEffect::Applied
        }
        PickupKind::TeleportCharge => {
            collector.teleport_charge = true;
            PickupEffect::Applied
        }
        PickupKind::Shield => {
            activate_shield(collector, now_ms, config);
            PickupEffect::Applied
        }
    }
}
